use std::net::SocketAddr;

use serde::{ Deserialize, Deserializer, de::Unexpected };

#[derive(Debug, Deserialize)]
pub struct General {
    #[serde(deserialize_with = "deserialize_socket")]
    pub socket: SocketAddr,

    /// Largest accepted request body, in bytes.
    #[serde(deserialize_with = "deserialize_max_body")]
    pub max_body: usize,
}

fn deserialize_socket<'de, D>(d: D) -> Result<SocketAddr, D::Error> where D: Deserializer<'de> {
    let s = String::deserialize(d)?;
    match s.parse::<SocketAddr>() {
        Ok(a) => Ok(a),
        Err(e) => Err(serde::de::Error::invalid_value(Unexpected::Str(&s), &format!("to be ip:port. (general.socket) {e}").as_str())),
    }
}

fn deserialize_max_body<'de, D>(d: D) -> Result<usize, D::Error> where D: Deserializer<'de> {
    let s = String::deserialize(d)?;
    match s.parse::<usize>() {
        Ok(v) if v > 0 => Ok(v),
        Ok(v) => Err(serde::de::Error::invalid_value(Unexpected::Unsigned(v as u64), &"to be greater than zero. (general.max_body)")),
        Err(e) => Err(serde::de::Error::invalid_value(Unexpected::Str(&s), &format!("to be an usize. (general.max_body) {e}").as_str())),
    }
}
