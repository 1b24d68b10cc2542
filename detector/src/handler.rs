use std::convert::Infallible;

use common::{ predict, GlareError, RawGlareRequest, SolarPositionProvider, Thresholds };
use http_body_util::{ BodyExt, Full, LengthLimitError, Limited };
use hyper::body::{ Body, Bytes };
use hyper::header::{ HeaderValue, CONTENT_TYPE };
use hyper::{ Method, Request, Response, StatusCode };
use log::{ debug, error, info, warn };
use serde::Serialize;
use size_format::SizeFormatterBinary;
use uuid::Uuid;

pub const DETECT_PATH: &str = "/glare/detect";

/// Everything a request needs, cheap enough to copy into every connection.
#[derive(Debug, Clone, Copy)]
pub struct Detector<P> {
    provider: P,
    thresholds: Thresholds,
    max_body: usize,
}

/// Response envelope. `glare` is sent as the string "true" or "false".
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum Reply {
    Success { glare: String },
    Error { detail: String },
}

impl Reply {
    fn error(detail: String) -> Reply {
        Reply::Error { detail }
    }
}

impl<P: SolarPositionProvider> Detector<P> {
    pub fn new(provider: P, thresholds: Thresholds, max_body: usize) -> Self {
        Detector { provider, thresholds, max_body }
    }

    pub fn handle(&self, id: Uuid, method: &Method, path: &str, body: &[u8]) -> Response<Full<Bytes>> {
        if path != DETECT_PATH {
            debug!("[{id}] no route for {path}");
            return reply(StatusCode::NOT_FOUND, &Reply::error(format!("no route for {path}.")));
        }
        if *method != Method::POST {
            debug!("[{id}] {method} not allowed");
            return reply(StatusCode::METHOD_NOT_ALLOWED, &Reply::error(format!("method {method} not allowed on {path}.")));
        }

        match self.detect(id, body) {
            Ok(glare) => reply(StatusCode::OK, &Reply::Success { glare: glare.to_string() }),
            Err(e) => {
                warn!("[{id}] detection failed. {e}");
                reply(StatusCode::INTERNAL_SERVER_ERROR, &Reply::error(e.detail()))
            },
        }
    }

    fn detect(&self, id: Uuid, body: &[u8]) -> Result<bool, GlareError> {
        let request = RawGlareRequest::from_slice(body)?.validate()?;
        let glare = predict(&request, &self.provider, &self.thresholds)?;

        info!("[{id}] lat={lat} lon={lon} epoch={epoch} orientation={orientation} glare={glare}",
            lat = request.latitude(),
            lon = request.longitude(),
            epoch = request.epoch(),
            orientation = request.orientation(),
        );
        Ok(glare)
    }
}

/// Reads the whole body, up to the configured limit, and answers it.
pub async fn serve<P, B>(detector: Detector<P>, req: Request<B>) -> Result<Response<Full<Bytes>>, Infallible>
where
    P: SolarPositionProvider,
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let id = Uuid::new_v4();
    let (parts, body) = req.into_parts();
    debug!("[{id}] {method} {path}", method = parts.method, path = parts.uri.path());

    let bytes = match Limited::new(body, detector.max_body).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            let max = SizeFormatterBinary::new(detector.max_body as u64);
            warn!("[{id}] body exceeds {max}B");
            return Ok(reply(StatusCode::INTERNAL_SERVER_ERROR, &Reply::error(format!("request body exceeds {max}B."))));
        },
        Err(e) => {
            warn!("[{id}] unable to read body. {e}");
            return Ok(reply(StatusCode::INTERNAL_SERVER_ERROR, &Reply::error(format!("unable to read request body. {e}"))));
        },
    };
    debug!("[{id}] received {total}B", total = SizeFormatterBinary::new(bytes.len() as u64));

    Ok(detector.handle(id, &parts.method, parts.uri.path(), &bytes))
}

fn reply(status: StatusCode, body: &Reply) -> Response<Full<Bytes>> {
    let json = match serde_json::to_vec(body) {
        Ok(j) => j,
        Err(e) => {
            error!("unable to serialize reply. {e}");
            br#"{"status":"error","detail":"unable to serialize reply."}"#.to_vec()
        },
    };
    let mut res = Response::new(Full::new(Bytes::from(json)));
    *res.status_mut() = status;
    res.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    res
}

#[cfg(test)]
mod tests {
    use chrono::{ DateTime, Utc };
    use serde_json::{ json, Value };

    use super::*;

    #[derive(Debug, Clone, Copy)]
    struct Fixed {
        azimuth: f64,
        altitude: f64,
    }

    impl SolarPositionProvider for Fixed {
        fn azimuth(&self, _: f64, _: f64, _: &DateTime<Utc>) -> Result<f64, GlareError> {
            Ok(self.azimuth)
        }

        fn altitude(&self, _: f64, _: f64, _: &DateTime<Utc>) -> Result<f64, GlareError> {
            Ok(self.altitude)
        }
    }

    const LOW_NORTHERN_SUN: Fixed = Fixed { azimuth: 350.0, altitude: 10.0 };

    fn detector() -> Detector<Fixed> {
        Detector::new(LOW_NORTHERN_SUN, Thresholds::default(), 1024)
    }

    async fn send(detector: Detector<Fixed>, method: Method, path: &str, body: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap();
        let res = serve(detector, req).await.unwrap();
        let status = res.status();
        assert_eq!(res.headers()[CONTENT_TYPE], "application/json");

        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn body(orientation: f64) -> String {
        json!({ "lat": 49.2699648, "lon": -123.1290368, "epoch": 1588704959.321, "orientation": orientation }).to_string()
    }

    #[tokio::test]
    async fn glare_is_reported_as_string() {
        let (status, reply) = send(detector(), Method::POST, DETECT_PATH, &body(-10.2)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply, json!({ "status": "success", "glare": "true" }));

        let (status, reply) = send(detector(), Method::POST, DETECT_PATH, &body(90.0)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply, json!({ "status": "success", "glare": "false" }));
    }

    #[tokio::test]
    async fn validation_errors_are_500_with_detail() {
        let body = r#"{"lat": 45, "lon": -123.1, "epoch": 1588704959.321, "orientation": -10.2}"#;
        let (status, reply) = send(detector(), Method::POST, DETECT_PATH, body).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply, json!({ "status": "error", "detail": "Latitude: 45 is not a float within 0 to 90." }));
    }

    #[tokio::test]
    async fn missing_field_is_500_with_detail() {
        let body = r#"{"lat": 45.0, "epoch": 1588704959.321, "orientation": -10.2}"#;
        let (status, reply) = send(detector(), Method::POST, DETECT_PATH, body).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply["detail"], "Longitude: missing field 'lon'.");
    }

    #[tokio::test]
    async fn garbage_body_is_500() {
        let (status, reply) = send(detector(), Method::POST, DETECT_PATH, "lat=45").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply["status"], "error");
        assert!(reply["detail"].as_str().unwrap().starts_with("malformed request body."));
    }

    #[tokio::test]
    async fn oversized_body_is_refused() {
        let small = Detector::new(LOW_NORTHERN_SUN, Thresholds::default(), 16);
        let (status, reply) = send(small, Method::POST, DETECT_PATH, &body(-10.2)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(reply["detail"].as_str().unwrap().starts_with("request body exceeds"));
    }

    #[tokio::test]
    async fn wrong_method_and_path() {
        let (status, reply) = send(detector(), Method::GET, DETECT_PATH, "").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(reply["status"], "error");

        let (status, reply) = send(detector(), Method::POST, "/glare", &body(0.0)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(reply["detail"], "no route for /glare.");
    }
}
