mod config;
mod handler;
mod logging;

use std::net::SocketAddr;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use thiserror::Error;

use common::Spa;
use config::Config;
use handler::Detector;

use log::{ error, warn, info, debug };

use lazy_static::lazy_static;
use tokio::net::{ TcpListener, TcpStream };


lazy_static!{
    static ref CONFIG: Config = Config::new();
}

#[tokio::main]
async fn main() {
    logging::init();

    let detector = Detector::new(Spa, CONFIG.glare, CONFIG.general.max_body);
    info!("glare thresholds {thresholds:?}", thresholds = CONFIG.glare);

    let listener = match TcpListener::bind(CONFIG.general.socket).await {
        Ok(l) => l,
        Err(e) => {
            error!("unable to bind {socket}. {e}", socket = CONFIG.general.socket);
            return;
        },
    };
    info!("listening on {socket}, serving POST {path}", socket = CONFIG.general.socket, path = handler::DETECT_PATH);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, addr)) => {
                        debug!("received new connection from {addr}");
                        tokio::spawn(accept_connection(stream, addr, detector));
                    },
                    Err(e) => warn!("unable to accept connection. {e}"),
                }
            },
            _ = &mut shutdown => {
                info!("received ctrl-c. shutting down.");
                break;
            },
        }
    }
}

#[derive(Error, Debug)]
enum ServeError {
    #[error("http connection failed: {0}")]
    Connection(hyper::Error),
}

async fn accept_connection(stream: TcpStream, addr: SocketAddr, detector: Detector<Spa>) {
    if let Err(e) = handle_connection(stream, detector).await {
        match e {
            ServeError::Connection(e) => warn!("connection from {addr} failed. {e}"),
        }
    } else {
        debug!("{addr} done.");
    }
}

async fn handle_connection(stream: TcpStream, detector: Detector<Spa>) -> Result<(), ServeError> {
    let io = TokioIo::new(stream);
    http1::Builder::new()
        .serve_connection(io, service_fn(move |req| handler::serve(detector, req)))
        .await
        .map_err(|e| { ServeError::Connection(e) })
}
