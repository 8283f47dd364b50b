//! A small HTTP/1 front end for `RequestHandler`.
//!
//! Any `POST` is treated as an expense submission regardless of its path. `OPTIONS` answers the
//! browser CORS preflight. Everything else gets a 405.

use crate::handler::RequestHandler;
use crate::response::Response;
use crate::Result;
use anyhow::Context;
use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Incoming};
use hyper::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW, CONTENT_TYPE,
};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

/// The largest request body that will be read.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

const ALLOWED_METHODS: &str = "POST, OPTIONS";

pub type HttpResponse = hyper::Response<Full<Bytes>>;

/// Accepts connections on `addr` until Ctrl-C is received.
pub async fn serve(handler: Arc<RequestHandler>, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Unable to listen on {addr}"))?;
    let local_addr = listener.local_addr().context("Unable to read the bound address")?;
    info!(
        "Accepting expenses for '{}' on http://{local_addr}",
        handler.target().worksheet_name()
    );

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!("Failed to accept a connection: {e}");
                    continue;
                }
            },
            _ = &mut shutdown => {
                info!("Shutting down");
                return Ok(());
            }
        };
        debug!("Connection from {peer}");

        let handler = Arc::clone(&handler);
        tokio::spawn(async move {
            let service = service_fn(move |request: Request<Incoming>| {
                let handler = Arc::clone(&handler);
                async move { Ok::<_, Infallible>(route(&handler, request).await) }
            });
            if let Err(e) = http1::Builder::new()
                .serve_connection(TokioIo::new(stream), service)
                .await
            {
                debug!("Connection from {peer} closed with an error: {e}");
            }
        });
    }
}

/// Dispatches one HTTP request.
pub async fn route<B>(handler: &RequestHandler, request: Request<B>) -> HttpResponse
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = request.method().clone();
    match method {
        Method::OPTIONS => preflight(),
        Method::POST => {
            let payload = match Limited::new(request.into_body(), MAX_BODY_BYTES)
                .collect()
                .await
            {
                Ok(collected) => collected.to_bytes(),
                Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
                    warn!("Rejected a request body larger than {MAX_BODY_BYTES} bytes");
                    return to_http(&Response::malformed(format!(
                        "The request body is larger than {MAX_BODY_BYTES} bytes"
                    )));
                }
                Err(e) => {
                    warn!("Unable to read the request body: {e}");
                    return to_http(&Response::malformed(format!(
                        "Unable to read the request body: {e}"
                    )));
                }
            };
            to_http(&handler.handle(&payload).await)
        }
        method => {
            debug!("Rejected method {method}");
            let body = serde_json::json!({
                "message": format!("❌ Method {method} is not allowed"),
                "errors": [],
            });
            let mut response = json_response(StatusCode::METHOD_NOT_ALLOWED, body.to_string());
            response
                .headers_mut()
                .insert(ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
            response
        }
    }
}

/// Converts a handler `Response` to an HTTP response with the JSON body and CORS headers.
pub fn to_http(response: &Response) -> HttpResponse {
    let body = match response.to_json() {
        Ok(json) => json,
        Err(e) => {
            error!("{e:#}");
            return json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                r#"{"message":"❌ Unable to serialize the response","errors":[]}"#.to_string(),
            );
        }
    };
    json_response(response.status(), body)
}

fn preflight() -> HttpResponse {
    let mut response = json_response(StatusCode::NO_CONTENT, String::new());
    let headers = response.headers_mut();
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}

fn json_response(status: StatusCode, body: String) -> HttpResponse {
    let mut response = hyper::Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}
