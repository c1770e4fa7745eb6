//! HTTP request handler for JSON-RPC calls

use std::error::Error as StdError;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{ALLOW, CONTENT_LENGTH, CONTENT_TYPE};
use http::{Method, Request, Response, StatusCode};
use http_body::Body;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use tracing::{debug, error, warn};

use nsrpc_json_rpc_server::{Dispatcher, ResponseAdapter};

use crate::{CorsLayer, Result, ServerConfig};

/// Routes HTTP requests to the dispatcher and writes adapter output.
#[derive(Clone)]
pub struct RpcHttpHandler {
    pub(crate) config: Arc<ServerConfig>,
    dispatcher: Arc<Dispatcher>,
    adapter: ResponseAdapter,
}

impl RpcHttpHandler {
    pub fn new(
        config: Arc<ServerConfig>,
        dispatcher: Arc<Dispatcher>,
        adapter: ResponseAdapter,
    ) -> Self {
        Self {
            config,
            dispatcher,
            adapter,
        }
    }

    /// Handle one HTTP request, applying CORS headers when enabled.
    pub async fn handle<B>(&self, req: Request<B>) -> Result<Response<Full<Bytes>>>
    where
        B: Body<Data = Bytes>,
        B::Error: Into<Box<dyn StdError + Send + Sync>>,
    {
        let mut response = self.route(req).await?;
        if self.config.enable_cors {
            CorsLayer::apply_cors_headers(response.headers_mut());
        }
        Ok(response)
    }

    /// Like [`handle`](Self::handle), but turns transport failures into a
    /// plain 500 so the connection task always has a response to send.
    pub async fn handle_or_500<B>(&self, req: Request<B>) -> Response<Full<Bytes>>
    where
        B: Body<Data = Bytes>,
        B::Error: Into<Box<dyn StdError + Send + Sync>>,
    {
        match self.handle(req).await {
            Ok(response) => response,
            Err(err) => {
                error!("Request handling error: {}", err);
                let mut response = Response::new(Full::new(Bytes::from_static(
                    b"Internal Server Error",
                )));
                *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                response
            }
        }
    }

    async fn route<B>(&self, req: Request<B>) -> Result<Response<Full<Bytes>>>
    where
        B: Body<Data = Bytes>,
        B::Error: Into<Box<dyn StdError + Send + Sync>>,
    {
        let path = req.uri().path();
        debug!("Handling {} {}", req.method(), path);

        if path != self.config.rpc_path {
            return plain_response(StatusCode::NOT_FOUND, "Not Found");
        }

        match req.method() {
            &Method::POST => self.handle_json_rpc_request(req).await,
            &Method::OPTIONS => Ok(Response::builder()
                .status(StatusCode::NO_CONTENT)
                .body(Full::new(Bytes::new()))?),
            _ => Ok(Response::builder()
                .status(StatusCode::METHOD_NOT_ALLOWED)
                .header(ALLOW, "POST, OPTIONS")
                .body(Full::new(Bytes::from_static(b"Method Not Allowed")))?),
        }
    }

    async fn handle_json_rpc_request<B>(&self, req: Request<B>) -> Result<Response<Full<Bytes>>>
    where
        B: Body<Data = Bytes>,
        B::Error: Into<Box<dyn StdError + Send + Sync>>,
    {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or("");

        if !content_type.starts_with("application/json") {
            warn!("Invalid content type: {}", content_type);
            return plain_response(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Content-Type must be application/json",
            );
        }

        let declared_length = req
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|len| len.to_str().ok())
            .and_then(|len| len.parse::<usize>().ok());
        if declared_length.is_some_and(|len| len > self.config.max_body_size) {
            warn!("Request body too large: {:?} bytes", declared_length);
            return plain_response(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large");
        }

        let body = Limited::new(req.into_body(), self.config.max_body_size);
        let body_bytes = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
                warn!("Request body exceeded {} bytes", self.config.max_body_size);
                return plain_response(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large");
            }
            Err(err) => {
                error!("Failed to read request body: {}", err);
                return plain_response(StatusCode::BAD_REQUEST, "Failed to read request body");
            }
        };

        let message = self.dispatcher.handle_bytes(&body_bytes).await;
        let encoded = self.adapter.encode(message);

        debug!(status = %encoded.status, "Sending JSON-RPC response");
        Ok(Response::builder()
            .status(encoded.status)
            .header(CONTENT_TYPE, "application/json")
            .body(Full::new(encoded.body))?)
    }
}

fn plain_response(status: StatusCode, text: &'static str) -> Result<Response<Full<Bytes>>> {
    Ok(Response::builder()
        .status(status)
        .body(Full::new(Bytes::from_static(text.as_bytes())))?)
}
