//! Network transports.

use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt};
use reqwest::Client;

use crate::fetch::types::{FetchError, FetchRequest, FetchResponse};

/// Performs a single network round trip.
///
/// The returned future owns everything it needs so it can be detached onto
/// the runtime and outlive the caller when a deadline fires.
pub trait Transport: Send + Sync + 'static {
    fn send(&self, request: FetchRequest) -> BoxFuture<'static, Result<FetchResponse, FetchError>>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: FetchRequest) -> BoxFuture<'static, Result<FetchResponse, FetchError>> {
        (**self).send(request)
    }
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: FetchRequest) -> BoxFuture<'static, Result<FetchResponse, FetchError>> {
        let client = self.client.clone();

        async move {
            let mut builder = client
                .request(request.method, request.url)
                .headers(request.headers)
                .header("sec-fetch-mode", request.mode.as_str());
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder
                .send()
                .await
                .map_err(|e| FetchError::Network(e.to_string()))?;
            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| FetchError::Network(e.to_string()))?;

            Ok(FetchResponse { status, body })
        }
        .boxed()
    }
}
