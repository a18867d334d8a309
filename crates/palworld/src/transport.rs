//! The network layer underneath [`HttpApiClient`](crate::api::HttpApiClient).
//!
//! The client never talks to the browser directly: it hands a fully built [`ApiRequest`]
//! to a [`Transport`] and gets back an [`HttpResponse`]. [`FetchTransport`] is the
//! browser implementation on top of `gloo-net`.

use std::time::Duration;

use gloo_net::http::Request;
use web_sys::{AbortController, RequestCredentials};

use crate::api::{ApiError, ApiHeaders, ApiResult, HttpMethod};

/// A request ready to leave the client.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: ApiHeaders,
    /// Serialized JSON body.
    pub body: Option<String>,
    pub with_credentials: bool,
}

/// Status and raw body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[async_trait::async_trait(?Send)]
pub trait Transport {
    /// Performs one request. Only failures to complete the exchange are errors here;
    /// any HTTP status is a successful send.
    async fn send(&self, request: ApiRequest) -> ApiResult<HttpResponse>;

    /// Resolves once `duration` has elapsed.
    async fn delay(&self, duration: Duration);
}

/// Maps the client's credentials flag onto the fetch credentials mode.
pub fn credentials_mode(with_credentials: bool) -> RequestCredentials {
    if with_credentials {
        RequestCredentials::Include
    } else {
        RequestCredentials::SameOrigin
    }
}

/// Runs `on_drop` when dropped, unless disarmed first.
pub struct AbortOnDrop<F: FnOnce()> {
    on_drop: Option<F>,
}

impl<F: FnOnce()> AbortOnDrop<F> {
    pub fn new(on_drop: F) -> Self {
        Self {
            on_drop: Some(on_drop),
        }
    }

    pub fn disarm(mut self) {
        self.on_drop = None;
    }
}

impl<F: FnOnce()> Drop for AbortOnDrop<F> {
    fn drop(&mut self) {
        if let Some(on_drop) = self.on_drop.take() {
            on_drop();
        }
    }
}

/// [`Transport`] backed by the browser fetch API.
///
/// Each request gets its own `AbortController`; dropping the send future before it
/// completes (as the client does on timeout) cancels the fetch in the browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

#[async_trait::async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<HttpResponse> {
        let builder = match request.method {
            HttpMethod::Get => Request::get(&request.url),
            HttpMethod::Post => Request::post(&request.url),
        };

        let controller = AbortController::new().map_err(|err| {
            ApiError::NetworkError(gloo_net::Error::GlooError(format!(
                "Failed to create AbortController: {err:?}"
            )))
        })?;
        let builder = builder
            .headers(request.headers.into())
            .credentials(credentials_mode(request.with_credentials))
            .abort_signal(Some(&controller.signal()));

        let guard = AbortOnDrop::new(|| {
            tracing::debug!(url = %request.url, "Aborting unfinished request");
            controller.abort();
        });

        let response = match request.body {
            Some(body) => builder
                .body(body)
                .map_err(ApiError::NetworkError)?
                .send()
                .await,
            None => builder.send().await,
        }
        .map_err(ApiError::NetworkError)?;

        let status = response.status();
        let body = response.text().await.map_err(ApiError::NetworkError)?;
        guard.disarm();
        Ok(HttpResponse { status, body })
    }

    async fn delay(&self, duration: Duration) {
        let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        gloo_timers::future::TimeoutFuture::new(millis).await;
    }
}
