use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use futures::future::{Either, select};

use crate::config::ClientConfig;
use crate::data::{LoginRequest, LoginResponse, LoginStatusResponse};
use crate::interceptor::{BrowserNavigator, RedirectOnUnauthorized, ResponseInterceptor};
use crate::transport::{ApiRequest, FetchTransport, HttpResponse, Transport};

pub const CHECK_LOGIN_STATUS_ENDPOINT: &str = "/api/check-login-status";
pub const LOGIN_ENDPOINT: &str = "/api/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Errors carrying an [`HttpResponse`] keep the server's status and body as received.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not Found")]
    NotFound(HttpResponse),
    #[error("Bad Request")]
    BadRequest(HttpResponse),
    #[error("Internal Server Error ({})", .0.status)]
    InternalServerError(HttpResponse),
    #[error("Unauthorized Access")]
    UnauthorizedAccess(HttpResponse),
    #[error("Forbidden Access")]
    ForbiddenAccess(HttpResponse),
    #[error("Network error: {0}")]
    NetworkError(gloo_net::Error),
    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("Parse error: {0}")]
    ParseError(serde_json::Error),
    #[error("Serialize error: {0}")]
    SerializeError(serde_json::Error),
    #[error("Unexpected response status code: {}", .0.status)]
    UnexpectedStatusCode(HttpResponse),
}

impl ApiError {
    /// The response that caused this error, if one was received.
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            ApiError::BadRequest(response)
            | ApiError::UnauthorizedAccess(response)
            | ApiError::ForbiddenAccess(response)
            | ApiError::NotFound(response)
            | ApiError::InternalServerError(response)
            | ApiError::UnexpectedStatusCode(response) => Some(response),
            ApiError::NetworkError(_)
            | ApiError::Timeout(_)
            | ApiError::ParseError(_)
            | ApiError::SerializeError(_) => None,
        }
    }

    /// HTTP status of the response that caused this error, if one was received.
    pub fn status(&self) -> Option<u16> {
        self.response().map(|response| response.status)
    }

    /// Raw body of the response that caused this error, if one was received.
    pub fn body(&self) -> Option<&str> {
        self.response().map(|response| response.body.as_str())
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Request headers. Names are case-insensitive and stored lowercased,
/// so setting a header twice under different casing replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiHeaders(HashMap<String, String>);

impl ApiHeaders {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn insert(&mut self, key: String, value: String) {
        self.0.insert(key.to_ascii_lowercase(), value);
    }

    pub fn delete(&mut self, key: &str) {
        self.0.remove(&key.to_ascii_lowercase());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(&key.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<ApiHeaders> for gloo_net::http::Headers {
    fn from(val: ApiHeaders) -> Self {
        let headers = gloo_net::http::Headers::new();
        for (key, value) in val.0 {
            headers.set(&key, &value);
        }
        headers
    }
}

// Reusable response handling functions
fn handle_response_status(response: HttpResponse) -> ApiResult<HttpResponse> {
    match response.status {
        200..=299 => Ok(response),
        400 => Err(ApiError::BadRequest(response)),
        401 => Err(ApiError::UnauthorizedAccess(response)),
        403 => Err(ApiError::ForbiddenAccess(response)),
        404 => Err(ApiError::NotFound(response)),
        500..=599 => Err(ApiError::InternalServerError(response)),
        _ => Err(ApiError::UnexpectedStatusCode(response)),
    }
}

fn parse_json_response<T>(response: &HttpResponse) -> ApiResult<T>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(&response.body).map_err(ApiError::ParseError)
}

// Combined function for the common pattern
fn handle_json_response<T>(response: HttpResponse) -> ApiResult<T>
where
    T: serde::de::DeserializeOwned,
{
    let validated_response = handle_response_status(response)?;
    parse_json_response(&validated_response)
}

#[async_trait::async_trait(?Send)]
pub trait ApiClient {
    async fn get<T>(&self, endpoint: &str) -> ApiResult<T>
    where
        T: serde::de::DeserializeOwned;

    async fn post<T, B>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize;
}

/// The configured HTTP client every request of the application goes through.
///
/// Failed requests are logged and shown to each registered [`ResponseInterceptor`]
/// before the error is handed back to the caller untouched.
pub struct HttpApiClient<T = FetchTransport> {
    config: ClientConfig,
    transport: T,
    interceptors: Vec<Rc<dyn ResponseInterceptor>>,
}

impl<T: Transport> HttpApiClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            interceptors: Vec::new(),
        }
    }

    /// Registers an interceptor. Interceptors run in registration order.
    pub fn with_interceptor(mut self, interceptor: impl ResponseInterceptor + 'static) -> Self {
        self.interceptors.push(Rc::new(interceptor));
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn build_request(&self, method: HttpMethod, endpoint: &str, body: Option<String>) -> ApiRequest {
        ApiRequest {
            method,
            url: self.config.url_for(endpoint),
            headers: self.config.headers.clone(),
            body,
            with_credentials: self.config.with_credentials,
        }
    }

    /// Sends a request, failing with [`ApiError::Timeout`] once the configured timeout elapses.
    /// A zero timeout waits for the transport indefinitely.
    async fn dispatch(&self, request: ApiRequest) -> ApiResult<HttpResponse> {
        tracing::debug!(method = ?request.method, url = %request.url, "Sending request");

        let timeout = self.config.timeout;
        if timeout.is_zero() {
            return self.transport.send(request).await;
        }

        let send = self.transport.send(request);
        let delay = self.transport.delay(timeout);

        match select(send, delay).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => Err(ApiError::Timeout(timeout)),
        }
    }

    fn intercept<R>(&self, result: ApiResult<R>) -> ApiResult<R> {
        if let Err(err) = &result {
            tracing::error!(error = %err, status = ?err.status(), "API error");
            for interceptor in &self.interceptors {
                interceptor.on_error(err);
            }
        }
        result
    }

    async fn make_request(&self, method: HttpMethod, endpoint: &str) -> ApiResult<HttpResponse> {
        self.dispatch(self.build_request(method, endpoint, None))
            .await
    }

    async fn make_request_with_body<B>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: &B,
    ) -> ApiResult<HttpResponse>
    where
        B: serde::Serialize,
    {
        let body = serde_json::to_string(body).map_err(ApiError::SerializeError)?;
        self.dispatch(self.build_request(method, endpoint, Some(body)))
            .await
    }
}

#[async_trait::async_trait(?Send)]
impl<T: Transport> ApiClient for HttpApiClient<T> {
    async fn get<R>(&self, endpoint: &str) -> ApiResult<R>
    where
        R: serde::de::DeserializeOwned,
    {
        let result = match self.make_request(HttpMethod::Get, endpoint).await {
            Ok(response) => handle_json_response(response),
            Err(err) => Err(err),
        };
        self.intercept(result)
    }

    async fn post<R, B>(&self, endpoint: &str, body: &B) -> ApiResult<R>
    where
        R: serde::de::DeserializeOwned,
        B: serde::Serialize,
    {
        let result = match self
            .make_request_with_body(HttpMethod::Post, endpoint, body)
            .await
        {
            Ok(response) => handle_json_response(response),
            Err(err) => Err(err),
        };
        self.intercept(result)
    }
}

/// The API of the Palworld server as used by the front-end.
///
/// Cloning an `Api` is cheap and every clone shares the same underlying client,
/// so the application builds one at its root and hands out clones.
pub struct Api<T = FetchTransport> {
    client: Rc<HttpApiClient<T>>,
}

impl<T> Clone for Api<T> {
    fn clone(&self) -> Self {
        Self {
            client: Rc::clone(&self.client),
        }
    }
}

impl<T> PartialEq for Api<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T> Api<T> {
    /// Whether both handles refer to the same client.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.client, &other.client)
    }
}

impl<T: Transport> Api<T> {
    pub fn new(client: HttpApiClient<T>) -> Self {
        Api {
            client: Rc::new(client),
        }
    }

    pub fn client(&self) -> &HttpApiClient<T> {
        &self.client
    }

    pub async fn check_login_status(&self) -> ApiResult<LoginStatusResponse> {
        self.client
            .get(CHECK_LOGIN_STATUS_ENDPOINT)
            .await
            .inspect_err(|err| tracing::error!(error = %err, "Error checking login status"))
    }

    pub async fn login(&self, username: &str, password: &str) -> ApiResult<LoginResponse> {
        let body = LoginRequest { username, password };
        self.client
            .post(LOGIN_ENDPOINT, &body)
            .await
            .inspect_err(|err| tracing::error!(error = %err, username, "Error during login"))
    }
}

impl Api<FetchTransport> {
    /// Builds the browser client: fetch transport, and a redirect to the login page on 401.
    pub fn browser(config: ClientConfig) -> Self {
        let client = HttpApiClient::new(config, FetchTransport)
            .with_interceptor(RedirectOnUnauthorized::new(BrowserNavigator));
        Api::new(client)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use futures::executor::block_on;

    use super::*;
    use crate::interceptor::testing::RecordingNavigator;
    use crate::interceptor::LOGIN_ROUTE;
    use crate::transport::mock::{MockReply, MockTransport};

    fn api_with(transport: MockTransport) -> (Api<MockTransport>, RecordingNavigator) {
        let navigator = RecordingNavigator::default();
        let client = HttpApiClient::new(ClientConfig::default(), transport)
            .with_interceptor(RedirectOnUnauthorized::new(navigator.clone()));
        (Api::new(client), navigator)
    }

    #[test]
    fn test_clones_share_one_client() {
        let (api, _) = api_with(MockTransport::default());
        let other = api.clone();
        assert!(api.ptr_eq(&other));
        assert!(std::ptr::eq(api.client(), other.client()));

        let (separate, _) = api_with(MockTransport::default());
        assert!(!api.ptr_eq(&separate));
    }

    #[test]
    fn test_check_login_status_returns_body() {
        let transport =
            MockTransport::default().respond(200, r#"{"isLoggedIn":false,"error":"no session"}"#);
        let (api, navigator) = api_with(transport.clone());

        let status = block_on(api.check_login_status()).unwrap();
        assert_eq!(
            status,
            LoginStatusResponse {
                is_logged_in: false,
                error: Some("no session".to_string()),
            }
        );

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Get);
        assert_eq!(requests[0].url, "/api/check-login-status");
        assert_eq!(requests[0].body, None);
        assert!(navigator.visits().is_empty());
    }

    #[test]
    fn test_login_posts_credentials() {
        let transport =
            MockTransport::default().respond(200, r#"{"isLoggedIn":true,"token":"t0k3n"}"#);
        let (api, _) = api_with(transport.clone());

        let login = block_on(api.login("admin", "hunter2")).unwrap();
        assert!(login.is_logged_in);
        assert_eq!(login.token.as_deref(), Some("t0k3n"));

        let request = &transport.requests()[0];
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "/api/login");
        let body: serde_json::Value =
            serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "username": "admin", "password": "hunter2" })
        );
    }

    #[test]
    fn test_requests_carry_shared_config() {
        let transport = MockTransport::default()
            .respond(200, r#"{"isLoggedIn":true}"#)
            .respond(200, r#"{"isLoggedIn":true}"#);
        let (api, _) = api_with(transport.clone());

        block_on(api.check_login_status()).unwrap();
        block_on(api.login("admin", "pw")).unwrap();

        for request in transport.requests() {
            assert!(request.with_credentials);
            assert_eq!(request.headers.get("Content-Type"), Some("application/json"));
        }
    }

    #[test]
    fn test_unauthorized_redirects_once_per_response() {
        let transport = MockTransport::default()
            .respond(401, "")
            .respond(401, r#"{"message":"bad credentials"}"#);
        let (api, navigator) = api_with(transport);

        let err = block_on(api.check_login_status()).unwrap_err();
        assert!(matches!(err, ApiError::UnauthorizedAccess(_)));
        assert_eq!(navigator.visits(), vec![LOGIN_ROUTE.to_string()]);

        let err = block_on(api.login("admin", "wrong")).unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(
            navigator.visits(),
            vec![LOGIN_ROUTE.to_string(), LOGIN_ROUTE.to_string()]
        );
    }

    #[test]
    fn test_other_failures_do_not_redirect() {
        let transport = MockTransport::default()
            .respond(403, "")
            .respond(500, "")
            .reply(MockReply::Fail("connection refused"));
        let (api, navigator) = api_with(transport);

        let forbidden = block_on(api.check_login_status()).unwrap_err();
        assert!(matches!(forbidden, ApiError::ForbiddenAccess(_)));

        let server = block_on(api.login("admin", "pw")).unwrap_err();
        assert!(matches!(server, ApiError::InternalServerError(_)));
        assert_eq!(server.status(), Some(500));

        let network = block_on(api.check_login_status()).unwrap_err();
        match network {
            ApiError::NetworkError(gloo_net::Error::GlooError(message)) => {
                assert_eq!(message, "connection refused")
            }
            other => panic!("expected the transport error back, got {other:?}"),
        }

        assert!(navigator.visits().is_empty());
    }

    #[test]
    fn test_stalled_request_times_out() {
        let transport = MockTransport::default().reply(MockReply::Stall);
        let (api, navigator) = api_with(transport.clone());

        let err = block_on(api.check_login_status()).unwrap_err();
        assert!(matches!(err, ApiError::Timeout(timeout) if timeout == Duration::from_millis(10_000)));
        assert_eq!(err.status(), None);
        assert_eq!(transport.delays(), vec![Duration::from_millis(10_000)]);
        assert!(navigator.visits().is_empty());
    }

    #[test]
    fn test_malformed_body_is_a_parse_error() {
        let transport = MockTransport::default().respond(200, "<html>maintenance</html>");
        let (api, _) = api_with(transport);

        let err = block_on(api.check_login_status()).unwrap_err();
        assert!(matches!(err, ApiError::ParseError(_)));
    }

    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl ResponseInterceptor for Recorder {
        fn on_error(&self, error: &ApiError) {
            self.0.borrow_mut().push(error.to_string());
        }
    }

    #[test]
    fn test_interceptors_see_the_error_returned_to_caller() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let transport = MockTransport::default().respond(404, "");
        let client = HttpApiClient::new(
            ClientConfig::default().with_root_url("http://palworld.local"),
            transport.clone(),
        )
        .with_interceptor(Recorder(seen.clone()))
        .with_interceptor(Recorder(seen.clone()));

        let result: ApiResult<LoginStatusResponse> =
            block_on(client.get("/api/check-login-status"));
        let err = result.unwrap_err();

        assert_eq!(err.to_string(), "Not Found");
        assert_eq!(*seen.borrow(), vec![err.to_string(), err.to_string()]);
        assert_eq!(
            transport.requests()[0].url,
            "http://palworld.local/api/check-login-status"
        );
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (400, Some(400)),
            (401, Some(401)),
            (403, Some(403)),
            (404, Some(404)),
            (503, Some(503)),
            (418, Some(418)),
        ];
        for (status, expected) in cases {
            let err = handle_response_status(HttpResponse::new(status, "")).unwrap_err();
            assert_eq!(err.status(), expected);
        }
        assert!(handle_response_status(HttpResponse::new(204, "")).is_ok());
    }
    #[test]
    fn test_error_keeps_server_response() {
        let body = r#"{"isLoggedIn":false,"error":"bad credentials"}"#;
        let transport = MockTransport::default().respond(401, body);
        let (api, navigator) = api_with(transport);

        let err = block_on(api.login("admin", "wrong")).unwrap_err();
        assert_eq!(err.response(), Some(&HttpResponse::new(401, body)));

        let rejected: LoginStatusResponse = serde_json::from_str(err.body().unwrap()).unwrap();
        assert_eq!(rejected.error.as_deref(), Some("bad credentials"));
        assert_eq!(navigator.visits(), vec![LOGIN_ROUTE.to_string()]);
    }

    #[test]
    fn test_transport_errors_have_no_response() {
        let transport = MockTransport::default().reply(MockReply::Fail("offline"));
        let (api, _) = api_with(transport);

        let err = block_on(api.login("admin", "pw")).unwrap_err();
        assert!(err.response().is_none());
        assert!(err.body().is_none());
    }

    #[test]
    fn test_slow_response_beats_timeout() {
        let transport = MockTransport::default()
            .reply(MockReply::Late(HttpResponse::new(200, r#"{"isLoggedIn":true}"#)));
        let (api, _) = api_with(transport.clone());

        let err = block_on(api.check_login_status()).unwrap_err();
        assert!(matches!(err, ApiError::Timeout(_)));
        assert_eq!(transport.delays(), vec![Duration::from_millis(10_000)]);
    }

    #[test]
    fn test_zero_timeout_waits_for_response() {
        let transport = MockTransport::default()
            .reply(MockReply::Late(HttpResponse::new(200, r#"{"isLoggedIn":true}"#)));
        let client = HttpApiClient::new(
            ClientConfig::default().with_timeout(Duration::ZERO),
            transport.clone(),
        );
        let api = Api::new(client);

        let status = block_on(api.check_login_status()).unwrap();
        assert!(status.is_logged_in);
        assert!(transport.delays().is_empty());
    }

    #[test]
    fn test_overridden_header_goes_out_once() {
        let transport = MockTransport::default().respond(200, r#"{"isLoggedIn":true}"#);
        let client = HttpApiClient::new(
            ClientConfig::default().with_header("content-type", "application/json; charset=utf-8"),
            transport.clone(),
        );

        let result: ApiResult<LoginStatusResponse> = block_on(client.get(CHECK_LOGIN_STATUS_ENDPOINT));
        result.unwrap();

        let headers = &transport.requests()[0].headers;
        assert_eq!(headers.len(), 1);
        assert_eq!(
            headers.get("Content-Type"),
            Some("application/json; charset=utf-8")
        );
    }

    #[test]
    fn test_header_names_are_case_insensitive() {
        let mut headers = ApiHeaders::new();
        headers.insert("X-Palworld-Client".to_string(), "web".to_string());
        headers.insert("x-palworld-client".to_string(), "admin".to_string());
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("X-PALWORLD-CLIENT"), Some("admin"));

        headers.delete("X-Palworld-Client");
        assert!(headers.is_empty());
    }
    #[test]
    fn test_unauthorized_on_any_endpoint_redirects() {
        let navigator = RecordingNavigator::default();
        let transport = MockTransport::default()
            .respond(401, "")
            .respond(401, "");
        let client = HttpApiClient::new(ClientConfig::default(), transport)
            .with_interceptor(RedirectOnUnauthorized::new(navigator.clone()));

        let players: ApiResult<serde_json::Value> = block_on(client.get("/api/players"));
        assert!(players.unwrap_err().is_unauthorized());

        let kick: ApiResult<serde_json::Value> =
            block_on(client.post("/api/players/kick", &serde_json::json!({ "id": 7 })));
        assert!(kick.unwrap_err().is_unauthorized());

        assert_eq!(
            navigator.visits(),
            vec![LOGIN_ROUTE.to_string(), LOGIN_ROUTE.to_string()]
        );
    }
}
