use std::time::Duration;

use reqwest::{
    Client,
    header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, COOKIE},
    Method,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, error};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::AppError;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// JSON client for the scheduling backend. Authentication rides on the
/// session cookie; nothing here attaches tokens.
pub struct RestClient {
    client: Client,
    base_url: String,
    session_cookie: Option<HeaderValue>,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .field("session_cookie", &self.session_cookie.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl RestClient {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        if !config.is_configured() {
            return Err(AppError::Config("api base url is not set".to_string()));
        }

        let mut builder = Client::builder().cookie_store(config.sends_credentials());
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Config(format!("failed to build http client: {}", e)))?;

        let session_cookie = match (&config.session_cookie, config.sends_credentials()) {
            (Some(cookie), true) => Some(
                HeaderValue::from_str(cookie)
                    .map_err(|_| AppError::Config("session cookie contains invalid characters".to_string()))?,
            ),
            _ => None,
        };

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session_cookie,
        })
    }

    fn get_headers(&self, request_id: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Ok(value) = HeaderValue::from_str(request_id) {
            headers.insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
        }

        if let Some(cookie) = &self.session_cookie {
            headers.insert(COOKIE, cookie.clone());
        }

        headers
    }

    pub async fn request<T>(&self, method: Method, path: &str,
                            query: &[(&str, String)], body: Option<Value>)
                            -> Result<T, AppError>
    where T: DeserializeOwned {
        let url = format!("{}{}", self.base_url, path);
        let request_id = Uuid::new_v4().to_string();
        debug!("Making {} request to {} (request id {})", method, url, request_id);

        let mut req = self.client.request(method, &url)
            .headers(self.get_headers(&request_id));

        if !query.is_empty() {
            req = req.query(query);
        }

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await.map_err(|e| {
            error!("Request {} to {} failed: {}", request_id, path, e);
            AppError::Network(e.to_string())
        })?;

        let status = response.status();
        let text = response.text().await
            .map_err(|e| AppError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("API error ({}) from {} (request id {}): {}", status, path, request_id, text);
            return Err(AppError::from_status(status.as_u16(), text));
        }

        // Acknowledgement endpoints may answer with an empty body.
        let payload = if text.trim().is_empty() { "null" } else { text.as_str() };

        serde_json::from_str::<T>(payload).map_err(|e| {
            error!("Malformed response from {} (request id {}): {}", path, request_id, e);
            AppError::Decode {
                path: path.to_string(),
                message: e.to_string(),
            }
        })
    }

    pub async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T, AppError>
    where T: DeserializeOwned {
        self.request(Method::GET, path, query, None).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, AppError>
    where T: DeserializeOwned, B: Serialize + ?Sized {
        let body = encode_body(body)?;
        self.request(Method::POST, path, &[], Some(body)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, AppError>
    where T: DeserializeOwned, B: Serialize + ?Sized {
        let body = encode_body(body)?;
        self.request(Method::PUT, path, &[], Some(body)).await
    }
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<Value, AppError> {
    serde_json::to_value(body)
        .map_err(|e| AppError::ValidationError(format!("request body could not be encoded: {}", e)))
}
