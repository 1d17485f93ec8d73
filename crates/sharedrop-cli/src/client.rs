//! HTTP client for the ShareDrop API.

use reqwest::{StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use sharedrop_core::error::AppError;
use sharedrop_core::result::AppResult;

/// Thin wrapper over `reqwest` bound to one server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(server: &str) -> AppResult<Self> {
        let base = Url::parse(server)
            .map_err(|e| AppError::validation(format!("Invalid server URL '{server}': {e}")))?;
        Ok(Self {
            http: reqwest::Client::new(),
            base,
        })
    }

    /// `ws://` (or `wss://`) URL of the live event endpoint.
    pub fn ws_url(&self, share_id: &str, user_name: &str) -> AppResult<Url> {
        let mut url = self.url("/ws", &[("shareId", share_id), ("userName", user_name)])?;
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        let base = &self.base;
        url.set_scheme(scheme)
            .map_err(|_| AppError::validation(format!("No WebSocket URL for {base}")))?;
        Ok(url)
    }

    pub async fn get<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> AppResult<R> {
        let url = self.url(path, query)?;
        let response = self.http.get(url).send().await.map_err(send_failed)?;
        decode(response).await
    }

    pub async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<R> {
        let url = self.url(path, &[])?;
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(send_failed)?;
        decode(response).await
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> AppResult<Url> {
        let mut url = self
            .base
            .join(path)
            .map_err(|e| AppError::validation(format!("Invalid path '{path}': {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }
}

fn send_failed(e: reqwest::Error) -> AppError {
    AppError::service_unavailable(format!("Server unreachable: {e}"))
}

/// Turn a response into the expected body, or the server's error message.
async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> AppResult<R> {
    let status = response.status();
    if status.is_success() {
        return response
            .json()
            .await
            .map_err(|e| AppError::internal(format!("Unexpected response body: {e}")));
    }

    let body: serde_json::Value = response.json().await.unwrap_or_default();
    let message = body
        .get("message")
        .or_else(|| body.get("error"))
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string());

    Err(match status {
        StatusCode::BAD_REQUEST => AppError::validation(message),
        StatusCode::NOT_FOUND => AppError::not_found(message),
        StatusCode::CONFLICT => AppError::conflict(message),
        StatusCode::FORBIDDEN => AppError::forbidden(message),
        StatusCode::SERVICE_UNAVAILABLE => AppError::service_unavailable(message),
        _ => AppError::internal(message),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ws_url_encodes_params() {
        let client = ApiClient::new("http://localhost:8080").unwrap();
        let url = client.ws_url("ab12cd34", "Ana María").unwrap();
        assert_eq!(url.scheme(), "ws");
        assert_eq!(url.path(), "/ws");
        assert_eq!(
            url.query(),
            Some("shareId=ab12cd34&userName=Ana+Mar%C3%ADa")
        );
    }

    #[test]
    fn test_ws_url_secure_scheme() {
        let client = ApiClient::new("https://photos.example.com").unwrap();
        assert_eq!(client.ws_url("x", "y").unwrap().scheme(), "wss");
    }

    #[test]
    fn test_rejects_bad_server() {
        assert!(ApiClient::new("not a url").is_err());
    }
}
