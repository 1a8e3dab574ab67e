//! `reqwest`-backed transport for the dice-bot REST API.

use reqwest::Client;
use serde_json::Value;

use crate::error::ApiError;
use crate::transport::{ApiRequest, Method, Transport};

/// Sends requests to `{base_url}{path}`. An empty base URL means same origin,
/// which on wasm resolves against the page.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl PartialEq for HttpTransport {
    fn eq(&self, other: &Self) -> bool {
        self.base_url == other.base_url
    }
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &store::ClientConfig) -> Self {
        Self::new(&config.api.base_url)
    }

    fn url(&self, path: &str) -> Result<String, ApiError> {
        if self.base_url.is_empty() {
            same_origin(path)
        } else {
            Ok(format!("{}{}", self.base_url, path))
        }
    }
}

/// reqwest needs an absolute URL; in the browser that is the page origin.
#[cfg(target_arch = "wasm32")]
fn same_origin(path: &str) -> Result<String, ApiError> {
    let origin = web_sys::window()
        .and_then(|window| window.location().origin().ok())
        .ok_or_else(|| ApiError::Network("page origin unavailable".to_string()))?;
    Ok(format!("{origin}{path}"))
}

/// Outside the browser there is no page to be relative to.
#[cfg(not(target_arch = "wasm32"))]
fn same_origin(path: &str) -> Result<String, ApiError> {
    Err(ApiError::Network(format!(
        "api.base_url is empty in {}, cannot resolve {path}",
        store::ClientConfig::filename()
    )))
}

impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let url = self.url(&request.path)?;
        tracing::debug!("{} {}", request.method, request.path);

        let builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Patch => self.client.patch(&url),
            Method::Delete => self.client.delete(&url),
        };
        let builder = if request.query.is_empty() {
            builder
        } else {
            builder.query(&request.query)
        };
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::status(status.as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let transport = HttpTransport::new("https://dice.example/");
        assert_eq!(
            transport.url("/api/characters/7"),
            Ok("https://dice.example/api/characters/7".to_string())
        );
    }

    #[test]
    fn config_base_url_is_used() {
        let config = store::ClientConfig::new("http://127.0.0.1:8080".to_string());
        let transport = HttpTransport::from_config(&config);
        assert_eq!(
            transport.url("/api/user/@me"),
            Ok("http://127.0.0.1:8080/api/user/@me".to_string())
        );
    }

    #[test]
    fn empty_base_url_off_the_web_is_a_network_error() {
        let transport = HttpTransport::new("");
        assert!(matches!(
            transport.url("/api/user/@me"),
            Err(ApiError::Network(message)) if message.contains("base_url")
        ));
    }
}
