//! CLI Commands

pub mod config;
pub mod forms;
pub mod local;

use anyhow::{anyhow, Result};
use formbuilder_core::Identity;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// API client
pub struct ApiClient {
    pub base_url: String,
    pub identity: Option<Identity>,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, identity: Option<Identity>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            identity,
            client: reqwest::Client::new(),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.client.get(self.url(path))).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        self.send(self.client.post(self.url(path)).json(body)).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        self.send(self.client.patch(self.url(path)).json(body)).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, mut req: RequestBuilder) -> Result<T> {
        let identity = self
            .identity
            .as_ref()
            .ok_or_else(|| anyhow!("No user configured: pass --as or set FORMBUILDER_USER"))?;
        req = req
            .header("x-user-id", identity.user_id.as_str())
            .header("x-user-role", identity.role.as_str());

        let resp = req.send().await?;
        let json: Value = resp.json().await?;
        unwrap_envelope(json)
    }
}

/// Extract `data` from an `ApiResponse` envelope, or its error message
fn unwrap_envelope<T: DeserializeOwned>(json: Value) -> Result<T> {
    if json.get("success").and_then(Value::as_bool) == Some(false) {
        let code = json.pointer("/error/code").and_then(Value::as_str).unwrap_or("ERROR");
        let message = json.pointer("/error/message").and_then(Value::as_str).unwrap_or("request failed");
        return Err(anyhow!("{}: {}", code, message));
    }
    match json.get("data") {
        Some(data) => Ok(serde_json::from_value(data.clone())?),
        None => Err(anyhow!("No data in response")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_data_and_errors() {
        let ids: Vec<u64> = unwrap_envelope(json!({"success": true, "data": [1, 2], "error": null})).unwrap();
        assert_eq!(ids, vec![1, 2]);

        let err = unwrap_envelope::<Value>(json!({
            "success": false,
            "data": null,
            "error": {"code": "FORBIDDEN", "message": "Forbidden: Form 3 is not accessible"}
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "FORBIDDEN: Forbidden: Form 3 is not accessible");
    }

    #[test]
    fn test_requests_need_identity() {
        let client = ApiClient::new("http://localhost:8080/api/v1/", None);
        assert_eq!(client.url("/forms"), "http://localhost:8080/api/v1/forms");
        let result = tokio_test::block_on(client.get::<Value>("/forms"));
        assert!(result.unwrap_err().to_string().contains("No user configured"));
    }
}
