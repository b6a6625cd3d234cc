use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::info;

pub const GENERATE_PATH: &str = "/api/agent/generate";

/// Payload of the question generation endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub role: String,
    pub level: String,
    pub techstack: String,
    pub amount: u32,
    pub userid: String,
}

/// Builds interview questions outside the agent
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<Value>;
}

/// Posts to the web application's `/api/agent/generate`
#[derive(Debug, Clone)]
pub struct HttpQuestionGenerator {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpQuestionGenerator {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), GENERATE_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl QuestionGenerator for HttpQuestionGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<Value> {
        info!("Triggering interview generation via {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .with_context(|| format!("Failed to call {}", GENERATE_PATH))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read generation response")?;

        if status.as_u16() >= 400 {
            bail!("Interview generation failed ({}): {}", status.as_u16(), body);
        }

        Ok(parse_body(&body))
    }
}

/// Empty bodies count as success; non-JSON bodies are passed through raw
pub(crate) fn parse_body(body: &str) -> Value {
    if body.is_empty() {
        return json!({ "success": true });
    }
    serde_json::from_str(body).unwrap_or_else(|_| json!({ "raw": body }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body_variants() {
        assert_eq!(parse_body(""), json!({ "success": true }));
        assert_eq!(parse_body(r#"{"id":"x"}"#), json!({ "id": "x" }));
        assert_eq!(parse_body("created"), json!({ "raw": "created" }));
    }

    #[test]
    fn test_request_uses_wire_names() {
        let req = GenerationRequest {
            kind: "technical".to_string(),
            role: "backend".to_string(),
            level: "senior".to_string(),
            techstack: "rust,tokio".to_string(),
            amount: 5,
            userid: "u1".to_string(),
        };

        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["type"], "technical");
        assert_eq!(value["userid"], "u1");
        assert_eq!(value["amount"], 5);
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let generator = HttpQuestionGenerator::new("http://localhost:3000/").unwrap();
        assert_eq!(generator.endpoint(), "http://localhost:3000/api/agent/generate");
    }
}
