//! Boundary to the external image-analysis service.
//!
//! The engine only builds requests and consumes results. Transport lives in
//! the host, behind [`AnalysisService`].

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Prompt sent when the user does not supply one.
pub const DEFAULT_PROMPT: &str = "Analyze this image and identify any text, diagrams, or drawings. \
If there are questions written on the canvas, please answer them.";

/// Analysis errors.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Failed to capture canvas: {0}")]
    Capture(String),
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Service returned an error: {0}")]
    Service(String),
    #[error("Empty response from analysis service")]
    EmptyResponse,
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// A rendered snapshot plus the question to ask about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub prompt: String,
    /// PNG bytes of the composed canvas.
    pub image: Vec<u8>,
}

#[derive(Serialize)]
struct RequestPayload<'a> {
    prompt: &'a str,
    image: String,
}

impl AnalysisRequest {
    pub fn new(prompt: impl Into<String>, image: Vec<u8>) -> Self {
        Self {
            prompt: prompt.into(),
            image,
        }
    }

    /// Request with [`DEFAULT_PROMPT`].
    pub fn with_default_prompt(image: Vec<u8>) -> Self {
        Self::new(DEFAULT_PROMPT, image)
    }

    /// The image as standard base64 without a data-URL prefix.
    pub fn image_base64(&self) -> String {
        STANDARD.encode(&self.image)
    }

    /// JSON body: `{"prompt": ..., "image": <base64>}`. A blank prompt is
    /// replaced by [`DEFAULT_PROMPT`].
    pub fn to_json(&self) -> AnalysisResult<String> {
        let prompt = if self.prompt.trim().is_empty() {
            DEFAULT_PROMPT
        } else {
            self.prompt.as_str()
        };
        let payload = RequestPayload {
            prompt,
            image: self.image_base64(),
        };
        Ok(serde_json::to_string(&payload)?)
    }
}

/// Text produced by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub text: String,
}

#[derive(Deserialize)]
struct ResponsePayload {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl AnalysisResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Parse the service's JSON reply (`{"response": ..., "status": ..., "error": ...}`).
    pub fn from_json(json: &str) -> AnalysisResult<Self> {
        let payload: ResponsePayload = serde_json::from_str(json)?;
        if payload.status.as_deref() == Some("error") || payload.error.is_some() {
            return Err(AnalysisError::Service(
                payload.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        match payload.response {
            Some(text) if !text.trim().is_empty() => Ok(Self { text }),
            _ => Err(AnalysisError::EmptyResponse),
        }
    }
}

/// Anything that can answer an [`AnalysisRequest`].
pub trait AnalysisService {
    fn analyze(&self, request: AnalysisRequest) -> BoxFuture<'_, AnalysisResult<AnalysisResponse>>;
}

/// Produces the raster image handed to the analysis service.
pub trait SnapshotExporter {
    type Error: std::error::Error;

    /// Encode the scene as PNG bytes.
    fn export_png(&mut self, scene: &crate::canvas::Scene<'_>) -> Result<Vec<u8>, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoService;

    impl AnalysisService for EchoService {
        fn analyze(
            &self,
            request: AnalysisRequest,
        ) -> BoxFuture<'_, AnalysisResult<AnalysisResponse>> {
            Box::pin(async move {
                if request.image.is_empty() {
                    Err(AnalysisError::Request("no image".to_string()))
                } else {
                    Ok(AnalysisResponse::new(format!("{} bytes", request.image.len())))
                }
            })
        }
    }

    #[test]
    fn test_request_json_payload() {
        let request = AnalysisRequest::new("what is this?", vec![1, 2, 3]);
        let json: serde_json::Value = serde_json::from_str(&request.to_json().unwrap()).unwrap();
        assert_eq!(json["prompt"], "what is this?");
        assert_eq!(json["image"], "AQID");
    }

    #[test]
    fn test_blank_prompt_uses_default() {
        let request = AnalysisRequest::new("  ", vec![]);
        let json: serde_json::Value = serde_json::from_str(&request.to_json().unwrap()).unwrap();
        assert_eq!(json["prompt"], DEFAULT_PROMPT);
    }

    #[test]
    fn test_response_parsing() {
        let ok =
            AnalysisResponse::from_json(r#"{"response": "x = 4", "status": "success"}"#).unwrap();
        assert_eq!(ok.text, "x = 4");

        let err =
            AnalysisResponse::from_json(r#"{"status": "error", "error": "quota"}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::Service(ref m) if m == "quota"));

        let empty = AnalysisResponse::from_json(r#"{"response": ""}"#).unwrap_err();
        assert!(matches!(empty, AnalysisError::EmptyResponse));

        assert!(matches!(
            AnalysisResponse::from_json("oops"),
            Err(AnalysisError::Decode(_))
        ));
    }

    #[test]
    fn test_service_roundtrip() {
        let service = EchoService;
        let reply =
            pollster::block_on(service.analyze(AnalysisRequest::with_default_prompt(vec![0; 8])));
        assert_eq!(reply.unwrap().text, "8 bytes");

        let failed =
            pollster::block_on(service.analyze(AnalysisRequest::with_default_prompt(Vec::new())));
        assert!(matches!(failed, Err(AnalysisError::Request(_))));
    }
}
