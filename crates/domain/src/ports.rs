//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and external systems.
//! Adapters implement these traits to connect to real infrastructure.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Brand, Cta, PlatformKey, Structure, Tone};

/// Error type for copy writer operations
#[derive(Debug, Error)]
pub enum CopyWriterError {
    /// No credential configured; callers fall back silently
    #[error("Copy writer not configured")]
    NotConfigured,
    #[error("LLM API error: {0}")]
    Api(String),
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Timeout")]
    Timeout,
}

/// Per-call model overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriterOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// One variant as described to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyBrief {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<PlatformKey>,
    pub tone: Tone,
    pub structure: Structure,
    pub cta: Cta,
    pub max_chars: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_length: Option<usize>,
}

/// Everything the model needs to write one plan in a single call
#[derive(Debug, Clone, PartialEq)]
pub struct CopyRequest {
    pub idea: String,
    pub brand: Option<Brand>,
    pub variants: Vec<CopyBrief>,
    pub options: WriterOptions,
}

/// Text returned by the model for one variant id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftText {
    pub id: String,
    pub text: String,
}

/// Port for model-backed copy writing
#[async_trait]
pub trait CopyWriter: Send + Sync {
    /// Write texts for every variant in the request with one model call
    async fn write(&self, request: CopyRequest) -> Result<Vec<DraftText>, CopyWriterError>;
}

#[async_trait]
impl<W: CopyWriter + ?Sized> CopyWriter for &W {
    async fn write(&self, request: CopyRequest) -> Result<Vec<DraftText>, CopyWriterError> {
        (**self).write(request).await
    }
}

#[async_trait]
impl<W: CopyWriter + ?Sized> CopyWriter for Box<W> {
    async fn write(&self, request: CopyRequest) -> Result<Vec<DraftText>, CopyWriterError> {
        (**self).write(request).await
    }
}
