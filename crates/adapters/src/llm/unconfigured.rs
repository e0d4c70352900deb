//! Writer used when no provider credential is available

use async_trait::async_trait;
use copy_variants_domain::{CopyRequest, CopyWriter, CopyWriterError, DraftText};

/// Always reports `NotConfigured`, so generation falls back to heuristics
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredCopyWriter;

#[async_trait]
impl CopyWriter for UnconfiguredCopyWriter {
    async fn write(&self, _request: CopyRequest) -> Result<Vec<DraftText>, CopyWriterError> {
        Err(CopyWriterError::NotConfigured)
    }
}
