//! Stub copy writer for testing and offline mode

use async_trait::async_trait;
use copy_variants_domain::{CopyRequest, CopyWriter, CopyWriterError, DraftText};

/// Stub writer that returns configurable responses
pub struct StubCopyWriter {
    texts: Option<Vec<String>>,
    error: Option<CopyWriterError>,
}

impl StubCopyWriter {
    /// Create a stub that returns the given texts, cycling when the plan is longer
    pub fn with_texts(texts: Vec<String>) -> Self {
        Self {
            texts: Some(texts),
            error: None,
        }
    }

    /// Create a stub that always returns an error
    pub fn with_error(error: CopyWriterError) -> Self {
        Self {
            texts: None,
            error: Some(error),
        }
    }

    /// Create a stub that writes a short line from each brief
    pub fn echo() -> Self {
        Self {
            texts: None,
            error: None,
        }
    }
}

impl Default for StubCopyWriter {
    fn default() -> Self {
        Self::echo()
    }
}

#[async_trait]
impl CopyWriter for StubCopyWriter {
    async fn write(&self, request: CopyRequest) -> Result<Vec<DraftText>, CopyWriterError> {
        if let Some(ref error) = self.error {
            return Err(match error {
                CopyWriterError::NotConfigured => CopyWriterError::NotConfigured,
                CopyWriterError::Api(msg) => CopyWriterError::Api(msg.clone()),
                CopyWriterError::InvalidFormat(msg) => CopyWriterError::InvalidFormat(msg.clone()),
                CopyWriterError::RateLimited => CopyWriterError::RateLimited,
                CopyWriterError::Timeout => CopyWriterError::Timeout,
            });
        }

        if let Some(ref texts) = self.texts {
            if texts.is_empty() {
                return Err(CopyWriterError::InvalidFormat("Stub has no texts".to_string()));
            }
            return Ok(request
                .variants
                .iter()
                .zip(texts.iter().cycle())
                .map(|(brief, text)| DraftText {
                    id: brief.id.clone(),
                    text: text.clone(),
                })
                .collect());
        }

        // Echo mode: describe the brief itself
        Ok(request
            .variants
            .iter()
            .map(|brief| DraftText {
                id: brief.id.clone(),
                text: format!("A {} {} take. {}", brief.tone, brief.structure, brief.cta),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copy_variants_domain::{CopyBrief, Cta, Structure, Tone, WriterOptions};

    fn request(n: usize) -> CopyRequest {
        CopyRequest {
            idea: "Idea".to_string(),
            brand: None,
            variants: (1..=n)
                .map(|i| CopyBrief {
                    id: format!("len-{}", i),
                    platform: None,
                    tone: Tone::Bold,
                    structure: Structure::Contrast,
                    cta: Cta::LearnMore,
                    max_chars: 100,
                    target_length: Some(98),
                })
                .collect(),
            options: WriterOptions::default(),
        }
    }

    #[tokio::test]
    async fn test_stub_texts_cycle() {
        let stub = StubCopyWriter::with_texts(vec!["one".to_string(), "two".to_string()]);
        let drafts = stub.write(request(3)).await.unwrap();

        let texts: Vec<_> = drafts.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "one"]);
        assert_eq!(drafts[2].id, "len-3");
    }

    #[tokio::test]
    async fn test_stub_error() {
        let stub = StubCopyWriter::with_error(CopyWriterError::Timeout);
        let result = stub.write(request(1)).await;
        assert!(matches!(result, Err(CopyWriterError::Timeout)));
    }

    #[tokio::test]
    async fn test_stub_echo() {
        let drafts = StubCopyWriter::echo().write(request(2)).await.unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].text, "A bold contrast take. Learn more");
    }
}
