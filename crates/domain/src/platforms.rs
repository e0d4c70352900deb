//! Static catalog of supported publishing surfaces

use crate::model::{PlatformKey, PlatformSpec};

impl PlatformKey {
    /// Look up the catalog entry for this platform
    pub fn spec(&self) -> PlatformSpec {
        match self {
            PlatformKey::InstagramCaption => PlatformSpec {
                key: *self,
                max_chars: 2200,
                focus_chars: Some(125),
                max_hashtags: Some(30),
                notes: "Long-form caption; only the first 125 chars show before \"more\"",
            },
            PlatformKey::XPost => PlatformSpec {
                key: *self,
                max_chars: 280,
                focus_chars: None,
                max_hashtags: Some(3),
                notes: "Short-form post; one idea, punchy",
            },
            PlatformKey::TiktokCaption => PlatformSpec {
                key: *self,
                max_chars: 150,
                focus_chars: None,
                max_hashtags: Some(5),
                notes: "Video description; supports the clip rather than explaining it",
            },
            PlatformKey::ArticleIntro => PlatformSpec {
                key: *self,
                max_chars: 600,
                focus_chars: None,
                max_hashtags: None,
                notes: "Article standfirst; complete sentences, no hashtags",
            },
        }
    }
}

/// All platform keys in catalog order
pub fn all_platforms() -> Vec<PlatformKey> {
    PlatformKey::ALL.to_vec()
}
