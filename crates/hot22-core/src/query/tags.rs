// Cache tags: `Kind` alone, `Kind:LIST`, or `Kind:<id>`.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
    AsRefStr,
)]
pub enum TagKind {
    Office,
    Passenger,
    Analytics,
    Search,
    ErrorLog,
    ErrorLogStats,
    HotFile,
    Record,
    Health,
}

/// A tag provided by a cached read or named by a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CacheTag {
    pub kind: TagKind,
    pub id: Option<String>,
}

impl CacheTag {
    pub const LIST: &'static str = "LIST";

    /// Matches every tag of `kind` when used for invalidation.
    pub fn kind(kind: TagKind) -> Self {
        Self { kind, id: None }
    }

    pub fn id(kind: TagKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: Some(id.into()),
        }
    }

    pub fn list(kind: TagKind) -> Self {
        Self::id(kind, Self::LIST)
    }

    /// Invalidation rule: a kind-only tag covers the whole kind, a tag
    /// with an id covers exactly that id.
    pub fn matches(&self, provided: &CacheTag) -> bool {
        self.kind == provided.kind
            && match &self.id {
                None => true,
                Some(id) => provided.id.as_ref() == Some(id),
            }
    }
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{}:{id}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_only_matches_every_id() {
        let all = CacheTag::kind(TagKind::ErrorLog);
        assert!(all.matches(&CacheTag::list(TagKind::ErrorLog)));
        assert!(all.matches(&CacheTag::id(TagKind::ErrorLog, "u-1")));
        assert!(!all.matches(&CacheTag::list(TagKind::ErrorLogStats)));
    }

    #[test]
    fn id_tags_match_exactly() {
        let one = CacheTag::id(TagKind::Office, "1234567");
        assert!(one.matches(&CacheTag::id(TagKind::Office, "1234567")));
        assert!(!one.matches(&CacheTag::id(TagKind::Office, "7654321")));
        assert!(!one.matches(&CacheTag::list(TagKind::Office)));
    }

    #[test]
    fn display_form() {
        assert_eq!(CacheTag::list(TagKind::ErrorLog).to_string(), "ErrorLog:LIST");
        assert_eq!(CacheTag::kind(TagKind::HotFile).to_string(), "HotFile");
    }
}
