//! Typed store paths
//!
//! Logical layout consumed by this crate:
//! `committees/{committee}/caucuses/{caucus}/{status | speaking |
//! speakerTimer | caucusTimer | queue/{id} | history/{id}}` and
//! `committees/{committee}/settings`.

use crate::error::{Error, Result};
use crate::models::{CaucusId, CommitteeId};

/// A validated slash-separated path into the store tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorePath {
    segments: Vec<String>,
}

impl StorePath {
    /// The root of the tree (empty path)
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Parse a slash-separated path; the empty string is the root
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Ok(Self::root());
        }
        let mut path = Self::root();
        for segment in raw.split('/') {
            path = path.child(segment)?;
        }
        Ok(path)
    }

    /// Append a segment; segments must be non-empty and slash-free
    pub fn child(mut self, segment: &str) -> Result<Self> {
        if segment.is_empty() || segment.contains('/') {
            return Err(Error::InvalidPath(segment.to_string()));
        }
        self.segments.push(segment.to_string());
        Ok(self)
    }

    /// `committees/{id}`
    pub fn committee(committee: &CommitteeId) -> Result<Self> {
        Self::root().child("committees")?.child(committee.as_str())
    }

    /// `committees/{id}/caucuses/{id}`
    pub fn caucus(committee: &CommitteeId, caucus: &CaucusId) -> Result<Self> {
        Self::committee(committee)?
            .child("caucuses")?
            .child(caucus.as_str())
    }

    /// `committees/{id}/settings`
    pub fn settings(committee: &CommitteeId) -> Result<Self> {
        Self::committee(committee)?.child("settings")
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The path one level up, or `None` at the root
    pub fn parent(&self) -> Option<StorePath> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn starts_with(&self, prefix: &StorePath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

impl std::fmt::Display for StorePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caucus_path_layout() {
        let committee = CommitteeId::new("abc123".to_string());
        let caucus = CaucusId::new("xyz789".to_string());
        let path = StorePath::caucus(&committee, &caucus).unwrap();
        assert_eq!(path.to_string(), "committees/abc123/caucuses/xyz789");

        let speaking = path.child("speaking").unwrap();
        assert_eq!(
            speaking.to_string(),
            "committees/abc123/caucuses/xyz789/speaking"
        );
    }

    #[test]
    fn test_settings_path_layout() {
        let committee = CommitteeId::new("abc123".to_string());
        let path = StorePath::settings(&committee).unwrap();
        assert_eq!(path.to_string(), "committees/abc123/settings");
    }

    #[test]
    fn test_parse_round_trip() {
        let path = StorePath::parse("a/b/c").unwrap();
        assert_eq!(path.segments().len(), 3);
        assert_eq!(path.to_string(), "a/b/c");

        assert!(StorePath::parse("").unwrap().is_root());
    }

    #[test]
    fn test_invalid_segments() {
        assert!(StorePath::root().child("").is_err());
        assert!(StorePath::root().child("a/b").is_err());
        assert!(StorePath::parse("a//b").is_err());
    }

    #[test]
    fn test_parent_and_prefix() {
        let path = StorePath::parse("a/b/c").unwrap();
        let parent = path.parent().unwrap();
        assert_eq!(parent.to_string(), "a/b");
        assert!(path.starts_with(&parent));
        assert!(path.starts_with(&StorePath::root()));
        assert!(!parent.starts_with(&path));
        assert!(StorePath::root().parent().is_none());
    }
}
