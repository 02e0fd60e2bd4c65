//! Configuration types for the topic ACL engine
//!
//! Defines the on-disk ACL document shape and the runtime inputs
//! (principal, direction) that authorization decisions are computed from.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or validating an ACL document.
#[derive(Debug, Error)]
pub enum AclConfigError {
    /// An ACL entry has no usable topic filter.
    #[error("ACL entry {index} must have a topicFilter (as a string)")]
    MissingTopicFilter { index: usize },

    /// The document is not valid JSON or does not match the ACL shape.
    #[error("failed to parse ACL document: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document could not be read.
    #[error("failed to read ACL document: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// ACL Document
// ============================================================================

/// Top-level ACL configuration document.
///
/// The on-disk format is a JSON object with an `acls` array:
///
/// ```json
/// {
///   "acls": [
///     {
///       "topicFilter": "home/%u/+",
///       "subscribers": ["residents"],
///       "publishers": ["controllers"]
///     }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AclDocument {
    /// Access-control entries, evaluated in document order.
    #[serde(default)]
    pub acls: Vec<AclEntry>,
}

impl AclDocument {
    /// Parse a document from its JSON text.
    pub fn from_json(content: &str) -> Result<Self, AclConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read and parse a document from a file.
    pub fn from_file(path: &Path) -> Result<Self, AclConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

/// A single access-control entry binding a topic filter to group identities.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AclEntry {
    /// Topic filter pattern. May contain the `+`/`#` wildcards and the
    /// `%u` (username) / `%c` (client id) placeholders. Required; an entry
    /// without one is rejected before any decision is computed.
    pub topic_filter: Option<String>,

    /// Groups permitted to subscribe (read) through this entry.
    pub subscribers: Vec<String>,

    /// Groups permitted to publish (write) through this entry.
    pub publishers: Vec<String>,

    /// Grants subscribe access without any group match.
    pub anonymous_subscriber: bool,
}

// ============================================================================
// Principal
// ============================================================================

/// Group membership as it appears on host account objects: either an array
/// of names or a single `;`-delimited string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum GroupSet {
    /// Already-normalized list of group names.
    Many(Vec<String>),
    /// Group names joined with `;`.
    Delimited(String),
}

impl GroupSet {
    /// Normalized group names.
    pub fn names(&self) -> Vec<String> {
        match self {
            GroupSet::Many(names) => names.clone(),
            GroupSet::Delimited(joined) => joined.split(';').map(str::to_string).collect(),
        }
    }
}

impl From<Vec<String>> for GroupSet {
    fn from(names: Vec<String>) -> Self {
        GroupSet::Many(names)
    }
}

impl From<&str> for GroupSet {
    fn from(joined: &str) -> Self {
        GroupSet::Delimited(joined.to_string())
    }
}

/// The authenticated actor attempting a pub/sub operation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Principal {
    /// User name, substituted for `%u` in topic filters.
    pub username: String,

    /// Direct group membership.
    pub auth_groups: Option<GroupSet>,

    /// Role fallback; some hosts keep group membership under `role.role`
    /// instead of `authGroups`.
    pub role: Option<PrincipalRole>,
}

/// Role object carrying group membership for hosts that nest it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PrincipalRole {
    /// Group membership attached to the role.
    pub role: Option<GroupSet>,
}

impl Principal {
    /// Effective group membership: `authGroups` when present, else
    /// `role.role`, else empty.
    pub fn group_names(&self) -> Vec<String> {
        self.auth_groups
            .as_ref()
            .or_else(|| self.role.as_ref().and_then(|r| r.role.as_ref()))
            .map(GroupSet::names)
            .unwrap_or_default()
    }
}

// ============================================================================
// Direction
// ============================================================================

/// Whether an access attempt is a read (subscribe) or a write (publish).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Subscribe,
    Publish,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_document() {
        let json = r#"{
            "acls": [
                {
                    "topicFilter": "home/%u/+",
                    "subscribers": ["residents"],
                    "publishers": ["controllers"]
                },
                {
                    "topicFilter": "announcements/#",
                    "anonymousSubscriber": true
                }
            ]
        }"#;

        let doc = AclDocument::from_json(json).expect("Failed to parse");
        assert_eq!(doc.acls.len(), 2);
        assert_eq!(doc.acls[0].topic_filter.as_deref(), Some("home/%u/+"));
        assert_eq!(doc.acls[0].subscribers, vec!["residents".to_string()]);
        assert_eq!(doc.acls[0].publishers, vec!["controllers".to_string()]);
        assert!(!doc.acls[0].anonymous_subscriber);
        assert!(doc.acls[1].anonymous_subscriber);
        assert!(doc.acls[1].subscribers.is_empty());
    }

    #[test]
    fn test_missing_topic_filter_is_representable() {
        let json = r#"{"acls": [{"subscribers": ["residents"]}]}"#;
        let doc = AclDocument::from_json(json).expect("Failed to parse");
        assert!(doc.acls[0].topic_filter.is_none());
    }

    #[test]
    fn test_non_string_topic_filter_rejected() {
        let json = r#"{"acls": [{"topicFilter": 42}]}"#;
        let err = AclDocument::from_json(json).unwrap_err();
        assert!(matches!(err, AclConfigError::Parse(_)));
    }

    #[test]
    fn test_group_set_shapes() {
        let many: GroupSet = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(many.names(), vec!["a".to_string(), "b".to_string()]);

        let delimited: GroupSet = serde_json::from_str(r#""a;b""#).unwrap();
        assert_eq!(delimited.names(), vec!["a".to_string(), "b".to_string()]);

        let single: GroupSet = serde_json::from_str(r#""a""#).unwrap();
        assert_eq!(single.names(), vec!["a".to_string()]);
    }

    #[test]
    fn test_principal_group_fallback() {
        let direct: Principal =
            serde_json::from_str(r#"{"username": "alice", "authGroups": ["residents"]}"#).unwrap();
        assert_eq!(direct.group_names(), vec!["residents".to_string()]);

        let via_role: Principal =
            serde_json::from_str(r#"{"username": "bob", "role": {"role": "guests;visitors"}}"#)
                .unwrap();
        assert_eq!(
            via_role.group_names(),
            vec!["guests".to_string(), "visitors".to_string()]
        );

        let neither: Principal = serde_json::from_str(r#"{"username": "eve"}"#).unwrap();
        assert!(neither.group_names().is_empty());
    }

    #[test]
    fn test_direction_serde() {
        assert_eq!(
            serde_json::from_str::<Direction>(r#""subscribe""#).unwrap(),
            Direction::Subscribe
        );
        assert_eq!(
            serde_json::from_str::<Direction>(r#""publish""#).unwrap(),
            Direction::Publish
        );
    }
}
