//! Permission decision engine

use crate::config::{AclConfigError, AclEntry, Direction, Principal};
use crate::topic::{TopicMatcher, TopicPath};
use parking_lot::RwLock;
use tracing::{debug, warn};

use super::resolver::resolve_topics;

/// A single access attempt to evaluate.
#[derive(Debug, Clone)]
pub struct AccessRequest<'a> {
    /// The authenticated principal, or `None` for anonymous access.
    pub principal: Option<&'a Principal>,
    /// Client identifier of the connection, substituted for `%c`.
    pub client_id: &'a str,
    /// Slash-delimited topic being accessed. May itself contain wildcards
    /// when the attempt is a subscription.
    pub topic: &'a str,
    /// Subscribe or publish.
    pub direction: Direction,
}

/// Capability hook that resource types expose for topic authorization.
///
/// Hosts inject a decision object behind this trait instead of extending
/// their resource classes with permission logic.
pub trait Authorize: Send + Sync {
    /// Decide whether the request may proceed.
    fn authorize(&self, request: &AccessRequest<'_>) -> bool;
}

/// Topic permission engine: a validated ACL entry set plus the matcher
/// that evaluates decisions against it.
///
/// Decisions are pure functions of the request and the current entry set;
/// the engine may be shared across threads freely. [`reconfigure`] is the
/// only writer.
///
/// [`reconfigure`]: PermissionEngine::reconfigure
#[derive(Debug)]
pub struct PermissionEngine {
    entries: RwLock<Vec<AclEntry>>,
    topic_matcher: TopicMatcher,
}

impl PermissionEngine {
    /// Build an engine, rejecting entries unusable as access rules.
    ///
    /// A missing topic filter fails construction so a corrupt document is
    /// surfaced to the operator before any decision is computed.
    pub fn new(entries: Vec<AclEntry>) -> Result<Self, AclConfigError> {
        let topic_matcher = TopicMatcher::new();
        validate_entries(&entries, &topic_matcher)?;

        Ok(Self {
            entries: RwLock::new(entries),
            topic_matcher,
        })
    }

    /// Replace the entry set atomically. The previous entries stay in
    /// force if the new set fails validation.
    pub fn reconfigure(&self, entries: Vec<AclEntry>) -> Result<(), AclConfigError> {
        validate_entries(&entries, &self.topic_matcher)?;
        *self.entries.write() = entries;
        Ok(())
    }

    /// Number of loaded ACL entries.
    pub fn rule_count(&self) -> usize {
        self.entries.read().len()
    }

    /// Evaluate an access request.
    pub fn check(&self, request: &AccessRequest<'_>) -> bool {
        let entries = self.entries.read();

        let patterns = match resolve_topics(
            &entries,
            request.principal,
            request.client_id,
            request.direction,
        ) {
            Ok(patterns) => patterns,
            Err(error) => {
                // Entries are validated on the way in, so this only fires
                // for a rule set that bypassed new/reconfigure.
                warn!(%error, "ACL resolution failed, denying access");
                return false;
            }
        };

        let candidate = TopicPath::parse(request.topic);
        let allowed = self.topic_matcher.matches(&candidate, &patterns);

        debug!(
            topic = %request.topic,
            direction = ?request.direction,
            username = request.principal.map(|p| p.username.as_str()),
            patterns = patterns.len(),
            allowed,
            "Topic access decision"
        );

        allowed
    }

    /// Check whether a topic filter may be subscribed to.
    pub fn can_subscribe(
        &self,
        principal: Option<&Principal>,
        client_id: &str,
        topic: &str,
    ) -> bool {
        self.check(&AccessRequest {
            principal,
            client_id,
            topic,
            direction: Direction::Subscribe,
        })
    }

    /// Check whether a topic may be published to.
    pub fn can_publish(
        &self,
        principal: Option<&Principal>,
        client_id: &str,
        topic: &str,
    ) -> bool {
        self.check(&AccessRequest {
            principal,
            client_id,
            topic,
            direction: Direction::Publish,
        })
    }
}

impl Default for PermissionEngine {
    fn default() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            topic_matcher: TopicMatcher::new(),
        }
    }
}

impl Authorize for PermissionEngine {
    fn authorize(&self, request: &AccessRequest<'_>) -> bool {
        self.check(request)
    }
}

fn validate_entries(
    entries: &[AclEntry],
    matcher: &TopicMatcher,
) -> Result<(), AclConfigError> {
    for (index, entry) in entries.iter().enumerate() {
        let filter = entry
            .topic_filter
            .as_deref()
            .ok_or(AclConfigError::MissingTopicFilter { index })?;

        let pattern = TopicPath::parse(filter);
        if !matcher.is_canonical_filter(&pattern) {
            warn!(index, filter, "Topic filter is not a canonical MQTT filter");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GroupSet;

    fn entry(filter: &str, subscribers: &[&str], publishers: &[&str]) -> AclEntry {
        AclEntry {
            topic_filter: Some(filter.to_string()),
            subscribers: subscribers.iter().map(|s| s.to_string()).collect(),
            publishers: publishers.iter().map(|s| s.to_string()).collect(),
            anonymous_subscriber: false,
        }
    }

    fn member(username: &str, group: &str) -> Principal {
        Principal {
            username: username.to_string(),
            auth_groups: Some(GroupSet::Many(vec![group.to_string()])),
            role: None,
        }
    }

    #[test]
    fn test_empty_engine_denies_everything() {
        let engine = PermissionEngine::default();
        let user = member("alice", "residents");

        assert!(!engine.can_subscribe(Some(&user), "c1", "home/alice/kitchen"));
        assert!(!engine.can_publish(Some(&user), "c1", "home/alice/kitchen"));
    }

    #[test]
    fn test_resolve_then_match_pipeline() {
        let engine = PermissionEngine::new(vec![entry("home/%u/+", &["residents"], &[])])
            .unwrap();
        let alice = member("alice", "residents");

        assert!(engine.can_subscribe(Some(&alice), "c1", "home/alice/kitchen"));

        // bob's rooms never resolve for alice, so no pattern covers them
        assert!(!engine.can_subscribe(Some(&alice), "c1", "home/bob/kitchen"));

        // subscribers do not imply publishers
        assert!(!engine.can_publish(Some(&alice), "c1", "home/alice/kitchen"));
    }

    #[test]
    fn test_construction_rejects_missing_filter() {
        let entries = vec![AclEntry {
            topic_filter: None,
            ..Default::default()
        }];

        let err = PermissionEngine::new(entries).unwrap_err();
        assert!(matches!(err, AclConfigError::MissingTopicFilter { index: 0 }));
    }

    #[test]
    fn test_reconfigure_swaps_rules() {
        let engine = PermissionEngine::new(vec![entry("old/topic", &["g"], &[])]).unwrap();
        let user = member("u", "g");
        assert!(engine.can_subscribe(Some(&user), "c1", "old/topic"));

        engine
            .reconfigure(vec![entry("new/topic", &["g"], &[])])
            .unwrap();
        assert!(!engine.can_subscribe(Some(&user), "c1", "old/topic"));
        assert!(engine.can_subscribe(Some(&user), "c1", "new/topic"));
        assert_eq!(engine.rule_count(), 1);
    }

    #[test]
    fn test_failed_reconfigure_keeps_previous_rules() {
        let engine = PermissionEngine::new(vec![entry("a/b", &["g"], &[])]).unwrap();
        let user = member("u", "g");

        let bad = vec![AclEntry {
            topic_filter: None,
            ..Default::default()
        }];
        assert!(engine.reconfigure(bad).is_err());

        assert!(engine.can_subscribe(Some(&user), "c1", "a/b"));
    }

    #[test]
    fn test_engine_as_authorize_trait_object() {
        let engine = PermissionEngine::new(vec![entry("data/#", &[], &["writers"])]).unwrap();
        let writer = member("w", "writers");

        let authorizer: Box<dyn Authorize> = Box::new(engine);
        assert!(authorizer.authorize(&AccessRequest {
            principal: Some(&writer),
            client_id: "c1",
            topic: "data/metrics/cpu",
            direction: Direction::Publish,
        }));
        assert!(!authorizer.authorize(&AccessRequest {
            principal: Some(&writer),
            client_id: "c1",
            topic: "data/metrics/cpu",
            direction: Direction::Subscribe,
        }));
    }

    #[test]
    fn test_anonymous_access_through_engine() {
        let engine = PermissionEngine::new(vec![AclEntry {
            topic_filter: Some("announcements/#".to_string()),
            anonymous_subscriber: true,
            ..Default::default()
        }])
        .unwrap();

        assert!(engine.can_subscribe(None, "c1", "announcements/today"));
        assert!(!engine.can_publish(None, "c1", "announcements/today"));
    }
}
