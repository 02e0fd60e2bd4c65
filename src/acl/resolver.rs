//! Per-principal resolution of ACL entries into allowed topic patterns

use crate::config::{AclConfigError, AclEntry, Direction, Principal};
use crate::topic::TopicPath;

/// Username placeholder in topic filters.
const USERNAME_PLACEHOLDER: &str = "%u";

/// Client-id placeholder in topic filters.
const CLIENT_ID_PLACEHOLDER: &str = "%c";

/// Resolve the topic patterns a principal may use for the given direction.
///
/// Entries are considered in document order; each applicable entry yields
/// one pattern with `%u`/`%c` substituted. An entry applies when its
/// direction-group set intersects the principal's membership, or, for
/// subscribe, when it is flagged `anonymousSubscriber`.
///
/// An absent principal has empty group membership and an empty username;
/// it resolves to whatever `anonymousSubscriber` entries grant. An entry
/// without a topic filter aborts resolution: it marks a corrupt document,
/// not an ordinary "no access" case.
pub fn resolve_topics(
    entries: &[AclEntry],
    principal: Option<&Principal>,
    client_id: &str,
    direction: Direction,
) -> Result<Vec<TopicPath>, AclConfigError> {
    let user_groups = principal.map(Principal::group_names).unwrap_or_default();
    let username = principal.map(|p| p.username.as_str()).unwrap_or_default();

    let mut allowed = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        let filter = entry
            .topic_filter
            .as_deref()
            .ok_or(AclConfigError::MissingTopicFilter { index })?;

        let entry_groups = match direction {
            Direction::Subscribe => &entry.subscribers,
            Direction::Publish => &entry.publishers,
        };

        let group_match = entry_groups.iter().any(|group| user_groups.contains(group));
        let anonymous_grant = direction == Direction::Subscribe && entry.anonymous_subscriber;
        if !group_match && !anonymous_grant {
            continue;
        }

        let resolved = filter
            .replace(USERNAME_PLACEHOLDER, username)
            .replace(CLIENT_ID_PLACEHOLDER, client_id);
        allowed.push(TopicPath::parse(&resolved));
    }

    Ok(allowed)
}
