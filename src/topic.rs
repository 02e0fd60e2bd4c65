//! Topic paths and wildcard matching
//!
//! Topics are slash-delimited hierarchical names. ACL-derived patterns may
//! contain the single-level (+) and multi-level (#) wildcards; a concrete
//! publish topic never does, but a subscription request may.

use std::fmt;

/// Single-level wildcard: matches exactly one topic level.
pub const SINGLE_LEVEL_WILDCARD: &str = "+";

/// Multi-level wildcard: matches the topic remainder at any depth.
pub const MULTI_LEVEL_WILDCARD: &str = "#";

/// A topic split into an ordered sequence of levels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopicPath {
    levels: Vec<String>,
}

impl TopicPath {
    /// Split a slash-delimited topic string into levels.
    pub fn parse(topic: &str) -> Self {
        Self {
            levels: topic.split('/').map(str::to_string).collect(),
        }
    }

    /// The ordered levels of this path.
    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    /// Number of levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether the path has no levels.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl From<&str> for TopicPath {
    fn from(topic: &str) -> Self {
        Self::parse(topic)
    }
}

impl fmt::Display for TopicPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.levels.join("/"))
    }
}

/// Wildcard-aware matcher deciding whether a topic is covered by a set of
/// allowed patterns.
#[derive(Debug, Clone, Default)]
pub struct TopicMatcher;

impl TopicMatcher {
    /// Create a new topic matcher
    pub fn new() -> Self {
        Self
    }

    /// Check whether `candidate` is covered by at least one pattern.
    ///
    /// An empty pattern list never matches: absence of a grant is a denial.
    /// Evaluation stops at the first covering pattern.
    ///
    /// # Examples
    /// ```
    /// use mqtt_acl_engine::topic::{TopicMatcher, TopicPath};
    ///
    /// let matcher = TopicMatcher::new();
    /// let patterns = vec![TopicPath::parse("sensors/+/temp")];
    /// assert!(matcher.matches(&TopicPath::parse("sensors/kitchen/temp"), &patterns));
    /// assert!(!matcher.matches(&TopicPath::parse("sensors/kitchen"), &patterns));
    /// ```
    pub fn matches(&self, candidate: &TopicPath, patterns: &[TopicPath]) -> bool {
        patterns
            .iter()
            .any(|pattern| self.pattern_covers(candidate, pattern))
    }

    /// Compare one candidate against one pattern.
    ///
    /// The walk is driven by the candidate's levels:
    /// * pattern exhausted first: the attempt is deeper than the grant, fail
    /// * pattern level `#`: the grant covers the whole remainder, accept
    /// * pattern level `+`: consumes one level, unless the candidate level
    ///   is itself `#` (a multi-level request cannot ride through a
    ///   single-level grant)
    /// * anything else: literal comparison
    ///
    /// Surviving the walk accepts only at exact depth; a grant deeper than
    /// the attempt must say `#` to also cover shallower attempts.
    fn pattern_covers(&self, candidate: &TopicPath, pattern: &TopicPath) -> bool {
        for (y, level) in candidate.levels().iter().enumerate() {
            let sub = match pattern.levels().get(y) {
                Some(sub) => sub.as_str(),
                None => return false,
            };

            match sub {
                MULTI_LEVEL_WILDCARD => return true,
                SINGLE_LEVEL_WILDCARD => {
                    if level == MULTI_LEVEL_WILDCARD {
                        return false;
                    }
                }
                _ => {
                    if sub != level {
                        return false;
                    }
                }
            }
        }

        candidate.len() == pattern.len()
    }

    /// Check whether a pattern is a canonical MQTT filter: `#` only in the
    /// final position, wildcards occupying a whole level, no empty levels.
    ///
    /// Matching itself does not require this; the engine uses it to flag
    /// filters that will not behave the way their author likely intended.
    pub fn is_canonical_filter(&self, pattern: &TopicPath) -> bool {
        if pattern.is_empty() {
            return false;
        }

        for (i, level) in pattern.levels().iter().enumerate() {
            if level.is_empty() {
                return false;
            }

            // # must be the final level and alone
            if level.contains('#') && (level != MULTI_LEVEL_WILDCARD || i != pattern.len() - 1) {
                return false;
            }

            // + must be alone in its level
            if level.contains('+') && level != SINGLE_LEVEL_WILDCARD {
                return false;
            }
        }

        true
    }
}
