//! Topic-level authorization engine for MQTT-style publish/subscribe
//!
//! Decides whether a principal may subscribe to or publish on a topic,
//! given access-control entries bound to group identities:
//!
//! - **ACL resolution**: select the entries whose subscriber/publisher
//!   groups intersect the principal's membership and expand the `%u`
//!   (username) and `%c` (client id) placeholders into concrete patterns
//! - **Wildcard matching**: compare the topic against the allowed patterns
//!   using single-level (+) and multi-level (#) wildcards, rejecting
//!   attempts deeper or shallower than a grant
//! - **Capability injection**: hosts plug the engine into their resource
//!   types through the [`Authorize`] trait instead of subclassing them
//!
//! Authentication is out of scope: the engine trusts the supplied
//! principal and its group memberships and only answers what that
//! principal may do.
//!
//! # Example ACL Document
//!
//! ```json
//! {
//!   "acls": [
//!     {
//!       "topicFilter": "home/%u/+",
//!       "subscribers": ["residents"],
//!       "publishers": ["controllers"]
//!     },
//!     {
//!       "topicFilter": "announcements/#",
//!       "anonymousSubscriber": true
//!     }
//!   ]
//! }
//! ```
//!
//! # Example
//!
//! ```
//! use mqtt_acl_engine::{AclDocument, PermissionEngine, Principal};
//!
//! let doc = AclDocument::from_json(
//!     r#"{"acls": [{"topicFilter": "home/%u/+", "subscribers": ["residents"]}]}"#,
//! )
//! .unwrap();
//! let engine = PermissionEngine::new(doc.acls).unwrap();
//!
//! let alice = Principal {
//!     username: "alice".to_string(),
//!     auth_groups: Some(vec!["residents".to_string()].into()),
//!     role: None,
//! };
//! assert!(engine.can_subscribe(Some(&alice), "client-1", "home/alice/kitchen"));
//! assert!(!engine.can_subscribe(Some(&alice), "client-1", "home/bob/kitchen"));
//! ```

pub mod acl;
pub mod config;
pub mod topic;

// Re-export main types
pub use acl::{resolve_topics, AccessRequest, Authorize, PermissionEngine};
pub use config::{
    AclConfigError, AclDocument, AclEntry, Direction, GroupSet, Principal, PrincipalRole,
};
pub use topic::{TopicMatcher, TopicPath};
