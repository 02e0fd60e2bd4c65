//! Topic ACL check CLI
//!
//! Loads an ACL document and evaluates a single subscribe/publish request.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use mqtt_acl_engine::{AclDocument, Direction, GroupSet, PermissionEngine, Principal};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Check topic permissions against an ACL document
#[derive(Parser, Debug)]
#[command(name = "mqtt-acl-check")]
#[command(version)]
#[command(about = "Evaluate a topic access request against an ACL document", long_about = None)]
struct Args {
    /// ACL document path (JSON)
    #[arg(short, long)]
    acls: PathBuf,

    /// Topic to check (slash-delimited; may contain wildcards for subscribe)
    topic: String,

    /// Direction of the access attempt
    #[arg(short, long, value_enum, default_value = "subscribe")]
    direction: CheckDirection,

    /// Username of the principal (omit for anonymous access)
    #[arg(short, long)]
    username: Option<String>,

    /// Group membership of the principal, `;`-delimited
    #[arg(short, long)]
    groups: Option<String>,

    /// Client identifier, substituted for `%c` in topic filters
    #[arg(short, long, default_value = "")]
    client_id: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Enable JSON log format
    #[arg(long)]
    json_logs: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CheckDirection {
    Subscribe,
    Publish,
}

impl From<CheckDirection> for Direction {
    fn from(direction: CheckDirection) -> Self {
        match direction {
            CheckDirection::Subscribe => Direction::Subscribe,
            CheckDirection::Publish => Direction::Publish,
        }
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    if args.json_logs {
        fmt().json().with_env_filter(filter).with_target(true).init();
    } else {
        fmt().with_env_filter(filter).with_target(true).init();
    }

    let document = AclDocument::from_file(&args.acls)
        .with_context(|| format!("failed to load ACL document {}", args.acls.display()))?;

    info!(
        path = %args.acls.display(),
        entries = document.acls.len(),
        "Loaded ACL document"
    );

    let engine = PermissionEngine::new(document.acls).context("invalid ACL document")?;

    let principal = args.username.map(|username| Principal {
        username,
        auth_groups: args.groups.map(GroupSet::Delimited),
        role: None,
    });

    let allowed = match Direction::from(args.direction) {
        Direction::Subscribe => {
            engine.can_subscribe(principal.as_ref(), &args.client_id, &args.topic)
        }
        Direction::Publish => {
            engine.can_publish(principal.as_ref(), &args.client_id, &args.topic)
        }
    };

    if allowed {
        println!("allowed");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("denied");
        Ok(ExitCode::from(2))
    }
}
