//! Explicit session context: created at login, destroyed at logout, persisted
//! as `session.json` in the selected workspace so a restarted sidecar picks it
//! back up.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Hod,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::Hod => "hod",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s.to_ascii_lowercase().as_str() {
            "student" => Some(Role::Student),
            "teacher" => Some(Role::Teacher),
            "hod" => Some(Role::Hod),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub user_id: String,
    pub role: Role,
    pub logged_in_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
            logged_in_at: Utc::now(),
        }
    }
}

pub fn session_path(workspace: &Path) -> PathBuf {
    workspace.join(SESSION_FILE)
}

pub fn load(workspace: &Path) -> anyhow::Result<Option<SessionContext>> {
    let path = session_path(workspace);
    if !path.is_file() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(&path)?;
    let ctx = serde_json::from_str(&raw)?;
    Ok(Some(ctx))
}

pub fn save(workspace: &Path, ctx: &SessionContext) -> anyhow::Result<()> {
    let raw = serde_json::to_string_pretty(ctx)?;
    std::fs::write(session_path(workspace), raw)?;
    Ok(())
}

pub fn clear(workspace: &Path) -> anyhow::Result<()> {
    let path = session_path(workspace);
    if path.is_file() {
        std::fs::remove_file(&path)?;
    }
    Ok(())
}
