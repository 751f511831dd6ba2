//! Session state: the signed-in user and the demo-mode flag.
//!
//! An explicit, injected object with a documented lifecycle: built at
//! startup, `login` installs a user, `logout` tears the session down.
//! Nothing here is global; callers that need the session receive it.
//! Persisted as JSON so CLI invocations keep the signed-in user between
//! runs.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, ScheduleError};

/// Role of the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Staff => "staff",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "staff" => Ok(Self::Staff),
            other => Err(ScheduleError::InvalidRecord(format!(
                "unknown role: {}",
                other
            ))),
        }
    }
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
        }
    }
}

/// Application session state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default)]
    pub demo_mode: bool,
}

impl Session {
    /// A fresh, signed-out session.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session running against demo data.
    pub fn demo() -> Self {
        Self {
            user: None,
            demo_mode: true,
        }
    }

    pub fn login(&mut self, user: User) {
        debug!("Session login: {} ({})", user.name, user.role);
        self.user = Some(user);
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            debug!("Session logout: {}", user.name);
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.user.as_ref().map(|u| u.role), Some(Role::Admin))
    }

    pub fn is_manager(&self) -> bool {
        matches!(
            self.user.as_ref().map(|u| u.role),
            Some(Role::Admin | Role::Manager)
        )
    }

    /// Value for the `X-User-Id` header; `None` when signed out.
    pub fn auth_header(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }

    /// Load a session from `path`. A missing or corrupt file yields a
    /// signed-out session rather than an error, matching how a cleared
    /// browser store behaves.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(session) => session,
                Err(e) => {
                    warn!(
                        "Corrupt session file {}, starting signed out: {}",
                        path.display(),
                        e
                    );
                    Self::new()
                }
            },
            Err(_) => Self::new(),
        }
    }

    /// Persist the session as JSON, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        debug!("Saved session to {}", path.display());
        Ok(())
    }
}

/// Expand a `~`-prefixed session path.
pub fn session_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}
