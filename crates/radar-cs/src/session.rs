//! Signed-in user context for CLI runs.
//!
//! Sessions are plain values read and written at process boundaries; nothing in
//! the workflows looks one up on its own.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::workflows::pendencies::{CsmFilter, ALL_CSMS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    Csm,
    Viewer,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Admin => "Administrador",
            Role::Manager => "Gestor",
            Role::Csm => "CSM",
            Role::Viewer => "Leitor",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "manager" => Some(Role::Manager),
            "csm" => Some(Role::Csm),
            "viewer" => Some(Role::Viewer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub organization_id: Option<String>,
}

impl Session {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SessionError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SessionError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// CSMs land on their own portfolio; everyone else sees every account.
    pub fn default_csm_filter(&self) -> String {
        match self.role {
            Role::Csm => self.name.clone(),
            _ => ALL_CSMS.to_string(),
        }
    }

    pub fn csm_filter(&self) -> CsmFilter {
        CsmFilter::parse(Some(&self.default_csm_filter()))
    }
}

#[derive(Debug)]
pub enum SessionError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Io(err) => write!(f, "session file unavailable: {}", err),
            SessionError::Json(err) => write!(f, "session file is not valid JSON: {}", err),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Io(err) => Some(err),
            SessionError::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for SessionError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
