//! File-backed session
//!
//! The session is a session.json marker in the data directory holding a
//! random session ID. Logging out deletes it.

use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::ports::SessionService;

const SESSION_FILE: &str = "session.json";

/// Active session details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct FileSession {
    data_dir: PathBuf,
}

impl FileSession {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn session_file(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }

    /// Start a new session, replacing any existing one
    pub fn start(&self) -> Result<SessionInfo> {
        fs::create_dir_all(&self.data_dir)?;
        let info = SessionInfo {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
        };
        fs::write(self.session_file(), serde_json::to_string_pretty(&info)?)?;
        info!(session = %info.id, "session started");
        Ok(info)
    }

    /// Current session, if any
    pub fn current(&self) -> Result<Option<SessionInfo>> {
        let path = self.session_file();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let info = serde_json::from_str(&content)
            .map_err(|e| Error::session(format!("Corrupt session file: {}", e)))?;
        Ok(Some(info))
    }

    pub fn is_active(&self) -> bool {
        self.session_file().exists()
    }
}

#[async_trait]
impl SessionService for FileSession {
    async fn logout(&self) -> Result<()> {
        match fs::remove_file(self.session_file()) {
            Ok(()) => {
                info!("session ended");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::session(format!("Failed to end session: {}", e))),
        }
    }
}
