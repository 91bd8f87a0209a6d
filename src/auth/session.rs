use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Session file name in the data directory
const SESSION_FILE: &str = "session.json";

/// Token expiry time in minutes.
/// The service issues tokens valid for one hour.
const TOKEN_EXPIRY_MINUTES: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl SessionData {
    pub fn is_expired(&self) -> bool {
        let expiry = self.created_at + Duration::minutes(TOKEN_EXPIRY_MINUTES);
        Utc::now() > expiry
    }
}

pub struct Session {
    data_dir: PathBuf,
    pub data: Option<SessionData>,
}

impl Session {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            data: None,
        }
    }

    /// Load session from disk
    pub fn load(&mut self) -> Result<bool> {
        let path = self.session_path();
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .context("Failed to read session file")?;
            let data: SessionData = serde_json::from_str(&contents)
                .context("Failed to parse session file")?;

            if !data.is_expired() {
                self.data = Some(data);
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Save session to disk
    pub fn save(&self) -> Result<()> {
        if let Some(ref data) = self.data {
            let path = self.session_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(data)?;
            std::fs::write(path, contents)?;
        }
        Ok(())
    }

    /// Clear session data
    pub fn clear(&mut self) -> Result<()> {
        self.data = None;
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Update session with new data
    pub fn update(&mut self, data: SessionData) {
        self.data = Some(data);
    }

    /// Get the bearer token if session is valid
    pub fn token(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.token.as_str())
    }

    /// Check if session is valid (exists and not expired)
    pub fn is_valid(&self) -> bool {
        self.data.as_ref().map(|d| !d.is_expired()).unwrap_or(false)
    }

    fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_expiry() {
        let fresh = SessionData {
            token: "t".to_string(),
            email: "nurse@health.gov.bz".to_string(),
            created_at: Utc::now(),
        };
        assert!(!fresh.is_expired());

        let stale = SessionData {
            token: "t".to_string(),
            email: "nurse@health.gov.bz".to_string(),
            created_at: Utc::now() - Duration::minutes(TOKEN_EXPIRY_MINUTES + 1),
        };
        assert!(stale.is_expired());
    }
}
