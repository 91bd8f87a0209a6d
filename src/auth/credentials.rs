use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "emtct-tui";

pub struct CredentialStore;

impl CredentialStore {
    /// Store email and password in the OS keychain
    pub fn store(email: &str, password: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, email)
            .context("Failed to create keyring entry")?;
        entry
            .set_password(password)
            .context("Failed to store password in keychain")?;
        Ok(())
    }

    /// Retrieve password for an email from the OS keychain
    pub fn get_password(email: &str) -> Result<String> {
        let entry = Entry::new(SERVICE_NAME, email)
            .context("Failed to create keyring entry")?;
        entry
            .get_password()
            .context("Failed to retrieve password from keychain")
    }

    /// Check if credentials exist for an email
    pub fn has_credentials(email: &str) -> bool {
        if let Ok(entry) = Entry::new(SERVICE_NAME, email) {
            entry.get_password().is_ok()
        } else {
            false
        }
    }
}
