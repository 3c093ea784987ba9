use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::{Error, Result, registry::RegistrySnapshot};

/// JSON state file holding the last committed registry snapshot.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored snapshot. Missing or unreadable files yield `None`.
    pub fn load(&self) -> Option<RegistrySnapshot> {
        let path = self.path.display().to_string();
        let data = match std::fs::read_to_string(&self.path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path, "webhook state file not found");
                return None;
            },
            Err(e) => {
                warn!(path = %path, error = %e, "webhook state file read failed");
                return None;
            },
        };

        match serde_json::from_str::<RegistrySnapshot>(&data) {
            Ok(snapshot) => {
                debug!(path = %path, count = snapshot.webhooks.len(), "webhook state loaded");
                Some(snapshot)
            },
            Err(e) => {
                warn!(path = %path, error = %e, "webhook state file parse failed");
                None
            },
        }
    }

    pub fn save(&self, snapshot: &RegistrySnapshot) -> Result<()> {
        let path = self.path.display().to_string();

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::store(format!("create {}", parent.display()), e))?;
        }

        let data = serde_json::to_string_pretty(snapshot)
            .map_err(|e| Error::store("serialize snapshot", e))?;
        std::fs::write(&self.path, &data).map_err(|e| Error::store(format!("write {path}"), e))?;

        // Endpoint URLs carry tokens.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .map_err(|e| Error::store(format!("chmod {path}"), e))?;
        }

        info!(path = %path, count = snapshot.webhooks.len(), "webhook state saved");
        Ok(())
    }

    /// Delete the state file. Returns whether one existed.
    pub fn clear(&self) -> Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "webhook state cleared");
                Ok(true)
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::store(format!("remove {}", self.path.display()), e)),
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::{ChannelKey, EndpointRef};

    fn snapshot() -> RegistrySnapshot {
        RegistrySnapshot {
            server_name: Some("Guild".into()),
            server_logo: Some("https://cdn/icons/1/a.png".into()),
            webhooks: BTreeMap::from([(
                ChannelKey::normalize("general").unwrap(),
                EndpointRef::from_parts("https://discord.com/api/webhooks", "1", "tok"),
            )]),
        }
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = RegistryStore::new(dir.path().join("nested").join("webhooks.json"));
        assert!(store.load().is_none());

        store.save(&snapshot()).unwrap();
        assert_eq!(store.load().unwrap(), snapshot());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn corrupt_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("webhooks.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(RegistryStore::new(path).load().is_none());
    }

    #[test]
    fn clear_reports_whether_file_existed() {
        let dir = tempfile::tempdir().unwrap();
        let store = RegistryStore::new(dir.path().join("webhooks.json"));
        assert!(!store.clear().unwrap());
        store.save(&snapshot()).unwrap();
        assert!(store.clear().unwrap());
        assert!(store.load().is_none());
    }
}
