use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};

use serde::{Deserialize, Serialize};

use crate::{channel_key::ChannelKey, endpoint::EndpointRef};

/// Display identity of the workspace the registry currently serves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Workspace {
    pub fn new(name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            icon: Some(icon.into()),
        }
    }
}

/// One immutable registry state. Readers always see a whole snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_logo: Option<String>,
    #[serde(default)]
    pub webhooks: BTreeMap<ChannelKey, EndpointRef>,
}

impl RegistrySnapshot {
    pub fn workspace(&self) -> Workspace {
        Workspace {
            name: self.server_name.clone(),
            icon: self.server_logo.clone(),
        }
    }

    /// Declarative TOML listing of the mapping, tokens included.
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string(self).map_err(|e| crate::Error::store("render listing", e))
    }
}

/// Channel key → webhook mapping for one workspace.
///
/// Mutations build a new snapshot and swap it in under the write lock, so
/// concurrent lookups never observe a half-replaced mapping.
#[derive(Debug, Default)]
pub struct WebhookRegistry {
    current: RwLock<Arc<RegistrySnapshot>>,
}

impl WebhookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: RegistrySnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        Arc::clone(&self.current.read().unwrap_or_else(|e| e.into_inner()))
    }

    pub fn lookup(&self, key: &str) -> Option<EndpointRef> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .webhooks
            .get(key)
            .cloned()
    }

    /// Discard every entry and install `entries` with the given workspace.
    /// Returns the snapshot this call committed.
    pub fn replace_all(
        &self,
        entries: BTreeMap<ChannelKey, EndpointRef>,
        workspace: Workspace,
    ) -> Arc<RegistrySnapshot> {
        let next = Arc::new(RegistrySnapshot {
            server_name: workspace.name,
            server_logo: workspace.icon,
            webhooks: entries,
        });
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Arc::clone(&next);
        next
    }

    /// Insert or overwrite one key, keeping the others. The workspace
    /// fields are overwritten unconditionally. Returns the committed snapshot.
    pub fn upsert(
        &self,
        key: ChannelKey,
        endpoint: EndpointRef,
        workspace: Workspace,
    ) -> Arc<RegistrySnapshot> {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        let mut next = RegistrySnapshot::clone(&guard);
        next.webhooks.insert(key, endpoint);
        next.server_name = workspace.name;
        next.server_logo = workspace.icon;
        let next = Arc::new(next);
        *guard = Arc::clone(&next);
        next
    }

    /// `(key, display label)` pairs sorted by key.
    pub fn list(&self) -> Vec<(ChannelKey, String)> {
        self.snapshot()
            .webhooks
            .keys()
            .map(|k| (k.clone(), k.display_label()))
            .collect()
    }

    pub fn workspace(&self) -> Workspace {
        self.snapshot().workspace()
    }

    pub fn len(&self) -> usize {
        self.snapshot().webhooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
