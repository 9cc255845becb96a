//! Key/value persistence for the logged-in user's session.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BilledError, Result};

/// Session key holding the API token
pub const JWT_KEY: &str = "jwt";

/// String key/value store shaped like a browser's local storage
pub trait SessionStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// In-memory session, lost when dropped
#[derive(Debug, Default)]
pub struct MemorySession {
    items: RefCell<BTreeMap<String, String>>,
}

impl SessionStore for MemorySession {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.items.borrow_mut().clear();
        Ok(())
    }
}

/// Session persisted as a JSON object in `session.json`.
///
/// Every write rewrites the whole file.
#[derive(Debug)]
pub struct FileSession {
    path: PathBuf,
    items: RefCell<BTreeMap<String, String>>,
}

impl FileSession {
    /// Open the session file in `config_dir` (empty if missing)
    pub fn open(config_dir: &Path) -> Result<Self> {
        let path = config_dir.join("session.json");
        let items = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)
                .map_err(|e| BilledError::SessionParse { path: path.clone(), source: e })?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            items: RefCell::new(items),
        })
    }

    fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&*self.items.borrow())?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl SessionStore for FileSession {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.save()
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.borrow_mut().remove(key);
        self.save()
    }

    fn clear(&self) -> Result<()> {
        self.items.borrow_mut().clear();
        self.save()
    }
}
