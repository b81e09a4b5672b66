//! JSON ファイルに権限を記録する PermissionStore 実装
//!
//! 形式: `{"camera": "granted"}`。ファイルが無ければ未記録。

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use common::error::Error;
use common::ports::outbound::FileSystem;

use crate::domain::{Capability, PermissionStatus};
use crate::ports::outbound::PermissionStore;

pub struct FilePermissionStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl FilePermissionStore {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    fn read_all(&self) -> Result<BTreeMap<Capability, PermissionStatus>, Error> {
        if !self.fs.exists(&self.path) {
            return Ok(BTreeMap::new());
        }
        let content = self.fs.read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .map_err(|e| Error::json(format!("{}: {}", self.path.display(), e)))
    }
}

impl PermissionStore for FilePermissionStore {
    fn load(&self, capability: Capability) -> Result<Option<PermissionStatus>, Error> {
        Ok(self.read_all()?.get(&capability).copied())
    }

    fn save(&self, capability: Capability, status: PermissionStatus) -> Result<(), Error> {
        let mut all = self.read_all()?;
        all.insert(capability, status);
        if let Some(parent) = self.path.parent() {
            self.fs.create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&all)?;
        self.fs.write(&self.path, &format!("{}\n", json))
    }
}
