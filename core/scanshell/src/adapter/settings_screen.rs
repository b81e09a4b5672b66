//! 設定画面（表示のみ。設定は編集しない）

use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use common::error::Error;

use super::config::AppConfig;
use crate::domain::Capability;
use crate::ports::outbound::{PermissionStore, SettingsScreen};

pub struct ConfigSettingsScreen {
    config_path: PathBuf,
    permission_path: PathBuf,
    config: AppConfig,
    store: Arc<dyn PermissionStore>,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConfigSettingsScreen {
    pub fn new(
        config_path: PathBuf,
        permission_path: PathBuf,
        config: AppConfig,
        store: Arc<dyn PermissionStore>,
        out: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            config_path,
            permission_path,
            config,
            store,
            out: Mutex::new(out),
        }
    }
}

impl SettingsScreen for ConfigSettingsScreen {
    fn open(&self) -> Result<(), Error> {
        let camera = match self.store.load(Capability::Camera)? {
            Some(status) => status.as_str(),
            None => "not asked",
        };
        let effective = serde_json::to_string_pretty(&self.config)?;
        let mut out = self
            .out
            .lock()
            .map_err(|_| Error::system("settings screen lock poisoned"))?;
        writeln!(out, "Settings")?;
        writeln!(out, "  config file: {}", self.config_path.display())?;
        writeln!(out, "  permissions: {}", self.permission_path.display())?;
        writeln!(out, "  camera:      {}", camera)?;
        writeln!(out, "{}", effective)?;
        out.flush()?;
        Ok(())
    }
}
