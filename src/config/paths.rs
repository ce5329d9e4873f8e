//! Where the ledger keeps its files
//!
//! The base directory is the first of:
//!
//! 1. `CHARITY_LEDGER_DIR`
//! 2. `$XDG_CONFIG_HOME/charity-ledger`, then `$HOME/.config/charity-ledger`
//!    (`%APPDATA%\charity-ledger` on Windows)
//!
//! Inside it live `config.json` and `data/ledger.json`. The ledger file can
//! be pointed elsewhere with [`LedgerPaths::with_ledger_file`].

use std::path::{Path, PathBuf};

use crate::error::{LedgerError, LedgerResult};

/// Environment variable that overrides the base directory
pub const LEDGER_DIR_ENV: &str = "CHARITY_LEDGER_DIR";

const APP_DIR: &str = "charity-ledger";
const DATA_DIR: &str = "data";
const SETTINGS_FILE: &str = "config.json";
const LEDGER_FILE: &str = "ledger.json";

#[derive(Debug, Clone)]
pub struct LedgerPaths {
    base_dir: PathBuf,
    ledger_override: Option<PathBuf>,
}

impl LedgerPaths {
    /// Resolve the base directory from the environment
    pub fn new() -> LedgerResult<Self> {
        let base_dir = match env_path(LEDGER_DIR_ENV) {
            Some(dir) => dir,
            None => default_base_dir()?,
        };
        Ok(Self::with_base_dir(base_dir))
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            ledger_override: None,
        }
    }

    /// Keep settings in the base directory but read and write this ledger
    pub fn with_ledger_file(self, ledger_file: impl Into<PathBuf>) -> Self {
        Self {
            ledger_override: Some(ledger_file.into()),
            ..self
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join(DATA_DIR)
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join(SETTINGS_FILE)
    }

    pub fn ledger_file(&self) -> PathBuf {
        match &self.ledger_override {
            Some(path) => path.clone(),
            None => self.data_dir().join(LEDGER_FILE),
        }
    }

    /// Create the data directory and, with it, the base directory
    pub fn ensure_directories(&self) -> LedgerResult<()> {
        let data_dir = self.data_dir();
        std::fs::create_dir_all(&data_dir).map_err(|e| {
            LedgerError::Io(format!("cannot create {}: {}", data_dir.display(), e))
        })
    }

    /// Settings have been written by `init`
    pub fn is_initialized(&self) -> bool {
        self.settings_file().is_file()
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn default_base_dir() -> LedgerResult<PathBuf> {
    let config_root = if cfg!(windows) {
        env_path("APPDATA")
    } else {
        env_path("XDG_CONFIG_HOME").or_else(|| env_path("HOME").map(|home| home.join(".config")))
    };

    config_root.map(|root| root.join(APP_DIR)).ok_or_else(|| {
        LedgerError::Config(format!(
            "no home or config directory found; set {}",
            LEDGER_DIR_ENV
        ))
    })
}
