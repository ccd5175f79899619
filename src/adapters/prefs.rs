//! Preference store adapter.
//!
//! Implements both [`ConfigPort`] and [`StoragePort`].
//!
//! ```text
//!   <config dir>/DockLambda/
//!     ├── config.json    AppConfig (pretty JSON)
//!     └── prefs.json     { "namespace::key": [bytes…], … }
//! ```
//!
//! - Config validation: all fields are range-checked before persistence.
//! - Namespace isolation: each subsystem uses its own namespace prefix.
//! - Atomic writes: each file is written to a sibling temp file and renamed
//!   over the original.
//!
//! [`PrefsStore::in_memory`] keeps everything in a map and never touches
//! the filesystem (tests, `--ephemeral`).

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort, StorageError, StoragePort};
use crate::config::{AppConfig, IdleRange};
use crate::geometry::Rect;

const APP_DIR: &str = "DockLambda";
const PREFS_FILE: &str = "prefs.json";
const CONFIG_FILE: &str = "config.json";

const CONFIG_NAMESPACE: &str = "docklambda";
const CONFIG_KEY: &str = "config";

pub struct PrefsStore {
    /// Backing directory; `None` for the in-memory backend.
    dir: Option<PathBuf>,
    store: RefCell<BTreeMap<String, Vec<u8>>>,
}

impl PrefsStore {
    /// Store that lives only as long as the process.
    pub fn in_memory() -> Self {
        info!("PrefsStore: in-memory backend");
        Self {
            dir: None,
            store: RefCell::new(BTreeMap::new()),
        }
    }

    /// Open (creating if needed) the store in `dir`.
    ///
    /// An unreadable `prefs.json` is logged and treated as empty; it is
    /// replaced on the next write.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            warn!("PrefsStore: cannot create {}: {}", dir.display(), e);
            StorageError::IoError
        })?;

        let path = dir.join(PREFS_FILE);
        let map = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!("PrefsStore: {} is corrupt ({}), starting empty", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!("PrefsStore: cannot read {}: {}", path.display(), e);
                return Err(StorageError::IoError);
            }
        };

        info!("PrefsStore: {} ({} keys)", dir.display(), map.len());
        Ok(Self {
            dir: Some(dir),
            store: RefCell::new(map),
        })
    }

    /// `<platform config dir>/DockLambda`, if the platform has one.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR))
    }

    /// Backing directory, `None` when in memory.
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{}::{}", namespace, key)
    }

    /// Rewrite `prefs.json` from the in-memory map.
    fn flush(&self) -> Result<(), StorageError> {
        let Some(dir) = &self.dir else {
            return Ok(());
        };
        let bytes =
            serde_json::to_vec_pretty(&*self.store.borrow()).map_err(|_| StorageError::Corrupted)?;
        write_atomic(&dir.join(PREFS_FILE), &bytes).map_err(|e| {
            warn!("PrefsStore: write failed: {}", e);
            StorageError::IoError
        })
    }
}

/// Write `bytes` to a temp sibling of `path`, then rename it into place.
fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)
}

fn validate_idle_range(range: IdleRange, msg: &'static str) -> Result<(), ConfigError> {
    if range.min_secs == 0 || range.min_secs > range.max_secs {
        return Err(ConfigError::ValidationFailed(msg));
    }
    Ok(())
}

pub fn validate_config(cfg: &AppConfig) -> Result<(), ConfigError> {
    if !(1_000..=600_000).contains(&cfg.cpu_poll_interval_ms) {
        return Err(ConfigError::ValidationFailed(
            "cpu_poll_interval_ms must be 1000–600000",
        ));
    }
    if !(500..=60_000).contains(&cfg.dock_poll_interval_ms) {
        return Err(ConfigError::ValidationFailed(
            "dock_poll_interval_ms must be 500–60000",
        ));
    }
    if cfg.screen_debounce_ms > 5_000 {
        return Err(ConfigError::ValidationFailed(
            "screen_debounce_ms must be 0–5000",
        ));
    }
    if !(10..=1_000).contains(&cfg.loop_period_ms) {
        return Err(ConfigError::ValidationFailed(
            "loop_period_ms must be 10–1000",
        ));
    }
    if !(0.0..=200.0).contains(&cfg.window_margin) {
        return Err(ConfigError::ValidationFailed(
            "window_margin must be 0–200",
        ));
    }
    if !(16.0..=1024.0).contains(&cfg.pet_size.width) || !(16.0..=1024.0).contains(&cfg.pet_size.height)
    {
        return Err(ConfigError::ValidationFailed(
            "pet_size must be 16–1024 on both axes",
        ));
    }
    if !(0.0..=1.0).contains(&cfg.cpu_medium_threshold)
        || !(0.0..=1.0).contains(&cfg.cpu_high_threshold)
    {
        return Err(ConfigError::ValidationFailed(
            "cpu thresholds must be 0.0–1.0",
        ));
    }
    if cfg.cpu_medium_threshold >= cfg.cpu_high_threshold {
        return Err(ConfigError::ValidationFailed(
            "cpu_medium_threshold must be < cpu_high_threshold",
        ));
    }
    validate_idle_range(cfg.idle_low, "idle_low must satisfy 0 < min <= max")?;
    validate_idle_range(cfg.idle_medium, "idle_medium must satisfy 0 < min <= max")?;
    validate_idle_range(cfg.idle_high, "idle_high must satisfy 0 < min <= max")?;
    if !is_valid_rect(&cfg.display.frame) {
        return Err(ConfigError::ValidationFailed(
            "display frame must be finite with a positive size",
        ));
    }
    if !is_valid_rect(&cfg.display.visible) {
        return Err(ConfigError::ValidationFailed(
            "display visible frame must be finite with a positive size",
        ));
    }
    Ok(())
}

/// Finite origin and a strictly positive, finite size.  NaN fails.
fn is_valid_rect(rect: &Rect) -> bool {
    let positive = |v: f64| v.is_finite() && v > 0.0;
    rect.origin.is_finite() && positive(rect.size.width) && positive(rect.size.height)
}

impl ConfigPort for PrefsStore {
    fn load(&self) -> Result<AppConfig, ConfigError> {
        let bytes = match &self.dir {
            Some(dir) => match fs::read(dir.join(CONFIG_FILE)) {
                Ok(bytes) => Some(bytes),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
                Err(_) => return Err(ConfigError::IoError),
            },
            None => self
                .store
                .borrow()
                .get(&Self::composite_key(CONFIG_NAMESPACE, CONFIG_KEY))
                .cloned(),
        };

        let Some(bytes) = bytes else {
            info!("PrefsStore: no stored config, using defaults");
            return Ok(AppConfig::default());
        };
        let cfg: AppConfig = serde_json::from_slice(&bytes).map_err(|_| ConfigError::Corrupted)?;
        validate_config(&cfg)?;
        info!("PrefsStore: loaded config ({} bytes)", bytes.len());
        Ok(cfg)
    }

    fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        validate_config(config)?;
        let bytes = serde_json::to_vec_pretty(config).map_err(|_| ConfigError::IoError)?;

        match &self.dir {
            Some(dir) => {
                write_atomic(&dir.join(CONFIG_FILE), &bytes).map_err(|e| {
                    warn!("PrefsStore: config write failed: {}", e);
                    ConfigError::IoError
                })?;
            }
            None => {
                self.store
                    .borrow_mut()
                    .insert(Self::composite_key(CONFIG_NAMESPACE, CONFIG_KEY), bytes);
            }
        }
        info!("PrefsStore: config saved");
        Ok(())
    }
}

impl StoragePort for PrefsStore {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        let composite = Self::composite_key(namespace, key);
        match self.store.borrow().get(&composite) {
            Some(data) if data.len() > buf.len() => {
                warn!(
                    "PrefsStore: '{}' holds {} bytes, buffer is {}",
                    composite,
                    data.len(),
                    buf.len()
                );
                Err(StorageError::BufferTooSmall(data.len()))
            }
            Some(data) => {
                buf[..data.len()].copy_from_slice(data);
                Ok(data.len())
            }
            None => Err(StorageError::NotFound),
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let composite = Self::composite_key(namespace, key);
        self.store.borrow_mut().insert(composite, data.to_vec());
        self.flush()
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        let composite = Self::composite_key(namespace, key);
        let removed = self.store.borrow_mut().remove(&composite).is_some();
        if removed {
            self.flush()?;
        }
        Ok(())
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        let composite = Self::composite_key(namespace, key);
        self.store.borrow().contains_key(&composite)
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
