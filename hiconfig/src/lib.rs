//! # hiradio settings store
//!
//! Each CLI command remembers a few values between runs (last channel id,
//! player path, proxy port) in its own flat JSON object, e.g.
//! `~/.config/hiradio/play.json`:
//!
//! ```json
//! {
//!   "channelID": 232,
//!   "player": "/usr/bin/mpv",
//!   "proxyPort": 1077
//! }
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use hiconfig::{settings_path, Settings};
//!
//! let path = settings_path("play.json")?;
//! let settings = Settings::load(&path)?;
//!
//! let port = settings.proxy_port();
//! settings.set_channel_id(232);
//! settings.save()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{anyhow, Result};
use serde_json::{Map, Number, Value};
use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, MutexGuard,
    },
};
use tracing::debug;

const ENV_CONFIG_DIR: &str = "HIRADIO_CONFIG";
const APP_DIR: &str = "hiradio";

pub const CHANNEL_ID_KEY: &str = "channelID";
pub const PLAYER_KEY: &str = "player";
pub const PROXY_PORT_KEY: &str = "proxyPort";

pub const DEFAULT_PROXY_PORT: u16 = 1077;

/// Integer value of a JSON number; floats are truncated
fn number_as_int(n: &Number) -> Option<i64> {
    n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))
}

/// Macro to generate getter/setter for optional integer values
macro_rules! impl_int_setting {
    ($getter:ident, $setter:ident, $ty:ty, $key:expr) => {
        pub fn $getter(&self) -> Option<$ty> {
            match self.get($key)? {
                Value::Number(n) => number_as_int(&n).and_then(|v| <$ty>::try_from(v).ok()),
                _ => None,
            }
        }

        pub fn $setter(&self, value: $ty) {
            self.set($key, Value::from(value))
        }
    };
}

/// Macro to generate getter/setter for string values
macro_rules! impl_string_setting {
    ($getter:ident, $setter:ident, $key:expr) => {
        pub fn $getter(&self) -> Option<String> {
            match self.get($key)? {
                Value::String(s) => Some(s),
                _ => None,
            }
        }

        pub fn $setter(&self, value: impl Into<String>) {
            self.set($key, Value::String(value.into()))
        }
    };
}

/// Directory holding the settings files
///
/// Searched in order:
/// 1. The `HIRADIO_CONFIG` environment variable
/// 2. `hiradio` under the platform config directory (`~/.config` on Linux)
///
/// The directory is created if it doesn't exist.
pub fn settings_dir() -> Result<PathBuf> {
    let dir = match env::var_os(ENV_CONFIG_DIR) {
        Some(dir) => PathBuf::from(dir),
        None => dirs::config_dir()
            .ok_or_else(|| anyhow!("No configuration directory on this platform"))?
            .join(APP_DIR),
    };

    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }
    if !dir.is_dir() {
        return Err(anyhow!("{} is not a directory", dir.display()));
    }
    Ok(dir)
}

/// Path of the settings file `name` inside [`settings_dir`]
pub fn settings_path(name: &str) -> Result<PathBuf> {
    Ok(settings_dir()?.join(name))
}

/// Flat JSON key/value settings, optionally backed by a file
///
/// Writes are in memory; [`Settings::save`] persists them, and only when a
/// value actually changed.
#[derive(Debug, Default)]
pub struct Settings {
    path: Option<PathBuf>,
    data: Mutex<Map<String, Value>>,
    changed: AtomicBool,
}

impl Settings {
    /// Settings with no backing file; `save` is a no-op
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load settings from `path`
    ///
    /// A missing or empty file yields empty settings that will be written to
    /// `path` on save. A file that is not a JSON object is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = match fs::read(path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Map::new(),
            Ok(bytes) => match serde_json::from_slice(&bytes)? {
                Value::Object(map) => map,
                _ => return Err(anyhow!("{} is not a JSON object", path.display())),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), keys = data.len(), "Loaded settings");

        Ok(Self {
            path: Some(path.to_path_buf()),
            data: Mutex::new(data),
            changed: AtomicBool::new(false),
        })
    }

    /// Empty settings that will replace the file at `path` on save
    ///
    /// Used when the file exists but cannot be read as settings.
    pub fn empty_at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock(&self) -> MutexGuard<'_, Map<String, Value>> {
        // A panic while holding the lock cannot leave the map half-written
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Whether a value changed since load or the last save
    pub fn is_changed(&self) -> bool {
        self.changed.load(Ordering::Relaxed)
    }

    /// Set `key`; marks the settings changed only if the value differs
    pub fn set(&self, key: &str, value: Value) {
        let mut data = self.lock();
        if data.get(key) != Some(&value) {
            data.insert(key.to_string(), value);
            self.changed.store(true, Ordering::Relaxed);
        }
    }

    /// Raw value of `key`
    pub fn get(&self, key: &str) -> Option<Value> {
        self.lock().get(key).cloned()
    }

    /// String value of `key`, or `default` if missing or not a string
    pub fn get_string(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            Some(Value::String(s)) => s,
            _ => default.to_string(),
        }
    }

    /// Integer value of `key`, or `default` if missing or not a number
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.get(key) {
            Some(Value::Number(n)) => number_as_int(&n).unwrap_or(default),
            _ => default,
        }
    }

    /// Write the settings to their file if anything changed
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if !self.is_changed() {
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&*self.lock())?;
        fs::write(path, json)?;
        self.changed.store(false, Ordering::Relaxed);
        debug!(path = %path.display(), "Saved settings");
        Ok(())
    }

    impl_int_setting!(channel_id, set_channel_id, u32, CHANNEL_ID_KEY);

    impl_string_setting!(player, set_player, PLAYER_KEY);

    /// Proxy port, or [`DEFAULT_PROXY_PORT`] if unset or invalid
    pub fn proxy_port(&self) -> u16 {
        u16::try_from(self.get_int(PROXY_PORT_KEY, i64::from(DEFAULT_PROXY_PORT)))
            .unwrap_or(DEFAULT_PROXY_PORT)
    }

    pub fn set_proxy_port(&self, port: u16) {
        self.set(PROXY_PORT_KEY, Value::from(port))
    }
}
