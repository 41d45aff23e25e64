//! Subcommand implementations

pub mod info;
pub mod list;
pub mod play;

use std::path::Path;

use anyhow::{anyhow, Result};
use hiconfig::{settings_path, Settings};
use tracing::warn;

/// Settings remembered for one subcommand
///
/// Problems with the settings are not fatal. Without a settings directory the
/// command runs with unsaved settings; an unreadable file is replaced on save.
pub(crate) fn load_settings(name: &str) -> Settings {
    match settings_path(name) {
        Ok(path) => load_settings_from(&path),
        Err(e) => {
            warn!("Failed to locate settings {name}: {e:#}");
            Settings::in_memory()
        }
    }
}

fn load_settings_from(path: &Path) -> Settings {
    match Settings::load(path) {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Failed to load settings {}: {e:#}", path.display());
            Settings::empty_at(path)
        }
    }
}

pub(crate) fn save_settings(settings: &Settings) {
    if let Err(e) = settings.save() {
        warn!("Failed to save settings: {e:#}");
    }
}

/// Channel id from the command line, falling back to the remembered one
pub(crate) fn resolve_channel_id(
    arg: Option<u32>,
    settings: &Settings,
    command: &str,
) -> Result<u32> {
    arg.or_else(|| settings.channel_id()).ok_or_else(|| {
        anyhow!("No channel id given and none remembered, run `hiradio {command} <CHANNEL_ID>`")
    })
}
