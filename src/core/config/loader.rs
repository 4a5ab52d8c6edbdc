use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::model::AppCfg;

/// Load the config at `path`. A missing file yields the defaults; an
/// unreadable or malformed file is an error the caller can surface.
pub fn load_at<P: AsRef<Path>>(path: P) -> Result<AppCfg> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(AppCfg::default());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("read config file: {}", path.display()))?;
    let cfg: AppCfg = serde_json::from_str(&text)
        .with_context(|| format!("parse config file: {}", path.display()))?;
    Ok(cfg)
}

/// Persist `cfg` as pretty JSON at `path`, creating parent directories.
pub fn save_at<P: AsRef<Path>>(cfg: &AppCfg, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config dir: {}", parent.display()))?;
    }
    let text = serde_json::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, text).with_context(|| format!("write config file: {}", path.display()))?;
    Ok(())
}
