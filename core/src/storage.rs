use anyhow::{Context, Result};
use std::path::Path;

use crate::models::ProcessingConfig;

/// Leser inn prosesseringskonfig fra disk (JSON).
/// Hvis filen ikke finnes, returneres default-konfig.
pub fn load_config(path: impl AsRef<Path>) -> Result<ProcessingConfig> {
    let path = path.as_ref();
    if !path.exists() {
        log::warn!("fant ikke konfig på {}, bruker default", path.display());
        return Ok(ProcessingConfig::default());
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("kunne ikke lese {}", path.display()))?;
    let mut de = serde_json::Deserializer::from_str(&contents);
    let cfg: ProcessingConfig = serde_path_to_error::deserialize(&mut de)
        .with_context(|| format!("ugyldig konfig i {}", path.display()))?;
    cfg.validate()?;

    log::info!("konfig lastet fra {} (mode={})", path.display(), cfg.mode);
    Ok(cfg)
}

/// Lagrer konfig til disk som JSON (pretty-print).
pub fn save_config(cfg: &ProcessingConfig, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    cfg.validate()?;
    let json = serde_json::to_string_pretty(cfg)?;
    std::fs::write(path, json).with_context(|| format!("kunne ikke skrive {}", path.display()))?;
    log::info!("konfig lagret til {} (mode={})", path.display(), cfg.mode);
    Ok(())
}
