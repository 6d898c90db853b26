//! `fxconv setup`: writes the example configuration to disk.

use crate::core::config::AppConfig;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const EXAMPLE_CONFIG: &str = include_str!("../../docs/example_config.yaml");

/// Writes the example config to the platform config path and returns where.
pub fn setup(force: bool) -> Result<PathBuf> {
    let path = AppConfig::default_config_path()?;
    write_example_config(&path, force)?;
    Ok(path)
}

/// Writes the example config to `path`, creating parent directories.
///
/// An existing file is only replaced when `force` is set.
pub fn write_example_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Configuration file already exists at {} (use --force to replace it)",
            path.display()
        );
    }

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config directory {}", dir.display()))?;
    }
    fs::write(path, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write config file {}", path.display()))?;

    info!(path = %path.display(), force, "Wrote example configuration");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_example_into_new_directory() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("fxconv").join("config.yaml");

        write_example_config(&path, false)?;

        let written: AppConfig = serde_yaml::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(written, AppConfig::default());
        Ok(())
    }

    #[test]
    fn test_keeps_existing_config_without_force() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("config.yaml");
        fs::write(&path, "api:\n  timeout_ms: 500\n")?;

        let err = write_example_config(&path, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert_eq!(fs::read_to_string(&path)?, "api:\n  timeout_ms: 500\n");
        Ok(())
    }

    #[test]
    fn test_force_replaces_existing_config() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("config.yaml");
        fs::write(&path, "api:\n  timeout_ms: 500\n")?;

        write_example_config(&path, true)?;
        assert_eq!(fs::read_to_string(&path)?, EXAMPLE_CONFIG);
        Ok(())
    }

    #[test]
    fn test_example_names_every_setting() {
        for key in ["base_url:", "timeout_ms:", "from:", "to:"] {
            assert!(EXAMPLE_CONFIG.contains(key), "{key} missing");
        }
    }
}
