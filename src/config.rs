//! Configuration file loading.
//!
//! The schema lives in [`tc_core::config`]; this module only finds and
//! parses the TOML file.

use std::path::Path;

use anyhow::{Context, Result};
use tc_core::config::Config;

const DEFAULT_PATHS: [&str; 3] = [
    "./transcast.toml",
    "~/.config/transcast/config.toml",
    "/etc/transcast/config.toml",
];

/// Load configuration from a TOML file. Validation warnings are logged,
/// not returned.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    for warning in config.validate() {
        tracing::warn!("{}: {warning}", path.display());
    }

    Ok(config)
}

/// Load `custom_path`, else the first default location that exists, else
/// the built-in defaults.
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    for path_str in DEFAULT_PATHS {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!(path = %path.display(), "using config file");
            return load_config(path);
        }
    }

    Ok(Config::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tc_core::EncodePreset;

    #[test]
    fn parses_partial_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcast.toml");
        std::fs::write(
            &path,
            r#"
[scratch]
dir = "/var/tmp/transcast"

[transcode]
preset = "medium"
audio_bitrate = "256k"
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.scratch.dir, Path::new("/var/tmp/transcast"));
        assert_eq!(config.transcode.preset, EncodePreset::Medium);
        assert_eq!(config.transcode.audio_bitrate, "256k");
        assert_eq!(config.transcode.audio_channels, 2);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = load_config_or_default(Some(Path::new("/nonexistent/transcast.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[transcode\npreset = ").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
