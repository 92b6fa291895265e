use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::config::defaults;
use crate::config::types::TocConfig;
use crate::config::validation;
use crate::utils::error::{BoxResult, TocError};

/// Configuration file names to look for
const CONFIG_FILES: [&str; 4] = [".mdtoc.yml", ".mdtoc.yaml", ".mdtoc.toml", ".mdtoc.json"];

/// Load configuration from the given files, or from the default files in `dir`
pub fn load_config<P: AsRef<Path>>(dir: P, config_files: Option<Vec<PathBuf>>) -> BoxResult<TocConfig> {
    let mut config = TocConfig::default();

    let config_paths = match config_files {
        Some(paths) => paths,
        None => find_default_config_files(&dir),
    };

    if config_paths.is_empty() {
        debug!("No configuration files found, using defaults");
    } else {
        for path in config_paths {
            debug!("Loading configuration from {}", path.display());
            merge_config_file(&mut config, &path)?;
        }
    }

    validation::validate_config(&config)?;

    debug!("Configuration loaded: {:?}", config);
    Ok(config)
}

fn find_default_config_files<P: AsRef<Path>>(dir: P) -> Vec<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| dir.as_ref().join(name))
        .filter(|path| path.exists())
        .collect()
}

/// Merge a configuration file into the current configuration
fn merge_config_file(config: &mut TocConfig, config_path: &Path) -> BoxResult<()> {
    if !config_path.exists() {
        return Err(TocError::Config(format!(
            "Configuration file not found: {}",
            config_path.display()
        ))
        .into());
    }

    let content = fs::read_to_string(config_path).map_err(|e| {
        TocError::Config(format!(
            "Failed to read configuration file {}: {}",
            config_path.display(),
            e
        ))
    })?;

    let extension = config_path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase());
    let file_config = match extension.as_deref() {
        Some("yml") | Some("yaml") | None => parse_yaml_config(&content, config_path)?,
        Some("toml") => parse_toml_config(&content, config_path)?,
        Some("json") => parse_json_config(&content, config_path)?,
        Some(other) => {
            return Err(TocError::Config(format!(
                "Unsupported configuration file format: {}",
                other
            ))
            .into());
        }
    };

    merge_configs(config, &file_config);
    Ok(())
}

fn parse_yaml_config(content: &str, path: &Path) -> BoxResult<TocConfig> {
    // An empty YAML document is a valid, empty configuration
    if content.trim().is_empty() {
        return Ok(TocConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| {
        TocError::Config(format!(
            "Failed to parse YAML configuration ({}): {}",
            path.display(),
            e
        ))
        .into()
    })
}

fn parse_toml_config(content: &str, path: &Path) -> BoxResult<TocConfig> {
    toml::from_str(content).map_err(|e| {
        TocError::Config(format!(
            "Failed to parse TOML configuration ({}): {}",
            path.display(),
            e
        ))
        .into()
    })
}

fn parse_json_config(content: &str, path: &Path) -> BoxResult<TocConfig> {
    serde_json::from_str(content).map_err(|e| {
        TocError::Config(format!(
            "Failed to parse JSON configuration ({}): {}",
            path.display(),
            e
        ))
        .into()
    })
}

/// Merge two configurations; only non-default values of `source` override
fn merge_configs(target: &mut TocConfig, source: &TocConfig) {
    if source.include_level != defaults::default_include_level() {
        target.include_level = source.include_level.clone();
    }

    if source.container_class != defaults::default_container_class() {
        target.container_class = source.container_class.clone();
    }

    if source.slug != defaults::default_slug() {
        target.slug = source.slug;
    }

    if source.marker_pattern != defaults::default_marker_pattern() {
        target.marker_pattern = source.marker_pattern.clone();
    }

    if source.list_type != defaults::default_list_type() {
        target.list_type = source.list_type;
    }

    if source.container_header_html.is_some() {
        target.container_header_html = source.container_header_html.clone();
    }

    if source.container_footer_html.is_some() {
        target.container_footer_html = source.container_footer_html.clone();
    }

    if !source.list_attrs.is_empty() {
        target.list_attrs = source.list_attrs.clone();
    }

    if source.force_full_toc {
        target.force_full_toc = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::toc::ListType;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_files() {
        let dir = TempDir::new().unwrap();
        let config = load_config(dir.path(), None).unwrap();

        assert_eq!(config, TocConfig::default());
    }

    #[test]
    fn test_finds_default_yaml_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(".mdtoc.yml"),
            "include_level: [2, 3]\ncontainer_class: outline\n",
        )
        .unwrap();

        let config = load_config(dir.path(), None).unwrap();
        assert_eq!(config.include_level, vec![2, 3]);
        assert_eq!(config.container_class, "outline");
    }

    #[test]
    fn test_later_files_override_earlier_ones() {
        let dir = TempDir::new().unwrap();
        let toml_path = dir.path().join("base.toml");
        let json_path = dir.path().join("override.json");
        fs::write(&toml_path, "list_type = \"ol\"\ncontainer_class = \"base\"\n").unwrap();
        fs::write(&json_path, r#"{"containerClass": "final"}"#).unwrap();

        let config = load_config(dir.path(), Some(vec![toml_path, json_path])).unwrap();
        assert_eq!(config.list_type, ListType::Ol);
        assert_eq!(config.container_class, "final");
    }

    #[test]
    fn test_empty_yaml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.yml");
        fs::write(&path, "").unwrap();

        let config = load_config(dir.path(), Some(vec![path])).unwrap();
        assert_eq!(config, TocConfig::default());
    }

    #[test]
    fn test_missing_and_unsupported_files() {
        let dir = TempDir::new().unwrap();

        let missing = load_config(dir.path(), Some(vec![dir.path().join("nope.yml")])).unwrap_err();
        assert!(missing.to_string().contains("not found"));

        let ini = dir.path().join("config.ini");
        fs::write(&ini, "x = 1").unwrap();
        let unsupported = load_config(dir.path(), Some(vec![ini])).unwrap_err();
        assert!(unsupported.to_string().contains("Unsupported"));
    }

    #[test]
    fn test_invalid_file_contents_fail_validation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "include_level: [0]\n").unwrap();

        assert!(load_config(dir.path(), Some(vec![path])).is_err());
    }
}
