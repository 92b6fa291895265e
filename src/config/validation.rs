use log::warn;

use crate::config::TocConfig;
use crate::markdown::toc::compile_marker_pattern;
use crate::utils::error::{BoxResult, TocError};

/// Validate the configuration
pub fn validate_config(config: &TocConfig) -> BoxResult<()> {
    validate_levels(config)?;

    validate_marker_pattern(config)?;

    if config.force_full_toc {
        warn!("`force_full_toc` was removed; rendering an outline will fail while it is set");
    }

    Ok(())
}

/// Levels must be a non-empty subset of 1..=6
fn validate_levels(config: &TocConfig) -> BoxResult<()> {
    if config.include_level.is_empty() {
        return Err(TocError::Config("include_level must name at least one heading level".to_string()).into());
    }

    if let Some(level) = config.include_level.iter().find(|level| !(1..=6).contains(*level)) {
        return Err(TocError::Config(format!(
            "include_level contains {}, heading levels range from 1 to 6", level
        ))
        .into());
    }

    Ok(())
}

fn validate_marker_pattern(config: &TocConfig) -> BoxResult<()> {
    compile_marker_pattern(&config.marker_pattern)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&TocConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_levels() {
        let empty = TocConfig {
            include_level: vec![],
            ..TocConfig::default()
        };
        assert!(validate_config(&empty).is_err());

        let out_of_range = TocConfig {
            include_level: vec![2, 7],
            ..TocConfig::default()
        };
        let err = validate_config(&out_of_range).unwrap_err();
        assert!(err.to_string().contains('7'));
    }

    #[test]
    fn test_invalid_pattern() {
        let config = TocConfig {
            marker_pattern: r"[[toc".to_string(),
            ..TocConfig::default()
        };

        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().starts_with("Invalid marker pattern"));
    }

    #[test]
    fn test_removed_option_is_accepted_here() {
        let config = TocConfig {
            force_full_toc: true,
            ..TocConfig::default()
        };

        assert!(validate_config(&config).is_ok());
    }
}
