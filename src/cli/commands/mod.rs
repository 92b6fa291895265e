mod outline;
mod render;

pub use outline::handle_outline_command;
pub use render::handle_render_command;

use log::debug;

use crate::config::{validate_config, TocConfig};
use crate::markdown::toc::ListType;
use crate::utils::error::BoxResult;

/// Apply command line overrides on top of the loaded configuration
pub fn apply_overrides(config: &mut TocConfig, levels: Option<&Vec<usize>>, ordered: bool) -> BoxResult<()> {
    if let Some(levels) = levels {
        debug!("Overriding include_level with {:?}", levels);
        config.include_level = levels.clone();
    }
    if ordered {
        config.list_type = ListType::Ol;
    }
    validate_config(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overrides() {
        let mut config = TocConfig::default();
        apply_overrides(&mut config, Some(&vec![2, 3]), true).unwrap();

        assert_eq!(config.include_level, vec![2, 3]);
        assert_eq!(config.list_type, ListType::Ol);
    }

    #[test]
    fn test_overrides_are_validated() {
        let mut config = TocConfig::default();
        assert!(apply_overrides(&mut config, Some(&vec![9]), false).is_err());
    }
}
