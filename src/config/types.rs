use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::markdown::toc::{ListType, SlugStyle, TocOptions};
use crate::utils::error::BoxResult;

/// Table of contents configuration, as read from a config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocConfig {
    /// Heading levels to include
    #[serde(default = "defaults::default_include_level", alias = "includeLevel")]
    pub include_level: Vec<usize>,

    /// CSS class of the container `div`
    #[serde(default = "defaults::default_container_class", alias = "containerClass")]
    pub container_class: String,

    /// Built-in slug function used for anchors
    #[serde(default = "defaults::default_slug")]
    pub slug: SlugStyle,

    /// Regex matched against inline content at the scan position
    #[serde(default = "defaults::default_marker_pattern", alias = "markerPattern")]
    pub marker_pattern: String,

    /// `ul` or `ol`
    #[serde(default = "defaults::default_list_type", alias = "listType")]
    pub list_type: ListType,

    #[serde(default, alias = "containerHeaderHtml")]
    pub container_header_html: Option<String>,

    #[serde(default, alias = "containerFooterHtml")]
    pub container_footer_html: Option<String>,

    /// Attributes for the outermost list, e.g. `class="toc"`
    #[serde(default, alias = "listAttrs")]
    pub list_attrs: String,

    /// Removed option, still accepted so rendering can report it
    #[serde(default, alias = "forceFullToc")]
    pub force_full_toc: bool,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            include_level: defaults::default_include_level(),
            container_class: defaults::default_container_class(),
            slug: defaults::default_slug(),
            marker_pattern: defaults::default_marker_pattern(),
            list_type: defaults::default_list_type(),
            container_header_html: None,
            container_footer_html: None,
            list_attrs: String::new(),
            force_full_toc: false,
        }
    }
}

impl TocConfig {
    /// Build engine options from this configuration
    pub fn to_options(&self) -> BoxResult<TocOptions> {
        let mut options = TocOptions::default()
            .with_include_level(self.include_level.clone())
            .with_container_class(self.container_class.clone())
            .with_slugify(self.slug.function())
            .with_marker_pattern(&self.marker_pattern)?
            .with_list_type(self.list_type)
            .with_list_attrs(self.list_attrs.clone())
            .with_force_full_toc(self.force_full_toc);

        if let Some(header) = &self.container_header_html {
            options = options.with_container_header_html(header.clone());
        }
        if let Some(footer) = &self.container_footer_html {
            options = options.with_container_footer_html(footer.clone());
        }

        Ok(options)
    }
}
