//! Table of contents: builds an outline of the document's headings and
//! renders it wherever a `[[toc]]` marker appears.

mod generator;
mod headlines;
mod marker;
mod slug;
mod tree;

pub use generator::render_outline;
pub use headlines::{extract_headlines, Headline};
pub use marker::{ContainerClose, ContainerOpen, MarkerRule, OutlineBody};
pub use self::slug::{ascii_slugify, slugify, SlugFn, SlugStyle};
pub use tree::{NodeId, Outline, OutlineEntry, OutlineNode, PreOrder};

use std::fmt;
use std::sync::Arc;

use lazy_static::lazy_static;
use log::debug;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::markdown::pipeline::{InlineRenderer, Pipeline, Plugin};
use crate::markdown::token::{MarkerKind, Token};
use crate::utils::error::{BoxResult, TocError};

/// Marker matched at the scan position, anchored to a line start
pub const DEFAULT_MARKER_PATTERN: &str = r"^\[\[toc\]\]";

pub const DEFAULT_CONTAINER_CLASS: &str = "table-of-contents";

lazy_static! {
    static ref DEFAULT_MARKER_REGEX: Regex = compile_marker_pattern(DEFAULT_MARKER_PATTERN).unwrap();
}

/// Formats a headline's text: `(text, inline renderer, anchor) -> markup`
pub type FormatFn = Arc<dyn Fn(&str, &InlineRenderer<'_>, Option<&str>) -> String + Send + Sync>;

/// Rewrites an anchor before it is used in a link
pub type TransformFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Compile a marker pattern. Matching is case-insensitive and `^`/`$` match
/// at line boundaries; inline flags such as `(?-i)` override that.
pub fn compile_marker_pattern(pattern: &str) -> Result<Regex, TocError> {
    Ok(RegexBuilder::new(pattern)
        .case_insensitive(true)
        .multi_line(true)
        .build()?)
}

/// List element used for the outline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    #[default]
    Ul,
    Ol,
}

impl ListType {
    pub fn tag(self) -> &'static str {
        match self {
            ListType::Ul => "ul",
            ListType::Ol => "ol",
        }
    }
}

/// Options for table of contents generation
#[derive(Clone)]
pub struct TocOptions {
    /// Heading levels to include (h1 = 1, h2 = 2, etc.)
    pub include_level: Vec<usize>,
    /// CSS class of the wrapping `div`
    pub container_class: String,
    pub slugify: SlugFn,
    pub marker_pattern: Regex,
    pub list_type: ListType,
    pub format: FormatFn,
    /// Markup placed inside the container, before the list
    pub container_header_html: Option<String>,
    /// Markup placed inside the container, after the list
    pub container_footer_html: Option<String>,
    pub transform_link: Option<TransformFn>,
    /// Attributes written verbatim on the outermost list element
    pub list_attrs: String,
    /// Removed. Rendering an outline fails while this is set.
    pub force_full_toc: bool,
}

impl Default for TocOptions {
    fn default() -> Self {
        Self {
            include_level: vec![1, 2],
            container_class: DEFAULT_CONTAINER_CLASS.to_string(),
            slugify: Arc::new(slugify),
            marker_pattern: DEFAULT_MARKER_REGEX.clone(),
            list_type: ListType::Ul,
            format: Arc::new(|text: &str, inline: &InlineRenderer<'_>, _anchor: Option<&str>| {
                inline.render_inline(text)
            }),
            container_header_html: None,
            container_footer_html: None,
            transform_link: None,
            list_attrs: String::new(),
            force_full_toc: false,
        }
    }
}

impl fmt::Debug for TocOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TocOptions")
            .field("include_level", &self.include_level)
            .field("container_class", &self.container_class)
            .field("marker_pattern", &self.marker_pattern.as_str())
            .field("list_type", &self.list_type)
            .field("container_header_html", &self.container_header_html)
            .field("container_footer_html", &self.container_footer_html)
            .field("transform_link", &self.transform_link.is_some())
            .field("list_attrs", &self.list_attrs)
            .field("force_full_toc", &self.force_full_toc)
            .finish()
    }
}

impl TocOptions {
    pub fn with_include_level(mut self, levels: Vec<usize>) -> Self {
        self.include_level = levels;
        self
    }

    pub fn with_container_class(mut self, class: impl Into<String>) -> Self {
        self.container_class = class.into();
        self
    }

    pub fn with_slugify(mut self, slugify: SlugFn) -> Self {
        self.slugify = slugify;
        self
    }

    pub fn with_marker_pattern(mut self, pattern: &str) -> Result<Self, TocError> {
        self.marker_pattern = compile_marker_pattern(pattern)?;
        Ok(self)
    }

    pub fn with_list_type(mut self, list_type: ListType) -> Self {
        self.list_type = list_type;
        self
    }

    pub fn with_format(mut self, format: FormatFn) -> Self {
        self.format = format;
        self
    }

    pub fn with_container_header_html(mut self, html: impl Into<String>) -> Self {
        self.container_header_html = Some(html.into());
        self
    }

    pub fn with_container_footer_html(mut self, html: impl Into<String>) -> Self {
        self.container_footer_html = Some(html.into());
        self
    }

    pub fn with_transform_link(mut self, transform: TransformFn) -> Self {
        self.transform_link = Some(transform);
        self
    }

    pub fn with_list_attrs(mut self, attrs: impl Into<String>) -> Self {
        self.list_attrs = attrs.into();
        self
    }

    pub fn with_force_full_toc(mut self, force: bool) -> Self {
        self.force_full_toc = force;
        self
    }
}

/// Extract the configured headlines from a document and build their outline
pub fn build_outline(document: &[Token], options: &TocOptions) -> Outline {
    let headlines = extract_headlines(document, &options.include_level, &*options.slugify);
    debug!("Found {} headlines for levels {:?}", headlines.len(), options.include_level);
    Outline::build(&headlines)
}

/// Fail when an option that no longer has any effect is set
pub fn check_removed_options(options: &TocOptions) -> Result<(), TocError> {
    if options.force_full_toc {
        return Err(TocError::RemovedOption {
            name: "force_full_toc",
            hint: "the outline is always built from every included heading of the document",
        });
    }
    Ok(())
}

/// Generate the outline list markup for a parsed document
pub fn generate_toc(document: &[Token], options: &TocOptions, inline: &InlineRenderer<'_>) -> BoxResult<String> {
    check_removed_options(options)?;
    let outline = build_outline(document, options);
    Ok(render_outline(&outline, options, inline))
}

/// Pipeline plugin that wires the marker rule and the three render hooks
#[derive(Debug, Clone, Default)]
pub struct TableOfContents {
    options: Arc<TocOptions>,
}

impl TableOfContents {
    pub fn new(options: TocOptions) -> Self {
        Self {
            options: Arc::new(options),
        }
    }

    pub fn options(&self) -> &TocOptions {
        &self.options
    }
}

impl Plugin for TableOfContents {
    fn name(&self) -> &str {
        "table_of_contents"
    }

    fn install(&self, pipeline: &mut Pipeline) -> BoxResult<()> {
        pipeline.inline_ruler_mut().insert_after(
            "emphasis",
            "toc",
            Arc::new(MarkerRule::new(&self.options.marker_pattern)?),
        )?;

        let renderer = pipeline.renderer_mut();
        renderer.set_hook(
            MarkerKind::OutlineStart,
            Arc::new(ContainerOpen::new(Arc::clone(&self.options))),
        );
        renderer.set_hook(
            MarkerKind::OutlineBody,
            Arc::new(OutlineBody::new(Arc::clone(&self.options))),
        );
        renderer.set_hook(
            MarkerKind::OutlineEnd,
            Arc::new(ContainerClose::new(Arc::clone(&self.options))),
        );
        Ok(())
    }
}
