use crate::markdown::toc::{ListType, SlugStyle, DEFAULT_CONTAINER_CLASS, DEFAULT_MARKER_PATTERN};

/// Default heading levels
pub fn default_include_level() -> Vec<usize> {
    vec![1, 2]
}

/// Default container class
pub fn default_container_class() -> String {
    DEFAULT_CONTAINER_CLASS.to_string()
}

/// Default slug style
pub fn default_slug() -> SlugStyle {
    SlugStyle::Uri
}

/// Default marker pattern
pub fn default_marker_pattern() -> String {
    DEFAULT_MARKER_PATTERN.to_string()
}

/// Default list element
pub fn default_list_type() -> ListType {
    ListType::Ul
}
