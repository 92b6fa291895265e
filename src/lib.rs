pub mod cli;
pub mod config;
pub mod markdown;
pub mod utils;

pub use config::TocConfig;
pub use markdown::{Pipeline, TableOfContents, TocOptions};
pub use utils::error::{BoxResult, TocError};
