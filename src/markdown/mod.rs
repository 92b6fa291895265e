pub mod engine;
pub mod pipeline;
pub mod token;
pub mod toc;

pub use engine::ComrakEngine;
pub use pipeline::{DocumentState, Pipeline, Plugin};
pub use toc::{generate_toc, TableOfContents, TocOptions};
