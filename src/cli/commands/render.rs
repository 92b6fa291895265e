use std::fs;
use std::path::Path;

use log::info;

use crate::config::TocConfig;
use crate::markdown::pipeline::Pipeline;
use crate::markdown::toc::TableOfContents;
use crate::utils::error::{BoxResult, TocError};

/// Build a pipeline with the table of contents plugin installed
pub fn build_pipeline(config: &TocConfig) -> BoxResult<Pipeline> {
    let mut pipeline = Pipeline::new();
    pipeline.use_plugin(&TableOfContents::new(config.to_options()?))?;
    Ok(pipeline)
}

/// Handle the render command
pub fn handle_render_command(config: &TocConfig, file: &Path, output: Option<&Path>) -> BoxResult<()> {
    let source = fs::read_to_string(file).map_err(TocError::Io)?;
    let html = build_pipeline(config)?.render(&source)?;

    match output {
        Some(path) => {
            fs::write(path, &html)?;
            info!("Rendered {} to {}", file.display(), path.display());
        }
        None => print!("{}", html),
    }
    Ok(())
}
