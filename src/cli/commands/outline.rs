use std::fs;
use std::path::Path;

use crate::cli::types::OutlineFormat;
use crate::config::TocConfig;
use crate::markdown::pipeline::{InlineRenderer, Pipeline};
use crate::markdown::toc::{build_outline, check_removed_options, generate_toc};
use crate::utils::error::{BoxResult, TocError};

/// Render only the outline of `source` in the requested format
pub fn outline_document(source: &str, config: &TocConfig, format: OutlineFormat) -> BoxResult<String> {
    let options = config.to_options()?;
    check_removed_options(&options)?;

    let pipeline = Pipeline::new();
    let state = pipeline.parse(source);

    let rendered = match format {
        OutlineFormat::Html => {
            let inline = InlineRenderer::new(pipeline.engine());
            generate_toc(&state.tokens, &options, &inline)?
        }
        OutlineFormat::Json => {
            serde_json::to_string_pretty(&build_outline(&state.tokens, &options).to_entries())?
        }
        OutlineFormat::Markdown => build_outline(&state.tokens, &options).to_markdown(),
    };
    Ok(rendered)
}

/// Handle the outline command
pub fn handle_outline_command(config: &TocConfig, file: &Path, format: OutlineFormat) -> BoxResult<()> {
    let source = fs::read_to_string(file).map_err(TocError::Io)?;
    println!("{}", outline_document(&source, config, format)?);
    Ok(())
}
