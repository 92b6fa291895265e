pub mod commands;
pub mod logging;
pub mod types;

use clap::Parser;
use log::debug;
use std::path::PathBuf;

use crate::config;
use crate::utils::error::BoxResult;
use types::{Cli, Commands};

/// Run the command-line interface
pub fn run() -> BoxResult<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.debug);
    logging::configure_backtrace(cli.trace);

    let mut config = config::load_config(PathBuf::from("."), cli.config.clone())?;

    match &cli.command {
        Commands::Render {
            file,
            output,
            levels,
            ordered,
        } => {
            commands::apply_overrides(&mut config, levels.as_ref(), *ordered)?;
            debug!("Rendering {} with {:?}", file.display(), config);
            commands::handle_render_command(&config, file, output.as_deref())
        }
        Commands::Outline { file, levels, format } => {
            commands::apply_overrides(&mut config, levels.as_ref(), false)?;
            commands::handle_outline_command(&config, file, *format)
        }
    }
}
