//! # Command Line Interface
//!
//! The CLI is built in `cli.rs`, which is shared with the build script.
//! Subcommands are handled in the `commands` module.

use env_logger;
use log::error;
use a2nib::commands;
use a2nib::commands::CommandError;

mod cli;

fn main() -> Result<(),Box<dyn std::error::Error>>
{
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let main_cmd = cli::build_cli();
    let matches = main_cmd.clone().get_matches();

    match matches.subcommand() {
        Some(("track",cmd)) => commands::get::track(cmd),
        Some(("sec",cmd)) => commands::get::sec(cmd),
        Some(("block",cmd)) => commands::get::block(cmd),
        Some(("meta",cmd)) => commands::get::meta(cmd),
        Some(("geometry",cmd)) => commands::get::geometry(cmd),
        Some(("stat",cmd)) => commands::get::stat(cmd),
        Some(("nibdesc",cmd)) => commands::get::nibdesc(cmd),
        Some(("has-nibbles",cmd)) => commands::get::has_nibbles(cmd),
        Some(("dump",cmd)) => commands::get::dump(cmd),
        Some(("completions",cmd)) => commands::completions::generate(main_cmd,cmd),
        _ => {
            error!("No subcommand was found, try `a2nib --help`");
            Err(Box::new(CommandError::InvalidCommand))
        }
    }
}
