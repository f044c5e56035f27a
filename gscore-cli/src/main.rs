mod config;
mod count;
mod profile;
mod score;

use anyhow::Result;
use clap::{Command, arg};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "gscore";
    pub const BIN_NAME: &str = "gscore";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Collect alignment counts, lengths and coverage over genomic features, as summary scores or position profiles.")
        .subcommand_required(true)
        .arg(arg!(-v --verbose "Log debug messages").global(true))
        .subcommand(count::cli::create_count_cli())
        .subcommand(score::cli::create_score_cli())
        .subcommand(profile::cli::create_profile_cli())
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    let level = if matches.get_flag("verbose") { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match matches.subcommand() {
        //
        // COUNT
        //
        Some((count::cli::COUNT_CMD, matches)) => {
            count::handlers::run_count(matches)?;
        }

        //
        // SCORE
        //
        Some((score::cli::SCORE_CMD, matches)) => {
            score::handlers::run_score(matches)?;
        }

        //
        // PROFILE
        //
        Some((profile::cli::PROFILE_CMD, matches)) => {
            profile::handlers::run_profile(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
