use clap::{Arg, ArgAction, Command, arg};

use crate::config::with_collection_args;

pub const SCORE_CMD: &str = "score";

pub fn create_score_cli() -> Command {
    let command = Command::new(SCORE_CMD)
        .about("Summarise alignment data over one or more regions into a single score each.")
        .arg_required_else_help(true)
        .arg(
            Arg::new("sources")
                .required(true)
                .num_args(1..)
                .help("Indexed BAM files, pooled into one score"),
        )
        .arg(
            arg!(-r --region <REGION>)
                .required(true)
                .action(ArgAction::Append)
                .help("Region as chr:start-stop[:strand], 1-based inclusive; repeatable"),
        )
        .arg(
            arg!(-m --method <METHOD>)
                .required(false)
                .help("mean, median, sum, min, max, range, stddev or count"),
        );

    with_collection_args(command)
}
