use clap::{Arg, Command, arg};

use crate::config::config_arg;

pub const COUNT_CMD: &str = "count";

pub fn create_count_cli() -> Command {
    Command::new(COUNT_CMD)
        .about("Count the alignments of an indexed BAM file, in parallel over chromosomes.")
        .arg_required_else_help(true)
        .arg(Arg::new("source").required(true).help("Path to an indexed BAM file"))
        .arg(arg!(--paired "Count proper pairs once instead of every mapped read"))
        .arg(
            Arg::new("min-quality")
                .long("min-quality")
                .required(false)
                .help("Minimum mapping quality (default 0)"),
        )
        .arg(
            arg!(-t --threads <THREADS>)
                .required(false)
                .help("Number of worker threads (default 1)"),
        )
        .arg(arg!(--progress "Show a per-chromosome progress bar"))
        .arg(config_arg())
}
