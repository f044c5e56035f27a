use clap::{Arg, Command, arg};

use crate::config::with_collection_args;

pub const PROFILE_CMD: &str = "profile";

pub fn create_profile_cli() -> Command {
    let command = Command::new(PROFILE_CMD)
        .about("Collect position-indexed scores over a feature, optionally stitched across sub-features and relative to a reference point.")
        .arg_required_else_help(true)
        .arg(
            Arg::new("sources")
                .required(true)
                .num_args(1..)
                .help("Indexed BAM files, summed into one profile"),
        )
        .arg(
            arg!(-r --region <REGION>)
                .required(true)
                .help("Feature as chr:start-stop[:strand], 1-based inclusive"),
        )
        .arg(
            arg!(--subfeatures <SUBFEATURES>)
                .required(false)
                .help("Sub-intervals to stitch (e.g. exons), separated by ';' or spaces; they take the feature strand"),
        )
        .arg(
            arg!(--reference <REFERENCE>)
                .required(false)
                .help("Report positions relative to the 5' end (5), 3' end (3) or midpoint (4)"),
        )
        .arg(
            arg!(--extend <EXTEND>)
                .required(false)
                .allow_negative_numbers(true)
                .help("Also collect this many bases beyond each end"),
        );

    with_collection_args(command)
}
