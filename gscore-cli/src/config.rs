use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command, arg};
use log::info;
use serde::Deserialize;

use gscore_engine::{
    CollectionParams, CountOptions, NameDedup, ReferencePoint, StrandednessMode, SummaryMethod,
    ValueType,
};

///
/// Settings file accepted by every subcommand through `--config`:
///
/// ```toml
/// [collect]
/// value_type = "ncount"
/// strandedness = "sense"
///
/// [count]
/// workers = 8
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub collect: CollectionParams,
    pub count: CountOptions,
}

impl CliConfig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        let config: CliConfig = toml::from_str(&raw)
            .with_context(|| format!("Could not parse config file {}", path.display()))?;
        info!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// The config named by `--config`, or the defaults
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        match matches.get_one::<String>("config") {
            Some(path) => CliConfig::from_path(path),
            None => Ok(CliConfig::default()),
        }
    }
}

pub fn config_arg() -> Arg {
    arg!(--config <CONFIG>)
        .required(false)
        .help("TOML settings file; command line flags override it")
}

/// Flags shared by `score` and `profile`
pub fn with_collection_args(command: Command) -> Command {
    command
        .arg(config_arg())
        .arg(
            Arg::new("value-type")
                .long("value-type")
                .required(false)
                .help("What to collect: coverage (or score), count, ncount, pcount, length"),
        )
        .arg(
            arg!(--strandedness <STRANDEDNESS>)
                .required(false)
                .help("Which alignments to keep relative to the feature strand: all, sense, antisense"),
        )
        .arg(
            Arg::new("name-dedup")
                .long("name-dedup")
                .required(false)
                .help("Scope of read-name deduplication for ncount: query or position"),
        )
}

fn parse_flag<T>(matches: &ArgMatches, id: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match matches.get_one::<String>(id) {
        Some(raw) => {
            let value = raw
                .parse::<T>()
                .with_context(|| format!("Invalid value for --{}: {}", id, raw))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

///
/// Collection parameters from `--config`, overridden by whichever flags were
/// given. Only flags the subcommand defines are looked at.
///
pub fn collection_params(matches: &ArgMatches) -> Result<CollectionParams> {
    let mut params = CliConfig::from_matches(matches)?.collect;

    if let Some(value_type) = parse_flag::<ValueType>(matches, "value-type")? {
        params.value_type = value_type;
    }
    if let Some(strandedness) = parse_flag::<StrandednessMode>(matches, "strandedness")? {
        params.strandedness = strandedness;
    }
    if let Some(name_dedup) = parse_flag::<NameDedup>(matches, "name-dedup")? {
        params.name_dedup = name_dedup;
    }
    if has_arg(matches, "method") {
        if let Some(method) = parse_flag::<SummaryMethod>(matches, "method")? {
            params.method = Some(method);
        }
    }
    if has_arg(matches, "reference") {
        if let Some(point) = parse_flag::<ReferencePoint>(matches, "reference")? {
            params.reference_point = Some(point);
        }
    }
    if has_arg(matches, "extend") {
        if let Some(extend) = parse_flag::<i64>(matches, "extend")? {
            params.extend = Some(extend);
        }
    }

    params.validate()?;
    Ok(params)
}

///
/// Counting options from `--config`, overridden by the `count` flags.
///
pub fn count_options(matches: &ArgMatches) -> Result<CountOptions> {
    let mut options = CliConfig::from_matches(matches)?.count;

    if matches.get_flag("paired") {
        options.paired = true;
    }
    if matches.get_flag("progress") {
        options.show_progress = true;
    }
    if let Some(min_quality) = parse_flag::<u8>(matches, "min-quality")? {
        options.min_quality = min_quality;
    }
    if let Some(threads) = parse_flag::<usize>(matches, "threads")? {
        options.workers = threads;
    }

    Ok(options)
}

fn has_arg(matches: &ArgMatches, id: &str) -> bool {
    matches.try_contains_id(id).unwrap_or(false)
}
