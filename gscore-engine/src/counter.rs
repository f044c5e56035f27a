use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rayon::prelude::*;

use gscore_core::models::Alignment;
use gscore_sources::{ScoreSource, SourceHandle, open_source};

use crate::errors::{EngineError, Result};
use crate::params::CountOptions;

///
/// What to count: a source given by path, or a handle the caller already has
/// open. A path is opened for the duration of the count and closed after.
///
pub enum CountInput<'a> {
    Path(PathBuf),
    Handle(&'a mut dyn ScoreSource),
}

impl From<PathBuf> for CountInput<'_> {
    fn from(path: PathBuf) -> Self {
        CountInput::Path(path)
    }
}

impl<'a> From<&'a mut dyn ScoreSource> for CountInput<'a> {
    fn from(handle: &'a mut dyn ScoreSource) -> Self {
        CountInput::Handle(handle)
    }
}

/// Whether one alignment counts under `options`.
#[inline]
fn counts(alignment: &Alignment, options: &CountOptions) -> bool {
    if alignment.mapping_quality < options.min_quality {
        return false;
    }
    if options.paired {
        // each proper pair once, through its forward mate
        alignment.is_proper_pair && !alignment.is_reverse
    } else {
        !alignment.is_unmapped
    }
}

///
/// Deal chromosomes out to `workers` buckets, longest first, round robin.
/// Ties in length are broken by name so the split is reproducible.
///
pub fn partition_chromosomes(
    chromosomes: Vec<(String, u64)>,
    workers: usize,
) -> Vec<Vec<(String, u64)>> {
    let workers = workers.max(1);
    let mut chromosomes = chromosomes;
    chromosomes.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut buckets: Vec<Vec<(String, u64)>> = vec![Vec::new(); workers];
    for (i, chromosome) in chromosomes.into_iter().enumerate() {
        buckets[i % workers].push(chromosome);
    }
    buckets
}

fn count_chromosome(
    source: &mut dyn ScoreSource,
    seq_id: &str,
    length: u64,
    options: &CountOptions,
) -> Result<u64> {
    let mut total = 0u64;
    for alignment in source.fetch_alignments(seq_id, 0, length)? {
        if counts(&alignment?, options) {
            total += 1;
        }
    }
    debug!("{}: {} alignments", seq_id, total);
    Ok(total)
}

fn count_bucket(
    source: &mut dyn ScoreSource,
    bucket: &[(String, u64)],
    options: &CountOptions,
    bar: &ProgressBar,
) -> Result<u64> {
    let mut total = 0;
    for (seq_id, length) in bucket {
        total += count_chromosome(source, seq_id, *length, options)?;
        bar.inc(1);
    }
    Ok(total)
}

fn progress_bar(len: usize, show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) =
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40} {pos}/{len} chromosomes")
    {
        bar.set_style(style);
    }
    bar
}

///
/// Count the alignments of a whole source.
///
/// With `paired` set, a read counts when it is the forward mate of a proper
/// pair; otherwise when it is mapped. Either way its mapping quality must
/// reach `min_quality`. With more than one worker, chromosomes are split
/// into buckets by [`partition_chromosomes`] and each bucket is counted on a
/// separate thread against its own clone of the source. The total does not
/// depend on the number of workers. Any worker failure fails the whole count.
///
/// ```
/// use gscore_core::models::Alignment;
/// use gscore_engine::counter::{CountInput, count_alignments};
/// use gscore_engine::params::CountOptions;
/// use gscore_sources::MemorySource;
///
/// let mut source = MemorySource::new("mem://count")
///     .with_alignments(
///         "chr1",
///         vec![Alignment::new(0, 50), Alignment::new(10, 60).with_mapping_quality(3)],
///     );
/// let options = CountOptions { min_quality: 10, ..Default::default() };
///
/// assert_eq!(count_alignments(CountInput::Handle(&mut source), &options).unwrap(), 1);
/// ```
pub fn count_alignments(input: CountInput<'_>, options: &CountOptions) -> Result<u64> {
    match input {
        CountInput::Path(path) => {
            let mut handle: SourceHandle = open_source(&path.to_string_lossy())?;
            count_source(handle.as_mut(), options)
        }
        CountInput::Handle(handle) => count_source(handle, options),
    }
}

fn count_source(source: &mut dyn ScoreSource, options: &CountOptions) -> Result<u64> {
    let chromosomes: Vec<(String, u64)> = source
        .chromosome_names()
        .iter()
        .map(|name| (name.clone(), source.target_length(name).unwrap_or(0)))
        .collect();

    let bar = progress_bar(chromosomes.len(), options.show_progress);

    if options.workers <= 1 {
        let bucket = partition_chromosomes(chromosomes, 1)
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();
        let total = count_bucket(source, &bucket, options, &bar)?;
        bar.finish();
        return Ok(total);
    }

    // every worker gets its own handle, cloned here before dispatch
    let jobs = partition_chromosomes(chromosomes, options.workers)
        .into_iter()
        .enumerate()
        .filter(|(_, bucket)| !bucket.is_empty())
        .map(|(worker, bucket)| {
            source
                .try_clone()
                .map(|handle| (worker, bucket, handle))
                .map_err(|e| EngineError::WorkerFailure {
                    worker,
                    source: Box::new(e.into()),
                })
        })
        .collect::<Result<Vec<(usize, Vec<(String, u64)>, SourceHandle)>>>()?;

    info!(
        "Counting {} with {} workers over {} buckets",
        source.path(),
        options.workers,
        jobs.len()
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.workers)
        .build()
        .map_err(|e| EngineError::ThreadPool(e.to_string()))?;

    let partials = pool.install(|| {
        jobs.into_par_iter()
            .map(|(worker, bucket, mut handle)| {
                count_bucket(handle.as_mut(), &bucket, options, &bar).map_err(|e| {
                    EngineError::WorkerFailure {
                        worker,
                        source: Box::new(e),
                    }
                })
            })
            .collect::<Result<Vec<u64>>>()
    })?;

    bar.finish();
    Ok(partials.into_iter().sum())
}
