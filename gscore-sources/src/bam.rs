use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};

use fxhash::{FxHashMap, FxHashSet};
use log::{debug, info};
use noodles::bam;
use noodles::bam::bai;
use noodles::bgzf;
use noodles::core::{Position, Region};
use noodles::sam;
use noodles::sam::alignment::Record as SamRecord;
use noodles::sam::alignment::record::cigar::op::Kind as CigarKind;

use gscore_core::models::Alignment;

use crate::error::{Result, SourceError};
use crate::traits::{AlignmentIter, ScoreSource, SourceHandle, add_depth};

///
/// An indexed BAM file read through noodles.
///
/// You must provide a .bai file alongside the bam file! Create one: `samtools index your_file.bam`
///
/// The reference sequence catalog and lengths are taken from the header when
/// the file is opened. Cloning reopens the file, so each clone owns its own
/// reader and index and can be moved to another thread.
///
pub struct BamSource {
    path: String,
    reader: bam::io::Reader<bgzf::Reader<File>>,
    header: sam::Header,
    index: bai::Index,
    names: FxHashSet<String>,
    lengths: FxHashMap<String, u64>,
}

impl BamSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let path_string = path.to_string_lossy().to_string();
        let open_error = |reason: String| SourceError::SourceOpenError {
            path: path_string.clone(),
            reason,
        };

        let mut reader = bam::io::reader::Builder::default()
            .build_from_path(path)
            .map_err(|e| open_error(format!("cannot open BAM ({})", e)))?;
        let header = reader
            .read_header()
            .map_err(|e| open_error(format!("cannot read BAM header ({})", e)))?;
        let index = bai::read(index_path(path))
            .map_err(|e| open_error(format!("cannot read BAM index ({})", e)))?;

        let mut names = FxHashSet::default();
        let mut lengths = FxHashMap::default();
        for (name, reference_sequence) in header.reference_sequences() {
            let name = name.to_string();
            lengths.insert(name.clone(), reference_sequence.length().get() as u64);
            names.insert(name);
        }

        info!(
            "Opened BAM source {} with {} reference sequences",
            path_string,
            names.len()
        );

        Ok(BamSource {
            path: path_string,
            reader,
            header,
            index,
            names,
            lengths,
        })
    }

    /// Translate a 0-based half-open window into a noodles (1-based, inclusive) region
    fn query_region(seq_id: &str, start: u64, end: u64) -> Result<Region> {
        let invalid = || SourceError::InvalidRegion(format!("{}:{}-{}", seq_id, start, end));
        let first = Position::try_from((start + 1) as usize).map_err(|_| invalid())?;
        let last = Position::try_from(end as usize).map_err(|_| invalid())?;
        Ok(Region::new(seq_id, first..=last))
    }
}

/// The index is expected at `<path>.bai`, where samtools puts it.
fn index_path(path: &Path) -> PathBuf {
    let mut index_path = OsString::from(path.as_os_str());
    index_path.push(".bai");
    PathBuf::from(index_path)
}

/// Convert a BAM record into an [`Alignment`]. Records without a position are dropped.
fn record_to_alignment(record: &bam::Record) -> Result<Option<Alignment>> {
    let flags = record.flags();

    let Some(alignment_start) = record.alignment_start().transpose()? else {
        return Ok(None);
    };
    let position = alignment_start.get() as i64 - 1;
    let end = match SamRecord::alignment_end(record).transpose()? {
        Some(alignment_end) => alignment_end.get() as i64,
        None => position + 1,
    };

    Ok(Some(Alignment {
        position,
        end,
        is_reverse: flags.is_reverse_complemented(),
        is_unmapped: flags.is_unmapped(),
        is_proper_pair: flags.is_properly_segmented(),
        // 255 is the SAM "unavailable" value
        mapping_quality: record.mapping_quality().map(|mq| mq.get()).unwrap_or(255),
        name: record.name().map(|name| name.to_string()),
    }))
}

impl ScoreSource for BamSource {
    fn path(&self) -> &str {
        &self.path
    }

    fn chromosome_names(&self) -> &FxHashSet<String> {
        &self.names
    }

    fn target_length(&self, seq_id: &str) -> Option<u64> {
        self.lengths.get(seq_id).copied()
    }

    fn fetch_alignments(
        &mut self,
        seq_id: &str,
        start: u64,
        end: u64,
    ) -> Result<AlignmentIter<'_>> {
        if start >= end || !self.names.contains(seq_id) {
            debug!("Nothing to fetch for {}:{}-{} in {}", seq_id, start, end, self.path);
            return Ok(Box::new(std::iter::empty()));
        }

        let region = Self::query_region(seq_id, start, end)?;
        let records = self.reader.query(&self.header, &self.index, &region)?;

        Ok(Box::new(records.filter_map(|result| match result {
            Ok(record) => record_to_alignment(&record).transpose(),
            Err(err) => Some(Err(err.into())),
        })))
    }

    fn coverage(&mut self, seq_id: &str, start: u64, end: u64) -> Result<Vec<u32>> {
        if start >= end || !self.names.contains(seq_id) {
            return Ok(Vec::new());
        }

        let mut depth = vec![0u32; (end - start) as usize];
        let region = Self::query_region(seq_id, start, end)?;
        let records = self.reader.query(&self.header, &self.index, &region)?;

        for result in records {
            let record = result?;
            if record.flags().is_unmapped() {
                continue;
            }
            let Some(alignment_start) = record.alignment_start().transpose()? else {
                continue;
            };

            // walk the CIGAR on the reference axis, 0-based
            let mut reference_position = alignment_start.get() as u64 - 1;
            for op in record.cigar().iter() {
                let op = op?;
                let len = op.len() as u64;
                match op.kind() {
                    CigarKind::Match | CigarKind::SequenceMatch | CigarKind::SequenceMismatch => {
                        add_depth(&mut depth, start, reference_position, reference_position + len);
                        reference_position += len;
                    }
                    CigarKind::Deletion | CigarKind::Skip => reference_position += len,
                    // insertions, clips and padding consume no reference
                    _ => {}
                }
            }
        }

        Ok(depth)
    }

    fn try_clone(&self) -> Result<SourceHandle> {
        Ok(Box::new(BamSource::open(&self.path)?))
    }
}
