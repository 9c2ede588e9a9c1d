//! Loading k-mer sets from disk and validating the command-line threshold.
//!
//! Plain text files carry one k-mer per line. FASTA and FASTQ files are
//! accepted as well (each record's sequence is one k-mer), and any of these
//! may be gzip-compressed.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use bio::io::{fasta, fastq};
use flate2::read::MultiGzDecoder;
use log::debug;

/// Fatal input problems. All of them are detected before graph construction.
#[derive(thiserror::Error, Debug)]
pub enum InputError {
    #[error("cannot read {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed record in {path:?}: {reason}")]
    Malformed { path: PathBuf, reason: String },
    #[error("input contains no k-mers")]
    Empty,
    #[error("k-mer {line} has length {found}, expected {expected}")]
    InconsistentLineLength {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("k-mers of length {length} cannot overlap; at least 2 is required")]
    KmerTooShort { length: usize },
    #[error("k-mer {line} contains non-ASCII symbols")]
    NonAscii { line: usize },
    #[error("invalid minimum output length {value:?}: expected a non-negative integer")]
    InvalidThreshold { value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceFormat {
    Fastq,
    Fasta,
    Lines,
}

/// Record format and gzip compression, read off the file name
/// (`reads.fq.gz` is gzipped FASTQ; anything unrecognised is plain lines).
pub fn classify_path(path: &Path) -> (SequenceFormat, bool) {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let (stem, gzipped) = match name
        .strip_suffix(".gz")
        .or_else(|| name.strip_suffix(".bgz"))
    {
        Some(stem) => (stem, true),
        None => (name.as_str(), false),
    };
    let format = match stem.rsplit_once('.').map(|(_, ext)| ext) {
        Some("fastq" | "fq") => SequenceFormat::Fastq,
        Some("fasta" | "fa" | "fna") => SequenceFormat::Fasta,
        _ => SequenceFormat::Lines,
    };
    (format, gzipped)
}

fn open_reader(path: &Path, gzipped: bool) -> Result<Box<dyn BufRead>, InputError> {
    let file = File::open(path).map_err(|source| InputError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    if gzipped {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

fn record_to_string(path: &Path, seq: &[u8]) -> Result<String, InputError> {
    String::from_utf8(seq.to_vec()).map_err(|_| InputError::Malformed {
        path: path.to_path_buf(),
        reason: "sequence is not valid UTF-8".to_string(),
    })
}

/// Read one k-mer per non-blank line. Trailing whitespace (including `\r`) is dropped.
pub fn read_lines<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut kmers = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            continue;
        }
        kmers.push(trimmed.to_string());
    }
    Ok(kmers)
}

/// Load every k-mer from `path`. An empty result is reported as [`InputError::Empty`].
pub fn read_kmers(path: &Path) -> Result<Vec<String>, InputError> {
    let (format, gzipped) = classify_path(path);
    debug!(
        "Reading {} as {:?} (gzip: {})",
        path.display(),
        format,
        gzipped
    );
    let reader = open_reader(path, gzipped)?;

    let kmers = match format {
        SequenceFormat::Fastq => {
            let mut kmers = Vec::new();
            for record in fastq::Reader::new(reader).records() {
                let record = record.map_err(|err| InputError::Malformed {
                    path: path.to_path_buf(),
                    reason: err.to_string(),
                })?;
                kmers.push(record_to_string(path, record.seq())?);
            }
            kmers
        }
        SequenceFormat::Fasta => {
            let mut kmers = Vec::new();
            for record in fasta::Reader::new(reader).records() {
                let record = record.map_err(|err| InputError::Malformed {
                    path: path.to_path_buf(),
                    reason: err.to_string(),
                })?;
                kmers.push(record_to_string(path, record.seq())?);
            }
            kmers
        }
        SequenceFormat::Lines => read_lines(reader).map_err(|source| InputError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?,
    };

    if kmers.is_empty() {
        return Err(InputError::Empty);
    }
    Ok(kmers)
}

/// Parse the minimum output length argument.
pub fn parse_threshold(value: &str) -> Result<usize, InputError> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| InputError::InvalidThreshold {
            value: value.to_string(),
        })
}
