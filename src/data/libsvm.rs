//! LIBSVM text format loader.
//!
//! Each line is `label index:value index:value ...` with 1-based feature
//! indices. Indices are shifted to 0-based on load. Labels greater than zero
//! map to `1.0` and every other label maps to `0.0`, so both `{0, 1}` and
//! `{-1, +1}` encodings load as binary targets.
//!
//! Blank lines and lines starting with `#` are skipped. Anything after a `#`
//! on a data line is a trailing comment. `qid:` tokens are ignored.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use super::{Instance, SparseVector};

// =============================================================================
// Error types
// =============================================================================

/// Error type for LIBSVM parsing.
#[derive(Debug, thiserror::Error)]
pub enum LibsvmError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: feature index {index} exceeds dimension {dimension}")]
    IndexOutOfRange {
        line: usize,
        index: usize,
        dimension: usize,
    },
}

// =============================================================================
// Options and output
// =============================================================================

/// Loader options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LibsvmOptions {
    /// Feature dimension. When `None`, the largest index in the file is used.
    pub dimension: Option<usize>,
    /// Stop after this many instances.
    pub max_instances: Option<usize>,
    /// With an explicit `dimension`, drop features above it instead of
    /// failing. Used to load a held-out set against a model's dimension.
    pub drop_out_of_range: bool,
}

impl LibsvmOptions {
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = Some(dimension);
        self
    }

    pub fn with_max_instances(mut self, max_instances: usize) -> Self {
        self.max_instances = Some(max_instances);
        self
    }

    pub fn with_drop_out_of_range(mut self) -> Self {
        self.drop_out_of_range = true;
        self
    }
}

/// A loaded dataset.
#[derive(Debug, Clone)]
pub struct LibsvmDataset {
    /// Number of features. All indices in `instances` are below this.
    pub dimension: usize,
    pub instances: Vec<Instance>,
}

impl LibsvmDataset {
    /// Labels in load order.
    pub fn labels(&self) -> Vec<f64> {
        self.instances.iter().map(Instance::label).collect()
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Load a LIBSVM file from disk.
pub fn load_libsvm_file(
    path: impl AsRef<Path>,
    options: &LibsvmOptions,
) -> Result<LibsvmDataset, LibsvmError> {
    let file = File::open(path)?;
    load_libsvm(BufReader::new(file), options)
}

/// Load LIBSVM-formatted text from any buffered reader.
pub fn load_libsvm<R: BufRead>(
    reader: R,
    options: &LibsvmOptions,
) -> Result<LibsvmDataset, LibsvmError> {
    let mut instances = Vec::new();
    let mut max_index = 0usize;
    let mut dropped = 0usize;

    for (line_idx, line) in reader.lines().enumerate() {
        if options.max_instances.is_some_and(|cap| instances.len() >= cap) {
            break;
        }
        let line = line?;
        let line_no = line_idx + 1;

        let content = match line.split_once('#') {
            Some((before, _)) => before,
            None => line.as_str(),
        };
        let mut tokens = content.split_whitespace();
        let Some(label_token) = tokens.next() else {
            continue;
        };

        let label: f64 = label_token.parse().map_err(|e| LibsvmError::Parse {
            line: line_no,
            message: format!("invalid label {label_token:?}: {e}"),
        })?;
        let label = if label > 0.0 { 1.0 } else { 0.0 };

        let mut entries = Vec::new();
        for token in tokens {
            let (Some(index), value) = parse_feature(token, line_no)? else {
                continue;
            };
            if let Some(dimension) = options.dimension {
                if index > dimension && options.drop_out_of_range {
                    dropped += 1;
                    continue;
                }
                if index > dimension {
                    return Err(LibsvmError::IndexOutOfRange {
                        line: line_no,
                        index,
                        dimension,
                    });
                }
            }
            max_index = max_index.max(index);
            entries.push(((index - 1) as u32, value));
        }

        let features = SparseVector::from_entries(entries).map_err(|e| LibsvmError::Parse {
            line: line_no,
            message: e.to_string(),
        })?;
        instances.push(Instance::new(features, label));
    }

    let dimension = options.dimension.unwrap_or(max_index);
    if dropped > 0 {
        log::warn!("dropped {dropped} LIBSVM features with index above dimension {dimension}");
    }
    log::debug!(
        "loaded {} LIBSVM instances with dimension {}",
        instances.len(),
        dimension
    );
    Ok(LibsvmDataset {
        dimension,
        instances,
    })
}

/// Parse one `index:value` token. Returns `None` for the index on `qid:`.
fn parse_feature(token: &str, line: usize) -> Result<(Option<usize>, f64), LibsvmError> {
    let err = |message: String| LibsvmError::Parse { line, message };

    let (index, value) = token
        .split_once(':')
        .ok_or_else(|| err(format!("expected index:value, got {token:?}")))?;
    if index == "qid" {
        return Ok((None, 0.0));
    }

    let index: usize = index
        .parse()
        .map_err(|e| err(format!("invalid feature index in {token:?}: {e}")))?;
    if index == 0 {
        return Err(err(format!(
            "feature indices are 1-based, got 0 in {token:?}"
        )));
    }
    if index > u32::MAX as usize {
        return Err(err(format!("feature index too large in {token:?}")));
    }
    let value: f64 = value
        .parse()
        .map_err(|e| err(format!("invalid feature value in {token:?}: {e}")))?;

    Ok((Some(index), value))
}
