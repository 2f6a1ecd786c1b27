//! Training data representations.
//!
//! # Overview
//!
//! - [`SparseVector`]: Immutable, index-sorted sparse feature vector
//! - [`Instance`]: A labeled, weighted training example
//! - [`ColumnStore`]: Column-oriented (CSC) index over a set of instances,
//!   used by coordinate descent to visit one feature at a time
//! - [`libsvm`]: Loader for the LIBSVM text format
//!
//! Feature indices are 0-based everywhere in the crate. Only the LIBSVM
//! text format uses 1-based indices, and the loader converts them.

mod column;
mod instance;
pub mod libsvm;
mod sparse;

pub use column::{ColumnIter, ColumnStore};
pub use instance::Instance;
pub use libsvm::{LibsvmDataset, LibsvmError, LibsvmOptions, load_libsvm, load_libsvm_file};
pub use sparse::{SparseVector, SparseVectorError, ZERO_EPSILON};
