//! Sorted sparse vectors.
//!
//! A [`SparseVector`] stores `(index, value)` pairs with strictly increasing
//! indices. It is immutable: arithmetic returns new vectors, and pairwise
//! operations are two-pointer merges over the sorted index arrays, so they
//! never densify.
//!
//! # Binary Format
//!
//! ```text
//! ┌──────────────┬───────────────────────────────────────────┐
//! │ count: u32   │ count × (index: u32, value: f64)          │
//! └──────────────┴───────────────────────────────────────────┘
//! ```
//!
//! All fields are big-endian and entries are written in ascending index
//! order. Reading a record back reproduces the vector bit for bit.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::{self, Read, Write};
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use approx::AbsDiffEq;

/// Dense values with magnitude at or below this are treated as absent.
pub const ZERO_EPSILON: f64 = 1e-13;

/// Bytes per serialized `(index, value)` entry.
const ENTRY_SIZE: usize = 4 + 8;

/// Errors raised while constructing or decoding a [`SparseVector`].
#[derive(Debug, thiserror::Error)]
pub enum SparseVectorError {
    #[error("number of indices ({indices}) does not match number of values ({values})")]
    LengthMismatch { indices: usize, values: usize },

    #[error("duplicate dimension index {0}")]
    DuplicateIndex(u32),

    #[error("invalid sparse entry {token:?}: {message}")]
    Parse { token: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Immutable sparse vector with strictly increasing `u32` indices.
///
/// # Example
///
/// ```
/// use sparse_lr::SparseVector;
///
/// let v = SparseVector::from_dense(&[0.0, 2.0, 0.0, -1.0]);
/// assert_eq!(v.indices(), &[1, 3]);
/// assert_eq!(v.get(3), -1.0);
/// assert_eq!(v.get(2), 0.0);
///
/// let w = SparseVector::from_pairs(vec![3, 0], vec![2.0, 5.0]).unwrap();
/// assert_eq!(v.inner_product(&w), -2.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SparseVector {
    indices: Box<[u32]>,
    values: Box<[f64]>,
}

impl SparseVector {
    /// Create an empty vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sparse vector from a dense slice.
    ///
    /// Entries with `|v| <= ZERO_EPSILON` are dropped. NaN entries fail that
    /// comparison and are dropped as well.
    pub fn from_dense(dense: &[f64]) -> Self {
        let (indices, values): (Vec<u32>, Vec<f64>) = dense
            .iter()
            .enumerate()
            .filter(|&(_, v)| v.abs() > ZERO_EPSILON)
            .map(|(i, &v)| (i as u32, v))
            .unzip();
        Self::from_sorted(indices, values)
    }

    /// Create a sparse vector from parallel index and value lists.
    ///
    /// The pairs may be given in any order; they are sorted by index.
    ///
    /// # Errors
    ///
    /// [`SparseVectorError::LengthMismatch`] if the lists differ in length,
    /// [`SparseVectorError::DuplicateIndex`] if an index repeats.
    pub fn from_pairs(
        indices: impl Into<Vec<u32>>,
        values: impl Into<Vec<f64>>,
    ) -> Result<Self, SparseVectorError> {
        let indices = indices.into();
        let values = values.into();
        if indices.len() != values.len() {
            return Err(SparseVectorError::LengthMismatch {
                indices: indices.len(),
                values: values.len(),
            });
        }
        Self::from_entries(indices.into_iter().zip(values))
    }

    /// Create a sparse vector from `(index, value)` entries in any order.
    ///
    /// # Errors
    ///
    /// [`SparseVectorError::DuplicateIndex`] if an index repeats.
    pub fn from_entries<I>(entries: I) -> Result<Self, SparseVectorError>
    where
        I: IntoIterator<Item = (u32, f64)>,
    {
        let mut entries: Vec<(u32, f64)> = entries.into_iter().collect();
        // Stable sort keeps the original order of duplicates for the error below.
        entries.sort_by_key(|&(index, _)| index);
        if let Some(pair) = entries.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(SparseVectorError::DuplicateIndex(pair[0].0));
        }
        let (indices, values) = entries.into_iter().unzip();
        Ok(Self::from_sorted(indices, values))
    }

    /// Build from arrays already sorted by strictly increasing index.
    fn from_sorted(indices: Vec<u32>, values: Vec<f64>) -> Self {
        debug_assert_eq!(indices.len(), values.len());
        debug_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        Self {
            indices: indices.into_boxed_slice(),
            values: values.into_boxed_slice(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of stored entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Whether the vector has no stored entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Stored indices, strictly increasing.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Stored values, aligned with [`indices`](Self::indices).
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Largest stored index, if any.
    #[inline]
    pub fn max_index(&self) -> Option<u32> {
        self.indices.last().copied()
    }

    /// Iterate over `(index, value)` pairs in index order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (u32, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Value at `index`, or 0 if the index is not stored.
    pub fn get(&self, index: u32) -> f64 {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    // =========================================================================
    // Arithmetic
    // =========================================================================

    /// Element-wise sum.
    pub fn add(&self, other: &SparseVector) -> SparseVector {
        self.merge_union(other, |a, b| a + b)
    }

    /// Element-wise difference `self - other`.
    pub fn subtract(&self, other: &SparseVector) -> SparseVector {
        self.merge_union(other, |a, b| a - b)
    }

    /// Negate every stored value.
    pub fn neg(&self) -> SparseVector {
        self.map_values(|v| -v)
    }

    /// Multiply every stored value by `factor`.
    pub fn scale(&self, factor: f64) -> SparseVector {
        self.map_values(|v| v * factor)
    }

    /// Square every stored value.
    pub fn square(&self) -> SparseVector {
        self.map_values(|v| v * v)
    }

    /// Element-wise product. Only indices present in both vectors survive.
    pub fn elementwise_multiply(&self, other: &SparseVector) -> SparseVector {
        let mut indices = Vec::with_capacity(self.nnz().min(other.nnz()));
        let mut values = Vec::with_capacity(self.nnz().min(other.nnz()));
        self.for_each_shared(other, |index, a, b| {
            indices.push(index);
            values.push(a * b);
        });
        Self::from_sorted(indices, values)
    }

    /// Inner product with another sparse vector.
    pub fn inner_product(&self, other: &SparseVector) -> f64 {
        let mut sum = 0.0;
        self.for_each_shared(other, |_, a, b| sum += a * b);
        sum
    }

    /// Inner product with a dense slice, gathering by this vector's indices.
    ///
    /// # Panics
    ///
    /// Panics if `dense` is shorter than `max_index() + 1`.
    #[inline]
    pub fn dot_dense(&self, dense: &[f64]) -> f64 {
        let mut sum = 0.0;
        for (&index, &value) in self.indices.iter().zip(self.values.iter()) {
            sum += value * dense[index as usize];
        }
        sum
    }

    /// Euclidean norm.
    pub fn norm2(&self) -> f64 {
        self.inner_product(self).sqrt()
    }

    /// Cosine similarity. NaN if either vector has zero norm.
    pub fn cosine(&self, other: &SparseVector) -> f64 {
        self.inner_product(other) / self.norm2() / other.norm2()
    }

    fn map_values(&self, f: impl Fn(f64) -> f64) -> SparseVector {
        Self {
            indices: self.indices.clone(),
            values: self.values.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Two-pointer walk over the union of both index sets.
    ///
    /// Missing entries on either side read as 0.
    fn merge_union(&self, other: &SparseVector, op: impl Fn(f64, f64) -> f64) -> SparseVector {
        let capacity = self.nnz() + other.nnz();
        let mut indices = Vec::with_capacity(capacity);
        let mut values = Vec::with_capacity(capacity);

        let (mut i, mut j) = (0, 0);
        while i < self.nnz() || j < other.nnz() {
            let left = self.indices.get(i);
            let right = other.indices.get(j);
            let order = match (left, right) {
                (Some(a), Some(b)) => a.cmp(b),
                (Some(_), None) => Ordering::Less,
                (None, _) => Ordering::Greater,
            };
            match order {
                Ordering::Less => {
                    indices.push(self.indices[i]);
                    values.push(op(self.values[i], 0.0));
                    i += 1;
                }
                Ordering::Greater => {
                    indices.push(other.indices[j]);
                    values.push(op(0.0, other.values[j]));
                    j += 1;
                }
                Ordering::Equal => {
                    indices.push(self.indices[i]);
                    values.push(op(self.values[i], other.values[j]));
                    i += 1;
                    j += 1;
                }
            }
        }

        Self::from_sorted(indices, values)
    }

    /// Two-pointer walk over the intersection of both index sets.
    #[inline]
    fn for_each_shared(&self, other: &SparseVector, mut f: impl FnMut(u32, f64, f64)) {
        let (mut i, mut j) = (0, 0);
        while i < self.nnz() && j < other.nnz() {
            match self.indices[i].cmp(&other.indices[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    f(self.indices[i], self.values[i], other.values[j]);
                    i += 1;
                    j += 1;
                }
            }
        }
    }

    // =========================================================================
    // Binary serialization
    // =========================================================================

    /// Size of the serialized record in bytes.
    pub fn encoded_len(&self) -> usize {
        4 + self.nnz() * ENTRY_SIZE
    }

    /// Write the binary record to `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let count = u32::try_from(self.nnz()).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "sparse vector has more than u32::MAX entries",
            )
        })?;
        writer.write_all(&count.to_be_bytes())?;
        for (index, value) in self.iter() {
            writer.write_all(&index.to_be_bytes())?;
            writer.write_all(&value.to_be_bytes())?;
        }
        Ok(())
    }

    /// Read one binary record from `reader`.
    ///
    /// # Errors
    ///
    /// [`SparseVectorError::Io`] on truncated input,
    /// [`SparseVectorError::DuplicateIndex`] if the record repeats an index.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, SparseVectorError> {
        let mut word = [0u8; 4];
        reader.read_exact(&mut word)?;
        let count = u32::from_be_bytes(word) as usize;

        // Cap the upfront reservation; the count comes from untrusted input.
        let mut entries = Vec::with_capacity(count.min(4096));
        let mut entry = [0u8; ENTRY_SIZE];
        for _ in 0..count {
            reader.read_exact(&mut entry)?;
            let index = u32::from_be_bytes([entry[0], entry[1], entry[2], entry[3]]);
            let mut bits = [0u8; 8];
            bits.copy_from_slice(&entry[4..]);
            entries.push((index, f64::from_be_bytes(bits)));
        }
        Self::from_entries(entries)
    }

    /// Serialize into a new byte buffer.
    ///
    /// # Errors
    ///
    /// Same as [`write_to`](Self::write_to): fails only when the entry count
    /// does not fit the `u32` header.
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut buf)?;
        Ok(buf)
    }

    /// Deserialize from a byte slice holding exactly one record.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SparseVectorError> {
        let mut cursor = bytes;
        let vector = Self::read_from(&mut cursor)?;
        if !cursor.is_empty() {
            return Err(SparseVectorError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} trailing bytes after sparse vector record", cursor.len()),
            )));
        }
        Ok(vector)
    }
}

// =============================================================================
// Equality, hashing, approximate comparison
// =============================================================================

impl PartialEq for SparseVector {
    /// Structural equality: same indices and bit-identical values.
    fn eq(&self, other: &Self) -> bool {
        self.indices == other.indices
            && self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(other.values.iter())
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl Eq for SparseVector {}

impl Hash for SparseVector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.indices.hash(state);
        for value in self.values.iter() {
            value.to_bits().hash(state);
        }
    }
}

impl AbsDiffEq for SparseVector {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::EPSILON
    }

    /// Same index set, values within `epsilon`.
    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.indices == other.indices
            && self
                .values
                .iter()
                .zip(other.values.iter())
                .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

// =============================================================================
// Operators
// =============================================================================

impl Add for &SparseVector {
    type Output = SparseVector;

    fn add(self, rhs: &SparseVector) -> SparseVector {
        SparseVector::add(self, rhs)
    }
}

impl Sub for &SparseVector {
    type Output = SparseVector;

    fn sub(self, rhs: &SparseVector) -> SparseVector {
        self.subtract(rhs)
    }
}

impl Neg for &SparseVector {
    type Output = SparseVector;

    fn neg(self) -> SparseVector {
        SparseVector::neg(self)
    }
}

impl Mul<f64> for &SparseVector {
    type Output = SparseVector;

    fn mul(self, rhs: f64) -> SparseVector {
        self.scale(rhs)
    }
}

// =============================================================================
// Text form
// =============================================================================

impl fmt::Display for SparseVector {
    /// Formats as `{index:value,index:value}`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (pos, (index, value)) in self.iter().enumerate() {
            if pos > 0 {
                f.write_str(",")?;
            }
            write!(f, "{index}:{value}")?;
        }
        f.write_str("}")
    }
}

impl FromStr for SparseVector {
    type Err = SparseVectorError;

    /// Parse `index:value` tokens separated by whitespace or commas.
    ///
    /// Surrounding braces are accepted, so the [`Display`](fmt::Display)
    /// output parses back to the same vector.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.trim();
        let body = body.strip_prefix('{').unwrap_or(body);
        let body = body.strip_suffix('}').unwrap_or(body);

        let mut entries = Vec::new();
        for token in body
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            let parse_err = |message: String| SparseVectorError::Parse {
                token: token.to_string(),
                message,
            };
            let (index, value) = token
                .split_once(':')
                .ok_or_else(|| parse_err("expected index:value".to_string()))?;
            let index: u32 = index
                .parse()
                .map_err(|e| parse_err(format!("bad index: {e}")))?;
            let value: f64 = value
                .parse()
                .map_err(|e| parse_err(format!("bad value: {e}")))?;
            entries.push((index, value));
        }
        Self::from_entries(entries)
    }
}
