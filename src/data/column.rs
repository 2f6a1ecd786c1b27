//! Column-oriented index over a set of instances.
//!
//! Coordinate descent visits one feature at a time and needs every
//! `(instance, value)` pair for that feature. [`ColumnStore`] is a compressed
//! sparse column (CSC) layout built once from row-oriented [`Instance`]s.

use super::{Instance, ZERO_EPSILON};

/// Compressed sparse column index over training instances.
///
/// # Structure
///
/// - `values`: Feature values, stored column by column
/// - `row_indices`: Instance index for each value
/// - `col_ptrs`: Starting offset in values/row_indices for each column
///
/// For column `j`, the values are `values[col_ptrs[j]..col_ptrs[j+1]]`
/// with instance indices `row_indices[col_ptrs[j]..col_ptrs[j+1]]`. Within a
/// column, instance indices are strictly increasing.
///
/// Row indices refer to positions in the original instance slice. Instances
/// whose weight is at or below [`ZERO_EPSILON`] never appear in any column.
///
/// # Intercept
///
/// When built with an intercept, one extra column is appended at index
/// `num_features`. It holds `1.0` for every included instance.
///
/// # Example
///
/// ```
/// use sparse_lr::data::{ColumnStore, Instance};
/// use sparse_lr::SparseVector;
///
/// let instances = vec![
///     Instance::new(SparseVector::from_dense(&[1.0, 0.0]), 1.0),
///     Instance::weighted(SparseVector::from_dense(&[2.0, 3.0]), 0.0, 0.0),
///     Instance::new(SparseVector::from_dense(&[4.0, 5.0]), 0.0),
/// ];
///
/// let columns = ColumnStore::from_instances(&instances, 2, true);
/// assert_eq!(columns.num_cols(), 3);
///
/// // The weight-0 instance at row 1 is skipped.
/// let col0: Vec<_> = columns.column(0).collect();
/// assert_eq!(col0, vec![(0, 1.0), (2, 4.0)]);
/// let intercept: Vec<_> = columns.column(2).collect();
/// assert_eq!(intercept, vec![(0, 1.0), (2, 1.0)]);
/// ```
#[derive(Debug, Clone)]
pub struct ColumnStore {
    /// Non-zero values stored column by column.
    values: Box<[f64]>,
    /// Instance index for each value.
    row_indices: Box<[u32]>,
    /// Length is num_cols + 1, with col_ptrs[num_cols] = nnz.
    col_ptrs: Box<[usize]>,
    /// Number of instances the index was built from, included or not.
    num_rows: usize,
    /// Feature columns plus the intercept column, if any.
    num_cols: usize,
    has_intercept: bool,
}

impl ColumnStore {
    /// Build the column index from row-oriented instances.
    ///
    /// Only instances with `weight > ZERO_EPSILON` are indexed.
    ///
    /// # Panics
    ///
    /// Panics if an included instance has a feature index `>= num_features`,
    /// or if there are more than `u32::MAX` instances. Callers validate
    /// their input first.
    pub fn from_instances(instances: &[Instance], num_features: usize, with_intercept: bool) -> Self {
        let num_rows = instances.len();
        assert!(
            u32::try_from(num_rows).is_ok(),
            "too many instances for a column store: {num_rows}"
        );
        let num_cols = num_features + usize::from(with_intercept);
        let included = |x: &Instance| x.weight() > ZERO_EPSILON;

        // First pass: count entries per column
        let mut col_counts = vec![0usize; num_cols];
        for x in instances.iter().filter(|&x| included(x)) {
            for &index in x.features().indices() {
                let col = index as usize;
                assert!(
                    col < num_features,
                    "feature index {col} out of range for {num_features} features"
                );
                col_counts[col] += 1;
            }
            if with_intercept {
                col_counts[num_features] += 1;
            }
        }

        // Build column pointers
        let mut col_ptrs = Vec::with_capacity(num_cols + 1);
        col_ptrs.push(0usize);
        let mut cumsum = 0usize;
        for &count in &col_counts {
            cumsum += count;
            col_ptrs.push(cumsum);
        }
        let nnz = cumsum;

        // Second pass: scatter rows into their columns. Rows are visited in
        // order, so each column ends up sorted by instance index.
        let mut values = vec![0.0f64; nnz];
        let mut row_indices = vec![0u32; nnz];
        let mut cursors: Vec<usize> = col_ptrs[..num_cols].to_vec();

        for (row, x) in instances.iter().enumerate() {
            if !included(x) {
                continue;
            }
            for (index, value) in x.features().iter() {
                let slot = &mut cursors[index as usize];
                values[*slot] = value;
                row_indices[*slot] = row as u32;
                *slot += 1;
            }
            if with_intercept {
                let slot = &mut cursors[num_features];
                values[*slot] = 1.0;
                row_indices[*slot] = row as u32;
                *slot += 1;
            }
        }

        Self {
            values: values.into_boxed_slice(),
            row_indices: row_indices.into_boxed_slice(),
            col_ptrs: col_ptrs.into_boxed_slice(),
            num_rows,
            num_cols,
            has_intercept: with_intercept,
        }
    }

    /// Number of instances the index was built from.
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Number of columns, including the intercept column.
    #[inline]
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Whether the last column is the implicit intercept.
    #[inline]
    pub fn has_intercept(&self) -> bool {
        self.has_intercept
    }

    /// Index of the intercept column, if present.
    #[inline]
    pub fn intercept_column(&self) -> Option<usize> {
        self.has_intercept.then(|| self.num_cols - 1)
    }

    /// Number of stored entries across all columns.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Ratio of stored entries to `num_rows * num_cols`.
    pub fn density(&self) -> f64 {
        let total = self.num_rows * self.num_cols;
        if total == 0 {
            return 1.0;
        }
        self.nnz() as f64 / total as f64
    }

    /// Iterate over `(instance_index, value)` pairs in a column.
    #[inline]
    pub fn column(&self, col: usize) -> ColumnIter<'_> {
        let (start, end) = self.bounds(col);
        ColumnIter {
            values: &self.values[start..end],
            row_indices: &self.row_indices[start..end],
            pos: 0,
        }
    }

    /// Values slice for a column.
    #[inline]
    pub fn column_values(&self, col: usize) -> &[f64] {
        let (start, end) = self.bounds(col);
        &self.values[start..end]
    }

    /// Instance indices slice for a column.
    #[inline]
    pub fn column_row_indices(&self, col: usize) -> &[u32] {
        let (start, end) = self.bounds(col);
        &self.row_indices[start..end]
    }

    /// Number of entries in a column.
    #[inline]
    pub fn column_nnz(&self, col: usize) -> usize {
        let (start, end) = self.bounds(col);
        end - start
    }

    #[inline]
    fn bounds(&self, col: usize) -> (usize, usize) {
        assert!(col < self.num_cols, "Column {} out of bounds", col);
        (self.col_ptrs[col], self.col_ptrs[col + 1])
    }
}

/// Iterator over `(instance_index, value)` pairs in one column.
#[derive(Debug, Clone)]
pub struct ColumnIter<'a> {
    values: &'a [f64],
    row_indices: &'a [u32],
    pos: usize,
}

impl Iterator for ColumnIter<'_> {
    type Item = (usize, f64);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.pos < self.values.len() {
            let row = self.row_indices[self.pos] as usize;
            let val = self.values[self.pos];
            self.pos += 1;
            Some((row, val))
        } else {
            None
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.values.len() - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ColumnIter<'_> {}
impl std::iter::FusedIterator for ColumnIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SparseVector;

    fn instances() -> Vec<Instance> {
        vec![
            Instance::new(SparseVector::from_dense(&[1.0, 0.0, 2.0]), 1.0), // row 0
            Instance::new(SparseVector::from_dense(&[0.0, 3.0, 0.0]), 0.0), // row 1
            Instance::new(SparseVector::from_dense(&[4.0, 0.0, 5.0]), 1.0), // row 2
        ]
    }

    // =========================================================================
    // Construction
    // =========================================================================

    #[test]
    fn from_instances_basic() {
        let cols = ColumnStore::from_instances(&instances(), 3, false);
        assert_eq!(cols.num_rows(), 3);
        assert_eq!(cols.num_cols(), 3);
        assert_eq!(cols.nnz(), 5);
        assert!(!cols.has_intercept());
        assert_eq!(cols.intercept_column(), None);
    }

    #[test]
    fn column_iteration() {
        let cols = ColumnStore::from_instances(&instances(), 3, false);

        let col0: Vec<_> = cols.column(0).collect();
        assert_eq!(col0, vec![(0, 1.0), (2, 4.0)]);

        let col1: Vec<_> = cols.column(1).collect();
        assert_eq!(col1, vec![(1, 3.0)]);

        let col2: Vec<_> = cols.column(2).collect();
        assert_eq!(col2, vec![(0, 2.0), (2, 5.0)]);
    }

    #[test]
    fn intercept_column_covers_included_rows() {
        let cols = ColumnStore::from_instances(&instances(), 3, true);
        assert_eq!(cols.num_cols(), 4);
        assert_eq!(cols.intercept_column(), Some(3));
        assert_eq!(cols.column_row_indices(3), &[0, 1, 2]);
        assert_eq!(cols.column_values(3), &[1.0, 1.0, 1.0]);
        assert_eq!(cols.nnz(), 8);
    }

    #[test]
    fn zero_weight_rows_are_skipped() {
        let mut data = instances();
        data[1] = Instance::weighted(SparseVector::from_dense(&[0.0, 3.0, 0.0]), 0.0, 0.0);

        let cols = ColumnStore::from_instances(&data, 3, true);
        assert_eq!(cols.num_rows(), 3);
        assert_eq!(cols.column_nnz(1), 0);
        // Intercept column is sized by included rows only.
        assert_eq!(cols.column_row_indices(3), &[0, 2]);
    }

    #[test]
    fn feature_dimension_wider_than_data() {
        let cols = ColumnStore::from_instances(&instances(), 10, false);
        assert_eq!(cols.num_cols(), 10);
        assert_eq!(cols.column_nnz(9), 0);
        assert_eq!(cols.column(9).count(), 0);
    }

    #[test]
    fn empty_input() {
        let cols = ColumnStore::from_instances(&[], 4, true);
        assert_eq!(cols.nnz(), 0);
        assert_eq!(cols.column_nnz(4), 0);
        assert_eq!(cols.density(), 1.0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn feature_out_of_range_panics() {
        ColumnStore::from_instances(&instances(), 2, false);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[test]
    fn density() {
        let cols = ColumnStore::from_instances(&instances(), 3, false);
        assert!((cols.density() - 5.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn column_iter_is_exact_size() {
        let cols = ColumnStore::from_instances(&instances(), 3, false);
        let mut iter = cols.column(0);
        assert_eq!(iter.len(), 2);
        iter.next();
        assert_eq!(iter.len(), 1);
        iter.next();
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn column_out_of_bounds() {
        let cols = ColumnStore::from_instances(&instances(), 3, false);
        cols.column(3);
    }
}
