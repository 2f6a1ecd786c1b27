//! Labeled training examples.

use super::SparseVector;

/// A single training example.
///
/// The label is expected to be `0.0` or `1.0` for logistic regression; the
/// loss validates this when it is built. Instances with weight `0` are kept
/// in the data but excluded from training.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    features: SparseVector,
    label: f64,
    weight: f64,
    offset: f64,
    flag: i32,
}

impl Instance {
    /// Create an instance with weight 1.
    pub fn new(features: SparseVector, label: f64) -> Self {
        Self {
            features,
            label,
            weight: 1.0,
            offset: 0.0,
            flag: 0,
        }
    }

    /// Create an instance with an explicit weight.
    pub fn weighted(features: SparseVector, label: f64, weight: f64) -> Self {
        Self {
            weight,
            ..Self::new(features, label)
        }
    }

    /// Attach an offset. Carried for callers; training ignores it.
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Attach a caller-defined flag. Training ignores it.
    pub fn with_flag(mut self, flag: i32) -> Self {
        self.flag = flag;
        self
    }

    #[inline]
    pub fn features(&self) -> &SparseVector {
        &self.features
    }

    #[inline]
    pub fn label(&self) -> f64 {
        self.label
    }

    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    #[inline]
    pub fn flag(&self) -> i32 {
        self.flag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let x = Instance::new(SparseVector::from_dense(&[1.0]), 1.0);
        assert_eq!(x.weight(), 1.0);
        assert_eq!(x.offset(), 0.0);
        assert_eq!(x.flag(), 0);
        assert_eq!(x.features().get(0), 1.0);
    }

    #[test]
    fn builders() {
        let x = Instance::weighted(SparseVector::new(), 0.0, 2.5)
            .with_offset(-1.0)
            .with_flag(7);
        assert_eq!(x.label(), 0.0);
        assert_eq!(x.weight(), 2.5);
        assert_eq!(x.offset(), -1.0);
        assert_eq!(x.flag(), 7);
    }
}
