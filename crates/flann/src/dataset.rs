//! Row-major dataset views over a numeric element type.

use flann_distances::Number;

use crate::error::{FlannError, Result};

/// A row-major `rows x cols` matrix of points, either owned or borrowed from the caller.
///
/// Every row has exactly `cols` entries and row `i` is contiguous; both invariants are enforced
/// once, at construction, and then hold for the dataset's whole lifetime. A point's id is its row
/// index, never reassigned even as points are tombstoned by [`Dataset::remove`].
#[derive(Debug, Clone)]
pub struct Dataset<'a, T: Number> {
    data: DatasetStorage<'a, T>,
    cols: usize,
    /// Tombstoned row indices, filtered out at result emission time (§6 `remove_point`).
    removed: Vec<bool>,
}

#[derive(Debug, Clone)]
enum DatasetStorage<'a, T: Number> {
    Owned(Vec<T>),
    Borrowed(&'a [T]),
}

impl<T: Number> std::ops::Deref for DatasetStorage<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        match self {
            Self::Owned(v) => v,
            Self::Borrowed(v) => v,
        }
    }
}

impl<'a, T: Number> Dataset<'a, T> {
    /// Wraps a caller-owned flat buffer as a view; the dataset does not take ownership.
    ///
    /// # Errors
    ///
    /// Returns [`FlannError::InvalidParam`] if `cols == 0` or `flat.len()` is not a multiple of
    /// `cols`.
    pub fn view(flat: &'a [T], cols: usize) -> Result<Self> {
        Self::validate(flat.len(), cols)?;
        Ok(Self {
            data: DatasetStorage::Borrowed(flat),
            cols,
            removed: vec![false; flat.len() / cols.max(1)],
        })
    }

    /// Takes ownership of a flat buffer, to be dropped along with the dataset (and, transitively,
    /// any index built on it).
    ///
    /// # Errors
    ///
    /// Returns [`FlannError::InvalidParam`] if `cols == 0` or `flat.len()` is not a multiple of
    /// `cols`.
    pub fn owned(flat: Vec<T>, cols: usize) -> Result<Self> {
        Self::validate(flat.len(), cols)?;
        let rows = flat.len() / cols.max(1);
        Ok(Self {
            data: DatasetStorage::Owned(flat),
            cols,
            removed: vec![false; rows],
        })
    }

    fn validate(len: usize, cols: usize) -> Result<()> {
        if cols == 0 {
            return Err(FlannError::InvalidParam {
                name: "cols",
                reason: "dimensionality must be at least 1".to_string(),
            });
        }
        if len % cols != 0 {
            return Err(FlannError::InvalidParam {
                name: "cols",
                reason: format!("flat buffer of length {len} is not a multiple of cols={cols}"),
            });
        }
        Ok(())
    }

    /// The number of rows, including tombstoned ones. Row ids are stable, so this is also one
    /// past the largest valid id this dataset has ever assigned.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.data.len() / self.cols
    }

    /// The fixed dimensionality of every row.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The number of rows not currently tombstoned.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.removed.iter().filter(|&&r| !r).count()
    }

    /// Borrows row `id` without bounds-checking against tombstoning: a removed row's data is still
    /// readable until the dataset itself is dropped, so in-flight traversals started before a
    /// `remove` can finish safely.
    ///
    /// # Panics
    ///
    /// Panics if `id >= self.rows()`.
    #[must_use]
    pub fn row(&self, id: usize) -> &[T] {
        let start = id * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Whether `id` has been tombstoned by [`Dataset::remove`].
    #[must_use]
    pub fn is_removed(&self, id: usize) -> bool {
        self.removed.get(id).copied().unwrap_or(true)
    }

    /// Tombstones `id`. Future searches filter it out at result-emit time, but its backing row
    /// data is retained so that other rows' ids (which are row indices) stay stable.
    ///
    /// # Errors
    ///
    /// Returns [`FlannError::InvalidParam`] if `id >= self.rows()`.
    pub fn remove(&mut self, id: usize) -> Result<()> {
        let flag = self.removed.get_mut(id).ok_or(FlannError::InvalidParam {
            name: "id",
            reason: format!("id {id} is out of range for a dataset of {} rows", self.rows()),
        })?;
        *flag = true;
        Ok(())
    }

    /// Appends `points` (already flattened, row-major) as new, live rows, converting this dataset
    /// to an owned one if it was a view.
    ///
    /// # Errors
    ///
    /// Returns [`FlannError::DimensionMismatch`] if `points.len()` is not a multiple of `cols()`.
    pub fn extend(&mut self, points: &[T]) -> Result<usize> {
        if points.len() % self.cols != 0 {
            return Err(FlannError::DimensionMismatch {
                expected: self.cols,
                found: points.len() % self.cols,
            });
        }
        let added = points.len() / self.cols;
        let mut owned = match std::mem::replace(&mut self.data, DatasetStorage::Owned(Vec::new())) {
            DatasetStorage::Owned(v) => v,
            DatasetStorage::Borrowed(v) => v.to_vec(),
        };
        owned.extend_from_slice(points);
        self.data = DatasetStorage::Owned(owned);
        self.removed.extend(std::iter::repeat(false).take(added));
        Ok(added)
    }
}
