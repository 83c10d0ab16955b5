//! Dense price matrix.
//!
//! # Memory Layout
//!
//! Prices are stored in row-major order: `data[path_idx * n_columns + step_idx]`
//! where `step_idx = 0` holds the initial value.

/// Simulated prices, one row per path and one column per time step.
///
/// Shape is `path_count × (horizon + 1)`. Once returned by the generator the
/// matrix is only ever read, so reducers may share it across threads.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceMatrix {
    data: Vec<f64>,
    n_paths: usize,
    n_columns: usize,
}

impl PriceMatrix {
    /// Allocates a zero-filled matrix of the given shape.
    pub(crate) fn zeros(n_paths: usize, n_columns: usize) -> Self {
        Self {
            data: vec![0.0; n_paths * n_columns],
            n_paths,
            n_columns,
        }
    }

    /// Mutable access to the backing buffer for the generator.
    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Number of rows (simulated paths).
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Number of columns (`horizon + 1`).
    #[inline]
    pub fn n_columns(&self) -> usize {
        self.n_columns
    }

    /// The row-major backing buffer.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Prices of a single path across all steps.
    ///
    /// # Panics
    ///
    /// Panics if `path_idx >= n_paths()`.
    #[inline]
    pub fn row(&self, path_idx: usize) -> &[f64] {
        let start = path_idx * self.n_columns;
        &self.data[start..start + self.n_columns]
    }

    /// Iterates over rows in path order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.n_columns.max(1))
    }

    /// Copies out a single column (all paths at one step).
    ///
    /// # Panics
    ///
    /// Panics if `step_idx >= n_columns()`.
    pub fn column(&self, step_idx: usize) -> Vec<f64> {
        assert!(step_idx < self.n_columns, "step index out of range");
        self.data
            .iter()
            .skip(step_idx)
            .step_by(self.n_columns)
            .copied()
            .collect()
    }

    /// Final-step price of every path.
    pub fn terminal_values(&self) -> Vec<f64> {
        self.column(self.n_columns - 1)
    }

    /// Price at step 0 (shared by every path).
    #[inline]
    pub fn initial_value(&self) -> f64 {
        self.data[0]
    }

    /// Copies the matrix into nested rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for PriceMatrix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;

        let mut seq = serializer.serialize_seq(Some(self.n_paths))?;
        for row in self.rows() {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}
