//! Triangular per-node storage for lattice quantities.

use fxb_core::Size;

/// One value per node of an `steps`-step recombining lattice, stored as a
/// flat triangle: layer `i` holds `i + 1` consecutive entries.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangularField<T> {
    steps: Size,
    data: Vec<T>,
}

impl<T: Copy> TriangularField<T> {
    /// A field with every node set to `value`.
    pub fn filled(steps: Size, value: T) -> Self {
        Self {
            steps,
            data: vec![value; (steps + 1) * (steps + 2) / 2],
        }
    }

    /// Number of time steps (layers − 1).
    pub fn steps(&self) -> Size {
        self.steps
    }

    #[inline]
    fn offset(&self, i: Size, j: Size) -> usize {
        debug_assert!(i <= self.steps && j <= i, "node ({i}, {j}) outside lattice");
        i * (i + 1) / 2 + j
    }

    /// Value at node `(i, j)`.
    #[inline]
    pub fn get(&self, i: Size, j: Size) -> T {
        self.data[self.offset(i, j)]
    }

    /// Overwrite node `(i, j)`.
    #[inline]
    pub fn set(&mut self, i: Size, j: Size, value: T) {
        let k = self.offset(i, j);
        self.data[k] = value;
    }

    /// All `i + 1` values of layer `i`.
    pub fn layer(&self, i: Size) -> &[T] {
        let start = self.offset(i, 0);
        &self.data[start..start + i + 1]
    }
}
