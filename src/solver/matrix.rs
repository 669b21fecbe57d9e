//! Dense nodal matrix assembly and solving.

use crate::error::{Result, SingularTopology, SolverError};

use super::PIVOT_TOLERANCE;

/// Nodal system Ax = b, one row and column per node.
#[derive(Debug)]
pub struct NodalMatrix {
    /// System matrix A (row-major)
    pub a: Vec<f64>,
    /// Right-hand side b
    pub b: Vec<f64>,
    /// Solution vector x
    pub x: Vec<f64>,
    /// Matrix dimension
    pub size: usize,
    /// LU decomposition of A
    lu: Vec<f64>,
    /// Pivot indices for LU decomposition
    pivots: Vec<usize>,
}

impl NodalMatrix {
    /// Create a zeroed system for `size` nodes.
    pub fn new(size: usize) -> Self {
        Self {
            a: vec![0.0; size * size],
            b: vec![0.0; size],
            x: vec![0.0; size],
            size,
            lu: vec![0.0; size * size],
            pivots: vec![0; size],
        }
    }

    /// Get matrix element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.a[row * self.size + col]
    }

    /// Set matrix element at (row, col).
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.a[row * self.size + col] = value;
    }

    /// Add to matrix element at (row, col).
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        self.a[row * self.size + col] += value;
    }

    /// Add `src` row into `dst` row, right-hand side included.
    pub fn add_row_into(&mut self, src: usize, dst: usize) {
        let n = self.size;
        for col in 0..n {
            self.a[dst * n + col] += self.a[src * n + col];
        }
        self.b[dst] += self.b[src];
    }

    /// Zero a row of A, leaving b untouched.
    pub fn clear_row(&mut self, row: usize) {
        let n = self.size;
        self.a[row * n..(row + 1) * n].fill(0.0);
    }

    /// Rows of A as nested vectors, for diagnostics.
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.a.chunks(self.size.max(1)).map(<[f64]>::to_vec).collect()
    }

    /// Perform LU decomposition with partial pivoting.
    ///
    /// A pivot is rejected when it is negligible against the largest entry
    /// of its own row, so rows made only of Hi-Z conductances still factor
    /// while a dependent row is caught.
    pub fn factor(&mut self) -> Result<()> {
        let n = self.size;
        self.lu.copy_from_slice(&self.a);

        let mut scale: Vec<f64> = (0..n)
            .map(|i| {
                self.a[i * n..(i + 1) * n]
                    .iter()
                    .fold(0.0f64, |m, v| m.max(v.abs()))
            })
            .collect();

        for i in 0..n {
            self.pivots[i] = i;
        }

        for k in 0..n {
            // Find pivot
            let mut max_val = self.lu[k * n + k].abs();
            let mut max_row = k;

            for i in (k + 1)..n {
                let val = self.lu[i * n + k].abs();
                if val > max_val {
                    max_val = val;
                    max_row = i;
                }
            }

            if max_val <= PIVOT_TOLERANCE * scale[max_row] || max_val == 0.0 {
                return Err(self.singular());
            }

            // Swap rows if needed
            if max_row != k {
                self.pivots.swap(k, max_row);
                scale.swap(k, max_row);
                for j in 0..n {
                    self.lu.swap(k * n + j, max_row * n + j);
                }
            }

            // Eliminate
            let pivot = self.lu[k * n + k];
            for i in (k + 1)..n {
                let factor = self.lu[i * n + k] / pivot;
                self.lu[i * n + k] = factor;
                for j in (k + 1)..n {
                    self.lu[i * n + j] -= factor * self.lu[k * n + j];
                }
            }
        }

        Ok(())
    }

    /// Solve the system using the pre-computed LU decomposition.
    pub fn solve(&mut self) {
        let n = self.size;

        // Apply pivot permutation to b
        for i in 0..n {
            self.x[i] = self.b[self.pivots[i]];
        }

        // Forward substitution (L * y = Pb)
        for i in 0..n {
            for j in 0..i {
                self.x[i] -= self.lu[i * n + j] * self.x[j];
            }
        }

        // Back substitution (U * x = y)
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                self.x[i] -= self.lu[i * n + j] * self.x[j];
            }
            self.x[i] /= self.lu[i * n + i];
        }
    }

    /// Factor and solve in one step.
    pub fn factor_and_solve(&mut self) -> Result<&[f64]> {
        self.factor()?;
        self.solve();
        Ok(&self.x)
    }

    fn singular(&self) -> SolverError {
        SolverError::SingularTopology(Box::new(SingularTopology {
            matrix: self.rows(),
            rhs: self.b.clone(),
            ground_inserted: false,
            steady_state: false,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_solves_small_system() {
        // 2x + y = 5, x - y = 1
        let mut m = NodalMatrix::new(2);
        m.set(0, 0, 2.0);
        m.set(0, 1, 1.0);
        m.set(1, 0, 1.0);
        m.set(1, 1, -1.0);
        m.b = vec![5.0, 1.0];

        let x = m.factor_and_solve().unwrap();
        assert_abs_diff_eq!(x[0], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_needs_pivoting() {
        let mut m = NodalMatrix::new(2);
        m.set(0, 1, 1.0);
        m.set(1, 0, 1.0);
        m.b = vec![3.0, 4.0];

        let x = m.factor_and_solve().unwrap();
        assert_abs_diff_eq!(x[0], 4.0);
        assert_abs_diff_eq!(x[1], 3.0);
    }

    #[test]
    fn test_singular_matrix_reports_dump() {
        let mut m = NodalMatrix::new(2);
        m.set(0, 0, 1.0);
        m.set(0, 1, -1.0);
        m.set(1, 0, -1.0);
        m.set(1, 1, 1.0);

        match m.factor() {
            Err(SolverError::SingularTopology(dump)) => {
                assert_eq!(dump.matrix, vec![vec![1.0, -1.0], vec![-1.0, 1.0]]);
            }
            other => panic!("expected singular topology, got {other:?}"),
        }
    }

    #[test]
    fn test_tiny_but_regular_rows_factor() {
        // A node tied only through Hi-Z conductances
        let g = 1e-9;
        let mut m = NodalMatrix::new(2);
        m.set(0, 0, 1.0);
        m.set(1, 0, g);
        m.set(1, 1, -g);
        m.b = vec![10.0, 0.0];

        let x = m.factor_and_solve().unwrap();
        assert_abs_diff_eq!(x[1], 10.0, epsilon = 1e-6);
    }

    #[test]
    fn test_row_operations() {
        let mut m = NodalMatrix::new(2);
        m.set(0, 0, 1.0);
        m.set(1, 1, 2.0);
        m.b = vec![3.0, 4.0];

        m.add_row_into(0, 1);
        assert_eq!(m.rows(), vec![vec![1.0, 0.0], vec![1.0, 2.0]]);
        assert_eq!(m.b, vec![3.0, 7.0]);

        m.clear_row(0);
        assert_eq!(m.get(0, 0), 0.0);
        assert_eq!(m.b[0], 3.0);
    }
}
