//! Pairwise travel-cost matrix
//!
//! Costs are stored row-major in a flat vector: `cost(i, j)` is the cost of
//! travelling from point `i` to point `j`. The matrix is not assumed to be
//! symmetric. The diagonal is always zero.

use serde::Serialize;

use crate::errors::DomainError;

/// Cost marking an arc with no finite travel cost
pub const UNREACHABLE: u64 = u64::MAX;

/// Square, zero-diagonal cost matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistanceMatrix {
    size: usize,
    costs: Vec<u64>,
}

impl DistanceMatrix {
    /// Build a matrix from nested rows
    ///
    /// Diagonal entries are forced to zero.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidMatrix` when the rows are not square.
    pub fn from_rows(rows: Vec<Vec<u64>>) -> Result<Self, DomainError> {
        let size = rows.len();
        let mut costs = Vec::with_capacity(size * size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(DomainError::InvalidMatrix(format!(
                    "row {i} has {} entries, expected {size}",
                    row.len()
                )));
            }
            costs.extend(row);
        }
        for i in 0..size {
            costs[i * size + i] = 0;
        }
        Ok(Self { size, costs })
    }

    /// Number of points
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Cost of the arc `from -> to`
    ///
    /// Out-of-range indices are treated as unreachable.
    #[must_use]
    pub fn cost(&self, from: usize, to: usize) -> u64 {
        if from >= self.size || to >= self.size {
            return UNREACHABLE;
        }
        self.costs[from * self.size + to]
    }

    /// Row `from` as a slice, `None` when `from` is out of range
    #[must_use]
    pub fn row(&self, from: usize) -> Option<&[u64]> {
        if from >= self.size {
            return None;
        }
        let start = from * self.size;
        self.costs.get(start..start + self.size)
    }

    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|i| (i + 1..self.size).all(|j| self.cost(i, j) == self.cost(j, i)))
    }

    /// Total cost of visiting `order`, saturating to `UNREACHABLE`
    ///
    /// With `closed_loop` the arc from the last point back to the first is
    /// included.
    #[must_use]
    pub fn path_cost(&self, order: &[usize], closed_loop: bool) -> u64 {
        let mut total: u64 = 0;
        for pair in order.windows(2) {
            total = total.saturating_add(self.cost(pair[0], pair[1]));
        }
        if closed_loop && order.len() > 1 {
            if let (Some(&last), Some(&first)) = (order.last(), order.first()) {
                total = total.saturating_add(self.cost(last, first));
            }
        }
        total
    }

    /// Copy of the matrix as nested rows
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<u64>> {
        self.costs.chunks(self.size.max(1)).map(<[u64]>::to_vec).collect()
    }
}

/// Incrementally fills a matrix one column at a time
///
/// Cells start empty; `build` refuses to produce a matrix while any
/// off-diagonal cell is missing.
#[derive(Debug, Clone)]
pub struct MatrixBuilder {
    size: usize,
    cells: Vec<Option<u64>>,
}

impl MatrixBuilder {
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Set a single cell
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidMatrix` for out-of-range indices.
    pub fn set(&mut self, from: usize, to: usize, cost: u64) -> Result<(), DomainError> {
        if from >= self.size || to >= self.size {
            return Err(DomainError::InvalidMatrix(format!(
                "cell ({from}, {to}) outside {0}x{0} matrix",
                self.size
            )));
        }
        self.cells[from * self.size + to] = Some(cost);
        Ok(())
    }

    /// Fill column `to` with the costs from every point, in point order
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidMatrix` if the column index is out of
    /// range or `costs` does not hold exactly one value per point.
    pub fn set_column(&mut self, to: usize, costs: &[u64]) -> Result<(), DomainError> {
        if costs.len() != self.size {
            return Err(DomainError::InvalidMatrix(format!(
                "column {to} has {} values, expected {}",
                costs.len(),
                self.size
            )));
        }
        for (from, &cost) in costs.iter().enumerate() {
            self.set(from, to, cost)?;
        }
        Ok(())
    }

    /// Finish the matrix
    ///
    /// # Errors
    ///
    /// Returns `DomainError::IncompleteMatrix` naming the first missing
    /// off-diagonal cell.
    pub fn build(self) -> Result<DistanceMatrix, DomainError> {
        let size = self.size;
        let mut costs = Vec::with_capacity(size * size);
        for (index, cell) in self.cells.into_iter().enumerate() {
            let (row, column) = (index / size, index % size);
            if row == column {
                costs.push(0);
                continue;
            }
            costs.push(cell.ok_or(DomainError::IncompleteMatrix { row, column })?);
        }
        Ok(DistanceMatrix { size, costs })
    }
}
