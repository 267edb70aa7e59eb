/// Cyclic Latin square of order n: `L[row][col] = (row + col) mod n`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatinSquare {
    order: usize,
}

impl LatinSquare {
    pub fn cyclic(order: usize) -> Self {
        Self { order }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn cell(&self, row: usize, col: usize) -> usize {
        (row + col) % self.order
    }

    /// Symbols of one row, read left to right
    pub fn row(&self, row: usize) -> Vec<usize> {
        (0..self.order).map(|col| self.cell(row, col)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rows_and_columns_are_permutations() {
        let square = LatinSquare::cyclic(7);
        for i in 0..7 {
            let row: HashSet<usize> = (0..7).map(|j| square.cell(i, j)).collect();
            let col: HashSet<usize> = (0..7).map(|j| square.cell(j, i)).collect();
            assert_eq!(row.len(), 7);
            assert_eq!(col.len(), 7);
        }
    }

    #[test]
    fn test_row_wraps_around() {
        let square = LatinSquare::cyclic(4);
        assert_eq!(square.row(0), vec![0, 1, 2, 3]);
        assert_eq!(square.row(3), vec![3, 0, 1, 2]);
        assert_eq!(square.order(), 4);
    }
}
