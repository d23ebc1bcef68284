//! Levenshtein distance and edit path.
//!
//! `levenshtein` uses the two-row formulation with the shorter sequence on
//! the columns axis, capping memory at `min(|a|, |b|) + 1` cells. The path
//! variant materializes the full matrix and backtracks from the bottom-right
//! corner.

use unicode_segmentation::UnicodeSegmentation;

/// One step of an edit path, in forward order from the start of both
/// sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    Retention,
    Substitution,
    Insertion,
    Deletion,
}

/// Edit distance between `lhs` and `rhs` under unit insertion, deletion and
/// substitution costs. `eq` decides element equality.
pub fn levenshtein<A, B, F>(lhs: &[A], rhs: &[B], mut eq: F) -> usize
where
    F: FnMut(&A, &B) -> bool,
{
    if lhs.len() <= rhs.len() {
        levenshtein_ordered(lhs, rhs, eq)
    } else {
        levenshtein_ordered(rhs, lhs, |a, b| eq(b, a))
    }
}

/// Distance between two strings compared grapheme cluster by grapheme
/// cluster.
pub fn levenshtein_str(lhs: &str, rhs: &str) -> usize {
    let lhs: Vec<&str> = lhs.graphemes(true).collect();
    let rhs: Vec<&str> = rhs.graphemes(true).collect();
    levenshtein(&lhs, &rhs, |a, b| a == b)
}

// Invariant: `short.len() <= long.len()`; the row vector spans the short
// sequence.
fn levenshtein_ordered<A, B, F>(short: &[A], long: &[B], mut eq: F) -> usize
where
    F: FnMut(&A, &B) -> bool,
{
    let mut row: Vec<usize> = (0..=short.len()).collect();
    for (i, long_item) in long.iter().enumerate() {
        let mut last_diag = row[0];
        row[0] = i + 1;
        for (j, short_item) in short.iter().enumerate() {
            let prev_diag = row[j + 1];
            let substitution = last_diag + usize::from(!eq(short_item, long_item));
            row[j + 1] = substitution.min(row[j + 1] + 1).min(row[j] + 1);
            last_diag = prev_diag;
        }
    }
    row[short.len()]
}

/// Distance plus the full edit path from `lhs` to `rhs`.
///
/// Ties during backtracking prefer the diagonal (a `Retention` when the cost
/// did not grow, a `Substitution` otherwise) over `Deletion` over
/// `Insertion`. Any leading imbalance once either index reaches zero is
/// emitted as a run of `Deletion`s or `Insertion`s.
pub fn levenshtein_path<A, B, F>(lhs: &[A], rhs: &[B], mut eq: F) -> (usize, Vec<EditOp>)
where
    F: FnMut(&A, &B) -> bool,
{
    let matrix = Matrix::fill(lhs, rhs, &mut eq);
    let (mut i, mut j) = (lhs.len(), rhs.len());
    let mut reversed = Vec::new();
    while i > 0 && j > 0 {
        let mut min_cost = matrix.get(i - 1, j - 1);
        let mut op = if matrix.get(i, j) == min_cost {
            EditOp::Retention
        } else {
            EditOp::Substitution
        };
        if matrix.get(i - 1, j) < min_cost {
            min_cost = matrix.get(i - 1, j);
            op = EditOp::Deletion;
        }
        if matrix.get(i, j - 1) < min_cost {
            op = EditOp::Insertion;
        }
        reversed.push(op);
        match op {
            EditOp::Retention | EditOp::Substitution => {
                i -= 1;
                j -= 1;
            }
            EditOp::Deletion => i -= 1,
            EditOp::Insertion => j -= 1,
        }
    }

    let prefix = i.max(j);
    let mut path = Vec::with_capacity(prefix + reversed.len());
    let prefix_op = if i > 0 {
        EditOp::Deletion
    } else {
        EditOp::Insertion
    };
    path.resize(prefix, prefix_op);
    while let Some(op) = reversed.pop() {
        path.push(op);
    }
    (matrix.get(lhs.len(), rhs.len()), path)
}

/// Grapheme-wise edit path between two strings.
pub fn levenshtein_path_str(lhs: &str, rhs: &str) -> (usize, Vec<EditOp>) {
    let lhs: Vec<&str> = lhs.graphemes(true).collect();
    let rhs: Vec<&str> = rhs.graphemes(true).collect();
    levenshtein_path(&lhs, &rhs, |a, b| a == b)
}

/// Row-major `(lhs_len + 1) x (rhs_len + 1)` DP table. Cell `(i, j)` holds
/// the distance between the first `i` elements of `lhs` and the first `j`
/// elements of `rhs`.
struct Matrix {
    cols: usize,
    cells: Vec<usize>,
}

impl Matrix {
    fn fill<A, B, F>(lhs: &[A], rhs: &[B], eq: &mut F) -> Self
    where
        F: FnMut(&A, &B) -> bool,
    {
        let cols = rhs.len() + 1;
        let mut matrix = Matrix {
            cols,
            cells: vec![0; (lhs.len() + 1) * cols],
        };
        for i in 1..=lhs.len() {
            matrix.set(i, 0, i);
        }
        for j in 1..=rhs.len() {
            matrix.set(0, j, j);
        }
        for (i, lhs_item) in lhs.iter().enumerate() {
            for (j, rhs_item) in rhs.iter().enumerate() {
                let substitution =
                    matrix.get(i, j) + usize::from(!eq(lhs_item, rhs_item));
                let cost = substitution
                    .min(matrix.get(i, j + 1) + 1)
                    .min(matrix.get(i + 1, j) + 1);
                matrix.set(i + 1, j + 1, cost);
            }
        }
        matrix
    }

    fn get(&self, i: usize, j: usize) -> usize {
        self.cells[i * self.cols + j]
    }

    fn set(&mut self, i: usize, j: usize, value: usize) {
        self.cells[i * self.cols + j] = value;
    }
}
