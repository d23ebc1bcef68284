//! Edit-distance kernels for log-line comparison.
//!
//! Two layers: classic Levenshtein over arbitrary element slices (distance
//! only, or the full edit path), and a token-position-weighted edit distance
//! that aligns two word sequences and sums inner distances scaled by a
//! logistic position weight.

mod levenshtein;
mod weighted;

pub use levenshtein::{levenshtein, levenshtein_path, levenshtein_path_str, levenshtein_str, EditOp};
pub use weighted::{logistic_decrease, weighted_edit_distance};
