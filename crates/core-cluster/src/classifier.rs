//! Distance classification threshold.
//!
//! A bounded 1-D two-means over a sorted distance vector: the boundary
//! between the "inner" (same-cluster) and "inter" (cross-cluster) distances
//! is initialized from the two halves of the range and iterated until the
//! half-mean midpoint stops moving. The returned cutoff is the largest value
//! still in the lower class.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("cannot classify a set with less than 2 distances")]
    TooFewValues,
    #[error("cannot classify a set of identical values")]
    IdenticalValues,
}

/// Sort `values` ascending, then classify.
pub fn classification_threshold(values: &mut [f64]) -> Result<f64, ClassifyError> {
    values.sort_unstable_by(f64::total_cmp);
    classification_threshold_sorted(values)
}

/// Classify an already ascending-sorted distance vector.
pub fn classification_threshold_sorted(values: &[f64]) -> Result<f64, ClassifyError> {
    let n = values.len();
    if n < 2 {
        return Err(ClassifyError::TooFewValues);
    }
    debug_assert!(
        values.windows(2).all(|pair| pair[0] <= pair[1]),
        "input must be sorted ascending"
    );

    // Seed the boundary from the middle of the range: the first position not
    // below the median value, or, when that is the very front, the first
    // position strictly above it. Only a run of identical values reaches the
    // end that way, and such a range cannot be classified.
    let mid = n / 2;
    let mid_value = values[mid];
    let mut upper = values[..mid].partition_point(|v| *v < mid_value);
    if upper == 0 {
        upper = mid + values[mid..].partition_point(|v| *v <= mid_value);
        if upper == n {
            return Err(ClassifyError::IdenticalValues);
        }
    }

    let mut num_lower = upper;
    let mut num_upper = n - upper;
    let mut sum_lower: f64 = values[..upper].iter().sum();
    let mut sum_upper: f64 = values[upper..].iter().sum();

    loop {
        let mean_lower = sum_lower / num_lower as f64;
        let mean_upper = sum_upper / num_upper as f64;
        let cutoff = (mean_lower + mean_upper) / 2.0;

        // A value falling exactly on the cutoff belongs to the lower class.
        let new_upper = values.partition_point(|v| *v <= cutoff);
        debug_assert!(new_upper > 0 && new_upper < n);
        if new_upper == upper {
            break;
        }
        if new_upper > upper {
            // The interval [upper, new_upper) joins the lower class.
            for value in &values[upper..new_upper] {
                sum_lower += value;
                sum_upper -= value;
            }
            num_lower += new_upper - upper;
            num_upper -= new_upper - upper;
        } else {
            // The interval [new_upper, upper) joins the upper class.
            for value in &values[new_upper..upper] {
                sum_lower -= value;
                sum_upper += value;
            }
            num_lower -= upper - new_upper;
            num_upper += upper - new_upper;
        }
        upper = new_upper;
    }

    Ok(values[upper - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_values() {
        assert_eq!(classification_threshold_sorted(&[1.0, 2.0]), Ok(1.0));
    }

    #[test]
    fn lower_singleton() {
        assert_eq!(classification_threshold_sorted(&[1.0, 2.0, 2.0]), Ok(1.0));
    }

    #[test]
    fn upper_singleton() {
        assert_eq!(classification_threshold_sorted(&[1.0, 1.0, 2.0]), Ok(1.0));
    }

    #[test]
    fn boundary_moves_during_iteration() {
        assert_eq!(classification_threshold_sorted(&[3.0, 5.0, 9.0]), Ok(5.0));
    }

    #[test]
    fn identical_values_are_rejected() {
        assert_eq!(
            classification_threshold_sorted(&[1.0, 1.0, 1.0]),
            Err(ClassifyError::IdenticalValues)
        );
    }

    #[test]
    fn too_few_values_are_rejected() {
        assert_eq!(
            classification_threshold_sorted(&[1.0]),
            Err(ClassifyError::TooFewValues)
        );
        assert_eq!(
            classification_threshold_sorted(&[]),
            Err(ClassifyError::TooFewValues)
        );
    }

    #[test]
    fn unsorted_input_is_sorted_first() {
        let mut values = vec![9.0, 3.0, 5.0];
        assert_eq!(classification_threshold(&mut values), Ok(5.0));
        assert_eq!(values, vec![3.0, 5.0, 9.0]);
    }

    #[test]
    fn threshold_is_a_member_of_the_input() {
        let mut values = vec![0.1, 0.12, 0.11, 0.55, 0.61, 0.58, 0.09];
        let threshold = classification_threshold(&mut values).unwrap();
        assert!(values.contains(&threshold));
    }

    // Sum of squared deviations from the two half-means; the chosen boundary
    // must be a local optimum.
    fn ssd(values: &[f64], boundary: usize) -> f64 {
        let mean = |slice: &[f64]| slice.iter().sum::<f64>() / slice.len() as f64;
        let dev = |slice: &[f64]| {
            let m = mean(slice);
            slice.iter().map(|v| (v - m) * (v - m)).sum::<f64>()
        };
        dev(&values[..boundary]) + dev(&values[boundary..])
    }

    #[test]
    fn boundary_is_locally_optimal() {
        let values = [0.05, 0.1, 0.12, 0.5, 0.55, 0.9];
        let threshold = classification_threshold_sorted(&values).unwrap();
        let boundary = values.partition_point(|v| *v <= threshold);
        let best = ssd(&values, boundary);
        if boundary > 1 {
            assert!(ssd(&values, boundary - 1) >= best);
        }
        if boundary < values.len() - 1 {
            assert!(ssd(&values, boundary + 1) >= best);
        }
    }
}
