//! # Reading Aggregation
//!
//! Each forecast field arrives as one value per forecast model. These helpers
//! collapse such a set into a single representative number.
//!
//! Compass bearings cannot be averaged arithmetically: 350° and 10° average to
//! 180° that way, while the true mean points north. Bearings are therefore
//! summed as unit vectors and the resultant's heading is taken instead.

/// Circular mean of compass bearings in degrees, rounded to a whole degree in `[0, 360)`.
///
/// Returns `None` for an empty input.
///
/// When the unit vectors cancel exactly (e.g. `[0, 180]`) the resultant has no
/// heading and the result is whatever `atan2(0, 0)` yields, currently 0°.
///
/// ```
/// use good_surf::aggregate::circular_mean;
///
/// assert_eq!(circular_mean([0.0, 350.0, 10.0]), Some(0.0));
/// assert_eq!(circular_mean([90.0, 180.0]), Some(135.0));
/// ```
pub fn circular_mean<I>(angles: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut count = 0usize;
    let (x, y) = angles.into_iter().fold((0.0f64, 0.0f64), |(x, y), angle| {
        count += 1;
        let radians = angle.to_radians();
        (x + radians.cos(), y + radians.sin())
    });
    if count == 0 {
        return None;
    }

    let heading = y.atan2(x).to_degrees().rem_euclid(360.0);
    // 359.6 rounds up to 360, which is north again
    Some(heading.round().rem_euclid(360.0))
}

/// Arithmetic mean, `None` for an empty input.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0f64, 0usize), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Round to a fixed number of decimal places.
///
/// Works on the exact binary value with ties to even: 1.25 becomes 1.2, and
/// 1.45 (stored just below 1.45) becomes 1.4.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circular_mean_across_north() {
        // A naive mean of these would be 120
        assert_eq!(circular_mean([0.0, 350.0, 10.0]), Some(0.0));
        assert_eq!(circular_mean([340.0, 20.0]), Some(0.0));
        assert_eq!(circular_mean([355.0, 345.0]), Some(350.0));
    }

    #[test]
    fn test_circular_mean_plain_angles() {
        assert_eq!(circular_mean([10.0, 20.0, 30.0]), Some(20.0));
        assert_eq!(circular_mean([270.0]), Some(270.0));
        assert_eq!(circular_mean([180.0, 270.0]), Some(225.0));
    }

    #[test]
    fn test_circular_mean_never_returns_360() {
        let mean = circular_mean([359.7]).unwrap();
        assert_eq!(mean, 0.0);
    }

    #[test]
    fn test_circular_mean_empty() {
        assert_eq!(circular_mean(Vec::<f64>::new()), None);
    }

    #[test]
    fn test_circular_mean_opposed_vectors_stay_in_range() {
        let mean = circular_mean([0.0, 180.0]).unwrap();
        assert!((0.0..360.0).contains(&mean));
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean([1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(mean([0.4]), Some(0.4));
        assert_eq!(mean(Vec::<f64>::new()), None);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.26, 1), 1.3);
        assert_eq!(round_to(1.234, 2), 1.23);
        assert_eq!(round_to(2.0, 1), 2.0);
    }

    #[test]
    fn test_round_to_ties_go_to_even() {
        assert_eq!(round_to(1.25, 1), 1.2);
        assert_eq!(round_to(0.25, 1), 0.2);
        assert_eq!(round_to(0.35, 1), 0.3);
        assert_eq!(round_to(1.45, 1), 1.4);
        assert_eq!(round_to(1.125, 2), 1.12);
        assert_eq!(round_to(1.375, 2), 1.38);
    }
}
