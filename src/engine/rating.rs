/// New accounts start at a perfect score rather than the mean of zero
/// ratings; the first real rating still carries full weight via the
/// running-average update.
pub const DEFAULT_RATING: f64 = 5.0;

/// Running-average update for a profile's reputation. Returns the new
/// average and the new count.
pub fn apply_rating(current_average: f64, current_count: u32, stars: u8) -> (f64, u32) {
    let new_count = current_count + 1;
    let new_average =
        (current_average * current_count as f64 + stars as f64) / new_count as f64;

    (new_average, new_count)
}

#[cfg(test)]
mod tests {
    use super::{apply_rating, DEFAULT_RATING};

    const EPS: f64 = 1e-9;

    #[test]
    fn first_rating_replaces_the_charitable_default() {
        let (average, count) = apply_rating(DEFAULT_RATING, 0, 5);

        assert!((average - 5.0).abs() < EPS);
        assert_eq!(count, 1);
    }

    #[test]
    fn second_rating_averages_with_the_first() {
        let (average, count) = apply_rating(5.0, 1, 1);

        assert!((average - 3.0).abs() < EPS);
        assert_eq!(count, 2);
    }

    #[test]
    fn average_stays_within_star_bounds() {
        let mut average = DEFAULT_RATING;
        let mut count = 0;

        for stars in [4, 2, 5, 1, 3, 5, 5, 2] {
            let (next_average, next_count) = apply_rating(average, count, stars);
            assert!((1.0..=5.0).contains(&next_average));
            assert_eq!(next_count, count + 1);
            average = next_average;
            count = next_count;
        }
    }
}
