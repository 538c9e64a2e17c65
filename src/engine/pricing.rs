use serde::{Deserialize, Serialize};

pub const MIN_VALUE_PER_PACKAGE: f64 = 10.00;
pub const FREE_KM_RADIUS: f64 = 20.0;
pub const EXTRA_KM_PRICE: f64 = 1.00;
pub const PLATFORM_FEE_PERCENTAGE: f64 = 0.15;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FreightQuote {
    pub base_value: f64,
    pub extra_value: f64,
    pub total_value: f64,
    pub courier_earnings: f64,
}

/// Freight formula: a per-package base plus a per-km surcharge past the free
/// radius, with the platform fee taken off the courier's side.
///
/// Inputs are validated at the API boundary (package_count 1..=50, distance
/// non-negative). The result is persisted on the order at creation and never
/// recomputed, so existing orders keep their price if the constants change.
pub fn compute_freight(package_count: u32, distance_km: f64) -> FreightQuote {
    let base_value = package_count as f64 * MIN_VALUE_PER_PACKAGE;
    let extra_km = (distance_km - FREE_KM_RADIUS).max(0.0);
    let extra_value = extra_km * EXTRA_KM_PRICE;

    let total_value = base_value + extra_value;
    let courier_earnings = total_value * (1.0 - PLATFORM_FEE_PERCENTAGE);

    FreightQuote {
        base_value,
        extra_value,
        total_value,
        courier_earnings,
    }
}

#[cfg(test)]
mod tests {
    use super::compute_freight;

    const EPS: f64 = 1e-9;

    #[test]
    fn three_packages_over_the_free_radius() {
        let quote = compute_freight(3, 25.0);

        assert!((quote.base_value - 30.0).abs() < EPS);
        assert!((quote.extra_value - 5.0).abs() < EPS);
        assert!((quote.total_value - 35.0).abs() < EPS);
        assert!((quote.courier_earnings - 29.75).abs() < EPS);
    }

    #[test]
    fn no_surcharge_inside_the_free_radius() {
        let quote = compute_freight(2, 12.5);

        assert!((quote.extra_value).abs() < EPS);
        assert!((quote.total_value - 20.0).abs() < EPS);
    }

    #[test]
    fn distance_exactly_at_the_radius_is_free() {
        let quote = compute_freight(1, 20.0);

        assert!((quote.extra_value).abs() < EPS);
        assert!((quote.total_value - 10.0).abs() < EPS);
    }

    #[test]
    fn earnings_are_total_minus_platform_fee_across_the_range() {
        for count in 1..=50u32 {
            for distance in [0.0, 7.3, 20.0, 48.9, 250.0] {
                let quote = compute_freight(count, distance);
                let expected_total =
                    count as f64 * 10.0 + (distance - 20.0).max(0.0);

                assert!((quote.total_value - expected_total).abs() < EPS);
                assert!((quote.courier_earnings - expected_total * 0.85).abs() < EPS);
                assert!(
                    (quote.total_value - quote.base_value - quote.extra_value).abs() < EPS
                );
            }
        }
    }
}
