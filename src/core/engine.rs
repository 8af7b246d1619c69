use super::types::{BandSchedule, BreakdownEntry, CommissionBand, CommissionResult};

pub const CURRENCY_SYMBOL: &str = "£";

/// Commission owed on `revenue` under a progressive, banded schedule.
///
/// Bands are walked in ascending order and the walk stops at the first band
/// whose start is not strictly below `revenue`. Every band reached contributes
/// `(min(revenue, end) - start) * rate`, including zero-rate bands. Negative
/// revenue therefore yields the same result as zero. `revenue` is expected to
/// be finite.
pub fn calculate(schedule: &BandSchedule, revenue: f64) -> CommissionResult {
    let mut total = 0.0;
    let mut breakdown = Vec::new();

    for band in schedule.bands() {
        if revenue <= band.start {
            break;
        }

        let effective_end = band.end.unwrap_or(f64::INFINITY);
        let slice = revenue.min(effective_end) - band.start;
        let contribution = slice * band.rate;
        total += contribution;

        breakdown.push(BreakdownEntry {
            label: band_label(band),
            amount: contribution,
        });
    }

    CommissionResult {
        total: format!("{total:.2}"),
        breakdown,
    }
}

/// `£5k -> 10k, 10%` for bounded bands, `£20k+, 25%` for the open band.
pub fn band_label(band: &CommissionBand) -> String {
    let start_k = band.start / 1000.0;
    let percent = band.rate * 100.0;
    match band.end {
        Some(end) => format!(
            "{CURRENCY_SYMBOL}{start_k}k -> {}k, {percent:.0}%",
            end / 1000.0
        ),
        None => format!("{CURRENCY_SYMBOL}{start_k}k+, {percent:.0}%"),
    }
}

pub fn format_money(amount: f64) -> String {
    format!("{CURRENCY_SYMBOL}{amount:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn standard(revenue: f64) -> CommissionResult {
        calculate(&BandSchedule::standard(), revenue)
    }

    fn labels(result: &CommissionResult) -> Vec<&str> {
        result
            .breakdown
            .iter()
            .map(|entry| entry.label.as_str())
            .collect()
    }

    fn amounts(result: &CommissionResult) -> Vec<f64> {
        result.breakdown.iter().map(|entry| entry.amount).collect()
    }

    fn total_of(result: &CommissionResult) -> f64 {
        result.total.parse().expect("total is numeric")
    }

    #[test]
    fn zero_revenue_has_no_breakdown() {
        let result = standard(0.0);
        assert_eq!(result.total, "0.00");
        assert!(result.breakdown.is_empty());
    }

    #[test]
    fn revenue_inside_zero_rate_band_lists_that_band() {
        let result = standard(3_000.0);
        assert_eq!(result.total, "0.00");
        assert_eq!(labels(&result), vec!["£0k -> 5k, 0%"]);
        assert_eq!(amounts(&result), vec![0.0]);
    }

    #[test]
    fn revenue_in_second_band_pays_marginal_rate_on_slice() {
        let result = standard(7_000.0);
        assert_eq!(result.total, "200.00");
        assert_eq!(labels(&result), vec!["£0k -> 5k, 0%", "£5k -> 10k, 10%"]);
        assert_approx(result.breakdown[0].amount, 0.0);
        assert_approx(result.breakdown[1].amount, 200.0);
    }

    #[test]
    fn revenue_in_open_band_uses_every_band() {
        let result = standard(25_000.0);
        assert_eq!(result.total, "3500.00");
        assert_eq!(
            labels(&result),
            vec![
                "£0k -> 5k, 0%",
                "£5k -> 10k, 10%",
                "£10k -> 15k, 15%",
                "£15k -> 20k, 20%",
                "£20k+, 25%",
            ]
        );
        for (actual, expected) in amounts(&result)
            .into_iter()
            .zip([0.0, 500.0, 750.0, 1_000.0, 1_250.0])
        {
            assert_approx(actual, expected);
        }
        assert_approx(result.total_value(), 3_500.0);
    }

    #[test]
    fn revenue_on_band_start_excludes_that_band() {
        let result = standard(5_000.0);
        assert_eq!(result.total, "0.00");
        assert_eq!(labels(&result), vec!["£0k -> 5k, 0%"]);

        let result = standard(20_000.0);
        assert_eq!(result.total, "2250.00");
        assert_eq!(result.breakdown.len(), 4);
    }

    #[test]
    fn revenue_just_past_band_start_includes_that_band() {
        let result = standard(5_000.5);
        assert_eq!(result.breakdown.len(), 2);
        assert_eq!(result.total, "0.05");
    }

    #[test]
    fn negative_revenue_matches_zero_revenue() {
        assert_eq!(standard(-1.0), standard(0.0));
        assert_eq!(standard(-25_000.0), standard(0.0));
    }

    #[test]
    fn total_rounds_to_two_decimal_places() {
        let result = standard(5_000.123);
        assert_eq!(result.total, "0.01");
        assert_approx(result.breakdown[1].amount, 0.0123);
    }

    #[test]
    fn substituted_schedule_drives_labels_and_amounts() {
        let schedule = BandSchedule::new(vec![
            CommissionBand::bounded(0.0, 2_500.0, 0.05),
            CommissionBand::unbounded(2_500.0, 0.5),
        ])
        .expect("valid schedule");

        let result = calculate(&schedule, 3_000.0);
        assert_eq!(labels(&result), vec!["£0k -> 2.5k, 5%", "£2.5k+, 50%"]);
        assert_approx(result.breakdown[0].amount, 125.0);
        assert_approx(result.breakdown[1].amount, 250.0);
        assert_eq!(result.total, "375.00");
    }

    #[test]
    fn format_money_uses_pound_sign_and_two_decimals() {
        assert_eq!(format_money(0.0), "£0.00");
        assert_eq!(format_money(200.0), "£200.00");
        assert_eq!(format_money(1_250.5), "£1250.50");
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(256))]

        #[test]
        fn prop_total_is_monotonic_in_revenue(
            a in 0.0f64..1_000_000.0,
            b in 0.0f64..1_000_000.0,
        ) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(total_of(&standard(low)) <= total_of(&standard(high)));
        }

        #[test]
        fn prop_repeated_calls_are_identical(revenue in -1_000_000.0f64..1_000_000.0) {
            prop_assert_eq!(standard(revenue), standard(revenue));
        }

        #[test]
        fn prop_breakdown_sums_to_total(revenue in 0.0f64..1_000_000.0) {
            let result = standard(revenue);
            prop_assert!((result.total_value() - total_of(&result)).abs() <= 0.005 + EPS);
        }

        #[test]
        fn prop_negative_revenue_matches_zero(revenue in -1_000_000.0f64..0.0) {
            prop_assert_eq!(standard(revenue), standard(0.0));
        }

        #[test]
        fn prop_breakdown_follows_schedule_order(revenue in 0.0f64..1_000_000.0) {
            let result = standard(revenue);
            let schedule = BandSchedule::standard();
            let reached = schedule
                .bands()
                .iter()
                .take_while(|band| revenue > band.start)
                .count();
            prop_assert_eq!(result.breakdown.len(), reached);
            for (entry, band) in result.breakdown.iter().zip(schedule.bands()) {
                prop_assert_eq!(&entry.label, &band_label(band));
                prop_assert!(entry.amount >= 0.0);
            }
        }
    }
}
