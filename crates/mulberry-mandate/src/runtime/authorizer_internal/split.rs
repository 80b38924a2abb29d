use crate::runtime::verdict::FundSplit;

/// Rates with more decimal places than this donate nothing on any `u64`
/// amount.
const MAX_RATE_DECIMALS: usize = 36;

/// Split `amount` into vendor and community-fund parts.
///
/// `community_fund = floor(amount * rate)`, computed exactly in integers from
/// the rate's shortest decimal form (the value as written in the mandate, so
/// `0.29` is 29/100 and not the nearest binary fraction). Rates at or below
/// zero (and NaN) donate nothing; rates at or above one donate everything.
/// `vendor_amount` is the remainder, so the parts always sum to `amount`.
pub fn compute_split(amount: u64, rate: f64) -> FundSplit {
    let donation = donation_floor(amount, rate);
    FundSplit {
        vendor_amount: amount - donation,
        community_fund: donation,
    }
}

fn donation_floor(amount: u64, rate: f64) -> u64 {
    if rate.is_nan() || rate <= 0.0 {
        return 0;
    }
    if rate >= 1.0 {
        return amount;
    }
    let Some((numerator, places)) = decimal_fraction(rate) else {
        return 0;
    };
    // numerator < 10^17 (shortest round-trip form), so the product fits.
    let donation = u128::from(amount) * numerator / 10u128.pow(places);
    u64::try_from(donation).map_or(amount, |d| d.min(amount))
}

/// `rate` in `(0, 1)` as `numerator / 10^places`.
fn decimal_fraction(rate: f64) -> Option<(u128, u32)> {
    // f64 Display never uses exponent notation and is the shortest
    // representation that round-trips.
    let text = rate.to_string();
    let (_, fraction) = text.split_once('.')?;
    let digits = fraction.trim_end_matches('0');
    if digits.is_empty() || digits.len() > MAX_RATE_DECIMALS {
        return None;
    }
    let numerator = digits.parse::<u128>().ok()?;
    Some((numerator, digits.len() as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_reference_values() {
        let split = compute_split(30_000, 0.1);
        assert_eq!(split.community_fund, 3_000);
        assert_eq!(split.vendor_amount, 27_000);
    }

    #[test]
    fn test_split_floors_donation() {
        let split = compute_split(999, 0.1);
        assert_eq!(split.community_fund, 99);
        assert_eq!(split.vendor_amount, 900);
    }

    #[test]
    fn test_split_uses_every_rate_decimal() {
        let split = compute_split(10_000_000, 0.1234567);
        assert_eq!(split.community_fund, 1_234_567);
        assert_eq!(split.vendor_amount, 8_765_433);

        assert_eq!(compute_split(10_000_000, 0.0000004).community_fund, 4);
        assert_eq!(compute_split(10_000_000, 0.12345678).community_fund, 1_234_567);
        assert_eq!(compute_split(1_000_000_000, 0.000_000_001).community_fund, 1);
    }

    #[test]
    fn test_split_is_decimal_not_binary() {
        // 100 * 0.29 is 28.999... in binary floating point.
        assert_eq!(compute_split(100, 0.29).community_fund, 29);
        assert_eq!(compute_split(3, 0.333333).community_fund, 0);
    }

    #[test]
    fn test_split_edges() {
        assert_eq!(compute_split(1_000, 0.0).community_fund, 0);
        assert_eq!(compute_split(1_000, 1.0).community_fund, 1_000);
        assert_eq!(compute_split(0, 0.5).total(), 0);
        assert_eq!(compute_split(1_000, f64::NAN).community_fund, 0);
        assert_eq!(compute_split(1_000, -0.5).community_fund, 0);
        assert_eq!(compute_split(1_000, 7.0).vendor_amount, 0);
        assert_eq!(compute_split(1_000, f64::INFINITY).vendor_amount, 0);
        assert_eq!(compute_split(u64::MAX, 1e-300).community_fund, 0);

        let split = compute_split(u64::MAX, 0.333333);
        assert_eq!(split.total(), u64::MAX);
        assert_eq!(
            split.community_fund,
            (u128::from(u64::MAX) * 333_333 / 1_000_000) as u64
        );
    }
}
