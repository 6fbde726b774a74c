use rust_decimal::Decimal;

// Notional (USD) ceilings and the impact percentage quoted below each
const IMPACT_BANDS: [(i64, (i64, u32)); 4] = [
    (1_000, (1, 2)),      // 0.01%
    (10_000, (5, 2)),     // 0.05%
    (100_000, (15, 2)),   // 0.15%
    (1_000_000, (5, 1)),  // 0.5%
];

// Above the last band impact grows by 1% per $10M
const OPEN_BAND_BASE_PCT: i64 = 1;
const OPEN_BAND_SCALE_USD: i64 = 10_000_000;

/// Advisory price impact, in percent, for a trade of `notional_usd`.
///
/// Step function of trade size; it never feeds back into the output amount.
pub fn price_impact_pct(notional_usd: Decimal) -> Decimal {
    for (ceiling, (mantissa, scale)) in IMPACT_BANDS {
        if notional_usd < Decimal::from(ceiling) {
            return Decimal::new(mantissa, scale);
        }
    }

    Decimal::from(OPEN_BAND_BASE_PCT) + notional_usd / Decimal::from(OPEN_BAND_SCALE_USD)
}
