use log::warn;
use rust_decimal::Decimal;

use super::factor::EmissionFactorRecord;

/// kg CO2 for `quantity` units. Unmatched lines emit nothing; negative
/// quantities are not clamped. A product beyond the `Decimal` range is
/// capped at `Decimal::MAX` (or `MIN`).
pub fn compute(quantity: Decimal, record: Option<&EmissionFactorRecord>) -> Decimal {
    let Some(record) = record else {
        return Decimal::ZERO;
    };

    quantity.checked_mul(record.factor()).unwrap_or_else(|| {
        warn!(
            "co2 overflow for {} x {} ({:?}), capping",
            quantity,
            record.factor(),
            record.category()
        );
        quantity.saturating_mul(record.factor())
    })
}

/// Sum of line values, capped like [`compute`] instead of overflowing.
pub fn total(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values.into_iter().fold(Decimal::ZERO, |total, value| {
        total.checked_add(value).unwrap_or_else(|| {
            warn!("co2 total overflow, capping");
            total.saturating_add(value)
        })
    })
}
