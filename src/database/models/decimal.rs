use bigdecimal::{BigDecimal, RoundingMode};
use serde::{Serialize, Serializer};

/// Serialize a NUMERIC value with exactly two decimal places. Postgres hands
/// back `160` for a stored `160.00`; computed values keep their own scale.
pub fn serialize<S>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    value
        .with_scale_round(2, RoundingMode::HalfUp)
        .serialize(serializer)
}
