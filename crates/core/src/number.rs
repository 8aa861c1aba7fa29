//! Wire form of schema numbers.

use serde::Serializer;

/// Largest magnitude below which every integral `f64` is exact (2^53).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Serialize an `f64` field, writing integral values as JSON integers
/// (`20`, not `20.0`).
///
/// Use with `#[serde(serialize_with = "crudkit_core::number::serialize")]`.
pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
