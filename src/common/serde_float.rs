//! Lossless serde representation of `f64` fields
//! that may hold `±∞` or NaN.
//!
//! Finite values are written as numbers.
//! Non-finite values are written as the strings
//! `"inf"`, `"-inf"` and `"NaN"`,
//! since formats such as JSON have no literal for them.
use serde::{Deserialize, Deserializer, Serializer};
use serde::de::Error;


pub(crate) fn serialize<S>(value: &f64, serializer: S)
    -> Result<S::Ok, S::Error>
    where S: Serializer,
{
    let value = *value;
    if value.is_finite() {
        serializer.serialize_f64(value)
    } else if value.is_nan() {
        serializer.serialize_str("NaN")
    } else if value > 0.0 {
        serializer.serialize_str("inf")
    } else {
        serializer.serialize_str("-inf")
    }
}


pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Float {
        Number(f64),
        Text(String),
    }

    match Float::deserialize(deserializer)? {
        Float::Number(value) => Ok(value),
        Float::Text(text) => match text.as_str() {
            "inf" => Ok(f64::INFINITY),
            "-inf" => Ok(f64::NEG_INFINITY),
            "NaN" => Ok(f64::NAN),
            _ => Err(D::Error::custom(
                format!("expected a number, \"inf\", \"-inf\" or \"NaN\", got {text:?}")
            )),
        },
    }
}
