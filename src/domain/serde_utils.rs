//! Serde helpers for pack documents written by other Matrix clients.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Deserializes `null` as the type's default value.
///
/// Pack documents in the wild contain `"images": null` or `"usage": null`; a
/// missing field is already covered by `#[serde(default)]`.
///
/// # Errors
///
/// Returns an error if the value is present but not a valid `T`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Optional unsigned integers that may arrive as integers, whole floats or strings.
///
/// Some clients store image dimensions as `128.0` or `"128"`.
pub mod lenient_u64 {
    use super::{Deserializer, Visitor, de, fmt};
    use serde::Serializer;

    /// Serializes the value as a plain integer.
    ///
    /// # Errors
    ///
    /// Returns an error if the serializer fails.
    #[allow(clippy::ref_option)]
    pub fn serialize<S>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => serializer.serialize_u64(*v),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes an optional u64 from an integer, a whole float or a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is negative, fractional or not numeric.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LenientVisitor;

        impl<'de> Visitor<'de> for LenientVisitor {
            type Value = Option<u64>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an optional non-negative integer")
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(None)
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(None)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_any(self)
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Some(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                u64::try_from(value)
                    .map(Some)
                    .map_err(|_| E::custom(format!("negative value {value}")))
            }

            #[allow(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                clippy::float_cmp
            )]
            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                if value < 0.0 || value.fract() != 0.0 || value > u64::MAX as f64 {
                    return Err(E::custom(format!("{value} is not a whole number")));
                }
                Ok(Some(value as u64))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value.trim().parse::<u64>().map(Some).map_err(E::custom)
            }
        }

        deserializer.deserialize_option(LenientVisitor)
    }
}
