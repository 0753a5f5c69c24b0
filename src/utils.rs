// Вспомогательные функции сериализации и форматирования

/// Deserialize an optional number that upstream APIs send either as a number
/// or as a numeric string; `null`, empty and unparsable strings become `None`
pub mod optional_string_or_float {
    use serde::{self, Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => serializer.serialize_some(v),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OptionalStringOrFloat;

        impl<'de> serde::de::Visitor<'de> for OptionalStringOrFloat {
            type Value = Option<f64>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("null, a float or a string containing a float")
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(None)
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(None)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_any(self)
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(value.trim().parse::<f64>().ok().filter(|v| v.is_finite()))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Some(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Some(value as f64))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Some(value as f64))
            }
        }

        deserializer.deserialize_option(OptionalStringOrFloat)
    }
}

// Shorten address for display
pub fn shorten_address(address: &str) -> String {
    if address.len() <= 12 || !address.is_ascii() {
        return address.to_string();
    }

    let start = &address[..6];
    let end = &address[address.len() - 4..];

    format!("{}...{}", start, end)
}

/// Format a USD amount: cents for regular prices, significant digits for
/// sub-cent prices, K/M/B suffixes for market caps.
pub fn format_usd(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1_000_000_000.0 {
        format!("${:.2}B", value / 1_000_000_000.0)
    } else if abs >= 1_000_000.0 {
        format!("${:.2}M", value / 1_000_000.0)
    } else if abs >= 10_000.0 {
        format!("${:.2}K", value / 1_000.0)
    } else if abs >= 0.01 || abs == 0.0 {
        format!("${:.2}", value)
    } else {
        format!("${:.8}", value)
    }
}

/// Hide a credential embedded in a URL before it reaches the logs
pub fn redact(text: &str, secret: Option<&str>) -> String {
    match secret {
        Some(secret) if !secret.is_empty() => text.replace(secret, "***"),
        _ => text.to_string(),
    }
}
