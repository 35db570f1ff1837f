//! [`CustomerId`] identifies the shopper towards the merchant backend.

use std::{fmt::Display, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};

/// Customer identifier, always rendered as at least six zero-padded digits.
///
/// ```
/// use shop_core::types::CustomerId;
///
/// assert_eq!(CustomerId::from(13).to_string(), "000013");
/// assert_eq!("42".parse::<CustomerId>().unwrap().to_string(), "000042");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CustomerId(pub u32);

impl From<u32> for CustomerId {
    fn from(value: u32) -> Self {
        CustomerId(value)
    }
}

impl FromStr for CustomerId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(CustomerId)
    }
}

impl Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:06}", self.0)
    }
}

impl Serialize for CustomerId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CustomerId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
