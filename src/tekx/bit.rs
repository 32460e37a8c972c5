use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// A binary signal level as stored in the `A`, `B`, `DO1` and `DO2` columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bit {
    #[default]
    Zero,
    One,
}

impl Bit {
    pub fn as_i64(&self) -> i64 {
        match self {
            Bit::Zero => 0,
            Bit::One => 1,
        }
    }
}

impl From<bool> for Bit {
    fn from(v: bool) -> Self {
        if v { Bit::One } else { Bit::Zero }
    }
}

impl TryFrom<i64> for Bit {
    type Error = ValidationError;

    fn try_from(v: i64) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Bit::Zero),
            1 => Ok(Bit::One),
            _ => Err(ValidationError::InvalidBit(v.to_string())),
        }
    }
}

impl FromStr for Bit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(Bit::Zero),
            "1" => Ok(Bit::One),
            other => Err(ValidationError::InvalidBit(other.to_string())),
        }
    }
}

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_i64(), f)
    }
}
