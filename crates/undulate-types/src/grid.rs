use serde::Serialize;
use strum_macros::{Display, EnumCount, EnumIter, EnumString, FromRepr};

#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Display, EnumCount, EnumIter, EnumString, FromRepr, Serialize,
)]
#[repr(u8)]
pub enum GridStep {
    #[strum(serialize = "1/1")]
    Full,
    #[strum(serialize = "1/2")]
    Half,
    #[strum(serialize = "1/4")]
    Fourth,
    #[default]
    #[strum(serialize = "1/8")]
    Eighth,
    #[strum(serialize = "1/16")]
    Sixteenth,
    #[strum(serialize = "1/32")]
    ThirtySecond,
}

impl GridStep {
    pub fn from_index(index: u8) -> Option<Self> {
        Self::from_repr(index)
    }

    /// Number of equal steps the period is divided into, e.g. 2 for "1/2".
    pub fn divisor(self) -> u32 {
        1 << (self as u32)
    }
}
