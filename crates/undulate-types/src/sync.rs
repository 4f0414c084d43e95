use serde::Serialize;
use strum_macros::{Display, EnumCount, EnumIter, EnumString, FromRepr};

/// Musical note division the LFO period is locked to in synced mode,
/// ordered from the shortest to the longest.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Display, EnumCount, EnumIter, EnumString, FromRepr, Serialize,
)]
#[repr(u8)]
pub enum SyncRate {
    #[strum(serialize = "1/128")]
    OneHundredTwentyEighth,
    #[strum(serialize = "1/64")]
    SixtyFourth,
    #[strum(serialize = "1/32")]
    ThirtySecond,
    #[strum(serialize = "1/16")]
    Sixteenth,
    #[strum(serialize = "1/8")]
    Eighth,
    #[default]
    #[strum(serialize = "1/4")]
    Quarter,
    #[strum(serialize = "1/2")]
    Half,
    #[strum(serialize = "1/1")]
    Whole,
    #[strum(serialize = "2/1")]
    TwoBars,
    #[strum(serialize = "4/1")]
    FourBars,
}

#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Display, EnumCount, EnumIter, EnumString, FromRepr, Serialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[repr(u8)]
pub enum SyncRateType {
    #[default]
    Normal,
    Dotted,
    Triplet,
}

const DOTTED_MULTIPLIER: f32 = 1.5;
const TRIPLET_MULTIPLIER: f32 = 2.0 / 3.0;

impl SyncRate {
    pub fn from_index(index: u8) -> Option<Self> {
        Self::from_repr(index)
    }

    /// Fraction of a whole bar covered by this division: `2^(index - index(1/1))`.
    pub fn base_fraction(self) -> f32 {
        2.0_f32.powi(self as i32 - SyncRate::Whole as i32)
    }

    pub fn to_fraction(self, rate_type: SyncRateType) -> f32 {
        self.base_fraction() * rate_type.multiplier()
    }
}

impl SyncRateType {
    pub fn from_index(index: u8) -> Option<Self> {
        Self::from_repr(index)
    }

    pub fn multiplier(self) -> f32 {
        match self {
            SyncRateType::Normal => 1.0,
            SyncRateType::Dotted => DOTTED_MULTIPLIER,
            SyncRateType::Triplet => TRIPLET_MULTIPLIER,
        }
    }
}

#[inline]
pub fn sync_rate_to_fraction(rate: SyncRate, rate_type: SyncRateType) -> f32 {
    rate.to_fraction(rate_type)
}
