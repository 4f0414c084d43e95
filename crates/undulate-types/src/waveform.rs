use serde::Serialize;
use strum_macros::{Display, EnumCount, EnumIter, EnumString};

#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
    Serialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Waveform {
    #[default]
    Sine,
    Saw,
    Triangle,
    Square,
    Random,
    Custom,
}
