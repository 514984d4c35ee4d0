#[cfg(feature = "clap")]
use clap::ValueEnum;
use strum::{Display, EnumCount, EnumIter};

/// Source selection for the digital input pair on the rear of the device.
#[derive(Copy, Clone, Debug, Display, EnumIter, EnumCount, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(ValueEnum))]
pub enum DigitalInput {
    #[cfg_attr(feature = "clap", value(skip))]
    Unknown,
    SpdifCoax,
    SpdifOptical,
    Adat,
    #[cfg_attr(feature = "clap", value(name = "wclock"))]
    WordClock,
}

/// Signal selection for the digital output pair.
#[derive(Copy, Clone, Debug, Display, EnumIter, EnumCount, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(ValueEnum))]
pub enum DigitalOutput {
    #[cfg_attr(feature = "clap", value(skip))]
    Unknown,
    Spdif,
    Adat,
    #[cfg_attr(feature = "clap", value(name = "wclock"))]
    WordClock,
}

/// The on / off toggles the device exposes besides routing.
#[derive(Copy, Clone, Debug, Display, EnumIter, EnumCount, PartialEq, Eq)]
pub enum DeviceOption {
    Phones2Source,
    Reamping,
    GroundLift,
}
