use crate::error::CommandError;
use audiofuse_types::{DigitalInput, DigitalOutput};
use strum::Display;

/// Which side of the ADAT clock boundary a restart crosses.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum RestartDirection {
    ToAdat,
    FromAdat,
}

impl RestartDirection {
    /// Payload byte of the restart command register.
    pub fn command_data(self) -> u8 {
        match self {
            RestartDirection::ToAdat => 2,
            RestartDirection::FromAdat => 1,
        }
    }
}

/// (data, data2) written to the input selector registers.
pub fn input_selector(input: DigitalInput) -> Result<(u8, u8), CommandError> {
    match input {
        DigitalInput::SpdifCoax => Ok((0, 0)),
        DigitalInput::SpdifOptical => Ok((0, 1)),
        DigitalInput::Adat => Ok((1, 1)),
        DigitalInput::WordClock => Ok((2, 0)),
        DigitalInput::Unknown => Err(CommandError::UnroutableTarget(input.to_string())),
    }
}

/// data written to the output selector register.
pub fn output_selector(output: DigitalOutput) -> Result<u8, CommandError> {
    match output {
        DigitalOutput::Spdif => Ok(0),
        DigitalOutput::Adat => Ok(1),
        DigitalOutput::WordClock => Ok(2),
        DigitalOutput::Unknown => Err(CommandError::UnroutableTarget(output.to_string())),
    }
}

/// The device restarts when one axis crosses the ADAT clock boundary while
/// the other axis is not already on ADAT. If the other axis is ADAT the
/// device stays in ADAT clock mode and no restart happens.
pub fn input_restart_direction(
    current: DigitalInput,
    target: DigitalInput,
    other_axis: DigitalOutput,
) -> Option<RestartDirection> {
    if other_axis == DigitalOutput::Adat {
        return None;
    }
    match (current == DigitalInput::Adat, target == DigitalInput::Adat) {
        (false, true) => Some(RestartDirection::ToAdat),
        (true, false) => Some(RestartDirection::FromAdat),
        _ => None,
    }
}

pub fn output_restart_direction(
    current: DigitalOutput,
    target: DigitalOutput,
    other_axis: DigitalInput,
) -> Option<RestartDirection> {
    if other_axis == DigitalInput::Adat {
        return None;
    }
    match (current == DigitalOutput::Adat, target == DigitalOutput::Adat) {
        (false, true) => Some(RestartDirection::ToAdat),
        (true, false) => Some(RestartDirection::FromAdat),
        _ => None,
    }
}
