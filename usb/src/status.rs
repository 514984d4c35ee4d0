use crate::commands::STATUS_LENGTH;
use crate::error::{CommandError, UnrecognizedStatus};
use audiofuse_types::{DigitalInput, DigitalOutput};

// Routing templates, in priority order. A candidate matches when every
// (offset, value) pair holds against the snapshot; the first match wins.
const INPUT_TEMPLATES: [(DigitalInput, [(usize, u8); 2]); 4] = [
    (DigitalInput::SpdifCoax, [(22, 0), (28, 0)]),
    (DigitalInput::SpdifOptical, [(22, 1), (28, 0)]),
    (DigitalInput::Adat, [(22, 1), (28, 1)]),
    (DigitalInput::WordClock, [(22, 0), (28, 2)]),
];

const OUTPUT_TEMPLATES: [(DigitalOutput, [(usize, u8); 2]); 3] = [
    (DigitalOutput::Spdif, [(27, 0), (29, 0)]),
    (DigitalOutput::Adat, [(27, 0), (29, 1)]),
    (DigitalOutput::WordClock, [(27, 1), (29, 2)]),
];

fn match_template<T: Copy>(
    snapshot: &[u8],
    templates: &[(T, [(usize, u8); 2])],
) -> Result<T, UnrecognizedStatus> {
    let mut mismatches = Vec::new();
    'candidate: for (value, bytes) in templates {
        for (offset, expected) in bytes {
            if snapshot[*offset] != *expected {
                mismatches.push((*offset, snapshot[*offset]));
                continue 'candidate;
            }
        }
        return Ok(*value);
    }
    Err(UnrecognizedStatus { mismatches })
}

/// Decode one axis each from a full status snapshot. A template miss on one
/// axis is reported per-axis so the other axis can still be used.
pub fn decode_status(
    snapshot: &[u8],
) -> Result<
    (
        Result<DigitalInput, UnrecognizedStatus>,
        Result<DigitalOutput, UnrecognizedStatus>,
    ),
    CommandError,
> {
    if snapshot.len() < STATUS_LENGTH {
        return Err(CommandError::ShortStatus(snapshot.len()));
    }
    Ok((
        match_template(snapshot, &INPUT_TEMPLATES),
        match_template(snapshot, &OUTPUT_TEMPLATES),
    ))
}
