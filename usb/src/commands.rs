use audiofuse_types::DeviceOption;

// Everything below was captured from USB traces of the official control
// centre; the device documentation describes none of it.

/// bRequest used by almost every control transfer the device understands.
pub const REQUEST_SET: u8 = 0x03;
/// bRequest of the restart priming transfer.
pub const REQUEST_PRIME: u8 = 0x01;

/// wIndex of the routing / option register block.
pub const INDEX_ROUTING: u16 = 0x4600;
/// wIndex of the commit block written at the tail of an input change.
pub const INDEX_COMMIT: u16 = 0x4c00;
/// wIndex of the status snapshot register.
pub const INDEX_STATUS: u16 = 0x4700;
/// wIndex of the restart command register.
pub const INDEX_RESTART: u16 = 0x5000;
/// wIndex of the restart priming register.
pub const INDEX_PRIME: u16 = 0x2900;

/// wValue of the primary input selector.
pub const VALUE_INPUT_SELECT: u16 = 0x0005;
/// wValue of the input sub-selector (coax vs optical, optical vs adat).
pub const VALUE_INPUT_SUB_SELECT: u16 = 0x0305;
/// wValue of the third input register; always written as zero.
pub const VALUE_INPUT_AUX: u16 = 0x0c05;
/// wValue of the output selector.
pub const VALUE_OUTPUT_SELECT: u16 = 0x0105;
/// wValues of the two commit writes that close an input change.
pub const VALUE_COMMIT_A: u16 = 0x0300;
pub const VALUE_COMMIT_B: u16 = 0x0200;
/// wValue of the restart priming transfer.
pub const VALUE_PRIME: u16 = 0x0100;

/// Payload of the restart priming transfer. Only needed when restarting
/// towards ADAT clocking; meaning unknown.
pub const PRIME_PAYLOAD: [u8; 4] = [0x00, 0x77, 0x01, 0x00];

/// Length of a full status snapshot.
pub const STATUS_LENGTH: usize = 178;

/// wValue code of a binary option register.
pub fn option_register(option: DeviceOption) -> u16 {
    match option {
        DeviceOption::Phones2Source => 0x0a00,
        DeviceOption::Reamping => 0x0b00,
        DeviceOption::GroundLift => 0x0c00,
    }
}
