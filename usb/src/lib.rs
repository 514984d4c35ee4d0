pub use rusb;
pub mod audiofuse;
pub mod commands;
pub mod error;
pub mod routing;
pub mod status;

mod device;

pub use device::libusb::AudioFuseUSB;
pub use device::open_audiofuse;

pub const VID_ARTURIA: u16 = 0x1c75;
pub const PID_AUDIOFUSE: u16 = 0xaf02;
