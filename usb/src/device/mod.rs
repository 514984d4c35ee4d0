use crate::audiofuse::AudioFuse;
use crate::device::libusb::AudioFuseUSB;
use crate::error::ConnectError;

pub mod base;
pub mod libusb;

/// Open the first attached AudioFuse and read its current routing.
pub fn open_audiofuse(allow_restart: bool) -> Result<AudioFuse<AudioFuseUSB>, ConnectError> {
    let bus = AudioFuseUSB::open()?;
    AudioFuse::new(bus, allow_restart)
}
