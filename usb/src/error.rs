use crate::routing::RestartDirection;

#[derive(thiserror::Error, Debug)]
pub enum ConnectError {
    #[error("No AudioFuse device was found")]
    DeviceNotFound,

    #[error("AudioFuse is busy, is another program using it?")]
    DeviceBusy,

    #[error("Insufficient permission to talk to the AudioFuse")]
    InsufficientPermissions,

    #[error("Failed to read the initial status: {0}")]
    InitialStatus(#[from] CommandError),

    #[error("USB error: {0}")]
    UsbError(#[from] rusb::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum CommandError {
    #[error("Changing this setting restarts the AudioFuse ({0}), which was not permitted")]
    RestartRequired(RestartDirection),

    #[error("Option values are a single bit, got {0}")]
    InvalidOptionValue(u8),

    #[error("{0} is not a routable target")]
    UnroutableTarget(String),

    #[error("Short status response from the AudioFuse: {0} bytes")]
    ShortStatus(usize),

    #[error("USB error: {0}")]
    UsbError(#[from] rusb::Error),
}

/// No routing template matched one axis of a status snapshot. Carries the
/// bytes that were checked along the way, for protocol debugging.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("Unrecognised status bytes: {mismatches:?}")]
pub struct UnrecognizedStatus {
    pub mismatches: Vec<(usize, u8)>,
}
