/// The transport the driver runs on. One implementor is backed by libusb,
/// tests inject a recording fake.
///
/// All device registers sit behind class-typed, interface-recipient control
/// transfers, so that is the whole surface.
pub trait ControlBus {
    fn write_class_control(
        &mut self,
        request: u8,
        value: u16,
        index: u16,
        data: &[u8],
    ) -> Result<(), rusb::Error>;

    fn read_class_control(
        &mut self,
        request: u8,
        value: u16,
        index: u16,
        length: usize,
    ) -> Result<Vec<u8>, rusb::Error>;

    /// Drop any kernel-driver reattach bookkeeping. The device re-enumerates
    /// during a restart, so recorded interface numbers no longer apply and
    /// must not be reattached on teardown.
    fn forget_detached_interfaces(&mut self);
}
