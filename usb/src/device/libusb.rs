use crate::device::base::ControlBus;
use crate::error::ConnectError;
use crate::{PID_AUDIOFUSE, VID_ARTURIA};
use log::{debug, error, info, warn};
use rusb::{Device, DeviceHandle, Direction, GlobalContext, Recipient, RequestType};
use std::time::Duration;

/// libusb-backed transport. Owns the device handle for its lifetime and
/// puts the kernel driver back the way it found it on drop.
pub struct AudioFuseUSB {
    handle: DeviceHandle<GlobalContext>,
    timeout: Duration,
    reattach_interfaces: Vec<u8>,
}

fn find_device() -> Result<Device<GlobalContext>, ConnectError> {
    for device in rusb::devices()?.iter() {
        if let Ok(descriptor) = device.device_descriptor() {
            if descriptor.vendor_id() == VID_ARTURIA && descriptor.product_id() == PID_AUDIOFUSE {
                return Ok(device);
            }
        }
    }
    Err(ConnectError::DeviceNotFound)
}

impl AudioFuseUSB {
    pub fn open() -> Result<Self, ConnectError> {
        let device = find_device()?;
        info!(
            "Found an AudioFuse on bus {}, address {}",
            device.bus_number(),
            device.address()
        );

        let handle = device.open().map_err(|error| match error {
            rusb::Error::Access => ConnectError::InsufficientPermissions,
            rusb::Error::Busy => ConnectError::DeviceBusy,
            error => ConnectError::UsbError(error),
        })?;

        let mut bus = Self {
            handle,
            timeout: Duration::from_secs(1),
            reattach_interfaces: Vec::new(),
        };

        // The AudioFuse only has one configuration.
        let config = device.config_descriptor(0)?;
        for interface in 0..config.num_interfaces() {
            if bus.handle.kernel_driver_active(interface)? {
                debug!("Detaching kernel driver from interface {interface}");
                bus.handle.detach_kernel_driver(interface)?;
                bus.reattach_interfaces.push(interface);
            }
        }
        bus.handle.set_active_configuration(config.number())?;

        Ok(bus)
    }
}

impl ControlBus for AudioFuseUSB {
    fn write_class_control(
        &mut self,
        request: u8,
        value: u16,
        index: u16,
        data: &[u8],
    ) -> Result<(), rusb::Error> {
        self.handle.write_control(
            rusb::request_type(Direction::Out, RequestType::Class, Recipient::Interface),
            request,
            value,
            index,
            data,
            self.timeout,
        )?;

        Ok(())
    }

    fn read_class_control(
        &mut self,
        request: u8,
        value: u16,
        index: u16,
        length: usize,
    ) -> Result<Vec<u8>, rusb::Error> {
        let mut buf = vec![0; length];
        let response_length = self.handle.read_control(
            rusb::request_type(Direction::In, RequestType::Class, Recipient::Interface),
            request,
            value,
            index,
            &mut buf,
            self.timeout,
        )?;
        buf.truncate(response_length);
        Ok(buf)
    }

    fn forget_detached_interfaces(&mut self) {
        self.reattach_interfaces.clear();
    }
}

impl Drop for AudioFuseUSB {
    fn drop(&mut self) {
        for interface in self.reattach_interfaces.drain(..) {
            debug!("Reattaching kernel driver to interface {interface}");
            match self.handle.attach_kernel_driver(interface) {
                Ok(()) => {}
                // Both show up when the device went away or is still settling,
                // cleanup is best effort at this point.
                Err(rusb::Error::Busy) | Err(rusb::Error::NoDevice) => {
                    warn!("Could not reattach kernel driver to interface {interface}");
                }
                Err(error) => {
                    error!("Failed to reattach kernel driver to interface {interface}: {error}");
                }
            }
        }
    }
}
