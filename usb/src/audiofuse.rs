use crate::commands::{
    option_register, INDEX_COMMIT, INDEX_PRIME, INDEX_RESTART, INDEX_ROUTING, INDEX_STATUS,
    PRIME_PAYLOAD, REQUEST_PRIME, REQUEST_SET, STATUS_LENGTH, VALUE_COMMIT_A, VALUE_COMMIT_B,
    VALUE_INPUT_AUX, VALUE_INPUT_SELECT, VALUE_INPUT_SUB_SELECT, VALUE_OUTPUT_SELECT, VALUE_PRIME,
};
use crate::device::base::ControlBus;
use crate::error::{CommandError, ConnectError};
use crate::routing::{
    input_restart_direction, input_selector, output_restart_direction, output_selector,
    RestartDirection,
};
use crate::status::decode_status;
use audiofuse_types::{DeviceOption, DigitalInput, DigitalOutput};
use log::{debug, info, warn};

/// A single open AudioFuse. Owns the bus and the last known routing state;
/// the state is only advanced once a full transfer sequence has gone
/// through, so a failed change leaves it at the previous value.
pub struct AudioFuse<B: ControlBus> {
    bus: B,
    input: DigitalInput,
    output: DigitalOutput,
    allow_restart: bool,
}

impl<B: ControlBus> AudioFuse<B> {
    pub fn new(bus: B, allow_restart: bool) -> Result<Self, ConnectError> {
        let mut audiofuse = Self {
            bus,
            input: DigitalInput::Unknown,
            output: DigitalOutput::Unknown,
            allow_restart,
        };
        audiofuse.refresh_status()?;
        info!(
            "AudioFuse digital I/O set to {} and {}",
            audiofuse.input, audiofuse.output
        );
        Ok(audiofuse)
    }

    pub fn digital_in(&self) -> DigitalInput {
        self.input
    }

    pub fn digital_out(&self) -> DigitalOutput {
        self.output
    }

    /// Re-read the status registers and decode the current routing. An axis
    /// whose bytes match no known template is left at Unknown.
    pub fn refresh_status(&mut self) -> Result<(), CommandError> {
        let snapshot = self
            .bus
            .read_class_control(REQUEST_SET, 0, INDEX_STATUS, STATUS_LENGTH)?;
        debug!("Status snapshot: {snapshot:02x?}");

        let (input, output) = decode_status(&snapshot)?;
        self.input = input.unwrap_or_else(|error| {
            warn!("Could not identify the digital input: {error}");
            DigitalInput::Unknown
        });
        self.output = output.unwrap_or_else(|error| {
            warn!("Could not identify the digital output: {error}");
            DigitalOutput::Unknown
        });
        Ok(())
    }

    pub fn set_digital_in(&mut self, target: DigitalInput) -> Result<(), CommandError> {
        if target == self.input {
            debug!("Digital in is already {target}, skipping");
            return Ok(());
        }

        let restart = input_restart_direction(self.input, target, self.output);
        if let Some(direction) = restart {
            if !self.allow_restart {
                return Err(CommandError::RestartRequired(direction));
            }
        }

        info!("Setting digital in to {target}");
        self.change_digital_in(target)?;
        if let Some(direction) = restart {
            // The device will not take the new clock source without having
            // the unchanged output written back first. Empirical.
            self.change_digital_out(self.output)?;
            self.restart(direction)?;
        }

        self.input = target;
        Ok(())
    }

    pub fn set_digital_out(&mut self, target: DigitalOutput) -> Result<(), CommandError> {
        if target == self.output {
            debug!("Digital out is already {target}, skipping");
            return Ok(());
        }

        let restart = output_restart_direction(self.output, target, self.input);
        if let Some(direction) = restart {
            if !self.allow_restart {
                return Err(CommandError::RestartRequired(direction));
            }
        }

        info!("Setting digital out to {target}");
        self.change_digital_out(target)?;
        if let Some(direction) = restart {
            self.change_digital_in(self.input)?;
            self.restart(direction)?;
        }

        self.output = target;
        Ok(())
    }

    /// Write one of the binary option registers. The device is the source of
    /// truth for these, nothing is read back or cached host-side.
    pub fn set_option(&mut self, option: DeviceOption, bit: u8) -> Result<(), CommandError> {
        if bit > 1 {
            return Err(CommandError::InvalidOptionValue(bit));
        }

        info!("Setting {option} to {bit}");
        self.bus
            .write_class_control(REQUEST_SET, option_register(option), INDEX_ROUTING, &[bit])?;
        Ok(())
    }

    fn change_digital_in(&mut self, target: DigitalInput) -> Result<(), CommandError> {
        let (data, data2) = input_selector(target)?;

        self.bus
            .write_class_control(REQUEST_SET, VALUE_INPUT_SELECT, INDEX_ROUTING, &[data])?;
        self.bus
            .write_class_control(REQUEST_SET, VALUE_INPUT_SUB_SELECT, INDEX_ROUTING, &[data2])?;
        self.bus
            .write_class_control(REQUEST_SET, VALUE_INPUT_AUX, INDEX_ROUTING, &[0])?;
        self.bus
            .write_class_control(REQUEST_SET, VALUE_COMMIT_A, INDEX_COMMIT, &[0, 0])?;
        self.bus
            .write_class_control(REQUEST_SET, VALUE_COMMIT_B, INDEX_COMMIT, &[0, 0])?;
        Ok(())
    }

    fn change_digital_out(&mut self, target: DigitalOutput) -> Result<(), CommandError> {
        let data = output_selector(target)?;
        self.bus
            .write_class_control(REQUEST_SET, VALUE_OUTPUT_SELECT, INDEX_ROUTING, &[data])?;
        Ok(())
    }

    fn restart(&mut self, direction: RestartDirection) -> Result<(), CommandError> {
        warn!("Restarting the AudioFuse ({direction})");
        if direction == RestartDirection::ToAdat {
            // Going towards ADAT clocking needs this priming write first,
            // the other direction does not. No idea why, but it works.
            self.bus
                .write_class_control(REQUEST_PRIME, VALUE_PRIME, INDEX_PRIME, &PRIME_PAYLOAD)?;
        }
        self.bus.write_class_control(
            REQUEST_SET,
            0,
            INDEX_RESTART,
            &[direction.command_data(), 0],
        )?;

        // The device drops off the bus and re-enumerates now, the recorded
        // kernel interfaces are gone with it.
        self.bus.forget_detached_interfaces();

        // TODO: Wait for the device to come back before allowing another
        // routing change, issuing one straight after the restart fails.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MockBus {
        transfers: Vec<(u8, u16, u16, Vec<u8>)>,
        status: Vec<u8>,
        fail_after: Option<usize>,
        forgot_interfaces: bool,
    }

    impl MockBus {
        fn with_status(bytes: &[(usize, u8)]) -> Self {
            let mut status = vec![0; STATUS_LENGTH];
            for (offset, value) in bytes {
                status[*offset] = *value;
            }
            Self {
                status,
                ..Self::default()
            }
        }
    }

    impl ControlBus for MockBus {
        fn write_class_control(
            &mut self,
            request: u8,
            value: u16,
            index: u16,
            data: &[u8],
        ) -> Result<(), rusb::Error> {
            if self.fail_after == Some(self.transfers.len()) {
                return Err(rusb::Error::Io);
            }
            self.transfers.push((request, value, index, data.to_vec()));
            Ok(())
        }

        fn read_class_control(
            &mut self,
            _request: u8,
            _value: u16,
            _index: u16,
            _length: usize,
        ) -> Result<Vec<u8>, rusb::Error> {
            Ok(self.status.clone())
        }

        fn forget_detached_interfaces(&mut self) {
            self.forgot_interfaces = true;
        }
    }

    // All zeroes decodes to SPDIF coax in, SPDIF out.
    fn coax_spdif(allow_restart: bool) -> AudioFuse<MockBus> {
        AudioFuse::new(MockBus::with_status(&[]), allow_restart).unwrap()
    }

    #[test]
    fn initial_status_is_decoded() {
        let audiofuse = AudioFuse::new(
            MockBus::with_status(&[(22, 1), (28, 1), (27, 0), (29, 1)]),
            false,
        )
        .unwrap();
        assert_eq!(audiofuse.digital_in(), DigitalInput::Adat);
        assert_eq!(audiofuse.digital_out(), DigitalOutput::Adat);
        assert!(audiofuse.bus.transfers.is_empty());
    }

    #[test]
    fn undecodable_axis_is_left_unknown() {
        let audiofuse = AudioFuse::new(MockBus::with_status(&[(22, 7), (29, 1)]), false).unwrap();
        assert_eq!(audiofuse.digital_in(), DigitalInput::Unknown);
        assert_eq!(audiofuse.digital_out(), DigitalOutput::Adat);
    }

    #[test]
    fn matching_target_issues_no_transfers() {
        let mut audiofuse = coax_spdif(false);
        audiofuse.set_digital_in(DigitalInput::SpdifCoax).unwrap();
        audiofuse.set_digital_out(DigitalOutput::Spdif).unwrap();
        assert!(audiofuse.bus.transfers.is_empty());
    }

    #[test]
    fn restart_needs_permission() {
        let mut audiofuse = coax_spdif(false);
        let result = audiofuse.set_digital_in(DigitalInput::Adat);
        assert!(matches!(
            result,
            Err(CommandError::RestartRequired(RestartDirection::ToAdat))
        ));
        assert!(audiofuse.bus.transfers.is_empty());
        assert_eq!(audiofuse.digital_in(), DigitalInput::SpdifCoax);
    }

    #[test]
    fn input_to_adat_runs_the_full_restart_sequence() {
        let mut audiofuse = coax_spdif(true);
        audiofuse.set_digital_in(DigitalInput::Adat).unwrap();

        let expected: Vec<(u8, u16, u16, Vec<u8>)> = vec![
            (0x03, 0x0005, 0x4600, vec![1]),
            (0x03, 0x0305, 0x4600, vec![1]),
            (0x03, 0x0c05, 0x4600, vec![0]),
            (0x03, 0x0300, 0x4c00, vec![0, 0]),
            (0x03, 0x0200, 0x4c00, vec![0, 0]),
            // Re-assert the unchanged output (SPDIF), then prime and restart.
            (0x03, 0x0105, 0x4600, vec![0]),
            (0x01, 0x0100, 0x2900, vec![0x00, 0x77, 0x01, 0x00]),
            (0x03, 0x0000, 0x5000, vec![2, 0]),
        ];
        assert_eq!(audiofuse.bus.transfers, expected);
        assert!(audiofuse.bus.forgot_interfaces);
        assert_eq!(audiofuse.digital_in(), DigitalInput::Adat);
    }

    #[test]
    fn leaving_adat_restarts_without_priming() {
        let mut audiofuse =
            AudioFuse::new(MockBus::with_status(&[(22, 1), (28, 1)]), true).unwrap();
        assert_eq!(audiofuse.digital_in(), DigitalInput::Adat);

        audiofuse.set_digital_in(DigitalInput::WordClock).unwrap();
        let restart = audiofuse.bus.transfers.last().unwrap();
        assert_eq!(restart, &(0x03, 0x0000, 0x5000, vec![1, 0]));
        assert!(!audiofuse
            .bus
            .transfers
            .iter()
            .any(|(request, ..)| *request == 0x01));
    }

    #[test]
    fn no_restart_when_output_is_already_adat() {
        let mut audiofuse = AudioFuse::new(
            MockBus::with_status(&[(22, 1), (28, 1), (27, 0), (29, 1)]),
            false,
        )
        .unwrap();

        // Input leaves ADAT, but the output keeps the ADAT clock alive.
        audiofuse.set_digital_in(DigitalInput::SpdifCoax).unwrap();
        assert_eq!(audiofuse.bus.transfers.len(), 5);
        assert_eq!(audiofuse.digital_in(), DigitalInput::SpdifCoax);
    }

    #[test]
    fn output_change_mirrors_the_input_machine() {
        let mut audiofuse = coax_spdif(true);
        audiofuse.set_digital_out(DigitalOutput::Adat).unwrap();

        let expected: Vec<(u8, u16, u16, Vec<u8>)> = vec![
            (0x03, 0x0105, 0x4600, vec![1]),
            // Re-assert the unchanged input (SPDIF coax).
            (0x03, 0x0005, 0x4600, vec![0]),
            (0x03, 0x0305, 0x4600, vec![0]),
            (0x03, 0x0c05, 0x4600, vec![0]),
            (0x03, 0x0300, 0x4c00, vec![0, 0]),
            (0x03, 0x0200, 0x4c00, vec![0, 0]),
            (0x01, 0x0100, 0x2900, vec![0x00, 0x77, 0x01, 0x00]),
            (0x03, 0x0000, 0x5000, vec![2, 0]),
        ];
        assert_eq!(audiofuse.bus.transfers, expected);
        assert_eq!(audiofuse.digital_out(), DigitalOutput::Adat);
    }

    #[test]
    fn plain_output_change_is_one_transfer() {
        let mut audiofuse = coax_spdif(false);
        audiofuse.set_digital_out(DigitalOutput::WordClock).unwrap();
        assert_eq!(
            audiofuse.bus.transfers,
            vec![(0x03, 0x0105, 0x4600, vec![2])]
        );
    }

    #[test]
    fn failed_sequence_leaves_state_unchanged() {
        let mut audiofuse = coax_spdif(false);
        audiofuse.bus.fail_after = Some(2);

        let result = audiofuse.set_digital_in(DigitalInput::SpdifOptical);
        assert!(matches!(result, Err(CommandError::UsbError(_))));
        assert_eq!(audiofuse.digital_in(), DigitalInput::SpdifCoax);
    }

    #[test]
    fn option_set_is_a_single_transfer() {
        let mut audiofuse = coax_spdif(false);
        audiofuse.set_option(DeviceOption::Reamping, 1).unwrap();
        assert_eq!(
            audiofuse.bus.transfers,
            vec![(0x03, 0x0b00, 0x4600, vec![1])]
        );

        audiofuse.set_option(DeviceOption::Phones2Source, 0).unwrap();
        assert_eq!(
            audiofuse.bus.transfers.last().unwrap(),
            &(0x03, 0x0a00, 0x4600, vec![0])
        );
    }

    #[test]
    fn option_bit_is_validated_before_any_transfer() {
        let mut audiofuse = coax_spdif(false);
        let result = audiofuse.set_option(DeviceOption::Reamping, 2);
        assert!(matches!(result, Err(CommandError::InvalidOptionValue(2))));
        assert!(audiofuse.bus.transfers.is_empty());
    }

    #[test]
    fn unknown_target_is_rejected_before_any_transfer() {
        let mut audiofuse = coax_spdif(true);
        let result = audiofuse.set_digital_in(DigitalInput::Unknown);
        assert!(matches!(result, Err(CommandError::UnroutableTarget(_))));
        assert!(audiofuse.bus.transfers.is_empty());
    }
}
