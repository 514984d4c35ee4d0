mod cli;

use anyhow::{bail, Context, Result};
use audiofuse_types::DeviceOption;
use audiofuse_usb::error::{CommandError, ConnectError};
use audiofuse_usb::open_audiofuse;
use clap::Parser;
use cli::Cli;
use log::info;
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

fn toggle_bit(on: bool, off: bool, name: &str) -> Result<Option<u8>> {
    match (on, off) {
        (true, true) => bail!("--{name}-on and --{name}-off cannot be combined"),
        (true, false) => Ok(Some(1)),
        (false, true) => Ok(Some(0)),
        (false, false) => Ok(None),
    }
}

fn main() -> Result<()> {
    let cli: Cli = Cli::parse();

    CombinedLogger::init(vec![TermLogger::new(
        if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        },
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )])
    .context("Could not configure the logger")?;

    // Sort out the toggle flags before going anywhere near the device.
    let toggles = [
        (
            DeviceOption::Phones2Source,
            toggle_bit(cli.toggles.phones2_on, cli.toggles.phones2_off, "phones2")?,
        ),
        (
            DeviceOption::Reamping,
            toggle_bit(cli.toggles.reamping_on, cli.toggles.reamping_off, "reamping")?,
        ),
        (
            DeviceOption::GroundLift,
            toggle_bit(
                cli.toggles.ground_lift_on,
                cli.toggles.ground_lift_off,
                "ground-lift",
            )?,
        ),
    ];

    let mut audiofuse = match open_audiofuse(cli.allow_restart) {
        Ok(audiofuse) => audiofuse,
        Err(ConnectError::DeviceNotFound) => bail!("No AudioFuse found."),
        Err(error) => return Err(error).context("Could not open the AudioFuse"),
    };

    // The original control centre applies the output before the input, keep
    // that order.
    if let Some(output) = cli.digital_out {
        match audiofuse.set_digital_out(output) {
            Err(CommandError::RestartRequired(_)) => info!(
                "Setting digital out to {output} requires a restart. Re-run with --allow-restart."
            ),
            result => result.context("Could not set the digital out")?,
        }
    }

    if let Some(input) = cli.digital_in {
        match audiofuse.set_digital_in(input) {
            Err(CommandError::RestartRequired(_)) => info!(
                "Setting digital in to {input} requires a restart. Re-run with --allow-restart."
            ),
            result => result.context("Could not set the digital in")?,
        }
    }

    for (option, bit) in toggles {
        if let Some(bit) = bit {
            audiofuse
                .set_option(option, bit)
                .with_context(|| format!("Could not set {option}"))?;
        }
    }

    Ok(())
}
