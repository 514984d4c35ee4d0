use audiofuse_types::{DigitalInput, DigitalOutput};
use clap::{Args, Parser};

#[derive(Parser, Debug)]
#[clap(about, version, author)]
pub struct Cli {
    /// Print protocol level detail while running
    #[clap(short, long)]
    pub verbose: bool,

    /// Permit changes that restart the device, interrupting audio
    #[clap(short = 'r', long)]
    pub allow_restart: bool,

    /// Select the digital input source
    #[clap(long, visible_alias = "din", value_enum)]
    pub digital_in: Option<DigitalInput>,

    /// Select the digital output signal
    #[clap(long, visible_alias = "dout", value_enum)]
    pub digital_out: Option<DigitalOutput>,

    #[clap(flatten, next_help_heading = "Option toggles")]
    pub toggles: OptionToggles,
}

#[derive(Debug, Args)]
pub struct OptionToggles {
    /// Feed the second headphone output from its own source
    #[clap(long)]
    pub phones2_on: bool,

    #[clap(long)]
    pub phones2_off: bool,

    /// Route the instrument input through the reamping circuit
    #[clap(long)]
    pub reamping_on: bool,

    #[clap(long)]
    pub reamping_off: bool,

    /// Lift the ground on the speaker outputs
    #[clap(long)]
    pub ground_lift_on: bool,

    #[clap(long)]
    pub ground_lift_off: bool,
}
