//! Clap derive structures for the `smappee` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Also compiled by `build.rs` for man pages, so it depends on clap only.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// smappee -- query and control Smappee energy monitors
#[derive(Debug, Parser)]
#[command(
    name = "smappee",
    version,
    about = "Query and control Smappee energy monitors from the command line",
    long_about = "Reads consumption, events and service location data from the Smappee\n\
        cloud API, switches actuators, and talks to the monitor's local\n\
        gateway API on the LAN.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Account profile to use
    #[arg(long, short = 'p', env = "SMAPPEE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SMAPPEE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Service locations of the account
    #[command(alias = "loc", alias = "l")]
    Locations(LocationsArgs),

    /// Electricity, solar and sensor consumption
    #[command(alias = "cons", alias = "c")]
    Consumption(ConsumptionArgs),

    /// Appliance events
    Events(EventsArgs),

    /// Switch actuators (smart plugs)
    #[command(alias = "act")]
    Actuator(ActuatorArgs),

    /// Talk to the monitor's local gateway API
    Local(LocalArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

/// Query window shared by time-series commands.
///
/// Accepts epoch milliseconds, RFC 3339, `YYYY-MM-DD HH:MM[:SS]` (local
/// time) or a bare `YYYY-MM-DD`.
#[derive(Debug, Args)]
pub struct WindowArgs {
    /// Start of the window
    #[arg(long, short = 'f')]
    pub from: String,

    /// End of the window (default: now)
    #[arg(long, short = 't')]
    pub to: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LOCATIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LocationsArgs {
    #[command(subcommand)]
    pub command: LocationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum LocationsCommand {
    /// List service locations
    #[command(alias = "ls")]
    List,

    /// Show service location details (appliances, actuators, sensors)
    Info {
        /// Service location ID (default: profile's service_location)
        location: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONSUMPTION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConsumptionArgs {
    /// Service location ID (default: profile's service_location)
    #[arg(long, short = 'l')]
    pub location: Option<String>,

    /// Read a sensor (gas, water) instead of the electricity channel
    #[arg(long, short = 's')]
    pub sensor: Option<String>,

    #[command(flatten)]
    pub window: WindowArgs,

    /// Aggregation: 5min, hourly, daily, monthly, quarterly, or a raw code
    #[arg(long, short = 'a', default_value = "hourly")]
    pub aggregation: String,

    /// Show timestamps in the service location's timezone instead of UTC
    #[arg(long)]
    pub localize: bool,

    /// Print the API response unmodified instead of a table
    #[arg(long)]
    pub raw: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  EVENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct EventsArgs {
    /// Service location ID (default: profile's service_location)
    #[arg(long, short = 'l')]
    pub location: Option<String>,

    /// Appliance ID
    #[arg(long)]
    pub appliance: String,

    #[command(flatten)]
    pub window: WindowArgs,

    /// Maximum number of events to return
    #[arg(long, short = 'n')]
    pub max: Option<u32>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ACTUATOR
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ActuatorArgs {
    #[command(subcommand)]
    pub command: ActuatorCommand,
}

#[derive(Debug, Subcommand)]
pub enum ActuatorCommand {
    /// Turn an actuator on
    On(ActuatorSwitchArgs),

    /// Turn an actuator off
    Off(ActuatorSwitchArgs),
}

#[derive(Debug, Args)]
pub struct ActuatorSwitchArgs {
    /// Actuator ID
    pub actuator: String,

    /// Service location ID (default: profile's service_location)
    #[arg(long, short = 'l')]
    pub location: Option<String>,

    /// Seconds to hold the state (300, 900, 1800 or 3600; others mean indefinitely)
    #[arg(long, short = 'd')]
    pub duration: Option<u32>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LOCAL GATEWAY
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LocalArgs {
    /// Gateway host (default: profile's gateway)
    #[arg(long, short = 'H', env = "SMAPPEE_GATEWAY")]
    pub host: Option<String>,

    #[command(subcommand)]
    pub command: LocalCommand,
}

#[derive(Debug, Subcommand)]
pub enum LocalCommand {
    /// Live per-phase readings
    #[command(alias = "inst")]
    Instantaneous,

    /// Human-readable instantaneous report
    Report,

    /// Total active power in kW
    Power,

    /// Mean power factor over all phases
    Cosfi,

    /// Show the gateway configuration
    Config {
        /// Load the advanced configuration page instead
        #[arg(long)]
        advanced: bool,
    },

    /// Send a raw configuration command string
    SaveConfig {
        /// Command string, sent verbatim
        payload: String,
    },

    /// Command control (comfort plugs, switch groups)
    #[command(alias = "cc")]
    CommandControl(CommandControlArgs),

    /// List logfiles, or show one
    Logs {
        /// Logfile name from the list
        name: Option<String>,
    },

    /// Restart the monitor
    Restart,

    /// Reset or clear gateway state
    Reset {
        /// What to reset
        target: ResetTarget,
    },
}

#[derive(Debug, Args)]
pub struct CommandControlArgs {
    #[command(subcommand)]
    pub command: CommandControlCommand,
}

#[derive(Debug, Subcommand)]
pub enum CommandControlCommand {
    /// Show the command control configuration
    Show,

    /// Send the control group
    Group,

    /// Toggle a command control
    Toggle { id: String },

    /// Delete a command control
    Delete { id: String },

    /// Delete all timers of a command control
    DeleteTimers { id: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ResetTarget {
    /// Active power peak values
    Peaks,
    /// IP scan cache
    IpScanCache,
    /// Sensor cache
    SensorCache,
    /// All recorded data
    Data,
    /// Learned appliances
    Appliances,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a configuration value on the active profile
    Set {
        /// Config key (e.g., "client_id", "gateway", "service_location")
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a secret in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,

        /// Which secret to store
        #[arg(long, default_value = "password")]
        secret: SecretArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SecretArg {
    /// Smappee account password
    Password,
    /// OAuth2 client secret
    ClientSecret,
    /// Pre-issued access token
    AccessToken,
    /// Local gateway password
    GatewayPassword,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
