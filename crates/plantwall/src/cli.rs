//! Clap derive structures for the `plantwall` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// plantwall -- monitor and control a vertical plant wall
#[derive(Debug, Parser)]
#[command(
    name = "plantwall",
    version,
    about = "Monitor and control a plant wall from the command line",
    long_about = "Reads system status, sensors, lighting and watering from the plant-wall\n\
        backend, and drives the lighting and irrigation controls.\n\n\
        Writes are acknowledged by the backend and then re-fetched, so the\n\
        state printed after a change is what the wall actually reports.",
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
    /// Backend profile to use
    #[arg(long, short = 'p', env = "PLANTWALL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile and environment)
    #[arg(long, short = 'b', env = "PLANTWALL_BACKEND", global = true)]
    pub backend: Option<String>,

    /// Deployment environment used to pick the default backend URL
    #[arg(long = "env", short = 'e', env = "PLANTWALL_ENV", global = true)]
    pub environment: Option<EnvironmentArg>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PLANTWALL_OUTPUT",
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

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "PLANTWALL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
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

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EnvironmentArg {
    /// Backend reachable as `backend:5000`
    Production,
    /// Backend on `localhost:5000`
    Development,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the whole-wall system status
    #[command(alias = "st")]
    Status(StatusArgs),

    /// Show raw sensor readings
    Sensors,

    /// Check backend health
    Health,

    /// Show and control the grow lights
    #[command(alias = "light")]
    Lighting(LightingArgs),

    /// Show and control irrigation
    #[command(alias = "water")]
    Watering(WateringArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Status ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Keep polling and print every change until interrupted
    #[arg(long, short = 'w')]
    pub watch: bool,
}

// ── Lighting ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LightingArgs {
    #[command(subcommand)]
    pub command: LightingCommand,
}

#[derive(Debug, Subcommand)]
pub enum LightingCommand {
    /// Show current lighting state
    Show,

    /// Set brightness in percent
    Brightness {
        /// Brightness (0-100)
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        value: u8,
    },

    /// Switch the lights on
    On,

    /// Switch the lights off
    Off,

    /// Flip the lights relative to their current state
    Toggle,

    /// Update the daily on/off schedule
    Schedule(LightingScheduleArgs),
}

#[derive(Debug, Args)]
pub struct LightingScheduleArgs {
    /// Switch-on time (HH:MM)
    #[arg(long = "on")]
    pub on_time: Option<String>,

    /// Switch-off time (HH:MM)
    #[arg(long = "off")]
    pub off_time: Option<String>,

    /// Brightness to apply with the schedule (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub brightness: Option<u8>,

    /// Enable the schedule
    #[arg(long, conflicts_with = "disable")]
    pub enable: bool,

    /// Disable the schedule
    #[arg(long)]
    pub disable: bool,
}

// ── Watering ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WateringArgs {
    #[command(subcommand)]
    pub command: WateringCommand,
}

#[derive(Debug, Subcommand)]
pub enum WateringCommand {
    /// Show current irrigation state
    Show,

    /// Start a manual watering run
    Start {
        /// Run length in seconds (10-300)
        #[arg(
            long,
            short = 'd',
            default_value = "30",
            value_parser = clap::value_parser!(u16).range(10..=300)
        )]
        duration: u16,
    },

    /// Turn automatic watering on or off
    Auto {
        #[arg(value_enum)]
        state: Switch,
    },

    /// Update the automatic watering schedule
    Schedule(WateringScheduleArgs),
}

#[derive(Debug, Args)]
pub struct WateringScheduleArgs {
    /// Hours between runs (1-168)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..=168))]
    pub interval: Option<u16>,

    /// Run length in seconds (10-300)
    #[arg(long, short = 'd', value_parser = clap::value_parser!(u16).range(10..=300))]
    pub duration: Option<u16>,
}

// ── Config ───────────────────────────────────────────────────────────

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

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
