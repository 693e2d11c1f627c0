//! CLI argument definitions for `choro`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use choro_cli::rows::{parse_bin_row, parse_delimiter, parse_edit_arg, parse_exact_row};
use choro_model::{BinRowDraft, ExactRowDraft};

#[derive(Parser)]
#[command(
    name = "choro",
    version,
    about = "Choropleth maps - join values onto regions and color them",
    long_about = "Join a numeric column of a CSV table onto the regions of a GeoJSON layer,\n\
                  classify each value into a color with a saved scheme, and print or\n\
                  export the styled map."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the attribute columns of a region layer and an attribute table.
    Columns(ColumnsArgs),

    /// Join values onto regions and print the color of each region.
    Classify(ClassifyArgs),

    /// Join, classify, and write the map as styled GeoJSON.
    Export(ExportArgs),

    /// Create or inspect classification schemes.
    #[command(subcommand)]
    Scheme(SchemeCommand),
}

#[derive(Parser)]
pub struct ColumnsArgs {
    /// GeoJSON region layer.
    #[arg(value_name = "GEO")]
    pub geo: PathBuf,

    /// Attribute table to list alongside the layer.
    #[arg(long = "csv", value_name = "CSV")]
    pub csv: Option<PathBuf>,

    /// CSV field delimiter (a single character, or `tab`).
    #[arg(long = "delimiter", default_value = ",", value_parser = parse_delimiter)]
    pub delimiter: u8,
}

/// Inputs shared by `classify` and `export`.
#[derive(Args)]
pub struct MapArgs {
    /// GeoJSON region layer.
    #[arg(long = "geo", value_name = "PATH")]
    pub geo: PathBuf,

    /// Attribute table with the values to map.
    #[arg(long = "csv", value_name = "PATH")]
    pub csv: PathBuf,

    /// Classification scheme (JSON).
    #[arg(long = "scheme", value_name = "PATH")]
    pub scheme: PathBuf,

    /// Region attribute to join on (default: the layer's first attribute).
    #[arg(long = "key-geo", value_name = "COLUMN")]
    pub key_geo: Option<String>,

    /// CSV key column (default: inferred).
    #[arg(long = "key-csv", value_name = "COLUMN")]
    pub key_csv: Option<String>,

    /// CSV value column (default: inferred).
    #[arg(long = "value", value_name = "COLUMN")]
    pub value: Option<String>,

    /// Override a joined value after the join; an empty VALUE clears it.
    #[arg(long = "edit", value_name = "KEY=VALUE", value_parser = parse_edit_arg)]
    pub edits: Vec<(String, String)>,

    /// Keep source coordinates instead of projecting to EPSG:3995.
    #[arg(long = "no-reproject")]
    pub no_reproject: bool,

    /// CSV field delimiter (a single character, or `tab`).
    #[arg(long = "delimiter", default_value = ",", value_parser = parse_delimiter)]
    pub delimiter: u8,
}

#[derive(Parser)]
pub struct ClassifyArgs {
    #[command(flatten)]
    pub map: MapArgs,

    /// Output format for the classified regions.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: ClassifyFormatArg,
}

#[derive(Parser)]
pub struct ExportArgs {
    #[command(flatten)]
    pub map: MapArgs,

    /// Destination GeoJSON file.
    #[arg(long = "output", value_name = "PATH")]
    pub output: PathBuf,
}

#[derive(Subcommand)]
pub enum SchemeCommand {
    /// Build a scheme from rule rows and save it.
    New(SchemeNewArgs),

    /// Print a saved scheme and its legend.
    Show(SchemeShowArgs),
}

#[derive(Parser)]
pub struct SchemeNewArgs {
    /// Which rule list classifies values.
    #[arg(long = "mode", value_enum, default_value = "bins")]
    pub mode: ModeArg,

    /// A value range and its color. Repeat in priority order.
    #[arg(long = "bin", value_name = "LOWER,UPPER,COLOR", value_parser = parse_bin_row)]
    pub bins: Vec<BinRowDraft>,

    /// An exact value and its color. Repeat in priority order.
    #[arg(long = "exact", value_name = "VALUE,COLOR", value_parser = parse_exact_row)]
    pub exact_values: Vec<ExactRowDraft>,

    /// Fill for regions without a value (default #D3D3D3).
    #[arg(long = "no-data-color", value_name = "COLOR")]
    pub no_data_color: Option<String>,

    /// Region outline color (default #444444).
    #[arg(long = "edge-color", value_name = "COLOR")]
    pub edge_color: Option<String>,

    /// Region outline width (default 0.4).
    #[arg(long = "edge-width", value_name = "WIDTH")]
    pub edge_width: Option<f64>,

    /// Where to write the scheme.
    #[arg(long = "output", value_name = "PATH")]
    pub output: PathBuf,
}

#[derive(Parser)]
pub struct SchemeShowArgs {
    /// Scheme file to print.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Bins,
    Exact,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ClassifyFormatArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
