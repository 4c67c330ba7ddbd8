use crate::writers::ChartFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "queimadas-report")]
#[command(about = "Fire occurrence reports from INPE wildfire detections")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Hide progress spinners")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        help = "Settings file [default: queimadas.toml if present]"
    )]
    pub config: Option<PathBuf>,
}

/// Where municipality names come from
#[derive(Args, Debug, Clone, Default)]
pub struct DirectoryArgs {
    #[arg(
        long,
        conflicts_with = "skip_directory",
        help = "Read the municipality directory from a JSON file instead of the service"
    )]
    pub directory_file: Option<PathBuf>,

    #[arg(long, help = "Do not resolve municipality names")]
    pub skip_directory: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load, enrich and aggregate fire records, then render every chart
    Report {
        #[arg(short, long, help = "Input CSV file with fire detections")]
        input: PathBuf,

        #[arg(
            short,
            long,
            help = "Output directory for charts [default: output/queimadas-{YYMMDD}]"
        )]
        output_dir: Option<PathBuf>,

        #[arg(short, long, value_enum)]
        format: Option<ChartFormat>,

        #[arg(short = 'n', long, help = "Entries kept in each ranking")]
        top_n: Option<usize>,

        #[command(flatten)]
        directory: DirectoryArgs,

        #[arg(long, help = "GeoJSON outline drawn under the maps")]
        boundary: Option<PathBuf>,

        #[arg(long, help = "Hexbin cell size in degrees")]
        hex_size: Option<f64>,
    },

    /// Print statistics and rankings without rendering charts
    Summary {
        #[arg(short, long, help = "Input CSV file with fire detections")]
        input: PathBuf,

        #[arg(short = 'n', long, help = "Entries kept in each ranking")]
        top_n: Option<usize>,

        #[command(flatten)]
        directory: DirectoryArgs,
    },

    /// Load the input file and report skipped rows
    Validate {
        #[arg(short, long, help = "Input CSV file with fire detections")]
        input: PathBuf,
    },
}
