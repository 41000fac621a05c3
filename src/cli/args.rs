use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "weather-reporter")]
#[command(about = "Weather observation analytics and multi-format reporting")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short,
        long,
        global = true,
        default_value = "config/config.yaml",
        help = "Path to the YAML configuration file"
    )]
    pub config: PathBuf,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze the latest processed dataset and render charts
    Analyze,

    /// Export the latest processed dataset to a single sink format
    Load {
        #[arg(short, long, value_enum, default_value = "json")]
        format: SinkFormat,

        #[arg(
            long,
            help = "SQLite database path [default: <output_dir>/weather_data.db]"
        )]
        db_path: Option<PathBuf>,

        #[arg(long, default_value = "false", help = "Skip the per-city summary CSV")]
        no_summary: bool,
    },

    /// Run the full pipeline: analysis followed by all three sinks
    Run {
        #[arg(long, default_value = "false")]
        skip_analyze: bool,

        #[arg(long, default_value = "false")]
        skip_load: bool,

        #[arg(
            long,
            default_value = "false",
            help = "Print the Prometheus metrics exposition after the run"
        )]
        show_metrics: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SinkFormat {
    Json,
    Sqlite,
    Csv,
}
