use clap::Parser;
use weather_reporter::cli::{run, Cli};
use weather_reporter::error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
