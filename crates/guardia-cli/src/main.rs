mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "guardia",
    version,
    about = "Pharmacy duty roster extraction for Segovia province schedule PDFs"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a duty roster PDF into per-location schedules
    Parse {
        /// Path to the schedule PDF
        input_file: PathBuf,

        /// Roster region: cuellar, el-espinar, segovia-capital or segovia-rural
        #[arg(short, long)]
        region: String,

        /// Originating URL of the PDF (improves year resolution)
        #[arg(short, long)]
        url: Option<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write parsed output to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// List known regions and the duty locations they feed
    Regions,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse {
            input_file,
            region,
            url,
            output,
            out,
        } => commands::parse::run(input_file, &region, url.as_deref(), &output, out),
        Commands::Regions => commands::regions::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
