//! Command-line wrapper: `mergehex [-p PAGESIZE] OUTFILE INFILES...`.
//!
//! Inputs are merged in the order given; a page present in several inputs is taken
//! from the last one.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use mergehex::PageSize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "mergehex",
    version,
    about = "Merge multiple Intel HEX files page by page; later inputs overwrite earlier ones."
)]
pub struct Args {
    /// Page size in bytes, decimal or 0x-prefixed hex (e.g. 1024, 4096)
    #[arg(short, long = "pagesize", value_name = "BYTES", default_value_t = PageSize::default())]
    pub page_size: PageSize,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Output hex file
    pub outfile: PathBuf,

    /// Input hex files
    #[arg(required = true)]
    pub infiles: Vec<PathBuf>,
}

impl Args {
    fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.log_level());

    if !args.page_size.is_power_of_two() {
        tracing::warn!(
            page_size = args.page_size.get(),
            "page size is not a power of two"
        );
    }

    match mergehex::merge_files(&args.infiles, &args.outfile, args.page_size) {
        Ok(summary) => {
            tracing::debug!(?summary, "done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
