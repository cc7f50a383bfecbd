//! Standalone viewer for the staged V8 assembly.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use motorviz::{Options, Viewer};

/// Open a window showing the staged engine assembly.
#[derive(Debug, Parser)]
#[command(name = "motorviz", version, about)]
struct Args {
    /// Stage shown on first mount (0 = exploded). Out-of-range values are
    /// clamped.
    #[arg(long, default_value_t = 0)]
    stage: usize,

    /// TOML options preset. Missing sections use defaults.
    #[arg(long, value_name = "TOML")]
    options: Option<PathBuf>,

    /// Print the options JSON Schema and exit.
    #[arg(long)]
    print_schema: bool,
}

#[allow(clippy::print_stdout)]
fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    if args.print_schema {
        return match serde_json::to_string_pretty(&Options::json_schema()) {
            Ok(schema) => {
                println!("{schema}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("failed to serialize schema: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let options = match args.options.as_deref().map(Options::load) {
        Some(Ok(options)) => options,
        Some(Err(e)) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
        None => Options::default(),
    };

    let viewer = Viewer::builder()
        .with_stage(args.stage)
        .with_options(options)
        .build();
    match viewer.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
