//! generatorng: regenerates the Telegram API parts of a C++ client tree.
//!
//! # What this does
//!
//! 1. Reads a TL schema (`--generate-from-text`) or its JSON dump
//!    (`--generate-from-json`)
//! 2. Reads the current generated regions of the target files in `-I`
//! 3. Generates enums, structs, stream operators, debug printers, RPC stubs
//!    and dispatch, keeping hand-written RPC handler bodies
//! 4. Writes every file whose text changed into `-O`
//!
//! `--fetch-json` downloads the schema and `--format-json` pretty-prints it.
//!
//! # Run
//! ```text
//! generatorng scheme.tl --generate-from-text -I src/TelegramQt
//! ```

use std::process;

use clap::Parser;
use generatorng_tl_gen::{Config, generate};

mod cli;
mod errors;
mod patcher;
mod schema;

use cli::{Action, Cli};
use errors::{ExitCode, RunError};
use patcher::Targets;
use schema::SchemaFormat;

fn main() -> process::ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too.
            let _ = e.print();
            let code = if e.use_stderr() { ExitCode::InvalidArgument } else { ExitCode::NoError };
            return code.into();
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::NoError.into(),
        Err(e) => {
            eprintln!("✗ {e}");
            e.exit_code().into()
        }
    }
}

fn run(cli: &Cli) -> Result<(), RunError> {
    match cli.action()? {
        Action::GenerateFromJson => generate_files(cli, SchemaFormat::Json),
        Action::GenerateFromText => generate_files(cli, SchemaFormat::Text),
        Action::FetchJson => schema::fetch_json(&cli.url, &cli.schema),
        Action::FormatJson => schema::format_json(&cli.schema),
    }
}

fn generate_files(cli: &Cli, format: SchemaFormat) -> Result<(), RunError> {
    let defs = schema::read_schema(&cli.schema, format)?;
    let targets = Targets::load(&cli.input_dir);

    let config = Config { add_spec_sources: cli.add_spec_sources, ..Config::default() };
    let generated = generate(&defs, &config, &targets.prior)?;
    if cli.dump {
        patcher::dump(&generated);
    }

    let summary = targets.apply(&generated, cli.output_dir(), cli.dry_run)?;
    log::info!(
        "[patch] {} files {}, {} unchanged",
        summary.written,
        if cli.dry_run { "would change" } else { "written" },
        summary.unchanged
    );
    Ok(())
}
