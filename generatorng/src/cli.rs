use std::path::{Path, PathBuf};

use clap::Parser;

use crate::errors::RunError;

/// Where `--fetch-json` downloads the schema from unless `--url` says otherwise.
pub const SCHEMA_URL: &str = "https://core.telegram.org/schema/json";

#[derive(Debug, Parser)]
#[command(
    name = "generatorng",
    version,
    about = "Generates Telegram API C++ sources from a TL schema and patches them into marked regions"
)]
pub struct Cli {
    /// Schema file: read by the generate actions, written by --fetch-json and --format-json
    pub schema: PathBuf,

    /// Generate from a JSON schema
    #[arg(long)]
    pub generate_from_json: bool,

    /// Generate from a TL text schema
    #[arg(long)]
    pub generate_from_text: bool,

    /// Download the JSON schema into the schema path
    #[arg(long)]
    pub fetch_json: bool,

    /// Pretty-print the JSON schema in place
    #[arg(long)]
    pub format_json: bool,

    /// Source for --fetch-json
    #[arg(long, default_value = SCHEMA_URL)]
    pub url: String,

    /// Compute and report changes without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// Print every generated section to stdout
    #[arg(long)]
    pub dump: bool,

    /// Emit schema lines as comments above constants, structs and stubs
    #[arg(long)]
    pub add_spec_sources: bool,

    /// Directory holding the target files
    #[arg(short = 'I', long, default_value = ".")]
    pub input_dir: PathBuf,

    /// Directory the patched files are written to [default: the input dir]
    #[arg(short = 'O', long)]
    pub output_dir: Option<PathBuf>,
}

/// What a run does. Exactly one per invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    GenerateFromJson,
    GenerateFromText,
    FetchJson,
    FormatJson,
}

impl Cli {
    pub fn action(&self) -> Result<Action, RunError> {
        let chosen: Vec<Action> = [
            (self.generate_from_json, Action::GenerateFromJson),
            (self.generate_from_text, Action::GenerateFromText),
            (self.fetch_json, Action::FetchJson),
            (self.format_json, Action::FormatJson),
        ]
        .into_iter()
        .filter_map(|(on, action)| on.then_some(action))
        .collect();

        match chosen.as_slice() {
            [action] => Ok(*action),
            _ => Err(RunError::InvalidAction { given: chosen.len() }),
        }
    }

    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(&self.input_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("generatorng").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn single_action() {
        let cli = parse(&["scheme.tl", "--generate-from-text", "-I", "src"]);
        assert_eq!(cli.action().unwrap(), Action::GenerateFromText);
        assert_eq!(cli.output_dir(), Path::new("src"));
    }

    #[test]
    fn action_count_is_checked() {
        assert!(matches!(
            parse(&["s.json"]).action(),
            Err(RunError::InvalidAction { given: 0 })
        ));
        assert!(matches!(
            parse(&["s.json", "--fetch-json", "--format-json"]).action(),
            Err(RunError::InvalidAction { given: 2 })
        ));
    }

    #[test]
    fn defaults() {
        let cli = parse(&["s.json", "--fetch-json", "-O", "out"]);
        assert_eq!(cli.url, SCHEMA_URL);
        assert_eq!(cli.input_dir, PathBuf::from("."));
        assert_eq!(cli.output_dir(), Path::new("out"));
        assert!(!cli.dry_run);
    }

    #[test]
    fn schema_is_required() {
        assert!(Cli::try_parse_from(["generatorng", "--generate-from-json"]).is_err());
    }
}
