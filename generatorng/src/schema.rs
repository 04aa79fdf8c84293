//! Reading, downloading and reformatting the schema file.

use std::fs;
use std::path::Path;
use std::time::Duration;

use generatorng_tl_parser::tl::Definition;
use generatorng_tl_parser::{format_json_schema, parse_json_schema, parse_tl_schema};

use crate::errors::RunError;

/// Dialect of the schema file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaFormat {
    Json,
    Text,
}

fn read(path: &Path) -> Result<Vec<u8>, RunError> {
    fs::read(path).map_err(|source| RunError::ReadSchema { path: path.to_owned(), source })
}

fn write(path: &Path, contents: &[u8]) -> Result<(), RunError> {
    fs::write(path, contents).map_err(|source| RunError::Write { path: path.to_owned(), source })
}

/// Reads and parses the whole schema. Any syntax error aborts.
pub fn read_schema(path: &Path, format: SchemaFormat) -> Result<Vec<Definition>, RunError> {
    let bytes = read(path)?;
    let defs = match format {
        SchemaFormat::Json => parse_json_schema(&bytes)?,
        SchemaFormat::Text => {
            let text = String::from_utf8_lossy(&bytes);
            parse_tl_schema(&text)?
        }
    };
    log::info!("[schema] {} definitions from {}", defs.len(), path.display());
    Ok(defs)
}

/// Rewrites a JSON schema with stable pretty formatting.
pub fn format_json(path: &Path) -> Result<(), RunError> {
    let formatted = format_json_schema(&read(path)?)?;
    write(path, formatted.as_bytes())?;
    log::info!("[schema] formatted {}", path.display());
    Ok(())
}

/// Downloads the JSON schema from `url` into `path`.
pub fn fetch_json(url: &str, path: &Path) -> Result<(), RunError> {
    log::info!("[schema] GET {url}");
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;
    let response = client.get(url).send()?;

    let status = response.status();
    if !status.is_success() {
        return Err(RunError::Server { url: url.to_owned(), status: status.as_u16() });
    }

    let body = response.bytes()?;
    write(path, &body)?;
    log::info!("[schema] {} bytes written to {}", body.len(), path.display());
    Ok(())
}
