//! Emit the REST API's OpenAPI document as pretty-printed JSON.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use patternhub::ApiDoc;
use utoipa::OpenApi;

/// `openapi-dump` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "openapi-dump",
    about = "Write the OpenAPI document for the patternhub REST API",
    version
)]
struct CliArgs {
    /// Destination file. Writes to stdout when omitted.
    #[arg(long, short, value_name = "path")]
    output: Option<PathBuf>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let document = ApiDoc::openapi()
        .to_pretty_json()
        .wrap_err("serialise OpenAPI document")?;

    match args.output {
        Some(path) => std::fs::write(&path, document)
            .wrap_err_with(|| format!("write OpenAPI document to {}", path.display()))?,
        None => println!("{document}"),
    }
    Ok(())
}
