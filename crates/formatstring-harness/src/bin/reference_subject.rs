//! A conformant subject backed by the reference engine.
//!
//! Reads `<format> <type> <literal>`, renders the value and writes the
//! result to stdout without a trailing newline. Renderings whose characters
//! all fit in one byte are written as Latin-1, matching how the harness
//! decodes subject output.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;

use formatstring_harness::canonical::expected_rendering;
use formatstring_reference::{SemanticType, parse_literal};

#[derive(Debug, Parser)]
#[command(name = "reference-subject")]
#[command(about = "Render one value with the reference formatting engine")]
struct Cli {
    /// Format string, e.g. `{:_>8}`.
    #[arg(allow_hyphen_values = true)]
    format: String,
    /// Semantic type tag, e.g. `std::int32_t`.
    #[arg(allow_hyphen_values = true)]
    type_tag: String,
    /// Literal value; raw bytes for character types.
    #[arg(allow_hyphen_values = true)]
    literal: OsString,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match render(&cli) {
        Ok(bytes) => {
            let mut stdout = std::io::stdout().lock();
            if stdout.write_all(&bytes).and_then(|()| stdout.flush()).is_err() {
                return ExitCode::from(1);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(1)
        }
    }
}

fn render(cli: &Cli) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let ty: SemanticType = cli.type_tag.parse()?;
    let value = parse_literal(ty, &literal_bytes(&cli.literal))?;
    let text = expected_rendering(&cli.format, &value)?;
    Ok(output_bytes(&text))
}

#[cfg(unix)]
fn literal_bytes(literal: &OsString) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    literal.as_bytes().to_vec()
}

#[cfg(not(unix))]
fn literal_bytes(literal: &OsString) -> Vec<u8> {
    literal.to_string_lossy().into_owned().into_bytes()
}

fn output_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)))
        .collect::<Result<Vec<u8>, _>>()
        .unwrap_or_else(|_| text.as_bytes().to_vec())
}
