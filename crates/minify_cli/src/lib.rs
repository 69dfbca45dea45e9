use std::fs;
use std::io::{self, Read, Write};

use tracing::info;

use house::{convert, ConvertOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    Path(String),
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: InputSource,
    pub pretty: bool,
    pub prefer_tag_identity: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            input: InputSource::Stdin,
            pretty: true,
            prefer_tag_identity: true,
        }
    }
}

/// Convert one document. The serialized output is the only thing written
/// to `stdout`; line-count diagnostics go to the tracing subscriber, which
/// the binary points at stderr.
pub fn run<W: Write>(options: &RunOptions, stdout: &mut W) -> Result<(), String> {
    let input = read_input(&options.input)?;
    let outcome = convert(
        &input,
        &ConvertOptions {
            pretty: options.pretty,
            prefer_tag_identity: options.prefer_tag_identity,
        },
    )
    .map_err(|error| error.to_string())?;

    info!(
        input_lines = outcome.input_line_count,
        output_lines = outcome.output_line_count,
        "document_converted"
    );
    writeln!(stdout, "{}", outcome.output)
        .map_err(|error| format!("failed to write output: {error}"))?;
    Ok(())
}

fn read_input(source: &InputSource) -> Result<String, String> {
    match source {
        InputSource::Stdin => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|error| format!("failed to read standard input: {error}"))?;
            Ok(buffer)
        }
        InputSource::Path(path) => {
            fs::read_to_string(path).map_err(|error| format!("failed to read {path}: {error}"))
        }
    }
}
