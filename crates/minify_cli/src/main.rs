use std::env;
use std::io;
use std::process::ExitCode;

use minify_cli::{run, InputSource, RunOptions};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::from(1)
        }
    }
}

fn run_cli() -> Result<(), String> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    let mut options = RunOptions::default();
    let mut input: Option<String> = None;

    for arg in &args {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            "--compact" => options.pretty = false,
            "--generic-tags" => options.prefer_tag_identity = false,
            other if other.starts_with('-') && other != "-" => {
                return Err(format!("unknown option '{other}'\n\n{}", usage_text()))
            }
            other => {
                if input.is_some() {
                    return Err("at most one input file may be given".to_string());
                }
                input = Some(other.to_string());
            }
        }
    }

    if let Some(path) = input {
        if path != "-" {
            options.input = InputSource::Path(path);
        }
    }

    run(&options, &mut io::stdout())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn print_usage() {
    println!("{}", usage_text());
}

fn usage_text() -> String {
    [
        "minify_cli - normalizing round-trip converter for house documents",
        "",
        "Usage:",
        "  minify_cli [--compact] [--generic-tags] [infile]",
        "",
        "Arguments:",
        "  infile           input document; '-' or omitted reads standard input",
        "",
        "Options:",
        "  --compact        single-line output instead of pretty-printed",
        "  --generic-tags   never emit an entity's name as its element tag",
        "",
        "The converted document is written to standard output; line-count",
        "diagnostics are logged to standard error.",
    ]
    .join("\n")
}
