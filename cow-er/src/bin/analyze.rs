//! cow-analyze - print the visualization parameters for a description
//!
//! ```text
//! cow-analyze "Ein eleganter Pinot Noir mit Aromen von Kirsche"
//! echo "Riesling Spätlese" | cow-analyze
//! ```

use std::io::Read;

use anyhow::{Context, Result};
use clap::Parser;
use cow_common::extract::extract_bytes;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cow-analyze")]
#[command(about = "Extract wine visualization parameters from a description")]
#[command(version)]
struct Args {
    /// Description text; read from stdin when omitted
    description: Vec<String>,

    /// Print compact JSON on one line
    #[arg(long)]
    compact: bool,
}

/// Analyze the description from `args`, falling back to `input`, and format it as JSON
fn analyze(args: &Args, mut input: impl Read) -> Result<String> {
    let bytes = if args.description.is_empty() {
        let mut buf = Vec::new();
        input
            .read_to_end(&mut buf)
            .context("Failed to read description from stdin")?;
        buf
    } else {
        args.description.join(" ").into_bytes()
    };

    let params = extract_bytes(&bytes)?;

    let json = if args.compact {
        serde_json::to_string(&params)?
    } else {
        serde_json::to_string_pretty(&params)?
    };
    Ok(json)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    println!("{}", analyze(&args, std::io::stdin().lock())?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cow_common::params::WineVisualizationParameters;
    use std::io::Cursor;

    fn parse(json: &str) -> WineVisualizationParameters {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_arguments_are_joined() {
        let args = Args::parse_from(["cow-analyze", "Pinot", "Noir"]);
        let json = analyze(&args, Cursor::new(b"Riesling".to_vec())).unwrap();

        assert_eq!(parse(&json), cow_common::extract("Pinot Noir"));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_stdin_when_no_arguments() {
        let args = Args::parse_from(["cow-analyze", "--compact"]);
        let json = analyze(&args, Cursor::new("Riesling Spätlese\n".as_bytes())).unwrap();

        assert!(!json.contains('\n'));
        assert_eq!(parse(&json), cow_common::extract("Riesling Spätlese\n"));
    }

    #[test]
    fn test_empty_stdin_gives_default_record() {
        let args = Args::parse_from(["cow-analyze"]);
        let json = analyze(&args, Cursor::new(Vec::new())).unwrap();
        assert_eq!(parse(&json), WineVisualizationParameters::default());
    }

    #[test]
    fn test_invalid_utf8_stdin_is_invalid_input() {
        let args = Args::parse_from(["cow-analyze"]);
        let err = analyze(&args, Cursor::new(vec![0x52, 0xFF, 0xFE])).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<cow_common::Error>(),
            Some(cow_common::Error::InvalidInput(_))
        ));
    }
}
