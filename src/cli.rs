use crate::config::load_config;
use crate::document::parse_document;
use crate::render::export_png;
use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "camr", version, about = "Cognitive-affective map renderer (PNG)")]
pub struct Args {
    /// Map document (.json5/.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output PNG file
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,

    /// Config JSON file (scale, fonts, palette)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Supersampling scale, overrides config and document
    #[arg(short = 's', long = "scale")]
    pub scale: Option<f32>,

    /// More log output (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(args.config.as_deref())?;
    let input = read_input(args.input.as_deref())?;
    let document = parse_document(&input)?;

    let mut request = document.into_request(config.render, config.theme);
    if let Some(scale) = args.scale {
        request.config.scale = scale;
    }

    export_png(&request, &args.output)
        .with_context(|| format!("rendering {}", args.output.display()))?;
    tracing::info!(output = %args.output.display(), "map rendered");
    Ok(())
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = if verbose > 0 {
        EnvFilter::new(default)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };
    // a subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_short_flags() {
        let args = Args::try_parse_from(["camr", "-i", "map.json5", "-o", "out.png", "-s", "3", "-vv"]).unwrap();
        assert_eq!(args.input.as_deref(), Some(Path::new("map.json5")));
        assert_eq!(args.output, PathBuf::from("out.png"));
        assert_eq!(args.scale, Some(3.0));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn output_is_required() {
        assert!(Args::try_parse_from(["camr", "-i", "map.json5"]).is_err());
    }
}
