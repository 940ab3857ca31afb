//! Command-line file converter.

use anyhow::{Context, Result};
use clap::Parser;
use fconv::{BomPolicy, ConversionMethod, Settings};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Convert a file to another format.
#[derive(Parser, Debug)]
#[command(name = "fconv")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to convert
    source: PathBuf,

    /// Where to write the result
    #[arg(required_unless_present = "list_targets")]
    output: Option<PathBuf>,

    /// Target format, e.g. PDF, DOCX, MD, JPG, XLSX
    #[arg(required_unless_present = "list_targets")]
    format: Option<String>,

    /// Print the formats SOURCE can be converted to and exit
    #[arg(short, long)]
    list_targets: bool,

    /// JSON settings file (rules, classifier thresholds, BOM policy)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Byte-order mark on Markdown output: auto, always or never
    #[arg(long)]
    bom: Option<BomPolicy>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let settings = load_settings(args.config.as_deref(), args.bom)?;
    let router = settings.router();

    if args.list_targets {
        if !args.source.exists() {
            anyhow::bail!("source file not found: {}", args.source.display());
        }
        for target in router.supported_targets(&args.source) {
            println!("{}", target);
        }
        return Ok(());
    }

    let output = args.output.as_ref().context("missing OUTPUT argument")?;
    let format = args.format.as_deref().context("missing FORMAT argument")?;

    if args.verbose {
        eprintln!("Converting: {} -> {}", args.source.display(), output.display());
    }

    let report = router.convert(&args.source, output, format)?;

    match report.method {
        ConversionMethod::Copied => println!(
            "Copied {} to {} (already {})",
            args.source.display(),
            output.display(),
            report.target
        ),
        ConversionMethod::Converted(_) => println!(
            "Converted {} to {} ({} -> {})",
            args.source.display(),
            output.display(),
            report.source_format,
            report.target
        ),
    }
    Ok(())
}

/// Settings from the config file, if any, with command-line overrides applied.
fn load_settings(config: Option<&Path>, bom: Option<BomPolicy>) -> Result<Settings> {
    let mut settings = match config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };

    if let Some(bom) = bom {
        settings = settings.with_bom(bom);
    }
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_conversion() {
        let args = Args::try_parse_from(["fconv", "in.pdf", "out.md", "MD", "--bom", "never"]).unwrap();
        assert_eq!(args.output, Some(PathBuf::from("out.md")));
        assert_eq!(args.format.as_deref(), Some("MD"));
        assert_eq!(args.bom, Some(BomPolicy::Never));
    }

    #[test]
    fn test_list_targets_needs_only_source() {
        let args = Args::try_parse_from(["fconv", "photo.png", "--list-targets"]).unwrap();
        assert!(args.list_targets);
        assert!(args.output.is_none());

        assert!(Args::try_parse_from(["fconv", "photo.png"]).is_err());
    }

    #[test]
    fn test_bad_bom_policy() {
        assert!(Args::try_parse_from(["fconv", "a.pdf", "a.md", "MD", "--bom", "sometimes"]).is_err());
    }

    #[test]
    fn test_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = Args::try_parse_from([
            "fconv".to_string(),
            dir.path().join("nope.png").display().to_string(),
            dir.path().join("nope.jpg").display().to_string(),
            "JPG".to_string(),
        ])
        .unwrap();

        let err = run(&args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<fconv::Error>(),
            Some(fconv::Error::SourceNotFound(_))
        ));
    }

    #[test]
    fn test_config_with_bom_override() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("fconv.json");
        std::fs::write(&config, r#"{ "bom": "always", "classifier": { "h1_below": 10 } }"#).unwrap();

        let settings = load_settings(Some(config.as_path()), Some(BomPolicy::Never)).unwrap();
        assert_eq!(settings.bom, BomPolicy::Never);
        assert_eq!(settings.classifier.h1_below, 10);

        assert!(load_settings(Some(dir.path().join("missing.json").as_path()), None).is_err());
    }
}
