//! Argument parsing tests for the `veil` command line

use clap::Parser;
use std::path::PathBuf;
use test_case::test_case;
use veil::cli::{Cli, Commands};

#[test]
fn test_redact_full_argument_set() {
    let cli = Cli::try_parse_from([
        "veil",
        "--config",
        "prod.toml",
        "--log-level",
        "warn",
        "redact",
        "--input",
        "-",
        "--output",
        "out.txt",
        "--labels",
        "person,email",
        "--manifest",
        "manifest.json",
        "--require-safe",
        "--report",
        "report.json",
    ])
    .unwrap();

    assert_eq!(cli.config, "prod.toml");
    assert_eq!(cli.log_level.as_deref(), Some("warn"));
    let Commands::Redact(args) = cli.command else {
        panic!("expected redact command");
    };
    assert_eq!(args.input, "-");
    assert_eq!(args.output, Some(PathBuf::from("out.txt")));
    assert_eq!(args.labels.as_deref(), Some("person,email"));
    assert_eq!(args.manifest, Some(PathBuf::from("manifest.json")));
    assert!(args.require_safe);
    assert!(!args.dry_run);
    assert_eq!(args.report, Some(PathBuf::from("report.json")));
}

#[test]
fn test_redact_with_entity_manifest() {
    let cli = Cli::try_parse_from([
        "veil",
        "redact",
        "-i",
        "memo.txt",
        "--entities",
        "entities.json",
        "--dry-run",
    ])
    .unwrap();

    let Commands::Redact(args) = cli.command else {
        panic!("expected redact command");
    };
    assert_eq!(args.entities, Some(PathBuf::from("entities.json")));
    assert!(args.dry_run);
}

#[test]
fn test_labels_defaults_flag() {
    let cli = Cli::try_parse_from(["veil", "labels", "--defaults"]).unwrap();
    let Commands::Labels(args) = cli.command else {
        panic!("expected labels command");
    };
    assert!(args.defaults);
}

#[test]
fn test_init_options() {
    let cli = Cli::try_parse_from(["veil", "init", "-o", "custom.toml", "--force"]).unwrap();
    let Commands::Init(args) = cli.command else {
        panic!("expected init command");
    };
    assert_eq!(args.output, "custom.toml");
    assert!(args.force);
    assert!(!args.with_examples);
}

#[test_case(&["veil"] ; "no subcommand")]
#[test_case(&["veil", "redact"] ; "redact without input")]
#[test_case(&["veil", "detect"] ; "detect without input")]
#[test_case(&["veil", "export"] ; "unknown subcommand")]
#[test_case(&["veil", "labels", "--bogus"] ; "unknown flag")]
fn test_invalid_invocations_rejected(args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}
