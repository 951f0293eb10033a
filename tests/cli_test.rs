use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use stencil::cli::{Args, Command};

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("stencil")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_use_args() {
    let parsed = Args::try_parse_from(make_args(&["use", "./template", "./output"])).unwrap();

    assert!(!parsed.verbose);
    match parsed.command {
        Command::Use { template, output_dir, use_defaults, force } => {
            assert_eq!(template, PathBuf::from("./template"));
            assert_eq!(output_dir, PathBuf::from("./output"));
            assert!(!use_defaults);
            assert!(!force);
        }
        other => panic!("Expected use command, got {other:?}"),
    }
}

#[test]
fn test_all_flags() {
    let args = make_args(&["use", "--use-defaults", "--force", "--verbose", "./template", "./output"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert!(parsed.verbose);
    match parsed.command {
        Command::Use { use_defaults, force, .. } => {
            assert!(use_defaults);
            assert!(force);
        }
        other => panic!("Expected use command, got {other:?}"),
    }
}

#[test]
fn test_short_flags() {
    let parsed = Args::try_parse_from(make_args(&["-v", "use", "-f", "./template", "./output"])).unwrap();

    assert!(parsed.verbose);
    assert!(matches!(parsed.command, Command::Use { force: true, .. }));
}

#[test]
fn test_validate_args() {
    let parsed = Args::try_parse_from(make_args(&["validate", "./template"])).unwrap();
    match parsed.command {
        Command::Validate { template } => assert_eq!(template, PathBuf::from("./template")),
        other => panic!("Expected validate command, got {other:?}"),
    }
}

#[test]
fn test_missing_args() {
    assert!(Args::try_parse_from(make_args(&["use", "./template"])).is_err());
    assert!(Args::try_parse_from(make_args(&[])).is_err());
}

#[test]
fn test_too_many_args() {
    assert!(Args::try_parse_from(make_args(&["use", "./template", "./output", "extra"])).is_err());
}
