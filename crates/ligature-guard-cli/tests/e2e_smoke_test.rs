use std::{fs, path::Path};

use tempfile::tempdir;

use ligature_guard_cli::{Args, CliError, CursorModeArg, Format, SettingsError, run};

fn args(input: &Path, output: &Path) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        language: None,
        config: None,
        ligatures: None,
        caret: None,
        cursor_mode: None,
        debug: false,
        format: Format::Text,
        output: Some(output.to_string_lossy().to_string()),
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_scan_writes_text_report() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("main.kt");
    let output = temp_dir.path().join("report.txt");
    fs::write(&input, "if (a != b) x = 0xFF // done -> ok\n").expect("write input");

    run(&args(&input, &output)).expect("scan succeeds");

    let report = fs::read_to_string(&output).expect("read report");
    assert!(report.contains("6..8\t!=\tOPERATOR\tsuppressed"), "{report}");
    assert!(report.contains("\t->\tLINE_COMMENT\tallowed\toutside_contexts"), "{report}");
}

#[test]
fn e2e_ligatures_file_and_json_format() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("notes.md");
    let output = temp_dir.path().join("report.jsonl");
    let ligatures = temp_dir.path().join("ligatures.json5");
    fs::write(&input, "a != b\n").expect("write input");
    fs::write(&ligatures, "{languages: {markdown: true}, // all on\n}").expect("write ligatures");

    let mut args = args(&input, &output);
    args.ligatures = Some(ligatures.to_string_lossy().to_string());
    args.format = Format::Json;
    run(&args).expect("scan succeeds");

    let report = fs::read_to_string(&output).expect("read report");
    assert!(!report.is_empty());
    assert!(report.lines().all(|line| line.contains("\"suppressed\":false")), "{report}");
}

#[test]
fn e2e_settings_file_sets_caret_mode() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("main.rs");
    let output = temp_dir.path().join("report.txt");
    let settings = temp_dir.path().join("config.toml");
    fs::write(&input, "x -> y\na == b != c\n").expect("write input");
    fs::write(
        &settings,
        "cursor_mode = \"line\"\nligatures = \"{languages: {rust: true}}\"\n",
    )
    .expect("write settings");

    let mut args = args(&input, &output);
    args.config = Some(settings.to_string_lossy().to_string());
    args.caret = Some(9);
    run(&args).expect("caret scan succeeds");

    let report = fs::read_to_string(&output).expect("read report");
    let ligatures: Vec<&str> = report
        .lines()
        .filter_map(|line| line.split('\t').nth(1))
        .collect();
    assert_eq!(ligatures, ["==", "!="]);

    // an explicit mode wins over the settings
    args.cursor_mode = Some(CursorModeArg::Off);
    run(&args).expect("caret scan succeeds");
    assert!(fs::read_to_string(&output).expect("read report").is_empty());
}

#[test]
fn e2e_invalid_ligatures_are_reported() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("main.kt");
    let output = temp_dir.path().join("report.txt");
    let ligatures = temp_dir.path().join("bad.json5");
    fs::write(&input, "a != b").expect("write input");
    fs::write(&ligatures, "{languages: {kotlin: 'yes'}}").expect("write ligatures");

    let mut args = args(&input, &output);
    args.ligatures = Some(ligatures.to_string_lossy().to_string());

    let err = run(&args).expect_err("invalid configuration rejected");
    let reportables = ligature_guard_cli::error_adapter::to_reportables(&err);
    assert!(!reportables.is_empty());
    assert!(!output.exists());
}

#[test]
fn e2e_missing_input_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let args = args(&temp_dir.path().join("absent.kt"), &temp_dir.path().join("out.txt"));

    assert!(run(&args).is_err());
}

#[test]
fn e2e_invalid_settings_keep_their_variant() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("main.kt");
    let settings = temp_dir.path().join("config.toml");
    fs::write(&input, "a != b").expect("write input");
    fs::write(&settings, "cursor_mode = \"sideways\"\n").expect("write settings");

    let mut args = args(&input, &temp_dir.path().join("out.txt"));
    args.config = Some(settings.to_string_lossy().to_string());

    let err = run(&args).expect_err("invalid settings rejected");
    assert!(matches!(err, CliError::Settings(SettingsError::Parse(_))), "{err}");
}

#[test]
fn e2e_custom_ligature_warning_does_not_fail() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("main.kt");
    let output = temp_dir.path().join("report.txt");
    let ligatures = temp_dir.path().join("custom.json5");
    fs::write(&input, "a <<<< b").expect("write input");
    fs::write(&ligatures, "{ligatures: '+ <<<<'}").expect("write ligatures");

    let mut args = args(&input, &output);
    args.ligatures = Some(ligatures.to_string_lossy().to_string());
    run(&args).expect("warnings do not fail the scan");

    let report = fs::read_to_string(&output).expect("read report");
    assert!(report.contains("\t<<<<\tOPERATOR\tsuppressed"), "{report}");
}
