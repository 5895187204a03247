//! Integration tests for the aksara CLI commands

use std::fs;
use std::io::Cursor;

use aksara_cli::{convert_command, init_config_command, inspect_command, load_settings, ConvertArgs, FormatArg};
use tempfile::TempDir;

const DECK: &str = "<!--
aksara:true
type: presentation
meta:
    title: Launch
    company: Acme
footer: ${meta.company} | [page]/[total]
-->
# ${meta.title}
---
<!-- class: dark -->
## Next steps
- ship
";

fn write_input(dir: &TempDir, text: &str) -> std::path::PathBuf {
    let path = dir.path().join("deck.md");
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn test_convert_html_default_output() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, DECK);

    let output = convert_command(&ConvertArgs {
        input: input.clone(),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(output, dir.path().join("deck.html"));
    let html = fs::read_to_string(output).unwrap();
    assert!(html.contains("<h1>Launch</h1>"));
    assert!(html.contains("1/2"));
}

#[test]
fn test_convert_pptx_explicit_output() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, DECK);
    let target = dir.path().join("out").with_extension("pptx");

    convert_command(&ConvertArgs {
        input,
        format: Some(FormatArg::Pptx),
        output: Some(target.clone()),
        ..Default::default()
    })
    .unwrap();

    let bytes = fs::read(&target).unwrap();
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let names: Vec<&str> = archive.file_names().collect();
    assert!(names.contains(&"ppt/slides/slide2.xml"));
}

#[test]
fn test_settings_file_picks_format() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, DECK);
    fs::write(dir.path().join("aksara.toml"), "[defaults]\nformat = \"pptx\"\n").unwrap();

    let output = convert_command(&ConvertArgs {
        input,
        ..Default::default()
    })
    .unwrap();
    assert_eq!(output.extension().and_then(|e| e.to_str()), Some("pptx"));
}

#[test]
fn test_strict_mode_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "<!--\naksara:true\n-->\nRef ${meta.ref}");

    let err = convert_command(&ConvertArgs {
        input,
        strict: true,
        ..Default::default()
    })
    .unwrap_err();

    assert!(err.to_string().contains("Unresolved metadata: ref"));
    assert!(!dir.path().join("deck.html").exists());
}

#[test]
fn test_missing_input() {
    let dir = TempDir::new().unwrap();
    let err = convert_command(&ConvertArgs {
        input: dir.path().join("nope.md"),
        ..Default::default()
    })
    .unwrap_err();
    assert!(err.to_string().contains("Input file not found"));
}

#[test]
fn test_inspect_summary() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, DECK);

    let json = inspect_command(&input, None).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["metadata"]["title"], "Launch");
    let sections = value["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[1]["index"], 2);
    assert_eq!(sections[1]["classes"], "dark");
}

#[test]
fn test_init_config_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("aksara.toml");

    init_config_command(&path, false).unwrap();
    let settings = load_settings(Some(&path), &path).unwrap();
    assert_eq!(settings, aksara::Settings::default());

    let err = init_config_command(&path, false).unwrap_err();
    assert!(err.to_string().contains("already exists"));
    init_config_command(&path, true).unwrap();
}
