#![cfg(unix)]

use hocr_batch::{
    commands::CommandTemplates,
    config::Config,
    engine::{OcrEngine, OcrTask, TaskParams, command::CommandEngine},
    select::ColorMode,
};
use std::path::Path;
use std::sync::Arc;

fn task(dir: &Path, templates: &str) -> OcrTask {
    std::fs::write(dir.join("scan1.tif"), b"II*").unwrap();
    let params = Arc::new(TaskParams {
        templates: CommandTemplates::parse(templates),
        language: "deu".into(),
        version: "tesseract_3".into(),
        color: ColorMode::On,
        work_dir: dir.to_path_buf(),
        hocr_extension: "hocr".into(),
    });
    OcrTask::new("scan1.tif", params).unwrap()
}

#[test]
fn renders_placeholders_per_token() {
    let dir = tempfile::tempdir().unwrap();
    let engine = CommandEngine::new(&Config::default()).unwrap();
    let task = task(dir.path(), "tesseract;{source};{target_base};-l;{language};--v={version};{color};{unknown}");

    let argv = engine.argv(&task);

    assert_eq!(argv[0], "tesseract");
    assert_eq!(argv[1], dir.path().join("scan1.tif").display().to_string());
    assert_eq!(argv[2], dir.path().join("scan1").display().to_string());
    assert_eq!(argv[4], "deu");
    assert_eq!(argv[5], "--v=tesseract_3");
    assert_eq!(argv[6], "ON");
    assert_eq!(argv[7], "{unknown}");
}

#[test]
fn successful_process_with_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let engine = CommandEngine::new(&Config::default()).unwrap();
    let task = task(dir.path(), r#"sh;-c;cp "$0" "$1";{source};{target}"#);

    engine.recognize(&task).unwrap();

    assert!(dir.path().join("scan1.hocr").is_file());
}

#[test]
fn non_zero_exit_is_a_failure() {
    let dir = tempfile::tempdir().unwrap();
    let engine = CommandEngine::new(&Config::default()).unwrap();
    let task = task(dir.path(), "sh;-c;echo broken >&2 && exit 3");

    let err = engine.recognize(&task).unwrap_err();

    assert!(format!("{err:#}").contains("broken"));
}

#[test]
fn missing_output_is_a_failure() {
    let dir = tempfile::tempdir().unwrap();
    let engine = CommandEngine::new(&Config::default()).unwrap();
    let task = task(dir.path(), "sh;-c;true");

    let err = engine.recognize(&task).unwrap_err();

    assert!(format!("{err:#}").contains("no output"));
}

#[test]
fn timeout_kills_a_hung_engine() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = Config::default();
    cfg.engine.timeout_seconds = 1;
    let engine = CommandEngine::new(&cfg).unwrap();
    let task = task(dir.path(), "sh;-c;exec sleep 30");

    let err = engine.recognize(&task).unwrap_err();

    assert!(format!("{err:#}").contains("timeout"));
}
