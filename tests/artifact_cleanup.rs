use hocr_batch::{cleanup::clean_intermediates, config::Cleanup};
use std::fs;

#[test]
fn removes_only_names_with_both_markers() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["a.tif.png", "a.tif", "b.txt"] {
        fs::write(dir.path().join(name), b"x").unwrap();
    }

    let removed = clean_intermediates(dir.path(), &Cleanup::default());

    assert_eq!(removed, [dir.path().join("a.tif.png")]);
    assert!(!dir.path().join("a.tif.png").exists());
    assert!(dir.path().join("a.tif").exists());
    assert!(dir.path().join("b.txt").exists());
}

#[test]
fn markers_match_anywhere_and_ignore_case() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("SCAN.PNG.x.TIF"), b"x").unwrap();
    fs::write(dir.path().join("scan.png"), b"x").unwrap();

    let removed = clean_intermediates(dir.path(), &Cleanup::default());

    assert_eq!(removed.len(), 1);
    assert!(dir.path().join("scan.png").exists());
}

#[test]
fn does_not_descend_into_subdirectories() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("nested");
    fs::create_dir(&nested).unwrap();
    fs::write(nested.join("n.tif.png"), b"x").unwrap();

    assert!(clean_intermediates(dir.path(), &Cleanup::default()).is_empty());
    assert!(nested.join("n.tif.png").exists());
}

#[test]
fn missing_or_empty_directory_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    assert!(clean_intermediates(dir.path(), &Cleanup::default()).is_empty());
    assert!(clean_intermediates(&dir.path().join("absent"), &Cleanup::default()).is_empty());
}

#[test]
fn blank_marker_skips_cleanup() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("keep.png"), b"x").unwrap();
    let markers = Cleanup {
        source_marker: "".into(),
        ..Cleanup::default()
    };

    assert!(clean_intermediates(dir.path(), &markers).is_empty());
    assert!(dir.path().join("keep.png").exists());
}

#[test]
fn matching_directories_go_only_when_empty() {
    let dir = tempfile::tempdir().unwrap();
    let empty = dir.path().join("e.tif.png");
    let full = dir.path().join("f.tif.png");
    fs::create_dir(&empty).unwrap();
    fs::create_dir(&full).unwrap();
    fs::write(full.join("inner"), b"x").unwrap();

    let removed = clean_intermediates(dir.path(), &Cleanup::default());

    assert_eq!(removed, [empty.clone()]);
    assert!(!empty.exists());
    assert!(full.join("inner").exists());
}
