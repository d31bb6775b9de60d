use hocr_batch::{
    OcrError,
    extension::{parse_allow_list, validate_extension},
};

fn allow() -> Vec<String> {
    vec!["tif".into(), "png".into()]
}

#[test]
fn accepts_case_insensitive_match() {
    assert!(validate_extension("scan1.TIF", &allow()).is_ok());
    assert!(validate_extension("scan2.png", &allow()).is_ok());
}

#[test]
fn rejects_unknown_extension() {
    let err = validate_extension("scan1.bmp", &allow()).unwrap_err();
    match err {
        OcrError::InvalidExtension { file_name } => assert_eq!(file_name, "scan1.bmp"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn empty_allow_list_is_a_configuration_error() {
    let err = validate_extension("scan1.tif", &[]).unwrap_err();
    assert!(matches!(err, OcrError::NoValidExtensionsConfigured));
}

#[test]
fn extension_is_taken_after_first_dot() {
    // "scan.part1.tif" is checked as "part1.tif", not "tif".
    let err = validate_extension("scan.part1.tif", &allow()).unwrap_err();
    assert!(matches!(err, OcrError::InvalidExtension { .. }));
    assert!(validate_extension("scan.part1.tif", &["part1.tif".to_string()]).is_ok());
}

#[test]
fn name_without_dot_is_compared_whole() {
    assert!(validate_extension("tif", &allow()).is_ok());
    assert!(validate_extension("scan", &allow()).is_err());
}

#[test]
fn allow_list_parsing_drops_blank_entries() {
    assert_eq!(parse_allow_list("tif; png;;"), ["tif", "png"]);
    assert!(parse_allow_list(" ; ").is_empty());
}
