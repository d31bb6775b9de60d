use hocr_batch::{
    OcrError,
    batch::{Batch, Document, Page},
    merge::merge_result,
    select::{ColorMode, select_pages},
};

fn page(plain: &str, ocr_input: &str) -> Page {
    Page {
        identifier: format!("PG-{plain}"),
        new_file_name: plain.into(),
        ocr_input_file_name: ocr_input.into(),
        ..Default::default()
    }
}

fn tree() -> Batch {
    Batch {
        batch_instance_id: "BI1".into(),
        documents: vec![
            Document {
                identifier: "DOC1".into(),
                pages: vec![page("a.tif", "a_color.png"), page("b.tif", "")],
                ..Default::default()
            },
            Document {
                identifier: "DOC2".into(),
                pages: vec![page("", "c_color.png"), page("a.tif", "d_color.png")],
                ..Default::default()
            },
        ],
        ..Default::default()
    }
}

#[test]
fn color_off_selects_plain_names_in_tree_order() {
    let pages = select_pages(&tree(), ColorMode::Off).unwrap();
    assert_eq!(pages, ["a.tif", "b.tif", "a.tif"]);
}

#[test]
fn color_on_selects_ocr_input_names() {
    let pages = select_pages(&tree(), ColorMode::On).unwrap();
    assert_eq!(pages, ["a_color.png", "c_color.png", "d_color.png"]);
}

#[test]
fn empty_tree_has_no_pages() {
    let batch = Batch {
        batch_instance_id: "BI9".into(),
        documents: vec![Document {
            pages: vec![page("", "")],
            ..Default::default()
        }],
        ..Default::default()
    };
    let err = select_pages(&batch, ColorMode::Off).unwrap_err();
    assert!(matches!(err, OcrError::NoPagesFound { ref batch_id } if batch_id == "BI9"));
    assert!(select_pages(&Batch::default(), ColorMode::On).is_err());
}

#[test]
fn switch_values_map_to_modes() {
    assert_eq!(ColorMode::from_switch("ON"), ColorMode::On);
    assert_eq!(ColorMode::from_switch(" on "), ColorMode::Off);
    assert_eq!(ColorMode::from_switch("on"), ColorMode::Off);
    assert_eq!(ColorMode::from_switch("OFF"), ColorMode::Off);
    assert_eq!(ColorMode::from_switch(""), ColorMode::Off);
}

#[test]
fn merge_sets_every_matching_page_case_insensitively() {
    let mut batch = tree();
    let updated = merge_result(&mut batch, ColorMode::Off, "A.TIF", "a.hocr");
    assert_eq!(updated, 2);
    assert_eq!(batch.documents[0].pages[0].hocr_file_name, "a.hocr");
    assert_eq!(batch.documents[1].pages[1].hocr_file_name, "a.hocr");
    assert_eq!(batch.documents[0].pages[1].hocr_file_name, "");
}

#[test]
fn merge_uses_the_same_field_as_selection() {
    let mut batch = tree();
    // "a.tif" is a plain name; with color on it must not match anything.
    assert_eq!(merge_result(&mut batch, ColorMode::On, "a.tif", "a.hocr"), 0);
    assert!(batch.pages().all(|p| p.hocr_file_name.is_empty()));

    assert_eq!(merge_result(&mut batch, ColorMode::On, "c_color.png", "c_color.hocr"), 1);
    assert_eq!(batch.documents[1].pages[0].hocr_file_name, "c_color.hocr");
}

#[test]
fn merge_is_idempotent() {
    let results = [("a.tif", "a.hocr"), ("b.tif", "b.hocr")];

    let mut once = tree();
    for (src, out) in results {
        merge_result(&mut once, ColorMode::Off, src, out);
    }

    let mut twice = once.clone();
    for (src, out) in results {
        merge_result(&mut twice, ColorMode::Off, src, out);
    }
    assert_eq!(once, twice);
}
