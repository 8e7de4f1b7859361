use atcs_core::{Category, RecordDraft};
use pretty_assertions::assert_eq;

fn init_logging() {
    atcs_logging::initialize_for_tests();
}

#[test]
fn first_assignment_per_category_wins() {
    init_logging();
    let mut draft = RecordDraft::new();
    assert!(draft.assign(Category::Problem, "first"));
    assert!(!draft.assign(Category::Problem, "second"));
    assert!(draft.assign(Category::Input, "N M"));

    let record = draft.finish().expect("record with content");
    assert_eq!(record.problem(), "first");
    assert_eq!(record.constraints(), "");
    assert_eq!(record.input(), "N M");
}

#[test]
fn empty_text_does_not_claim_a_category() {
    let mut draft = RecordDraft::new();
    assert!(!draft.assign(Category::Constraints, ""));
    assert!(!draft.is_set(Category::Constraints));
    assert!(draft.assign(Category::Constraints, "1 <= N <= 100"));
    assert!(draft.is_set(Category::Constraints));
}

#[test]
fn images_keep_first_encounter_order_without_duplicates() {
    let mut draft = RecordDraft::new();
    assert!(draft.push_image("b.png"));
    assert!(draft.push_image("a.png"));
    assert!(!draft.push_image("b.png"));
    assert!(!draft.push_image(""));
    assert!(draft.push_image("data:image/png;base64,AAAA"));

    assert_eq!(
        draft.images(),
        &["b.png", "a.png", "data:image/png;base64,AAAA"]
    );
}

#[test]
fn draft_without_text_does_not_finish() {
    let mut draft = RecordDraft::new();
    draft.push_image("only-an-image.png");
    assert!(!draft.has_content());
    assert_eq!(draft.finish(), None);
}

#[test]
fn json_omits_empty_image_list() {
    let mut draft = RecordDraft::new();
    draft.assign(Category::Problem, "Print A+B.");
    let json = draft.finish().unwrap().to_json().unwrap();

    assert_eq!(
        json,
        "{\n  \"problem\": \"Print A+B.\",\n  \"constraints\": \"\",\n  \"input\": \"\"\n}"
    );
}

#[test]
fn json_lists_images_when_present() {
    let mut draft = RecordDraft::new();
    draft.assign(Category::Problem, "p");
    draft.push_image("../img/x.png");
    let json = draft.finish().unwrap().to_json().unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["images"], serde_json::json!(["../img/x.png"]));
    assert_eq!(value["constraints"], "");
}
