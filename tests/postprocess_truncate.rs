use report_ingest::postprocess::{normalize, TRUNCATION_MARKER};

#[test]
fn trims_surrounding_whitespace() {
    assert_eq!(normalize("  \n Glucose 5.4 mmol/L \t\n", 100), "Glucose 5.4 mmol/L");
}

#[test]
fn short_text_is_untouched() {
    assert_eq!(normalize("exactly10!", 10), "exactly10!");
}

#[test]
fn long_text_is_cut_at_the_ceiling() {
    let out = normalize("abcdefghijklmnop", 10);
    assert_eq!(out, format!("abcdefghij{TRUNCATION_MARKER}"));
    assert_eq!(
        out.chars().count(),
        10 + TRUNCATION_MARKER.chars().count()
    );
}

#[test]
fn counts_characters_not_bytes() {
    let out = normalize("ééééé", 3);
    assert_eq!(out, format!("ééé{TRUNCATION_MARKER}"));
}

#[test]
fn same_input_same_output() {
    let text = "x".repeat(50);
    assert_eq!(normalize(&text, 20), normalize(&text, 20));
}
