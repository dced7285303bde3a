use report_ingest::config::Config;
use std::collections::HashMap;

#[test]
fn parse_example_config() {
    let raw = include_str!("../report-ingest.example.toml");
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    assert_eq!(cfg.limits.max_attachments, 4);
    assert_eq!(cfg.limits.max_attachment_size_mb, 8);
    assert_eq!(cfg.limits.max_extracted_text_chars, 14_000);
    assert_eq!(cfg.paths.ocr_debug_dir, "chat/data/ocr_debug");
    assert_eq!(cfg.ocr.program, "tesseract");
}

#[test]
fn empty_document_uses_defaults() {
    let cfg: Config = toml::from_str("").expect("parse TOML");
    assert_eq!(cfg.limits.max_attachment_size_bytes(), 8 * 1024 * 1024);
    assert!(cfg.ocr.search_paths.is_empty());
}

#[test]
fn partial_section_keeps_other_defaults() {
    let cfg: Config = toml::from_str("[limits]\nmax_attachments = 2\n").expect("parse TOML");
    assert_eq!(cfg.limits.max_attachments, 2);
    assert_eq!(cfg.limits.max_extracted_text_chars, 14_000);
}

#[test]
fn env_overrides_apply() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("MAX_ATTACHMENTS", "6"),
        ("MAX_ATTACHMENT_SIZE_MB", " 2 "),
        ("MAX_EXTRACTED_TEXT_CHARS", "500"),
        ("OCR_DEBUG_DIR", "/tmp/ocr-debug"),
        ("TESSERACT_CMD", "/opt/tess/bin/tesseract"),
    ]);
    let mut cfg = Config::default();
    cfg.apply_env_overrides(|k| env.get(k).map(|v| v.to_string()))
        .expect("overrides");

    assert_eq!(cfg.limits.max_attachments, 6);
    assert_eq!(cfg.limits.max_attachment_size_bytes(), 2 * 1024 * 1024);
    assert_eq!(cfg.limits.max_extracted_text_chars, 500);
    assert_eq!(cfg.paths.ocr_debug_dir, "/tmp/ocr-debug");
    assert_eq!(cfg.ocr.tesseract_cmd, "/opt/tess/bin/tesseract");
}

#[test]
fn non_integer_override_is_an_error() {
    let mut cfg = Config::default();
    let err = cfg
        .apply_env_overrides(|k| (k == "MAX_ATTACHMENTS").then(|| "four".to_string()))
        .unwrap_err();
    assert!(format!("{err:#}").contains("MAX_ATTACHMENTS"));
}

#[test]
fn log_file_follows_logging_section() {
    let cfg = Config::default();
    assert_eq!(cfg.log_file_path(), None);

    let cfg: Config = toml::from_str(
        "[paths]\nocr_debug_dir = \"/var/tmp/ocr\"\n[logging]\nwrite_to_file = true\n",
    )
    .expect("parse TOML");
    assert_eq!(
        cfg.log_file_path(),
        Some(std::path::PathBuf::from("/var/tmp/ocr/report-ingest.log"))
    );

    let cfg: Config =
        toml::from_str("[logging]\nwrite_to_file = true\nfile_path = \"logs/ingest.log\"\n")
            .expect("parse TOML");
    assert_eq!(
        cfg.log_file_path(),
        Some(std::path::PathBuf::from("logs/ingest.log"))
    );
}
