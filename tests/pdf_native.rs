#![cfg(feature = "pdf")]

use lopdf::{
    content::{Content, Operation},
    dictionary, Document, Object, Stream,
};
use report_ingest::{
    config::Config,
    decoders::pdf,
    engine::tesseract::TesseractEngine,
    pipeline::Pipeline,
    report::Extractor,
    upload::UploadedFile,
};

/// One page per entry; an empty entry is a page with no text layer.
fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for text in pages {
        let operations = if text.is_empty() {
            Vec::new()
        } else {
            vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ]
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::from(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

fn pipeline() -> Pipeline<TesseractEngine> {
    let mut cfg = Config::default();
    cfg.ocr.program = "report-ingest-no-such-ocr-binary".into();
    Pipeline::new(&cfg, TesseractEngine::new(&cfg))
}

#[test]
fn pages_come_back_in_reading_order() {
    let bytes = pdf_with_pages(&["Hemoglobin 13.5", "Leukocytes 6.1", "Platelets 250"]);
    let decoded = pdf::extract(&bytes).unwrap();
    assert!(decoded.available);

    let text = decoded.text;
    let first = text.find("Hemoglobin 13.5").unwrap();
    let second = text.find("Leukocytes 6.1").unwrap();
    let third = text.find("Platelets 250").unwrap();
    assert!(first < second && second < third, "{text:?}");
}

#[test]
fn text_pdf_goes_through_native_extractor() {
    let mut files = vec![UploadedFile::from_bytes("r.pdf", pdf_with_pages(&["Hemoglobin 13.5"]))];
    let result = pipeline().run(&mut files).unwrap();

    let outcome = &result.all_outcomes[0];
    assert_eq!(outcome.extractor_used, Extractor::PdfNative);
    assert_eq!(outcome.normalized_text, "Hemoglobin 13.5");
    assert_eq!(result.non_empty_documents.len(), 1);
    assert!(result.warnings.is_empty());
}

#[test]
fn pdf_without_text_layer_warns() {
    let mut files = vec![
        UploadedFile::from_bytes("blank.pdf", pdf_with_pages(&[""])),
        UploadedFile::from_bytes("notes.txt", b"still read".to_vec()),
    ];
    let result = pipeline().run(&mut files).unwrap();

    let outcome = &result.all_outcomes[0];
    assert_eq!(outcome.extractor_used, Extractor::PdfNative);
    assert!(outcome.normalized_text.is_empty());
    assert_eq!(result.non_empty_documents.len(), 1);
    assert_eq!(
        result.warnings,
        ["Could not extract text from 'blank.pdf'. Upload a text-based file."]
    );
}
