use super::*;
use std::io::Write;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

fn write_docx(dir: &TempDir, name: &str, document_xml: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    writer
        .start_file("word/document.xml", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(document_xml.as_bytes()).unwrap();
    writer.finish().unwrap();
    path
}

#[test]
fn missing_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.txt");

    let err = detect_kind(&path).unwrap_err();
    assert!(matches!(err, KnowledgeError::NotFound(_)));
    assert!(err.to_string().contains("nope.txt"));
}

#[test]
fn pdf_magic_bytes_detected() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "doc.bin", b"%PDF-1.7 rest of file");

    assert_eq!(detect_kind(&path).unwrap(), FileKind::Pdf);
}

#[test]
fn image_signatures_detected() {
    let dir = TempDir::new().unwrap();

    let png = write_file(&dir, "a.bin", &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    let jpeg = write_file(&dir, "b.bin", &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0]);
    let webp = write_file(&dir, "c.bin", b"RIFF\x00\x00\x00\x00WEBPVP8 ");

    assert_eq!(detect_kind(&png).unwrap(), FileKind::Image);
    assert_eq!(detect_kind(&jpeg).unwrap(), FileKind::Image);
    assert_eq!(detect_kind(&webp).unwrap(), FileKind::Image);
}

#[test]
fn plain_text_is_other() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "notes.txt", b"just some notes");

    assert_eq!(detect_kind(&path).unwrap(), FileKind::Other);
}

#[test]
fn extension_fallback_when_magic_is_absent() {
    let dir = TempDir::new().unwrap();
    // No signature in the content, so classification falls back to the
    // extension.
    let path = write_file(&dir, "scan.jpg", b"not really image data");

    assert_eq!(detect_kind(&path).unwrap(), FileKind::Image);
}

#[test]
fn zip_without_document_part_is_other() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("archive.zip");
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    writer
        .start_file("readme.txt", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"hello").unwrap();
    writer.finish().unwrap();

    assert_eq!(detect_kind(&path).unwrap(), FileKind::Other);
}

#[test]
fn docx_detected_and_text_extracted() {
    let dir = TempDir::new().unwrap();
    let xml = concat!(
        r#"<?xml version="1.0"?><w:document><w:body>"#,
        "<w:p><w:r><w:t>First paragraph.</w:t></w:r></w:p>",
        "<w:p><w:r><w:t xml:space=\"preserve\">Second </w:t></w:r>",
        "<w:r><w:t>half.</w:t></w:r></w:p>",
        "</w:body></w:document>"
    );
    let path = write_docx(&dir, "report.docx", xml);

    assert_eq!(detect_kind(&path).unwrap(), FileKind::WordDocument);

    let text = extract_text(&path).unwrap();
    assert_eq!(text, "First paragraph.\nSecond half.\n");
}

#[test]
fn document_xml_entities_and_breaks_decoded() {
    let xml = concat!(
        "<w:p><w:r><w:t>a &amp; b &lt;c&gt;</w:t></w:r>",
        "<w:r><w:tab/><w:t>after tab</w:t></w:r></w:p>",
        "<w:p><w:r><w:t>x&#233;y</w:t><w:br/><w:t>next line</w:t></w:r></w:p>"
    );

    let text = docx::text_from_xml(xml);
    assert_eq!(text, "a & b <c>\tafter tab\nx\u{e9}y\nnext line\n");
}

#[test]
fn document_xml_ignores_non_text_elements() {
    let xml = concat!(
        "<w:tbl><w:tr><w:tc>",
        "<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>cell</w:t></w:r></w:p>",
        "</w:tc></w:tr></w:tbl>"
    );

    assert_eq!(docx::text_from_xml(xml), "cell\n");
}

#[test]
fn invalid_utf8_is_replaced_not_fatal() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "mixed.txt", b"good \xFF\xFE bad");

    let text = extract_text(&path).unwrap();
    assert!(text.starts_with("good "));
    assert!(text.ends_with(" bad"));
}

#[test]
fn corrupt_pdf_is_an_extraction_error() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "broken.bin", b"%PDF-1.7 but nothing else");

    let err = extract_text(&path).unwrap_err();
    assert!(matches!(err, KnowledgeError::Extraction(_)));
}
