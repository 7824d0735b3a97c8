//! Word (`.docx`) text extraction.
//!
//! A `.docx` file is a zip archive; the body lives in `word/document.xml`.
//! Body paragraphs (`w:p`) are walked in document order and the text of
//! their runs is concatenated:
//!
//! * `w:t` contributes its text,
//! * `w:tab` inside a run renders as `\t`,
//! * `w:br` / `w:cr` inside a run render as `\n`.
//!
//! Paragraphs nested in tables (`w:tbl`) are not body paragraphs and are
//! skipped.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Extract body paragraph text from a `.docx` archive.
///
/// # Errors
///
/// [`ExtractError::Word`] when the archive cannot be opened, has no
/// `word/document.xml`, or the XML is malformed.
pub fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractError::Word(e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractError::Word(format!("{DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::Word(format!("{DOCUMENT_PART}: {e}")))?;

    paragraph_text(&xml)
}

/// Walk `document.xml` and collect body paragraph text.
fn paragraph_text(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();

    let mut table_depth = 0usize;
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:r" => in_run = true,
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                b"w:r" => in_run = false,
                b"w:t" => in_text = false,
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if table_depth == 0 && in_run {
                    match e.name().as_ref() {
                        b"w:tab" => out.push('\t'),
                        b"w:br" | b"w:cr" => out.push('\n'),
                        _ => {}
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if table_depth == 0 && in_text {
                    let text = t
                        .unescape()
                        .map_err(|e| ExtractError::Word(e.to_string()))?;
                    out.push_str(&text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractError::Word(format!("malformed {DOCUMENT_PART}: {e}")));
            }
            _ => {}
        }
    }

    Ok(out)
}
