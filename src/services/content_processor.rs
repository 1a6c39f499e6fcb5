use std::io::{Cursor, Read};

use quick_xml::{events::Event, Reader};
use zip::ZipArchive;

use crate::{
    errors::{AppError, AppResult},
    services::prompt_builder::truncate_chars,
};

pub const DEFAULT_MAX_TEXT_CHARS: usize = 5000;

const DOCX_BODY: &str = "word/document.xml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialFormat {
    PlainText,
    Docx,
    Pdf,
}

impl MaterialFormat {
    /// Picks the format from the text after the last `.` of the file name.
    pub fn from_file_name(file_name: &str) -> AppResult<Self> {
        let extension = file_name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_lowercase();

        match extension.as_str() {
            "txt" => Ok(MaterialFormat::PlainText),
            "docx" => Ok(MaterialFormat::Docx),
            "pdf" => Ok(MaterialFormat::Pdf),
            other => Err(AppError::ValidationError(format!(
                "Unsupported file format: {}",
                other
            ))),
        }
    }
}

/// Extracts plain text from uploaded study material.
#[derive(Debug, Clone)]
pub struct ContentProcessor {
    max_upload_bytes: usize,
}

impl ContentProcessor {
    pub fn new(max_upload_bytes: usize) -> Self {
        Self { max_upload_bytes }
    }

    pub fn process_file(&self, content: &[u8], file_name: &str) -> AppResult<String> {
        if content.len() > self.max_upload_bytes {
            return Err(AppError::ValidationError(format!(
                "File is too large ({} bytes, limit {} bytes)",
                content.len(),
                self.max_upload_bytes
            )));
        }

        let text = match MaterialFormat::from_file_name(file_name)? {
            MaterialFormat::PlainText => extract_text_from_txt(content),
            MaterialFormat::Docx => extract_text_from_docx(content)?,
            MaterialFormat::Pdf => extract_text_from_pdf(content)?,
        };

        log::info!("Extracted {} chars from '{}'", text.chars().count(), file_name);
        Ok(text)
    }
}

/// UTF-8 when valid, Latin-1 otherwise.
pub fn extract_text_from_txt(content: &[u8]) -> String {
    match std::str::from_utf8(content) {
        Ok(text) => text.trim().to_string(),
        Err(_) => {
            log::debug!("Upload is not UTF-8, decoding as Latin-1");
            content
                .iter()
                .map(|&b| b as char)
                .collect::<String>()
                .trim()
                .to_string()
        }
    }
}

/// Joins the text runs of each `w:p` paragraph, one paragraph per line.
/// `w:tab` becomes a tab and `w:br` a line break.
pub fn extract_text_from_docx(content: &[u8]) -> AppResult<String> {
    let mut archive = ZipArchive::new(Cursor::new(content))?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY)?
        .read_to_string(&mut xml)
        .map_err(docx_error)?;

    let mut reader = Reader::from_str(&xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event().map_err(docx_error)? {
            Event::Start(tag) if tag.name().as_ref() == b"w:t" => in_text_run = true,
            Event::End(tag) => match tag.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Empty(tag) => match tag.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" | b"w:cr" => current.push('\n'),
                b"w:p" => paragraphs.push(String::new()),
                _ => {}
            },
            Event::Text(text) if in_text_run => {
                current.push_str(&text.unescape().map_err(docx_error)?);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    Ok(paragraphs.join("\n").trim().to_string())
}

fn docx_error(err: impl std::fmt::Display) -> AppError {
    AppError::ValidationError(format!("Error extracting DOCX text: {}", err))
}

/// Text of every page, in page order.
pub fn extract_text_from_pdf(content: &[u8]) -> AppResult<String> {
    // pdf-extract panics on some malformed font programs instead of erroring.
    let text = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(content))
        .map_err(|_| pdf_error("unreadable document"))?
        .map_err(pdf_error)?;

    Ok(text.trim().to_string())
}

fn pdf_error(err: impl std::fmt::Display) -> AppError {
    AppError::ValidationError(format!("Error extracting PDF text: {}", err))
}

/// Cuts `text` to `max_chars`, ending on a full stop when one falls in the
/// last fifth of the kept text, otherwise appending "...".
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    let truncated = truncate_chars(text, max_chars);
    if truncated.len() == text.len() {
        return text.to_string();
    }

    if let Some(period) = truncated.rfind('.') {
        let period_chars = truncated[..period].chars().count();
        if period_chars as f64 > max_chars as f64 * 0.8 {
            return truncated[..=period].to_string();
        }
    }

    format!("{}...", truncated)
}
