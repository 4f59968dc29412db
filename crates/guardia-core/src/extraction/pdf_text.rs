//! In-process PDF extraction backend built on the `pdf-extract` crate.
//!
//! A custom [`OutputDev`] records every glyph with its page position
//! (flipped into top-left/document coordinates) while also assembling the
//! same reading-order linear text a plain-text device would produce, so one
//! pass over the document serves both the row-oriented strategies and the
//! geometric column scanner.

use crate::error::GuardiaError;
use crate::extraction::{PageContent, PdfExtractor, PositionedChar};
use pdf_extract::{Document, MediaBox, OutputDev, OutputError, Transform};
use tracing::warn;

pub struct PdfTextBackend;

impl PdfTextBackend {
    pub fn new() -> Self {
        PdfTextBackend
    }
}

impl Default for PdfTextBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor for PdfTextBackend {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, GuardiaError> {
        if pdf_bytes.is_empty() {
            return Err(GuardiaError::Extraction("empty PDF input".into()));
        }

        // The document handle lives exactly as long as this call; dropped on
        // every path once the pages are collected.
        let doc = Document::load_mem(pdf_bytes)
            .map_err(|e| GuardiaError::Extraction(format!("failed to open PDF: {e}")))?;

        let mut collector = PageCollector::new();
        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        if page_numbers.is_empty() {
            return Err(GuardiaError::Extraction("PDF contains no pages".into()));
        }

        // One page failing to decode costs only that page.
        for page_num in page_numbers {
            if let Err(e) = pdf_extract::output_doc_page(&doc, &mut collector, page_num) {
                warn!(page = page_num, "skipping unreadable page: {e}");
                collector.discard_current();
            }
        }

        Ok(collector.pages)
    }

    fn backend_name(&self) -> &str {
        "pdf-extract"
    }
}

/// Glyph collector implementing `pdf-extract`'s output-device interface.
struct PageCollector {
    pages: Vec<PageContent>,
    current: PageContent,
    page_top: f64,
    last_end: f64,
    last_y: f64,
}

impl PageCollector {
    fn new() -> PageCollector {
        PageCollector {
            pages: Vec::new(),
            current: PageContent::default(),
            page_top: 0.0,
            last_end: f64::MAX,
            last_y: 0.0,
        }
    }

    fn discard_current(&mut self) {
        self.current = PageContent::default();
    }
}

impl OutputDev for PageCollector {
    fn begin_page(
        &mut self,
        page_num: u32,
        media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> Result<(), OutputError> {
        self.current = PageContent {
            page_number: page_num as usize,
            width: (media_box.urx - media_box.llx) as f32,
            height: (media_box.ury - media_box.lly) as f32,
            text: String::new(),
            chars: Vec::new(),
        };
        self.page_top = media_box.ury - media_box.lly;
        self.last_end = f64::MAX;
        self.last_y = 0.0;
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        self.pages.push(std::mem::take(&mut self.current));
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        text: &str,
    ) -> Result<(), OutputError> {
        // Flip PDF user space (origin bottom-left, y up) into document
        // order (origin top-left, y down).
        let x = trm.m31;
        let y = self.page_top - trm.m32;
        let det = (trm.m11 * trm.m22 - trm.m12 * trm.m21).abs();
        let scaled_size = det.sqrt() * font_size;
        let advance = width * scaled_size;

        // Reading-order text reconstruction, same deltas the crate's own
        // plain-text device uses.
        if !self.current.text.is_empty() {
            if (y - self.last_y).abs() > scaled_size * 1.5 {
                self.current.text.push('\n');
            } else if x < self.last_end && (y - self.last_y).abs() > scaled_size * 0.5 {
                self.current.text.push('\n');
            } else if x > self.last_end + scaled_size * 0.1 {
                self.current.text.push(' ');
            }
        }
        self.current.text.push_str(text);

        self.current.chars.push(PositionedChar {
            x: x as f32,
            y: y as f32,
            width: advance as f32,
            text: text.to_string(),
        });

        self.last_y = y;
        self.last_end = x + advance;
        Ok(())
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        Ok(())
    }
}
