//! # Document Rendering
//!
//! Optional attachment carrying the same content as the order message.
//!
//! ## Renderer Seam
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  OrderRequest ──► dyn DocumentRenderer ──► Attachment { name, bytes }   │
//! │                         │                          │                    │
//! │                   PdfRenderer (shipped)            ▼                    │
//! │                   test doubles              base64 → RelayPayload       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The shipped [`PdfRenderer`] lays the message out as plain text on A4
//! pages in the built-in Helvetica font and leaves serialization to `lopdf`.
//! No images, no compression.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::error::{CoreError, CoreResult};
use crate::order::OrderRequest;

// =============================================================================
// Attachment
// =============================================================================

/// A rendered file ready to attach to the relay payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Base64 (standard alphabet, padded, no `data:` prefix).
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

/// Turns an order into an attachment.
pub trait DocumentRenderer: Send + Sync {
    /// Renders `order`; `issued_at` names the file and dates the document.
    fn render(&self, order: &OrderRequest, issued_at: DateTime<Utc>) -> CoreResult<Attachment>;
}

/// File name for an order document issued at `issued_at`.
pub fn attachment_filename(issued_at: DateTime<Utc>, extension: &str) -> String {
    format!(
        "risinghorn-order-{}.{}",
        issued_at.format("%Y%m%d-%H%M%S"),
        extension
    )
}

// =============================================================================
// PDF Renderer
// =============================================================================

const PAGE_WIDTH: u32 = 595; // A4, points
const PAGE_HEIGHT: u32 = 842;
const MARGIN: u32 = 50;

/// Paginated plain-text PDF.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    /// Font size in points.
    pub font_size: u32,
    /// Distance between baselines in points.
    pub leading: u32,
    /// Characters per line before wrapping.
    pub wrap_width: usize,
    /// Text lines per page.
    pub lines_per_page: usize,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        PdfRenderer {
            font_size: 10,
            leading: 14,
            wrap_width: 90,
            lines_per_page: ((PAGE_HEIGHT - 2 * MARGIN) / 14) as usize,
        }
    }
}

impl DocumentRenderer for PdfRenderer {
    fn render(&self, order: &OrderRequest, issued_at: DateTime<Utc>) -> CoreResult<Attachment> {
        if self.wrap_width == 0 || self.lines_per_page == 0 {
            return Err(CoreError::RenderFailed {
                format: "pdf".to_string(),
                reason: "page geometry leaves no room for text".to_string(),
            });
        }

        let mut lines = vec![
            format!("RisingHorn - {}", issued_at.format("%Y-%m-%d %H:%M UTC")),
            String::new(),
        ];
        for line in order.message().lines() {
            lines.extend(wrap(line, self.wrap_width));
        }

        let pages: Vec<&[String]> = lines.chunks(self.lines_per_page).collect();
        let bytes = self.write_pdf(&pages).map_err(|e| CoreError::RenderFailed {
            format: "pdf".to_string(),
            reason: e.to_string(),
        })?;

        Ok(Attachment {
            filename: attachment_filename(issued_at, "pdf"),
            content_type: "application/pdf".to_string(),
            bytes,
        })
    }
}

impl PdfRenderer {
    fn page_content(&self, lines: &[String]) -> Content {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), Object::Integer(self.font_size.into())]),
            Operation::new("TL", vec![Object::Integer(self.leading.into())]),
            Operation::new(
                "Td",
                vec![
                    Object::Integer(MARGIN.into()),
                    Object::Integer((PAGE_HEIGHT - MARGIN).into()),
                ],
            ),
        ];
        for line in lines {
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(win_ansi(line), StringFormat::Literal)],
            ));
            operations.push(Operation::new("T*", vec![]));
        }
        operations.push(Operation::new("ET", vec![]));

        Content { operations }
    }

    fn write_pdf(&self, pages: &[&[String]]) -> lopdf::Result<Vec<u8>> {
        let mut doc = Document::with_version("1.4");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<ObjectId> = Vec::with_capacity(pages.len());
        for page in pages {
            let content = self.page_content(page).encode()?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));
            kids.push(doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            }));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids.into_iter().map(Object::from).collect::<Vec<_>>(),
                "Count" => Object::Integer(count),
                "Resources" => resources_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(PAGE_WIDTH.into()),
                    Object::Integer(PAGE_HEIGHT.into()),
                ],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf)?;
        Ok(buf)
    }
}

/// WinAnsi bytes for a line. Characters outside printable Latin-1 become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' | '\u{A0}'..='\u{FF}' => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

/// Word-wraps one line to `width` characters, keeping its indentation on
/// continuation lines. Words longer than a line are split.
fn wrap(line: &str, width: usize) -> Vec<String> {
    if line.chars().count() <= width {
        return vec![line.to_string()];
    }

    let indent: String = line.chars().take_while(|c| *c == ' ').collect();
    let indent = if indent.len() < width { indent } else { String::new() };
    let room = width - indent.len();

    let mut out = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > room {
            if !current.is_empty() {
                out.push(format!("{}{}", indent, current));
                current.clear();
            }
            let rest = word.split_off(room);
            out.push(format!("{}{}", indent, word.iter().collect::<String>()));
            word = rest;
        }
        if word.is_empty() {
            continue;
        }

        let needed = if current.is_empty() {
            word.len()
        } else {
            current.chars().count() + 1 + word.len()
        };
        if needed > room {
            out.push(format!("{}{}", indent, current));
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }
    if !current.is_empty() {
        out.push(format!("{}{}", indent, current));
    }
    if out.is_empty() {
        // Whitespace only
        out.push(String::new());
    }
    out
}
