//! Book model and its tagged on-disk representation.
//!
//! A book is a shared set of bibliographic fields plus a [`BookKind`] that
//! carries the variant-specific data. On disk every book is written as a flat
//! JSON object with an explicit `_cls` tag naming the variant; a missing or
//! unrecognized tag loads as a plain book.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AppError, AppResult};

pub const DEFAULT_FILE_FORMAT: &str = "PDF";

/// Tag written in the `_cls` field of each persisted book
pub const TAG_PLAIN: &str = "Book";
pub const TAG_ELECTRONIC: &str = "EBook";
pub const TAG_AUDIO: &str = "AudioBook";

/// Variant-specific book data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookKind {
    /// Printed book, no extra fields
    Plain,
    /// E-book with its file format (e.g. "PDF", "EPUB")
    Electronic { file_format: String },
    /// Audiobook with its running time in minutes
    Audio { duration: u32 },
}

impl BookKind {
    /// Tag used in the persisted record and in API responses
    pub fn tag(&self) -> &'static str {
        match self {
            BookKind::Plain => TAG_PLAIN,
            BookKind::Electronic { .. } => TAG_ELECTRONIC,
            BookKind::Audio { .. } => TAG_AUDIO,
        }
    }
}

/// Catalog book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BookRecord", into = "BookRecord")]
pub struct Book {
    pub title: String,
    pub author: String,
    /// Identity key within a catalog
    pub isbn: String,
    is_borrowed: bool,
    pub kind: BookKind,
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
        kind: BookKind,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
            is_borrowed: false,
            kind,
        }
    }

    pub fn plain(title: impl Into<String>, author: impl Into<String>, isbn: impl Into<String>) -> Self {
        Self::new(title, author, isbn, BookKind::Plain)
    }

    pub fn electronic(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
        file_format: impl Into<String>,
    ) -> Self {
        Self::new(
            title,
            author,
            isbn,
            BookKind::Electronic {
                file_format: file_format.into(),
            },
        )
    }

    pub fn audio(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
        duration: u32,
    ) -> Self {
        Self::new(title, author, isbn, BookKind::Audio { duration })
    }

    pub fn is_borrowed(&self) -> bool {
        self.is_borrowed
    }

    /// Mark the book as lent out
    pub fn borrow(&mut self) -> AppResult<()> {
        if self.is_borrowed {
            return Err(AppError::AlreadyBorrowed(self.title.clone()));
        }
        self.is_borrowed = true;
        Ok(())
    }

    /// Mark the book as back on the shelf
    pub fn return_(&mut self) -> AppResult<()> {
        if !self.is_borrowed {
            return Err(AppError::NotBorrowed(self.title.clone()));
        }
        self.is_borrowed = false;
        Ok(())
    }

    /// Human-readable one-line description
    pub fn display(&self) -> String {
        let base = format!("'{}' by {} (ISBN: {})", self.title, self.author, self.isbn);
        match &self.kind {
            BookKind::Plain => base,
            BookKind::Electronic { file_format } => format!("{} [Format: {}]", base, file_format),
            BookKind::Audio { duration } => format!("{} [Duration: {} mins]", base, duration),
        }
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Flat, explicitly tagged record as stored in the catalog file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct BookRecord {
    pub title: String,
    pub author: String,
    pub isbn: String,
    #[serde(default)]
    pub is_borrowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(rename = "_cls", default)]
    pub tag: Option<String>,
}

impl From<BookRecord> for Book {
    fn from(record: BookRecord) -> Self {
        let kind = match record.tag.as_deref() {
            Some(TAG_ELECTRONIC) => BookKind::Electronic {
                file_format: record
                    .file_format
                    .unwrap_or_else(|| DEFAULT_FILE_FORMAT.to_string()),
            },
            Some(TAG_AUDIO) => BookKind::Audio {
                duration: record.duration.unwrap_or(0),
            },
            _ => BookKind::Plain,
        };

        Self {
            title: record.title,
            author: record.author,
            isbn: record.isbn,
            is_borrowed: record.is_borrowed,
            kind,
        }
    }
}

impl From<Book> for BookRecord {
    fn from(book: Book) -> Self {
        let tag = Some(book.kind.tag().to_string());
        let (file_format, duration) = match book.kind {
            BookKind::Plain => (None, None),
            BookKind::Electronic { file_format } => (Some(file_format), None),
            BookKind::Audio { duration } => (None, Some(duration)),
        };

        Self {
            title: book.title,
            author: book.author,
            isbn: book.isbn,
            is_borrowed: book.is_borrowed,
            file_format,
            duration,
            tag,
        }
    }
}
