pub mod chunker;
mod store;

pub use store::{build_store, extract_title};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Origin format of a raw document. Drives title extraction and the
/// `file_type` chunk metadata.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Markdown,
    Json,
    Text,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Markdown => "markdown",
            DocumentKind::Json => "json",
            DocumentKind::Text => "text",
        }
    }
}

/// One source document as handed over by the loading layer.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RawDocument {
    pub text: String,
    pub source: String,
    pub kind: DocumentKind,
}

impl RawDocument {
    pub fn new<T: Into<String>, S: Into<String>>(text: T, source: S, kind: DocumentKind) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            kind,
        }
    }
}

/// One indexed chunk of a source document. `id` is the chunk's ordinal
/// position in the store; `(source, chunk_index)` is unique per build.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Chunk {
    pub id: u32,
    pub content: String,
    pub source: String,
    pub title: String,
    pub chunk_index: u32,
    pub metadata: serde_json::Map<String, Value>,
}

/// Seam to the document acquisition layer. Implementations hand over
/// raw documents; discovery and file parsing stay outside this crate.
pub trait DocumentProvider: Send + Sync {
    fn load_documents(&self) -> Result<Vec<RawDocument>>;
}

impl DocumentProvider for Vec<RawDocument> {
    fn load_documents(&self) -> Result<Vec<RawDocument>> {
        Ok(self.clone())
    }
}
