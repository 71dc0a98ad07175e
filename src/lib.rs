//! Ranked full-text search over chunked documents.
//!
//! Documents are split into overlapping chunks, chunks are tokenized into
//! an inverted index, and queries are answered by BM25 scoring. The built
//! index round-trips through an on-disk cache so later runs skip the
//! build.
//!
//! ```
//! use docsearch::{DocumentKind, RawDocument, SearchConfig, SearchEngine};
//!
//! let dir = tempfile::tempdir()?;
//! let docs = vec![
//!     RawDocument::new("# Guide\n\nimplant care basics", "guide.md", DocumentKind::Markdown),
//!     RawDocument::new("device recall notice", "recall.txt", DocumentKind::Text),
//! ];
//!
//! let engine = SearchEngine::new(SearchConfig::with_index_dir(dir.path()), docs);
//! let hits = engine.search("implant")?;
//! assert_eq!(hits[0].title, "Guide");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod analysis;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod index;
pub mod search;

pub use config::SearchConfig;
pub use document::{Chunk, DocumentKind, DocumentProvider, RawDocument};
pub use engine::SearchEngine;
pub use error::{Result, SearchError};
pub use search::SearchResult;
