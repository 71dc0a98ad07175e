use rustc_hash::FxHashSet;
use std::sync::{Arc, RwLock};

use crate::config::SearchConfig;
use crate::document::{build_store, Chunk, DocumentProvider};
use crate::error::{Result, SearchError};
use crate::index::{persist, IndexState};
use crate::search::{self, SearchResult};

const RELATED_POOL: usize = 10;
const RELATED_LIMIT: usize = 5;

/// The chunk store and its derived index, published together so readers
/// always see a matching pair.
struct IndexHandle {
    chunks: Vec<Chunk>,
    index: IndexState,
}

/// Owns the index lifecycle: load-or-build on initialization, lazy
/// initialization on first search, atomic swap on rebuild.
pub struct SearchEngine {
    config: SearchConfig,
    provider: Box<dyn DocumentProvider>,
    live: RwLock<Option<Arc<IndexHandle>>>,
}

impl SearchEngine {
    pub fn new<P>(config: SearchConfig, provider: P) -> Self
    where
        P: DocumentProvider + 'static,
    {
        Self {
            config,
            provider: Box::new(provider),
            live: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Brings the engine to a ready state. Without `force_rebuild` this
    /// is a no-op when already ready, and prefers the on-disk cache over
    /// a fresh build. A forced rebuild always pulls documents from the
    /// provider and replaces the live index once the new one is complete.
    pub fn initialize(&self, force_rebuild: bool) -> Result<()> {
        if !force_rebuild {
            if self.live.read().unwrap().is_some() {
                return Ok(());
            }
            if let Some((chunks, index)) = persist::load(&self.config.index_dir) {
                self.publish(chunks, index);
                return Ok(());
            }
        }
        self.build_from_provider()
    }

    pub fn rebuild(&self) -> Result<()> {
        self.initialize(true)
    }

    /// Drops the live index. The next search re-initializes lazily.
    pub fn teardown(&self) {
        *self.live.write().unwrap() = None;
    }

    /// Ranked search with the configured default result limit.
    pub fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.search_top_k(query, self.config.default_top_k)
    }

    /// Ranked search with an explicit result limit. Initializes the
    /// engine first if no index is live. No-match and empty-query cases
    /// return an empty vector, never an error.
    pub fn search_top_k(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        let handle = match self.handle() {
            Some(handle) => handle,
            None => {
                self.initialize(false)?;
                self.handle()
                    .ok_or_else(|| SearchError::index_error("no live index after initialization"))?
            }
        };
        Ok(search::execute(&handle.index, &handle.chunks, query, top_k))
    }

    /// Distinct titles among the strongest matches for `query`, in
    /// relevance order, capped at five.
    pub fn related_titles(&self, query: &str) -> Result<Vec<String>> {
        let results = self.search_top_k(query, RELATED_POOL)?;
        let mut seen = FxHashSet::default();
        let mut titles = Vec::new();
        for result in results {
            if seen.insert(result.title.clone()) {
                titles.push(result.title);
            }
            if titles.len() == RELATED_LIMIT {
                break;
            }
        }
        Ok(titles)
    }

    pub fn is_ready(&self) -> bool {
        self.live.read().unwrap().is_some()
    }

    pub fn doc_count(&self) -> u32 {
        self.handle().map(|h| h.index.num_docs()).unwrap_or(0)
    }

    pub fn term_count(&self) -> usize {
        self.handle().map(|h| h.index.num_terms()).unwrap_or(0)
    }

    pub fn avg_doc_length(&self) -> f32 {
        self.handle().map(|h| h.index.avg_doc_length).unwrap_or(0.0)
    }

    fn handle(&self) -> Option<Arc<IndexHandle>> {
        self.live.read().unwrap().clone()
    }

    fn build_from_provider(&self) -> Result<()> {
        let documents = self.provider.load_documents()?;
        let chunks = build_store(&documents, self.config.chunk_size, self.config.chunk_overlap);
        let index = IndexState::build(&chunks, self.config.k1, self.config.b);
        tracing::info!(
            "built search index: {} documents, {} chunks, {} terms",
            documents.len(),
            chunks.len(),
            index.num_terms()
        );
        if let Err(e) = persist::save(&self.config.index_dir, &chunks, &index) {
            tracing::warn!("search index not persisted: {e}");
        }
        self.publish(chunks, index);
        Ok(())
    }

    fn publish(&self, chunks: Vec<Chunk>, index: IndexState) {
        *self.live.write().unwrap() = Some(Arc::new(IndexHandle { chunks, index }));
    }
}
