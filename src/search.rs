use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::analysis::tokenize;
use crate::document::Chunk;
use crate::index::IndexState;

/// One ranked hit, carrying enough of the chunk to render without a
/// second lookup.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SearchResult {
    pub document_id: u32,
    pub content: String,
    pub source: String,
    pub title: String,
    pub score: f32,
    pub chunk_index: u32,
}

/// Runs a BM25-ranked query against a built index, returning at most
/// `top_k` results ordered by descending score. Equal scores fall back
/// to chunk ordinal so repeated runs return the same order.
pub fn execute(index: &IndexState, chunks: &[Chunk], query: &str, top_k: usize) -> Vec<SearchResult> {
    if top_k == 0 {
        return vec![];
    }
    let tokens = tokenize(query);
    if tokens.is_empty() {
        return vec![];
    }
    if index.avg_doc_length <= 0.0 {
        return vec![];
    }

    let num_docs = index.num_docs() as f32;
    let mut doc_scores: FxHashMap<u32, f32> = FxHashMap::default();

    for token in &tokens {
        let df = match index.doc_freqs.get(token) {
            Some(df) => *df,
            None => continue,
        };
        let postings = match index.postings.get(token) {
            Some(postings) => postings,
            None => continue,
        };

        // Smoothed IDF, computed once per query occurrence of the term.
        let idf = ((num_docs - df as f32 + 0.5) / (df as f32 + 0.5) + 1.0).ln();

        for posting in postings {
            let doc_len = index
                .doc_lengths
                .get(posting.doc_id as usize)
                .copied()
                .unwrap_or(0) as f32;

            let tf = posting.term_frequency as f32;
            let numerator = tf * (index.k1 + 1.0);
            let denominator =
                tf + index.k1 * (1.0 - index.b + index.b * doc_len / index.avg_doc_length);

            *doc_scores.entry(posting.doc_id).or_insert(0.0) += idf * numerator / denominator;
        }
    }

    let mut ranked: Vec<(u32, f32)> = doc_scores
        .into_iter()
        .filter(|(_, score)| *score > 0.0)
        .collect();
    ranked.sort_unstable_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked.truncate(top_k);

    ranked
        .into_iter()
        .filter_map(|(doc_id, score)| {
            let chunk = chunks.get(doc_id as usize)?;
            Some(SearchResult {
                document_id: doc_id,
                content: chunk.content.clone(),
                source: chunk.source.clone(),
                title: chunk.title.clone(),
                score,
                chunk_index: chunk.chunk_index,
            })
        })
        .collect()
}
