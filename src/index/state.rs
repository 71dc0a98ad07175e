use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::analysis::tokenize;
use crate::document::Chunk;

/// One posting: a chunk ordinal and the term's frequency within it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Posting {
    pub doc_id: u32,
    pub term_frequency: u32,
}

/// The derived search structures for one corpus build.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexState {
    pub k1: f32,
    pub b: f32,
    pub postings: FxHashMap<String, Vec<Posting>>,
    pub doc_freqs: FxHashMap<String, u32>,
    pub doc_lengths: Vec<u32>,
    pub avg_doc_length: f32,
    pub vocab: FxHashSet<String>,
}

impl IndexState {
    /// Tokenizes every chunk in parallel, then folds the per-chunk term
    /// counts into postings, document frequencies, and length stats.
    /// Ordinals are assigned in store order during the sequential fold,
    /// so repeated builds over the same store are structurally identical.
    pub fn build(chunks: &[Chunk], k1: f32, b: f32) -> Self {
        let counted: Vec<(u32, FxHashMap<String, u32>)> = chunks
            .par_iter()
            .map(|chunk| {
                let tokens = tokenize(&chunk.content);
                let length = tokens.len() as u32;
                let mut freqs: FxHashMap<String, u32> = FxHashMap::default();
                for token in tokens {
                    *freqs.entry(token).or_insert(0) += 1;
                }
                (length, freqs)
            })
            .collect();

        let mut postings: FxHashMap<String, Vec<Posting>> = FxHashMap::default();
        let mut doc_freqs: FxHashMap<String, u32> = FxHashMap::default();
        let mut doc_lengths = Vec::with_capacity(counted.len());
        let mut total_length = 0u64;

        for (ordinal, (length, freqs)) in counted.into_iter().enumerate() {
            let doc_id = ordinal as u32;
            doc_lengths.push(length);
            total_length += length as u64;

            for (term, term_frequency) in freqs {
                *doc_freqs.entry(term.clone()).or_insert(0) += 1;
                postings.entry(term).or_default().push(Posting {
                    doc_id,
                    term_frequency,
                });
            }
        }

        let avg_doc_length = if doc_lengths.is_empty() {
            0.0
        } else {
            total_length as f32 / doc_lengths.len() as f32
        };

        let vocab: FxHashSet<String> = postings.keys().cloned().collect();

        IndexState {
            k1,
            b,
            postings,
            doc_freqs,
            doc_lengths,
            avg_doc_length,
            vocab,
        }
    }

    pub fn num_docs(&self) -> u32 {
        self.doc_lengths.len() as u32
    }

    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_lengths.is_empty()
    }
}
