use rkyv::{Archive, Deserialize, Serialize as RkyvSerialize};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::codec::{decode_postings, encode_postings};
use super::state::{IndexState, Posting};
use crate::document::Chunk;
use crate::error::{Result, SearchError};

pub const SCHEMA_VERSION: u32 = 1;

pub const META_FILE: &str = "documents.json";
pub const POSTINGS_FILE: &str = "postings.bin";

/// Human-inspectable artifact: the chunk store plus the scoring
/// parameters the index was built with.
#[derive(SerdeSerialize, SerdeDeserialize)]
struct MetaArtifact {
    schema_version: u32,
    k1: f32,
    b: f32,
    chunks: Vec<Chunk>,
}

/// Binary artifact: the derived index structures, posting lists encoded
/// through the varint codec.
#[derive(Archive, RkyvSerialize, Deserialize)]
#[rkyv(derive(Debug))]
struct PostingsArtifact {
    schema_version: u32,
    doc_lengths: Vec<u32>,
    avg_doc_length: f32,
    doc_freqs: HashMap<String, u32>,
    vocab: Vec<String>,
    terms: HashMap<String, Vec<u8>>,
}

pub fn save(dir: &Path, chunks: &[Chunk], index: &IndexState) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    let meta = MetaArtifact {
        schema_version: SCHEMA_VERSION,
        k1: index.k1,
        b: index.b,
        chunks: chunks.to_vec(),
    };
    let json = serde_json::to_string_pretty(&meta)?;
    std::fs::write(dir.join(META_FILE), json)?;

    let mut vocab: Vec<String> = index.vocab.iter().cloned().collect();
    vocab.sort_unstable();

    let artifact = PostingsArtifact {
        schema_version: SCHEMA_VERSION,
        doc_lengths: index.doc_lengths.clone(),
        avg_doc_length: index.avg_doc_length,
        doc_freqs: index
            .doc_freqs
            .iter()
            .map(|(term, df)| (term.clone(), *df))
            .collect(),
        vocab,
        terms: index
            .postings
            .iter()
            .map(|(term, postings)| (term.clone(), encode_postings(postings)))
            .collect(),
    };

    let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(&artifact)
        .map_err(|e| SearchError::index_error(format!("encode postings artifact: {e}")))?;
    let file = File::create(dir.join(POSTINGS_FILE))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&bytes)?;
    writer.flush()?;

    tracing::info!(
        "saved search index to {}: {} chunks, {} terms",
        dir.display(),
        chunks.len(),
        index.num_terms()
    );
    Ok(())
}

/// Loads the cached index pair from `dir`. Any missing file, schema
/// mismatch, decode failure, or disagreement between the two artifacts
/// means there is no usable cache, reported as `None`.
pub fn load(dir: &Path) -> Option<(Vec<Chunk>, IndexState)> {
    let meta_path = dir.join(META_FILE);
    let postings_path = dir.join(POSTINGS_FILE);
    if !meta_path.exists() || !postings_path.exists() {
        return None;
    }

    let raw = match std::fs::read_to_string(&meta_path) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!("cannot read {}: {e}", meta_path.display());
            return None;
        }
    };
    let meta: MetaArtifact = match serde_json::from_str(&raw) {
        Ok(meta) => meta,
        Err(e) => {
            tracing::warn!("cannot parse {}: {e}", meta_path.display());
            return None;
        }
    };
    if meta.schema_version != SCHEMA_VERSION {
        tracing::warn!(
            "metadata artifact is schema v{}, expected v{}",
            meta.schema_version,
            SCHEMA_VERSION
        );
        return None;
    }

    let bytes = match std::fs::read(&postings_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("cannot read {}: {e}", postings_path.display());
            return None;
        }
    };
    let mut aligned = rkyv::util::AlignedVec::<16>::new();
    aligned.extend_from_slice(&bytes);

    let archived = match rkyv::access::<ArchivedPostingsArtifact, rkyv::rancor::Error>(&aligned) {
        Ok(archived) => archived,
        Err(e) => {
            tracing::warn!("postings artifact is unreadable: {e}");
            return None;
        }
    };
    let artifact: PostingsArtifact =
        match rkyv::deserialize::<PostingsArtifact, rkyv::rancor::Error>(archived) {
            Ok(artifact) => artifact,
            Err(e) => {
                tracing::warn!("postings artifact does not deserialize: {e}");
                return None;
            }
        };

    rebuild_state(meta, artifact)
}

fn rebuild_state(meta: MetaArtifact, artifact: PostingsArtifact) -> Option<(Vec<Chunk>, IndexState)> {
    if artifact.schema_version != SCHEMA_VERSION {
        tracing::warn!(
            "postings artifact is schema v{}, expected v{}",
            artifact.schema_version,
            SCHEMA_VERSION
        );
        return None;
    }
    if meta.chunks.len() != artifact.doc_lengths.len() {
        tracing::warn!(
            "artifacts disagree: {} chunks vs {} document lengths",
            meta.chunks.len(),
            artifact.doc_lengths.len()
        );
        return None;
    }
    if artifact.terms.len() != artifact.doc_freqs.len()
        || artifact.terms.len() != artifact.vocab.len()
    {
        tracing::warn!("artifacts disagree on vocabulary size");
        return None;
    }

    let num_docs = artifact.doc_lengths.len();
    let mut postings: FxHashMap<String, Vec<Posting>> = FxHashMap::default();
    for (term, blob) in &artifact.terms {
        let list = decode_postings(blob);
        let df = match artifact.doc_freqs.get(term) {
            Some(df) => *df,
            None => {
                tracing::warn!("no document frequency recorded for {term:?}");
                return None;
            }
        };
        if list.len() as u32 != df {
            tracing::warn!("posting list for {term:?} does not match its document frequency");
            return None;
        }
        if list.iter().any(|p| p.doc_id as usize >= num_docs) {
            tracing::warn!("posting list for {term:?} references unknown documents");
            return None;
        }
        postings.insert(term.clone(), list);
    }

    // Equal sizes plus membership both ways: the three key sets agree.
    let vocab: FxHashSet<String> = artifact.vocab.into_iter().collect();
    if vocab.len() != postings.len() || !vocab.iter().all(|term| postings.contains_key(term)) {
        tracing::warn!("vocabulary does not match the posting terms");
        return None;
    }

    let index = IndexState {
        k1: meta.k1,
        b: meta.b,
        postings,
        doc_freqs: artifact.doc_freqs.into_iter().collect(),
        doc_lengths: artifact.doc_lengths,
        avg_doc_length: artifact.avg_doc_length,
        vocab,
    };

    tracing::info!(
        "loaded cached search index: {} chunks, {} terms",
        meta.chunks.len(),
        index.num_terms()
    );
    Some((meta.chunks, index))
}
