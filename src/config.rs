use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_K1: f32 = 1.5;
pub const DEFAULT_B: f32 = 0.75;
pub const DEFAULT_CHUNK_SIZE: usize = 500;
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;
pub const DEFAULT_TOP_K: usize = 5;

/// Tuning parameters for chunking and scoring, plus the location of the
/// on-disk index cache.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct SearchConfig {
    pub k1: f32,
    pub b: f32,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub default_top_k: usize,
    pub index_dir: PathBuf,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            k1: DEFAULT_K1,
            b: DEFAULT_B,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            default_top_k: DEFAULT_TOP_K,
            index_dir: PathBuf::from("index"),
        }
    }
}

impl SearchConfig {
    pub fn with_index_dir<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            index_dir: dir.into(),
            ..Default::default()
        }
    }
}
