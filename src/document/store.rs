use rayon::prelude::*;
use serde_json::json;

use super::chunker::chunk_text;
use super::{Chunk, DocumentKind, RawDocument};

/// Chunks every raw document and assembles the ordered chunk store.
/// Chunking runs per document in parallel; ids are assigned afterwards
/// in input order, so the same corpus always yields the same store.
pub fn build_store(docs: &[RawDocument], chunk_size: usize, chunk_overlap: usize) -> Vec<Chunk> {
    let per_doc: Vec<(String, Vec<String>)> = docs
        .par_iter()
        .map(|doc| {
            let title = extract_title(&doc.text, &doc.source, doc.kind);
            (title, chunk_text(&doc.text, chunk_size, chunk_overlap))
        })
        .collect();

    let mut store = Vec::new();
    let mut next_id = 0u32;

    for (doc, (title, pieces)) in docs.iter().zip(per_doc) {
        let total = pieces.len();
        for (chunk_index, content) in pieces.into_iter().enumerate() {
            let mut metadata = serde_json::Map::new();
            metadata.insert("file_type".to_string(), json!(doc.kind.as_str()));
            metadata.insert("total_chunks".to_string(), json!(total));

            store.push(Chunk {
                id: next_id,
                content,
                source: doc.source.clone(),
                title: title.clone(),
                chunk_index: chunk_index as u32,
                metadata,
            });
            next_id += 1;
        }
    }

    store
}

/// Best-effort human title: the first `# ` heading for markdown, the
/// normalized file stem otherwise.
pub fn extract_title(text: &str, source: &str, kind: DocumentKind) -> String {
    if kind == DocumentKind::Markdown {
        if let Some(title) = first_heading(text) {
            return title;
        }
    }
    humanize_stem(source)
}

fn first_heading(text: &str) -> Option<String> {
    for line in text.lines() {
        if let Some(rest) = line.strip_prefix('#') {
            if rest.starts_with(char::is_whitespace) {
                let title = rest.trim();
                if !title.is_empty() {
                    return Some(title.to_string());
                }
            }
        }
    }
    None
}

fn humanize_stem(source: &str) -> String {
    let name = source.rsplit(['/', '\\']).next().unwrap_or(source);
    let stem = match name.rsplit_once('.') {
        Some(("", _)) | None => name,
        Some((stem, _)) => stem,
    };

    stem.split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn doc(text: &str, source: &str, kind: DocumentKind) -> RawDocument {
        RawDocument::new(text, source, kind)
    }

    #[test]
    fn ids_are_ordinal_across_sources() {
        let long = "alpha ".repeat(120);
        let docs = vec![
            doc(&long, "docs/first.md", DocumentKind::Markdown),
            doc("short file", "docs/second.txt", DocumentKind::Text),
        ];
        let store = build_store(&docs, 500, 50);

        assert!(store.len() >= 3);
        let ids: Vec<u32> = store.iter().map(|c| c.id).collect();
        assert_eq!(ids, (0..store.len() as u32).collect::<Vec<_>>());
    }

    #[test]
    fn chunk_index_restarts_per_source() {
        let long = "alpha ".repeat(120);
        let docs = vec![
            doc(&long, "docs/first.md", DocumentKind::Markdown),
            doc("short file", "docs/second.txt", DocumentKind::Text),
        ];
        let store = build_store(&docs, 500, 50);

        let first: Vec<u32> = store
            .iter()
            .filter(|c| c.source == "docs/first.md")
            .map(|c| c.chunk_index)
            .collect();
        assert_eq!(first, (0..first.len() as u32).collect::<Vec<_>>());

        let second: Vec<u32> = store
            .iter()
            .filter(|c| c.source == "docs/second.txt")
            .map(|c| c.chunk_index)
            .collect();
        assert_eq!(second, vec![0]);
    }

    #[test]
    fn source_and_chunk_index_pairs_are_unique() {
        let long = "beta ".repeat(200);
        let docs = vec![
            doc(&long, "a.txt", DocumentKind::Text),
            doc(&long, "b.txt", DocumentKind::Text),
        ];
        let store = build_store(&docs, 300, 30);

        let pairs: HashSet<(String, u32)> = store
            .iter()
            .map(|c| (c.source.clone(), c.chunk_index))
            .collect();
        assert_eq!(pairs.len(), store.len());
    }

    #[test]
    fn markdown_title_comes_from_the_first_heading() {
        let text = "intro line\n\n# Device Classification\n\n## Details\n\nBody text.";
        let store = build_store(&[doc(text, "docs/classification.md", DocumentKind::Markdown)], 500, 50);
        assert!(store.iter().all(|c| c.title == "Device Classification"));
    }

    #[test]
    fn markdown_without_heading_falls_back_to_the_filename() {
        let store = build_store(
            &[doc("no heading here", "docs/fda_pathways.md", DocumentKind::Markdown)],
            500,
            50,
        );
        assert_eq!(store[0].title, "Fda Pathways");
    }

    #[test]
    fn subheadings_are_not_titles() {
        let store = build_store(
            &[doc("## Secondary\n\nbody", "notes/overview_notes.md", DocumentKind::Markdown)],
            500,
            50,
        );
        assert_eq!(store[0].title, "Overview Notes");
    }

    #[test]
    fn non_markdown_titles_use_the_normalized_stem() {
        let store = build_store(
            &[doc("{\"a\": 1}", "data/trial_registry.json", DocumentKind::Json)],
            500,
            50,
        );
        assert_eq!(store[0].title, "Trial Registry");
    }

    #[test]
    fn metadata_carries_file_type_and_total_chunks() {
        let store = build_store(&[doc("para one\n\npara two", "a.md", DocumentKind::Markdown)], 500, 50);
        assert_eq!(store.len(), 1);
        assert_eq!(store[0].metadata["file_type"], "markdown");
        assert_eq!(store[0].metadata["total_chunks"], 1);
    }

    #[test]
    fn empty_inputs_produce_an_empty_store() {
        assert!(build_store(&[], 500, 50).is_empty());

        let store = build_store(&[doc("", "empty.txt", DocumentKind::Text)], 500, 50);
        assert!(store.is_empty());
    }

    #[test]
    fn zero_chunk_size_produces_an_empty_store() {
        let store = build_store(&[doc("some text", "a.txt", DocumentKind::Text)], 0, 0);
        assert!(store.is_empty());
    }
}
