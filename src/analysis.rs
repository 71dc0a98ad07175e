use deunicode::deunicode;
use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;

const MIN_TOKEN_LEN: usize = 2;

static STOPWORDS: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is",
        "it", "its", "of", "on", "that", "the", "to", "was", "were", "will", "with", "this",
        "but", "they", "have", "had", "what", "when", "where", "who", "which", "why", "how",
        "all", "each", "every", "both", "few", "more", "most", "other", "some", "such", "no",
        "nor", "not", "only", "own", "same", "so", "than", "too", "very", "can", "just",
        "should", "now",
    ]
    .into_iter()
    .collect()
});

/// Splits text into lowercase index terms: alphanumeric runs that may
/// carry internal hyphens, minus stopwords and single characters.
/// Document content and queries go through the same function.
pub fn tokenize(text: &str) -> Vec<String> {
    let folded = deunicode(text).to_lowercase();
    let mut tokens = Vec::new();
    let mut current = String::new();

    for c in folded.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            current.push(c);
        } else {
            flush_token(&mut current, &mut tokens);
        }
    }
    flush_token(&mut current, &mut tokens);

    tokens
}

fn flush_token(current: &mut String, tokens: &mut Vec<String>) {
    if current.is_empty() {
        return;
    }
    let term = current.trim_matches('-');
    if term.len() >= MIN_TOKEN_LEN && !STOPWORDS.contains(term) {
        tokens.push(term.to_string());
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_splits_on_punctuation() {
        assert_eq!(
            tokenize("Neural interfaces; (implanted!)"),
            vec!["neural", "interfaces", "implanted"]
        );
    }

    #[test]
    fn keeps_internal_hyphens() {
        assert_eq!(
            tokenize("de-novo FDA-cleared pathway"),
            vec!["de-novo", "fda-cleared", "pathway"]
        );
    }

    #[test]
    fn strips_leading_and_trailing_hyphens() {
        assert_eq!(tokenize("-pre- post-op- --"), vec!["pre", "post-op"]);
    }

    #[test]
    fn drops_stopwords_and_single_characters() {
        assert_eq!(tokenize("the risk of a device"), vec!["risk", "device"]);
        assert!(tokenize("a I x 9").is_empty());
    }

    #[test]
    fn keeps_numeric_tokens() {
        assert_eq!(tokenize("510(k) clearance in 2024"), vec!["510", "clearance", "2024"]);
    }

    #[test]
    fn folds_accents_to_ascii() {
        assert_eq!(tokenize("café naïve"), vec!["cafe", "naive"]);
    }

    #[test]
    fn empty_and_symbol_only_inputs_yield_nothing() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  \n\t ...!!! ---").is_empty());
    }

    #[test]
    fn is_deterministic() {
        let text = "Chronic implant-site infection; see §3.2 of the 510(k) summary.";
        assert_eq!(tokenize(text), tokenize(text));
    }
}
