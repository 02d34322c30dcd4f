use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

const TOP_KEYWORD_LIMIT: usize = 10;
const MIN_TOKEN_CHARS: usize = 3;

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "was",
        "one", "our", "out", "has", "have", "been", "being", "were", "will", "with", "this",
        "that", "these", "those", "they", "them", "their", "then", "than", "there", "here",
        "from", "into", "onto", "over", "under", "about", "after", "before", "between", "during",
        "through", "above", "below", "again", "further", "once", "more", "most", "other", "some",
        "such", "only", "own", "same", "very", "just", "should", "could", "would", "also", "its",
        "his", "she", "him", "who", "whom", "what", "which", "when", "where", "why", "how",
        "your", "yours", "per", "via", "each", "both", "few", "nor", "too", "does", "did", "doing",
    ]
    .into_iter()
    .collect()
});

/// The ten most frequent content words of the visible page text.
/// Tokens shorter than three characters, non-alphabetic tokens and stop
/// words are dropped; frequency ties keep first-encountered order.
pub fn top_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();

    for raw in lowered.split_whitespace() {
        let token = raw.trim_matches(|c: char| !c.is_alphanumeric());
        if token.chars().count() < MIN_TOKEN_CHARS {
            continue;
        }
        if !token.chars().all(char::is_alphabetic) {
            continue;
        }
        if STOP_WORDS.contains(token) {
            continue;
        }

        let count = counts.entry(token).or_insert(0);
        if *count == 0 {
            first_seen.push(token);
        }
        *count += 1;
    }

    // Stable sort: equal counts stay in first-seen order.
    first_seen.sort_by_key(|token| std::cmp::Reverse(counts[token]));
    first_seen
        .into_iter()
        .take(TOP_KEYWORD_LIMIT)
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_ranking() {
        let text = "rust rust rust tokio tokio async";
        assert_eq!(top_keywords(text), vec!["rust", "tokio", "async"]);
    }

    #[test]
    fn test_drops_stop_words_and_short_tokens() {
        let text = "the cat and a dog sat on the mat with it";
        assert_eq!(top_keywords(text), vec!["cat", "dog", "sat", "mat"]);
    }

    #[test]
    fn test_drops_tokens_with_digits_or_punctuation() {
        let text = "version2 foo3bar plain o'clock hyphen-ated plain";
        assert_eq!(top_keywords(text), vec!["plain"]);
    }

    #[test]
    fn test_strips_surrounding_punctuation() {
        let text = "hello, world! (hello)";
        assert_eq!(top_keywords(text), vec!["hello", "world"]);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let text = "zebra apple zebra apple mango mango";
        assert_eq!(top_keywords(text), vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_limit_is_ten() {
        let text = "aaa bbb ccc ddd eee fff ggg hhh iii jjj kkk lll";
        assert_eq!(top_keywords(text).len(), 10);
    }

    #[test]
    fn test_case_folding() {
        let text = "Rust RUST rust";
        assert_eq!(top_keywords(text), vec!["rust"]);
    }
}
