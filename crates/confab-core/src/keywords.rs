//! Keyword extraction for agent matching
//!
//! Normalizes a free-text message into a deduplicated set of lowercase
//! tokens. Splitting is strictly on single spaces, so a contiguous CJK run
//! stays one token; the stop-word and tag lists downstream are tuned to
//! that behavior and it must not be replaced with proper segmentation.

use std::collections::HashSet;

/// Punctuation and symbol characters removed before tokenization.
const PUNCTUATION: &[char] = &[
    '.', ',', '/', '#', '!', '$', '%', '^', '&', '*', ';', ':', '{', '}', '=', '-', '_', '`',
    '~', '(', ')',
];

/// Common function words never treated as keywords.
const STOP_WORDS: &[&str] = &[
    "的", "了", "是", "在", "我", "有", "和", "就", "不", "人", "都", "一", "一个", "上", "也",
    "很", "到", "说", "要", "去", "你", "会", "着", "没有", "看", "好", "自己", "这",
];

/// Extract the deduplicated keyword set from a message.
///
/// Lowercases, strips punctuation, splits on single spaces, and drops
/// tokens of one character or less as well as stop-words. Empty input
/// yields an empty set; there are no error conditions.
pub fn extract_keywords(text: &str) -> HashSet<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !PUNCTUATION.contains(c))
        .collect();

    cleaned
        .split(' ')
        .filter(|word| word.chars().count() > 1 && !STOP_WORDS.contains(word))
        .map(|word| word.to_string())
        .collect()
}
