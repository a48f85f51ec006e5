use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref RE: Regex = Regex::new(r"[\p{L}\p{N}]+").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","cannot","could",
            "did","do","does","doing","down","during",
            "each","few","for","from","further",
            "had","has","have","having","he","her","here","hers","herself","him","himself","his","how",
            "i","if","in","into","is","it","its","itself",
            "me","more","most","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","should","so","some","such",
            "than","that","the","their","theirs","them","themselves","then","there","these","they","this","those","through","to","too",
            "under","until","up","very",
            "was","we","were","what","when","where","which","while","who","whom","why","with","would",
            "you","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

/// Optional normalization steps layered on top of the base rule
/// (lower-case, split on anything that is not a letter or digit).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerConfig {
    /// Apply NFKC normalization before lower-casing.
    #[serde(default)]
    pub normalize_unicode: bool,
    #[serde(default)]
    pub remove_stopwords: bool,
    /// English Snowball stemming.
    #[serde(default)]
    pub stem: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tokenizer {
    config: TokenizerConfig,
}

impl Tokenizer {
    pub fn new(config: TokenizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> TokenizerConfig {
        self.config
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = if self.config.normalize_unicode {
            text.nfkc().collect::<String>().to_lowercase()
        } else {
            text.to_lowercase()
        };
        let mut tokens = Vec::new();
        for mat in RE.find_iter(&lowered) {
            let token = mat.as_str();
            if self.config.remove_stopwords && STOPWORDS.contains(token) {
                continue;
            }
            if self.config.stem {
                tokens.push(STEMMER.stem(token).into_owned());
            } else {
                tokens.push(token.to_string());
            }
        }
        tokens
    }
}

/// Tokenize with the default rule: lower-case, alphanumeric runs only.
pub fn tokenize(text: &str) -> Vec<String> {
    Tokenizer::default().tokenize(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = tokenize("A Thrilling, space-adventure!");
        assert_eq!(t, vec!["a", "thrilling", "space", "adventure"]);
    }

    #[test]
    fn drops_empty_tokens() {
        assert!(tokenize("  ...  !!  ").is_empty());
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn stemming_is_opt_in() {
        let plain = tokenize("Running");
        assert_eq!(plain, vec!["running"]);
        let stemmed = Tokenizer::new(TokenizerConfig { stem: true, ..Default::default() }).tokenize("Running");
        assert_eq!(stemmed, vec!["run"]);
    }
}
