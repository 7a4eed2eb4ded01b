//! Parameterized n-gram tokenizer behind the word/bigram/trigram frequency
//! artifacts: one cleaning + filtering pipeline, three profiles.

use ahash::AHashSet;
use anyhow::{ensure, Context, Result};
use regex::Regex;

/// Markup stripped before tokenization: URLs, mentions, hashtags, markdown
/// emphasis, HTML-escaped angle quotes, and bracketed/parenthesized spans.
const MARKUP_PATTERN: &str = r"http\S+|www\S+|@\w+|#\w+|\*+|&gt;|&lt;|\[.*?\]|\(.*?\)";

/// Function words dropped from every profile.
pub const STOPWORDS_BASIC: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "her", "was", "one",
    "our", "out", "day", "get", "has", "him", "his", "how", "its", "may", "new", "now", "old",
    "see", "two", "who", "boy", "did", "man", "way", "she", "yet", "this", "that", "with", "have",
    "will", "from", "they", "been", "were", "said", "each", "which", "their", "time", "what",
    "than", "many", "some", "very", "when", "much", "then", "them", "these", "more", "your",
    "would", "about", "think", "know", "just", "first", "into", "over", "also", "back", "after",
    "well", "only", "being", "where", "before", "here", "through", "there", "could", "should",
    "still", "such", "make", "even", "most", "other", "another", "while", "again", "come", "take",
    "want", "like", "really",
];

/// Collapsed contractions and subreddit boilerplate, additionally dropped
/// for single-word counts. Kept inside n-grams, where they carry phrase
/// structure ("dont care", "deleted comment").
pub const STOPWORDS_EXTENDED: &[&str] = &[
    "dont", "doesnt", "wasnt", "isnt", "cant", "wont", "wouldnt", "shouldnt", "couldnt", "edit",
    "deleted", "removed", "reddit", "comment", "thread", "post", "upvote", "downvote",
];

/// Tokenizer profile. The three artifact profiles are exposed as
/// constructors; `new` stays public for callers with their own needs.
pub struct TokenizerCfg {
    pub ngram: usize,
    pub min_token_len: usize,
    pub stopwords: Vec<&'static str>,
    /// Replace remaining punctuation with spaces before matching tokens.
    /// The n-gram profiles do; the word profile strips markup outright.
    pub punct_to_space: bool,
    /// Drop all-vowel and all-consonant tokens (keyboard noise like "aaaa"
    /// and "hmmm", not words).
    pub drop_degenerate: bool,
}

pub struct Tokenizer {
    ngram: usize,
    clean_re: Regex,
    token_re: Regex,
    stopwords: AHashSet<&'static str>,
    punct_to_space: bool,
    drop_degenerate: bool,
}

impl Tokenizer {
    pub fn new(cfg: TokenizerCfg) -> Result<Self> {
        ensure!(cfg.ngram >= 1, "ngram size must be at least 1");
        let clean_pattern = if cfg.punct_to_space {
            format!(r"{MARKUP_PATTERN}|[^\w\s]")
        } else {
            MARKUP_PATTERN.to_string()
        };
        let clean_re = Regex::new(&clean_pattern).context("tokenizer cleaning pattern")?;
        let token_re = Regex::new(&format!(r"\b[a-z]{{{},}}\b", cfg.min_token_len))
            .context("tokenizer token pattern")?;
        Ok(Self {
            ngram: cfg.ngram,
            clean_re,
            token_re,
            stopwords: cfg.stopwords.into_iter().collect(),
            punct_to_space: cfg.punct_to_space,
            drop_degenerate: cfg.drop_degenerate,
        })
    }

    /// Profile for `word_frequencies`: single tokens of 4+ letters, the full
    /// stopword set, degenerate tokens dropped.
    pub fn words() -> Result<Self> {
        let mut stopwords = STOPWORDS_BASIC.to_vec();
        stopwords.extend_from_slice(STOPWORDS_EXTENDED);
        Self::new(TokenizerCfg {
            ngram: 1,
            min_token_len: 4,
            stopwords,
            punct_to_space: false,
            drop_degenerate: true,
        })
    }

    /// Profile for `bigram_frequencies`: pairs of 3+ letter tokens, basic
    /// stopwords only.
    pub fn bigrams() -> Result<Self> {
        Self::new(TokenizerCfg {
            ngram: 2,
            min_token_len: 3,
            stopwords: STOPWORDS_BASIC.to_vec(),
            punct_to_space: true,
            drop_degenerate: false,
        })
    }

    /// Profile for `trigram_frequencies`: triples of 3+ letter tokens.
    pub fn trigrams() -> Result<Self> {
        Self::new(TokenizerCfg {
            ngram: 3,
            min_token_len: 3,
            stopwords: STOPWORDS_BASIC.to_vec(),
            punct_to_space: true,
            drop_degenerate: false,
        })
    }

    /// Extract n-grams from one text. All filters run before grams are
    /// formed, so a dropped token never appears inside a pair or triple,
    /// and the pair "a b" means a and b were adjacent survivors.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let cleaned = if self.punct_to_space {
            self.clean_re.replace_all(&lowered, " ")
        } else {
            self.clean_re.replace_all(&lowered, "")
        };
        let kept: Vec<&str> = self
            .token_re
            .find_iter(cleaned.as_ref())
            .map(|m| m.as_str())
            .filter(|t| !self.stopwords.contains(*t))
            .filter(|t| !self.drop_degenerate || !is_degenerate(t))
            .collect();
        if self.ngram == 1 {
            kept.into_iter().map(str::to_string).collect()
        } else if kept.len() >= self.ngram {
            kept.windows(self.ngram).map(|w| w.join(" ")).collect()
        } else {
            Vec::new()
        }
    }
}

fn is_degenerate(token: &str) -> bool {
    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u');
    token.chars().all(is_vowel) || token.chars().all(|c| !is_vowel(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_strip_markup_and_noise() {
        let t = Tokenizer::words().unwrap();
        let tokens = t.extract(
            "Check https://example.com and www.foo.bar @user #tag **bold** \
             [link](http://x) &gt; quoted episode",
        );
        assert_eq!(tokens, vec!["check", "bold", "quoted", "episode"]);
    }

    #[test]
    fn words_enforce_length_and_stopwords() {
        let t = Tokenizer::words().unwrap();
        assert!(t.extract("the cat sat on it").is_empty());
        assert!(t.extract("this that with have dont deleted").is_empty());
        assert_eq!(t.extract("great episode"), vec!["great", "episode"]);
    }

    #[test]
    fn words_drop_degenerate_tokens() {
        let t = Tokenizer::words().unwrap();
        assert!(t.extract("aaaa hmmm rhythm").is_empty());
    }

    #[test]
    fn emphasis_marks_join_in_word_profile_and_split_in_ngram_profile() {
        // Markup is deleted outright for single words, so a token broken by
        // emphasis marks fuses back together. The n-gram profiles replace
        // with spaces instead, keeping the break.
        let words = Tokenizer::words().unwrap();
        assert_eq!(words.extract("epis*ode"), vec!["episode"]);
        let bigrams = Tokenizer::bigrams().unwrap();
        assert_eq!(bigrams.extract("epis*ode"), vec!["epis ode"]);
    }

    #[test]
    fn bigrams_pair_adjacent_survivors() {
        let t = Tokenizer::bigrams().unwrap();
        assert_eq!(
            t.extract("the great finale was amazing"),
            vec!["great finale", "finale amazing"]
        );
        assert_eq!(t.extract("good, bad"), vec!["good bad"]);
        assert!(t.extract("one word").len() <= 1);
    }

    #[test]
    fn trigrams_need_three_survivors() {
        let t = Tokenizer::trigrams().unwrap();
        assert!(t.extract("great finale").is_empty());
        assert_eq!(
            t.extract("great finale amazing ending"),
            vec!["great finale amazing", "finale amazing ending"]
        );
    }
}
