//! Lexicon/rule sentiment scorer. Produces the conventional four-dimensional
//! polarity output: `neg`/`neu`/`pos` proportions plus a normalized
//! `compound` in [-1, 1]. Rules cover degree modifiers with distance decay,
//! negation windows, ALL-CAPS emphasis, "but"-clause reweighting, and
//! terminal punctuation emphasis.

use crate::lexicon::{
    parse_lexicon, BOOSTERS, CAPS_EMPHASIS, NEGATIONS, NEGATION_SCALAR, NORMALIZE_ALPHA,
    RAW_LEXICON,
};
use crate::util::round_places;
use ahash::{AHashMap, AHashSet};
use anyhow::{Context, Result};
use serde::Serialize;

/// Four-dimensional polarity for one text. `neg`/`neu`/`pos` are proportions
/// in [0, 1] that sum to 1 (within rounding); `compound` is the overall
/// polarity in [-1, 1]. Proportions are rounded to 3 places, compound to 4.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SentimentScores {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    pub compound: f64,
}

impl SentimentScores {
    /// Score for text with nothing to say: empty, whitespace, or
    /// punctuation-only bodies.
    pub fn neutral() -> Self {
        Self { neg: 0.0, neu: 1.0, pos: 0.0, compound: 0.0 }
    }
}

pub struct SentimentIntensityAnalyzer {
    lexicon: AHashMap<String, f64>,
    boosters: AHashMap<&'static str, f64>,
    negations: AHashSet<&'static str>,
}

impl SentimentIntensityAnalyzer {
    /// Parse and validate the embedded resource tables. Construction is the
    /// readiness check: a malformed table fails here, before any row is
    /// scored, never midway through a run.
    pub fn new() -> Result<Self> {
        let lexicon = parse_lexicon(RAW_LEXICON).context("embedded sentiment lexicon")?;
        let boosters = BOOSTERS.iter().copied().collect();
        let negations = NEGATIONS.iter().copied().collect();
        Ok(Self { lexicon, boosters, negations })
    }

    /// Score one text. Total function: any input maps to valid scores, with
    /// tokenless input mapping to the neutral score.
    pub fn polarity_scores(&self, text: &str) -> SentimentScores {
        let tokens = scorer_tokens(text);
        if tokens.is_empty() {
            return SentimentScores::neutral();
        }
        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        let cap_diff = has_cap_difference(&tokens);

        let mut valences: Vec<f64> = Vec::with_capacity(tokens.len());
        for i in 0..tokens.len() {
            valences.push(self.token_valence(&tokens, &lowered, i, cap_diff));
        }
        but_clause_reweight(&lowered, &mut valences);
        assemble_scores(text, &valences)
    }

    fn token_valence(&self, tokens: &[String], lowered: &[String], i: usize, cap_diff: bool) -> f64 {
        let Some(&base) = self.lexicon.get(lowered[i].as_str()) else {
            return 0.0;
        };
        let mut valence = base;
        if cap_diff && is_all_caps(&tokens[i]) {
            if valence > 0.0 {
                valence += CAPS_EMPHASIS;
            } else if valence < 0.0 {
                valence -= CAPS_EMPHASIS;
            }
        }
        for dist in 1..=3usize {
            if dist > i {
                break;
            }
            let prev = i - dist;
            // A lexicon word never doubles as a modifier for the next one.
            if self.lexicon.contains_key(lowered[prev].as_str()) {
                continue;
            }
            let mut scalar = self.modifier_scalar(&tokens[prev], &lowered[prev], valence, cap_diff);
            if scalar != 0.0 {
                scalar *= match dist {
                    2 => 0.95,
                    3 => 0.9,
                    _ => 1.0,
                };
                valence += scalar;
            }
        }
        if self.is_negated(lowered, i) {
            valence *= NEGATION_SCALAR;
        }
        valence
    }

    fn modifier_scalar(&self, raw: &str, lower: &str, valence: f64, cap_diff: bool) -> f64 {
        let Some(&boost) = self.boosters.get(lower) else {
            return 0.0;
        };
        let mut scalar = boost;
        if valence < 0.0 {
            scalar = -scalar;
        }
        if cap_diff && is_all_caps(raw) {
            if valence > 0.0 {
                scalar += CAPS_EMPHASIS;
            } else {
                scalar -= CAPS_EMPHASIS;
            }
        }
        scalar
    }

    fn is_negated(&self, lowered: &[String], i: usize) -> bool {
        for dist in 1..=3usize {
            if dist > i {
                break;
            }
            if self.negations.contains(lowered[i - dist].as_str()) {
                return true;
            }
        }
        false
    }
}

/// Words kept for scoring: whitespace-split, leading/trailing punctuation
/// trimmed (apostrophes kept for contractions), single characters dropped.
fn scorer_tokens(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
        .filter(|w| w.chars().count() > 1)
        .map(|w| w.to_string())
        .collect()
}

fn is_all_caps(word: &str) -> bool {
    let mut has_alpha = false;
    for c in word.chars() {
        if c.is_alphabetic() {
            has_alpha = true;
            if !c.is_uppercase() {
                return false;
            }
        }
    }
    has_alpha
}

/// Emphasis only means something when the text mixes cased styles; a fully
/// shouted text gets no extra signal per word.
fn has_cap_difference(tokens: &[String]) -> bool {
    let caps = tokens.iter().filter(|t| is_all_caps(t)).count();
    caps > 0 && caps < tokens.len()
}

/// First "but" flips the emphasis of the sentence: sentiment before it is
/// halved, sentiment after it amplified by half.
fn but_clause_reweight(lowered: &[String], valences: &mut [f64]) {
    if let Some(bi) = lowered.iter().position(|w| w == "but") {
        for (i, v) in valences.iter_mut().enumerate() {
            if i < bi {
                *v *= 0.5;
            } else if i > bi {
                *v *= 1.5;
            }
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let bangs = text.chars().filter(|&c| c == '!').count().min(4);
    let exclaim = bangs as f64 * 0.292;
    let marks = text.chars().filter(|&c| c == '?').count();
    let question = if marks > 1 {
        if marks <= 3 {
            marks as f64 * 0.18
        } else {
            0.96
        }
    } else {
        0.0
    };
    exclaim + question
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + NORMALIZE_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn assemble_scores(text: &str, valences: &[f64]) -> SentimentScores {
    let sum: f64 = valences.iter().sum();
    let punct = punctuation_emphasis(text);

    let mut pos_sum = 0.0;
    let mut neg_sum = 0.0;
    let mut neu_count = 0.0;
    for &v in valences {
        // Shift each hit away from zero by one so that single weak words
        // still move the proportions.
        if v > 0.0 {
            pos_sum += v + 1.0;
        } else if v < 0.0 {
            neg_sum += v - 1.0;
        } else {
            neu_count += 1.0;
        }
    }
    if pos_sum > neg_sum.abs() {
        pos_sum += punct;
    } else if pos_sum < neg_sum.abs() {
        neg_sum -= punct;
    }
    let total = pos_sum + neg_sum.abs() + neu_count;

    let mut adjusted = sum;
    if adjusted > 0.0 {
        adjusted += punct;
    } else if adjusted < 0.0 {
        adjusted -= punct;
    }

    SentimentScores {
        neg: round_places((neg_sum / total).abs(), 3),
        neu: round_places((neu_count / total).abs(), 3),
        pos: round_places((pos_sum / total).abs(), 3),
        compound: round_places(normalize(adjusted), 4),
    }
}
