//! Passphrase generation over an injected random source.
use std::collections::HashSet;

use rand::Rng;
use rand::seq::index;

use crate::error::PassphraseError;

/// Split word-list text into distinct words, keeping first-seen order.
///
/// One word per line; surrounding whitespace and blank lines are ignored.
#[must_use]
pub fn parse_words(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    content
        .lines()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .filter(|w| seen.insert(*w))
        .map(String::from)
        .collect()
}

/// Parse a user-supplied word count.
///
/// # Errors
///
/// [`PassphraseError::InvalidWordCount`] unless `raw` is a positive integer.
pub fn parse_count(raw: &str) -> Result<usize, PassphraseError> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(PassphraseError::InvalidWordCount(raw.to_string())),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Build a passphrase of `count` words drawn from `words`.
///
/// Words are sampled uniformly without replacement and capitalised; one of
/// them, chosen uniformly, gets a single random digit appended. Tokens are
/// joined with `delimiter` in sampling order.
///
/// # Errors
///
/// [`PassphraseError::NotEnoughWords`] if `words` holds fewer than `count`
/// entries.
pub fn generate<R: Rng + ?Sized>(
    words: &[String],
    count: usize,
    delimiter: &str,
    rng: &mut R,
) -> Result<String, PassphraseError> {
    if count == 0 {
        return Err(PassphraseError::InvalidWordCount(count.to_string()));
    }
    if words.len() < count {
        return Err(PassphraseError::NotEnoughWords {
            requested: count,
            available: words.len(),
        });
    }
    let mut tokens: Vec<String> = index::sample(rng, words.len(), count)
        .into_iter()
        .filter_map(|i| words.get(i))
        .map(|w| capitalize(w))
        .collect();
    let marked = rng.random_range(0..count);
    let digit = rng.random_range(0..10u8);
    if let Some(token) = tokens.get_mut(marked) {
        token.push(char::from(b'0' + digit));
    }
    Ok(tokens.join(delimiter))
}
