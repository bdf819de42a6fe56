use once_cell::sync::Lazy;
use regex::Regex;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").expect("valid non-word pattern"));

/// Lowercase `line` and split it into word tokens.
///
/// Every run of non-word characters (Unicode-aware, `_` counts as a word
/// character) separates tokens; empty tokens are dropped.
pub fn tokenize(line: &str) -> Vec<String> {
    let lowered = line.to_lowercase();
    NON_WORD
        .replace_all(&lowered, " ")
        .split(' ')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Space-joined n-grams of consecutive tokens of `line`.
///
/// Returns an empty list when `n` is 0 or the line has fewer than `n` tokens.
///
/// # Example
/// ```
/// use survey_encoding::text::generate_ngrams;
///
/// assert_eq!(
///     generate_ngrams("Hello there, Mr. Finch", 2),
///     vec!["hello there", "there mr", "mr finch"]
/// );
/// ```
pub fn generate_ngrams(line: &str, n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    tokenize(line)
        .windows(n)
        .map(|window| window.join(" "))
        .collect()
}
