use once_cell::sync::Lazy;
use regex::Regex;

static FLIGHT_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:flight\s+)?([a-z]{2}\d{3})").expect("flight token pattern is valid")
});

/// Scans free text for a two-letter, three-digit flight token, optionally
/// introduced by the word "flight". Returns the token as written.
pub fn extract_flight_number_pattern(text: &str) -> Option<String> {
    FLIGHT_TOKEN
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|token| token.as_str().to_string())
}

/// Canonical form used as the lookup key: no whitespace, uppercase.
pub fn normalize_flight_number(input: &str) -> String {
    input
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

pub fn normalize_text(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
