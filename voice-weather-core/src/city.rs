//! Extraction of the city name from a spoken query.
//!
//! The heuristic keeps whatever follows the first " in " (or the whole text
//! when there is none) and drops every token that belongs to the time
//! vocabulary. A city whose name is itself a time word ("Tonight", "Day")
//! cannot be recognized this way; that limitation is accepted.

/// Tokens never considered part of a city name. "on" only ever introduces a
/// weekday ("in incheon on friday").
pub const TIME_WORDS: &[&str] = &[
    "on", "today", "tomorrow", "tonight", "now", "right", "this", "morning", "afternoon", "evening",
    "night", "day", "after", "monday", "tuesday", "wednesday", "thursday", "friday", "saturday",
    "sunday",
];

/// Words that end the conversation instead of naming a city.
pub const EXIT_WORDS: &[&str] = &["quit", "exit"];

pub fn is_exit_command(text: &str) -> bool {
    let text = text.to_lowercase();
    EXIT_WORDS.iter().any(|w| text.contains(w))
}

/// Returns the display-ready city named in `text`, or `None` when nothing is
/// left after stripping time words or the text is an exit command.
pub fn extract_city(text: &str) -> Option<String> {
    if is_exit_command(text) {
        return None;
    }

    let text = text.to_lowercase();
    let tail = text.split_once(" in ").map_or(text.as_str(), |(_, after)| after);

    let words: Vec<String> = tail
        .split_whitespace()
        .filter(|token| !TIME_WORDS.contains(token))
        .map(capitalize)
        .collect();

    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
