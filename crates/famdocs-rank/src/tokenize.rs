/// Lower-cases `text`, drops every character outside `[a-z0-9. ]`, splits on
/// whitespace and keeps tokens longer than two characters.
///
/// Dots survive so decimal values such as `8.12` stay a single token.
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| matches!(c, 'a'..='z' | '0'..='9' | '.' | ' '))
        .collect();
    cleaned
        .split_whitespace()
        .filter(|t| t.len() > 2)
        .map(str::to_string)
        .collect()
}
