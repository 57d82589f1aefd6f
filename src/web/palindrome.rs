//! Palindrome check for stored text

/// Returns true if `text` reads the same forwards and backwards
///
/// Comparison is exact, character by character: case is significant and
/// nothing is stripped.
pub fn is_palindrome(text: &str) -> bool {
    text.chars().eq(text.chars().rev())
}
