//! Output grouping in fixed-width blocks.
//!
//! Cipher text is traditionally transmitted in five-symbol groups
//! separated by single spaces.

/// Default group width.
pub const GROUP_WIDTH: usize = 5;

/// Splits `text` into groups of `width` characters joined by single spaces.
///
/// # Parameters
/// - `text`: The characters to group. Any whitespace is kept as is.
/// - `width`: Group width. A width of 0 returns `text` unchanged.
///
/// # Examples
///
/// ```
/// use enigma::utils::grouping::group;
///
/// assert_eq!(group("HELLOWORLD", 5), "HELLO WORLD");
/// assert_eq!(group("ABCDEFG", 5), "ABCDE FG");
/// ```
pub fn group(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Removes all whitespace from `text`.
pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_exact_multiple() {
        assert_eq!(group("ABCDEFGHIJ", 5), "ABCDE FGHIJ");
    }

    #[test]
    fn test_group_short() {
        assert_eq!(group("ABC", 5), "ABC");
    }

    #[test]
    fn test_group_empty() {
        assert_eq!(group("", 5), "");
    }

    #[test]
    fn test_group_zero_width() {
        assert_eq!(group("ABCDEFG", 0), "ABCDEFG");
    }

    #[test]
    fn test_strip_whitespace() {
        assert_eq!(strip_whitespace(" HEL LO\tWOR LD "), "HELLOWORLD");
    }

    #[test]
    fn test_roundtrip() {
        let text = "QWERTYUIOPASDFGHJKL";
        assert_eq!(strip_whitespace(&group(text, GROUP_WIDTH)), text);
    }
}
