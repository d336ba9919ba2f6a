//! Display helpers shared by the catalog views.

use std::borrow::Cow;

/// Maximum title and author lengths for one kind of card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayLimits {
    /// Longest title shown before truncating.
    pub title: usize,
    /// Longest author shown before truncating.
    pub author: usize,
}

/// Cards in the results grid.
pub const RESULT_CARD: DisplayLimits = DisplayLimits {
    title: 40,
    author: 25,
};

/// The "book of the day" panel.
pub const BOOK_OF_THE_DAY: DisplayLimits = DisplayLimits {
    title: 35,
    author: 20,
};

/// Rows in the favorites panel.
pub const FAVORITES_PANEL: DisplayLimits = DisplayLimits {
    title: 20,
    author: 15,
};

/// Cut `text` to `max_chars` characters and append `...` if it was longer.
#[must_use]
pub fn truncate(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        None => Cow::Borrowed(text),
        Some((byte_idx, _)) => Cow::Owned(format!("{}...", &text[..byte_idx])),
    }
}

impl DisplayLimits {
    /// Truncated title for this card kind.
    #[must_use]
    pub fn title<'a>(&self, title: &'a str) -> Cow<'a, str> {
        truncate(title, self.title)
    }

    /// Truncated author for this card kind.
    #[must_use]
    pub fn author<'a>(&self, author: &'a str) -> Cow<'a, str> {
        truncate(author, self.author)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_borrowed() {
        let out = truncate("Emma", 40);
        assert!(matches!(out, Cow::Borrowed("Emma")));
    }

    #[test]
    fn test_exact_length_is_untouched() {
        assert_eq!(truncate("abcde", 5), "abcde");
    }

    #[test]
    fn test_long_text_gets_ellipsis() {
        assert_eq!(
            truncate("Harry Potter and the Sorcerer's Stone", 20),
            "Harry Potter and the..."
        );
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        assert_eq!(truncate("日本語のタイトル", 3), "日本語...");
    }

    #[test]
    fn test_card_limits() {
        let title = "Harry Potter and the Sorcerer's Stone";
        assert_eq!(RESULT_CARD.title(title), title);
        assert_eq!(
            BOOK_OF_THE_DAY.title(title),
            "Harry Potter and the Sorcerer's Sto..."
        );
        assert_eq!(FAVORITES_PANEL.title(title), "Harry Potter and the...");
        assert_eq!(FAVORITES_PANEL.author("F. Scott Fitzgerald"), "F. Scott Fitzge...");
    }
}
