//! Prefix autocomplete over the per-language keyword tables.
//!
//! A `SuggestionList` is rebuilt from scratch on every keystroke and never
//! exists empty: no matches, or a word shorter than two characters, means no
//! list at all.

use limn_lang::{KeywordEntry, Language};

/// Minimum in-progress word length before suggestions appear. Shorter words
/// produce too many false matches.
pub const MIN_WORD_LEN: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionList {
    entries: Vec<KeywordEntry>,
    selected: usize,
    /// Byte offset where the in-progress word starts.
    anchor: usize,
    word_len: usize,
}

impl SuggestionList {
    pub fn entries(&self) -> &[KeywordEntry] {
        &self.entries
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_entry(&self) -> &KeywordEntry {
        &self.entries[self.selected]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Move the selection cursor down, wrapping past the end.
    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.entries.len();
    }

    /// Move the selection cursor up, wrapping past the start.
    pub fn previous(&mut self) {
        self.selected = if self.selected == 0 {
            self.entries.len() - 1
        } else {
            self.selected - 1
        };
    }

    /// Replace the in-progress word in `buffer` with the selected entry.
    /// Returns the new buffer and the caret position just after the
    /// inserted text. The list is consumed: commit discards it.
    pub fn commit(self, buffer: &str) -> (String, usize) {
        let name = self.entries[self.selected].name;
        let mut out = String::with_capacity(buffer.len() + name.len());
        out.push_str(&buffer[..self.anchor]);
        out.push_str(name);
        out.push_str(&buffer[self.anchor + self.word_len..]);
        let caret = self.anchor + name.len();
        (out, caret)
    }
}

/// Extract the identifier being typed immediately before `cursor`.
pub fn current_word(buffer: &str, cursor: usize) -> Option<(usize, &str)> {
    let before = &buffer[..cursor];
    let start = before
        .rfind(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .map_or(0, |i| i + 1);
    if start == cursor {
        return None;
    }
    let word = &before[start..];
    // Words cannot start with a digit.
    if word.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    Some((start, word))
}

/// Build the suggestion list for the word ending at `cursor`.
///
/// Filters the language's table by case-insensitive prefix, preserving
/// table order. Returns `None` for words under [`MIN_WORD_LEN`] and when
/// nothing matches.
pub fn suggest(word: &str, cursor: usize, lang: Language) -> Option<SuggestionList> {
    if word.len() < MIN_WORD_LEN {
        return None;
    }
    let lowered = word.to_ascii_lowercase();
    let entries: Vec<KeywordEntry> = lang
        .completion_table()
        .iter()
        .filter(|e| e.name.to_ascii_lowercase().starts_with(&lowered))
        .copied()
        .collect();
    if entries.is_empty() {
        return None;
    }
    Some(SuggestionList {
        entries,
        selected: 0,
        anchor: cursor - word.len(),
        word_len: word.len(),
    })
}

/// Characters that dismiss an open suggestion list when typed.
pub fn is_dismiss_char(c: char) -> bool {
    matches!(c, ' ' | '(' | ')' | ',' | ':')
}

#[cfg(test)]
mod tests {
    use super::{current_word, is_dismiss_char, suggest};
    use limn_lang::{ALL_LANGUAGES, Language};

    #[test]
    fn short_words_suggest_nothing() {
        for lang in ALL_LANGUAGES {
            assert!(suggest("", 0, lang).is_none());
            assert!(suggest("p", 1, lang).is_none());
        }
    }

    #[test]
    fn every_table_entry_is_reachable_by_its_own_prefix() {
        for lang in ALL_LANGUAGES {
            for entry in lang.completion_table() {
                if entry.name.len() < 2 {
                    continue;
                }
                let prefix = &entry.name[..2];
                let list = suggest(prefix, prefix.len(), lang)
                    .unwrap_or_else(|| panic!("{lang}: no matches for {prefix}"));
                assert!(
                    list.entries().iter().any(|e| e.name == entry.name),
                    "{lang}: {} missing from suggestions for {prefix}",
                    entry.name
                );
            }
        }
    }

    #[test]
    fn prefix_match_is_case_insensitive() {
        let list = suggest("SEL", 3, Language::Sql).expect("SEL should match");
        assert_eq!(list.selected_entry().name, "SELECT");
        let list = suggest("sel", 3, Language::Sql).expect("sel should match");
        assert_eq!(list.selected_entry().name, "SELECT");
    }

    #[test]
    fn table_order_is_preserved() {
        let list = suggest("pr", 2, Language::Python).expect("pr should match");
        let names: Vec<_> = list.entries().iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["print"]);

        let list = suggest("in", 2, Language::Python).expect("in should match");
        let names: Vec<_> = list.entries().iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["in", "int", "input"]);
    }

    #[test]
    fn selection_starts_at_zero_and_wraps() {
        let mut list = suggest("in", 2, Language::Python).expect("in should match");
        assert_eq!(list.selected_index(), 0);
        list.next();
        list.next();
        assert_eq!(list.selected_index(), 2);
        list.next();
        assert_eq!(list.selected_index(), 0);
        list.previous();
        assert_eq!(list.selected_index(), 2);
    }

    #[test]
    fn commit_replaces_the_word_and_places_the_caret() {
        let buffer = "x = pri";
        let (anchor, word) = current_word(buffer, buffer.len()).expect("word expected");
        assert_eq!((anchor, word), (4, "pri"));
        let list = suggest(word, buffer.len(), Language::Python).expect("pri should match");
        let (next, caret) = list.commit(buffer);
        assert_eq!(next, "x = print");
        assert_eq!(caret, 9);
    }

    #[test]
    fn commit_mid_buffer_keeps_the_tail() {
        let buffer = "x = pri\ny = 2";
        let cursor = 7;
        let (_, word) = current_word(buffer, cursor).expect("word expected");
        let list = suggest(word, cursor, Language::Python).expect("pri should match");
        let (next, caret) = list.commit(buffer);
        assert_eq!(next, "x = print\ny = 2");
        assert_eq!(caret, 9);
    }

    #[test]
    fn no_word_at_cursor_after_delimiter() {
        assert_eq!(current_word("print(", 6), None);
        assert_eq!(current_word("", 0), None);
        assert_eq!(current_word("x = 42", 6), None);
    }

    #[test]
    fn dismiss_characters() {
        for c in [' ', '(', ')', ',', ':'] {
            assert!(is_dismiss_char(c));
        }
        assert!(!is_dismiss_char('a'));
        assert!(!is_dismiss_char('_'));
    }
}
