//! The editor interaction layer: one explicit session struct owning the
//! buffer, the active language, the flagged line set and the live
//! suggestion list. No ambient globals; every event goes through the
//! session and re-reads the buffer fresh.

use std::time::Duration;

use limn_complete::SuggestionList;
use limn_lang::Language;
use limn_lint::FlaggedLines;

mod gutter;

pub use gutter::{DisplayLine, render_gutter};

/// Highlight refresh delay: effectively "next frame".
pub const HIGHLIGHT_DEBOUNCE: Duration = Duration::from_millis(10);
/// Heuristic + remote scan delay after the last qualifying keystroke.
pub const SCAN_DEBOUNCE: Duration = Duration::from_millis(600);

/// Monotonic token handed out when a debounce gate is armed. Work started
/// under an older generation must not apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

/// Last-writer-wins debounce: arming cancels every earlier generation.
#[derive(Debug, Default)]
pub struct DebounceGate {
    current: u64,
}

impl DebounceGate {
    pub fn arm(&mut self) -> Generation {
        self.current += 1;
        Generation(self.current)
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        generation.0 == self.current
    }
}

#[derive(Debug)]
pub struct EditorSession {
    language: Language,
    buffer: String,
    cursor: usize,
    flagged: FlaggedLines,
    suggestions: Option<SuggestionList>,
    highlight_gate: DebounceGate,
    scan_gate: DebounceGate,
}

impl EditorSession {
    /// Open a session on the language's starter template.
    pub fn new(language: Language) -> Self {
        let buffer = language.template().to_string();
        let cursor = buffer.len();
        Self {
            language,
            buffer,
            cursor,
            flagged: FlaggedLines::new(),
            suggestions: None,
            highlight_gate: DebounceGate::default(),
            scan_gate: DebounceGate::default(),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn flagged(&self) -> &FlaggedLines {
        &self.flagged
    }

    pub fn suggestions(&self) -> Option<&SuggestionList> {
        self.suggestions.as_ref()
    }

    /// Replace the buffer with the new language's template and clear every
    /// flag, unconditionally.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        self.buffer = language.template().to_string();
        self.cursor = self.buffer.len();
        self.flagged.clear();
        self.suggestions = None;
        self.highlight_gate.arm();
        self.scan_gate.arm();
    }

    /// Adopt a better-fitting tag from run auto-detection. Unlike
    /// `set_language`, the buffer stays as typed.
    pub fn override_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Replace the whole buffer (load a file, paste). Clears flags like a
    /// language switch does.
    pub fn set_buffer(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.cursor = self.buffer.len();
        self.flagged.clear();
        self.suggestions = None;
        self.highlight_gate.arm();
        self.scan_gate.arm();
    }

    /// Type `text` at the caret. Rebuilds the suggestion list from scratch
    /// and re-arms both debounce gates.
    pub fn insert(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
        self.after_edit(text.chars().last());
    }

    /// Backspace: remove the character before the caret.
    pub fn delete_backwards(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let start = self.buffer[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0);
        self.buffer.replace_range(start..self.cursor, "");
        self.cursor = start;
        self.after_edit(None);
    }

    /// Enter key. After a python line ending in `:` or a java line ending
    /// in `{`, the new line keeps the current indentation plus four spaces.
    pub fn press_enter(&mut self) {
        let line_start = self.buffer[..self.cursor].rfind('\n').map_or(0, |i| i + 1);
        let current_line = &self.buffer[line_start..self.cursor];
        let trimmed = current_line.trim_end();

        let deepen = (self.language == Language::Python && trimmed.ends_with(':'))
            || (self.language == Language::Java && trimmed.ends_with('{'));

        let mut inserted = String::from("\n");
        if deepen {
            let indent: String = current_line
                .chars()
                .take_while(|c| *c == ' ' || *c == '\t')
                .collect();
            inserted.push_str(&indent);
            inserted.push_str("    ");
        }

        self.buffer.insert_str(self.cursor, &inserted);
        self.cursor += inserted.len();
        self.suggestions = None;
        self.highlight_gate.arm();
        self.scan_gate.arm();
    }

    fn after_edit(&mut self, last_typed: Option<char>) {
        self.sync_flags_to_buffer();
        self.refresh_suggestions(last_typed);
        self.highlight_gate.arm();
        self.scan_gate.arm();
    }

    fn refresh_suggestions(&mut self, last_typed: Option<char>) {
        if last_typed.is_some_and(limn_complete::is_dismiss_char) {
            self.suggestions = None;
            return;
        }
        self.suggestions = limn_complete::current_word(&self.buffer, self.cursor)
            .and_then(|(_, word)| limn_complete::suggest(word, self.cursor, self.language));
    }

    /// Flags may never point past the end of the buffer; drop stale ones
    /// left over from a longer previous buffer.
    fn sync_flags_to_buffer(&mut self) {
        let lines = line_count(&self.buffer);
        self.flagged.retain(|n| *n <= lines);
    }

    pub fn navigate_next(&mut self) {
        if let Some(list) = self.suggestions.as_mut() {
            list.next();
        }
    }

    pub fn navigate_previous(&mut self) {
        if let Some(list) = self.suggestions.as_mut() {
            list.previous();
        }
    }

    /// Accept the selected suggestion, placing the caret after the
    /// inserted text. No-op when no list is open.
    pub fn commit_suggestion(&mut self) {
        if let Some(list) = self.suggestions.take() {
            let (buffer, caret) = list.commit(&self.buffer);
            self.buffer = buffer;
            self.cursor = caret;
            self.sync_flags_to_buffer();
            self.highlight_gate.arm();
            self.scan_gate.arm();
        }
    }

    /// Escape, focus loss, or a click elsewhere.
    pub fn dismiss_suggestions(&mut self) {
        self.suggestions = None;
    }

    /// Arm the scan gate and return the generation a pending scan must
    /// present when it applies.
    pub fn arm_scan(&mut self) -> Generation {
        self.scan_gate.arm()
    }

    pub fn arm_highlight(&mut self) -> Generation {
        self.highlight_gate.arm()
    }

    pub fn scan_is_current(&self, generation: Generation) -> bool {
        self.scan_gate.is_current(generation)
    }

    /// Run the local heuristics for `generation` and apply the result if no
    /// newer keystroke superseded it. Returns whether the result applied.
    pub fn apply_local_scan(&mut self, generation: Generation) -> bool {
        if !self.scan_gate.is_current(generation) {
            return false;
        }
        self.flagged = limn_lint::scan(&self.buffer, self.language);
        self.sync_flags_to_buffer();
        true
    }

    /// Merge best-effort remote findings into the flag set for the same
    /// scan generation. Stale or out-of-range lines are dropped.
    pub fn merge_remote_flags(&mut self, generation: Generation, remote: FlaggedLines) -> bool {
        if !self.scan_gate.is_current(generation) {
            return false;
        }
        self.flagged.extend(remote);
        self.sync_flags_to_buffer();
        true
    }

    /// Replace the flag set wholesale (run results from the dispatcher).
    pub fn set_flags(&mut self, flags: FlaggedLines) {
        self.flagged = flags;
        self.sync_flags_to_buffer();
    }

    pub fn clear_flags(&mut self) {
        self.flagged.clear();
    }

    /// Rendered markup for the current buffer.
    pub fn markup(&self) -> String {
        limn_highlight::highlight(&self.buffer, self.language)
    }

    /// The line-number column, recomputed from scratch.
    pub fn gutter(&self) -> Vec<DisplayLine> {
        render_gutter(&self.buffer, &self.flagged)
    }
}

pub(crate) fn line_count(source: &str) -> usize {
    source.split('\n').count()
}
