//! Best-effort per-line heuristics, not a parser.
//!
//! Every check is a single pass over one line (plus a textual look-behind
//! for the defined-before-use probe). Known misfires are part of the
//! contract: quote parity trips on apostrophes inside prose, and brace
//! balance is blind to a continuation brace on the next line.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use limn_lang::Language;

/// 1-based line numbers currently considered errored.
pub type FlaggedLines = BTreeSet<usize>;

const PYTHON_BLOCK_OPENERS: [&str; 6] = ["if ", "elif ", "for ", "while ", "def ", "class "];

const JAVA_TERMINATOR_EXEMPT: [&str; 11] = [
    "public ", "private ", "protected ", "class ", "if ", "else", "for ", "while ", "import ",
    "package ", "@",
];

static COERCION_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:int|float|str)\(([A-Za-z_]\w*)\)").expect("regex: coercion call")
});

fn count(line: &str, target: char) -> usize {
    line.chars().filter(|c| *c == target).count()
}

fn python_missing_colon(trimmed: &str) -> bool {
    let opens_block = PYTHON_BLOCK_OPENERS.iter().any(|k| trimmed.starts_with(k))
        || trimmed == "else"
        || trimmed
            .strip_prefix("else")
            .is_some_and(|rest| rest.trim().is_empty());
    opens_block && !trimmed.ends_with(':')
}

fn java_missing_terminator(trimmed: &str) -> bool {
    !trimmed.ends_with(';')
        && !trimmed.ends_with('{')
        && !trimmed.ends_with('}')
        && !JAVA_TERMINATOR_EXEMPT.iter().any(|p| trimmed.starts_with(p))
}

/// A coercion call on a bare identifier with no earlier assignment to that
/// identifier anywhere above. Textual containment, not scope analysis;
/// shadowing and unreachable branches both confuse it, on purpose.
fn possibly_undefined(trimmed: &str, earlier: &str) -> bool {
    let Some(captures) = COERCION_CALL.captures(trimmed) else {
        return false;
    };
    let name = &captures[1];
    if name == "input" {
        return false;
    }
    !earlier.contains(&format!("{name} =")) && !earlier.contains(&format!("{name}="))
}

/// Scan the whole buffer and return the flagged line set. Pure and total:
/// the worst outcome is an empty set.
pub fn scan(source: &str, lang: Language) -> FlaggedLines {
    let mut flagged = FlaggedLines::new();
    let grammar = lang.comment_grammar();
    let lines: Vec<&str> = source.lines().collect();

    for (index, line) in lines.iter().enumerate() {
        let number = index + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() || grammar.line_is_comment(trimmed) {
            continue;
        }
        // Continuation lines of java-style block comments.
        if grammar.block_comments && (trimmed.starts_with("/*") || trimmed.starts_with('*')) {
            continue;
        }

        if lang == Language::Python && python_missing_colon(trimmed) {
            flagged.insert(number);
        }

        if lang == Language::Java && java_missing_terminator(trimmed) {
            flagged.insert(number);
        }

        if count(trimmed, '(') != count(trimmed, ')') {
            flagged.insert(number);
        }

        if count(trimmed, '\'') % 2 != 0 || count(trimmed, '"') % 2 != 0 {
            flagged.insert(number);
        }

        if lang == Language::Java && count(trimmed, '{') != count(trimmed, '}') {
            flagged.insert(number);
        }

        let earlier = lines[..index].join("\n");
        if possibly_undefined(trimmed, &earlier) {
            flagged.insert(number);
        }
    }

    flagged
}
