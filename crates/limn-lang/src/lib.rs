use serde::{Deserialize, Serialize};

mod tables;
mod templates;

pub use tables::{KeywordCategory, KeywordEntry};

/// The fixed set of languages the playground understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Java,
    Sql,
    R,
    JavaScript,
    C,
    Cpp,
    Go,
    Php,
    TypeScript,
}

pub const ALL_LANGUAGES: [Language; 10] = [
    Language::Python,
    Language::Java,
    Language::Sql,
    Language::R,
    Language::JavaScript,
    Language::C,
    Language::Cpp,
    Language::Go,
    Language::Php,
    Language::TypeScript,
];

impl Language {
    pub fn from_hint(hint: &str) -> Option<Self> {
        match hint.trim().to_ascii_lowercase().as_str() {
            "python" | "py" => Some(Self::Python),
            "java" => Some(Self::Java),
            "sql" => Some(Self::Sql),
            "r" => Some(Self::R),
            "javascript" | "js" => Some(Self::JavaScript),
            "c" => Some(Self::C),
            "cpp" | "c++" => Some(Self::Cpp),
            "go" | "golang" => Some(Self::Go),
            "php" => Some(Self::Php),
            "typescript" | "ts" => Some(Self::TypeScript),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Java => "java",
            Self::Sql => "sql",
            Self::R => "r",
            Self::JavaScript => "javascript",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::Go => "go",
            Self::Php => "php",
            Self::TypeScript => "typescript",
        }
    }

    /// Canned starter template shown when this language is selected.
    pub fn template(self) -> &'static str {
        templates::template(self)
    }

    /// Curated autocomplete table. Languages without a curated table share
    /// the Python table.
    pub fn completion_table(self) -> &'static [KeywordEntry] {
        tables::completion_table(self)
    }

    /// Flat keyword list used by the highlighter.
    pub fn highlight_keywords(self) -> &'static [&'static str] {
        tables::highlight_keywords(self)
    }

    pub fn comment_grammar(self) -> CommentGrammar {
        match self {
            Self::Python | Self::R => CommentGrammar {
                line_prefixes: &["#"],
                block_comments: false,
            },
            Self::Sql => CommentGrammar {
                line_prefixes: &["--"],
                block_comments: false,
            },
            Self::Php => CommentGrammar {
                line_prefixes: &["//", "#"],
                block_comments: true,
            },
            Self::Java | Self::JavaScript | Self::TypeScript | Self::C | Self::Cpp | Self::Go => {
                CommentGrammar {
                    line_prefixes: &["//"],
                    block_comments: true,
                }
            }
        }
    }

    /// R identifiers may contain dots (`data.frame`); everywhere else a dot
    /// ends the word.
    pub fn dot_in_identifiers(self) -> bool {
        matches!(self, Self::R)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comment syntax for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentGrammar {
    pub line_prefixes: &'static [&'static str],
    pub block_comments: bool,
}

impl CommentGrammar {
    pub fn line_is_comment(&self, trimmed: &str) -> bool {
        self.line_prefixes.iter().any(|p| trimmed.starts_with(p))
    }
}

fn line_starts_with_sql_verb(line: &str) -> bool {
    const VERBS: [&str; 7] = [
        "SELECT", "INSERT", "UPDATE", "DELETE", "CREATE", "ALTER", "DROP",
    ];
    let trimmed = line.trim_start();
    VERBS.iter().any(|verb| {
        trimmed.len() >= verb.len() && trimmed[..verb.len()].eq_ignore_ascii_case(verb)
    })
}

/// Guess a better-fitting language from textual fingerprints. Returns `None`
/// when nothing distinctive is found; callers keep their current tag.
///
/// Probe order matters: earlier fingerprints are more distinctive, and the
/// JavaScript probes would otherwise swallow TypeScript and Java sources.
pub fn detect(source: &str) -> Option<Language> {
    if source.contains("public class")
        || source.contains("public static void main")
        || source.contains("System.out.println")
        || source.contains("import java.")
    {
        return Some(Language::Java);
    }
    if source.contains("#include <iostream>")
        || source.contains("std::cout")
        || source.contains("using namespace std")
    {
        return Some(Language::Cpp);
    }
    if (source.contains("#include <stdio.h>") || source.contains("printf("))
        && !source.contains("std::")
    {
        return Some(Language::C);
    }
    if source.contains("package main") && source.contains("func main()") {
        return Some(Language::Go);
    }
    if source.contains("<-") || source.contains("readline()") || source.contains("cat(") {
        return Some(Language::R);
    }
    if source.lines().any(line_starts_with_sql_verb) {
        return Some(Language::Sql);
    }
    if source.contains("const ")
        || source.contains("let ")
        || source.contains("function")
        || source.contains("console.log")
    {
        return if source.contains(": string") || source.contains(": number") {
            Some(Language::TypeScript)
        } else {
            Some(Language::JavaScript)
        };
    }
    if source.contains("<?php") {
        return Some(Language::Php);
    }
    if source.contains("def ")
        || source.contains("import ")
        || (source.contains("print(") && !source.contains(';'))
    {
        return Some(Language::Python);
    }
    None
}
