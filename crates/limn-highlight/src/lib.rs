//! Syntax highlighting as a single tokenizer pass plus a markup renderer.
//!
//! The tokenizer assigns each classified span an exact `(kind, byte range)`
//! token; the renderer escapes the full source and wraps tokens in
//! `<span class="syntax-*">` markup. Strings and comments are consumed
//! before anything else on their span, so keywords and numbers can never
//! fire inside them.

use limn_lang::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Str,
    Comment,
    Number,
    Keyword,
    Call,
}

/// A classified byte span of the source. Unclassified text carries no token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl TokenKind {
    fn css_class(self) -> &'static str {
        match self {
            Self::Str => "syntax-string",
            Self::Comment => "syntax-comment",
            Self::Number => "syntax-number",
            Self::Keyword => "syntax-keyword",
            Self::Call => "syntax-function",
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char, lang: Language) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || (c == '.' && lang.dot_in_identifiers())
}

/// Classify `source` into ordered, non-overlapping tokens.
pub fn tokenize(source: &str, lang: Language) -> Vec<Token> {
    let grammar = lang.comment_grammar();
    let keywords = lang.highlight_keywords();
    let mut tokens = Vec::new();
    let mut i = 0;
    let mut prev_char: Option<char> = None;

    while i < source.len() {
        let rest = &source[i..];
        let c = rest.chars().next().unwrap_or('\0');

        // Block comments win over line comments so `/*` is not read as `/`.
        if grammar.block_comments && rest.starts_with("/*") {
            let end = rest.find("*/").map_or(source.len(), |p| i + p + 2);
            tokens.push(Token {
                kind: TokenKind::Comment,
                start: i,
                end,
            });
            prev_char = Some('/');
            i = end;
            continue;
        }

        if grammar.line_prefixes.iter().any(|p| rest.starts_with(p)) {
            let end = rest.find('\n').map_or(source.len(), |p| i + p);
            tokens.push(Token {
                kind: TokenKind::Comment,
                start: i,
                end,
            });
            prev_char = Some('#');
            i = end;
            continue;
        }

        if c == '"' || c == '\'' || c == '`' {
            let end = string_end(source, i, c);
            tokens.push(Token {
                kind: TokenKind::Str,
                start: i,
                end,
            });
            prev_char = Some(c);
            i = end;
            continue;
        }

        if c.is_ascii_digit() && !prev_char.is_some_and(|p| is_ident_continue(p, lang)) {
            let mut end = i;
            for (off, ch) in rest.char_indices() {
                if ch.is_ascii_digit() || ch == '.' {
                    end = i + off + ch.len_utf8();
                } else {
                    break;
                }
            }
            let next = source[end..].chars().next();
            // `42abc` is an identifier-like blob, not a literal.
            if !next.is_some_and(is_ident_start) {
                tokens.push(Token {
                    kind: TokenKind::Number,
                    start: i,
                    end,
                });
            }
            prev_char = source[..end].chars().next_back();
            i = end;
            continue;
        }

        if is_ident_start(c) && !prev_char.is_some_and(|p| is_ident_continue(p, lang)) {
            let mut end = i;
            for (off, ch) in rest.char_indices() {
                if is_ident_continue(ch, lang) {
                    end = i + off + ch.len_utf8();
                } else {
                    break;
                }
            }
            let word = &source[i..end];
            if keywords.iter().any(|k| k.eq_ignore_ascii_case(word)) {
                tokens.push(Token {
                    kind: TokenKind::Keyword,
                    start: i,
                    end,
                });
            } else if followed_by_paren(&source[end..]) {
                tokens.push(Token {
                    kind: TokenKind::Call,
                    start: i,
                    end,
                });
            }
            prev_char = source[..end].chars().next_back();
            i = end;
            continue;
        }

        prev_char = Some(c);
        i += c.len_utf8();
    }

    tokens
}

fn string_end(source: &str, start: usize, delim: char) -> usize {
    let mut escaped = false;
    for (off, ch) in source[start..].char_indices().skip(1) {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            // Unterminated literals stop at the line break.
            '\n' => return start + off,
            _ if ch == delim => return start + off + ch.len_utf8(),
            _ => {}
        }
    }
    source.len()
}

fn followed_by_paren(rest: &str) -> bool {
    rest.chars().find(|c| *c != ' ' && *c != '\t') == Some('(')
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

/// Render `source` as escaped markup with classified spans wrapped.
///
/// Total and pure: any input produces markup, and re-highlighting the
/// markup-stripped projection of the output reproduces it exactly.
pub fn highlight(source: &str, lang: Language) -> String {
    let tokens = tokenize(source, lang);
    let mut out = String::with_capacity(source.len() * 2);
    let mut cursor = 0;

    for token in tokens {
        if cursor < token.start {
            push_escaped(&mut out, &source[cursor..token.start]);
        }
        out.push_str("<span class=\"");
        out.push_str(token.kind.css_class());
        out.push_str("\">");
        push_escaped(&mut out, &source[token.start..token.end]);
        out.push_str("</span>");
        cursor = token.end;
    }
    if cursor < source.len() {
        push_escaped(&mut out, &source[cursor..]);
    }

    out
}

/// Inverse of the renderer's escaping: drop tags, restore entities. The
/// plain-text projection of `highlight` output is the original source.
pub fn strip_markup(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut chars = markup.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '<' {
            for inner in chars.by_ref() {
                if inner == '>' {
                    break;
                }
            }
            continue;
        }
        if c == '&' {
            let mut entity = String::from("&");
            while let Some(&next) = chars.peek() {
                entity.push(next);
                chars.next();
                if next == ';' {
                    break;
                }
            }
            match entity.as_str() {
                "&amp;" => out.push('&'),
                "&lt;" => out.push('<'),
                "&gt;" => out.push('>'),
                other => out.push_str(other),
            }
            continue;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{TokenKind, highlight, strip_markup, tokenize};
    use limn_lang::{ALL_LANGUAGES, Language};

    fn kinds_at(source: &str, lang: Language) -> Vec<(TokenKind, String)> {
        tokenize(source, lang)
            .into_iter()
            .map(|t| (t.kind, source[t.start..t.end].to_string()))
            .collect()
    }

    #[test]
    fn classifies_a_simple_python_line() {
        insta::assert_snapshot!(
            highlight("x = 1 # note", Language::Python),
            @r#"x = <span class="syntax-number">1</span> <span class="syntax-comment"># note</span>"#
        );
    }

    #[test]
    fn nothing_fires_inside_strings() {
        let toks = kinds_at(r#"s = "if 42 while""#, Language::Python);
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].0, TokenKind::Str);
    }

    #[test]
    fn nothing_fires_inside_comments() {
        let toks = kinds_at("# def f(1)", Language::Python);
        assert_eq!(toks, vec![(TokenKind::Comment, "# def f(1)".to_string())]);
    }

    #[test]
    fn keywords_win_over_call_sites() {
        let toks = kinds_at("int(x)", Language::Python);
        assert_eq!(toks[0], (TokenKind::Keyword, "int".to_string()));
    }

    #[test]
    fn call_site_allows_spaces_before_paren() {
        let toks = kinds_at("foo (1)", Language::JavaScript);
        assert!(toks.contains(&(TokenKind::Call, "foo".to_string())));
    }

    #[test]
    fn sql_keywords_match_case_insensitively() {
        let toks = kinds_at("select name from users", Language::Sql);
        let keywords: Vec<_> = toks
            .iter()
            .filter(|(k, _)| *k == TokenKind::Keyword)
            .map(|(_, w)| w.clone())
            .collect();
        assert_eq!(keywords, vec!["select", "from"]);
    }

    #[test]
    fn block_comments_span_lines() {
        let toks = kinds_at("/* a\nb */ int x;", Language::C);
        assert_eq!(toks[0].0, TokenKind::Comment);
        assert_eq!(toks[0].1, "/* a\nb */");
    }

    #[test]
    fn unterminated_string_stops_at_line_end() {
        let toks = kinds_at("s = \"oops\nprint(1)", Language::Python);
        assert_eq!(toks[0], (TokenKind::Str, "\"oops".to_string()));
        assert!(toks.iter().any(|(k, _)| *k == TokenKind::Call));
    }

    #[test]
    fn r_dotted_identifiers_stay_whole() {
        let toks = kinds_at("df <- data.frame(Name = names)", Language::R);
        assert!(toks.contains(&(TokenKind::Keyword, "data.frame".to_string())));
    }

    #[test]
    fn escapes_html_sensitive_characters() {
        let markup = highlight("a < b && c > d", Language::JavaScript);
        assert!(markup.contains("&lt;"));
        assert!(markup.contains("&amp;&amp;"));
        assert!(markup.contains("&gt;"));
    }

    #[test]
    fn strip_is_the_inverse_of_highlight() {
        for lang in ALL_LANGUAGES {
            let source = lang.template();
            assert_eq!(strip_markup(&highlight(source, lang)), source, "{lang}");
        }
    }

    #[test]
    fn highlight_is_idempotent_on_its_own_projection() {
        for lang in ALL_LANGUAGES {
            let source = lang.template();
            let once = highlight(source, lang);
            let twice = highlight(&strip_markup(&once), lang);
            assert_eq!(once, twice, "{lang}");
        }
    }

    #[test]
    fn numbers_embedded_in_identifiers_are_not_literals() {
        let toks = kinds_at("value42 = 7", Language::Python);
        assert_eq!(toks, vec![(TokenKind::Number, "7".to_string())]);
    }
}
