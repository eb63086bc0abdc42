//! Search text normalization
//!
//! Quote-preserving tokenization plus the cleanup steps applied to business
//! names before they are sent to the SAM Entities API as a `q` search.

const FORBIDDEN_CHARACTERS: &[char] = &['-', '&', '|', '{', '}', '^', '\\'];

const LLC_TOKENS: &[&str] = &["LLC", "L.L.C", "L.L.C."];

const QUOTE: char = '"';

fn is_token_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Split on whitespace, keeping a double-quoted span as a single token
/// (quotes included). Unterminated quotes fall back to a plain whitespace split.
pub fn tokenize(input: &str) -> Vec<String> {
    lex_quoted(input).unwrap_or_else(|| {
        input.split_whitespace().map(str::to_string).collect()
    })
}

/// `None` when a quote opened at the start of a token is never closed.
fn lex_quoted(input: &str) -> Option<Vec<String>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if is_token_whitespace(c) {
            chars.next();
            continue;
        }

        let mut token = String::new();

        if c == QUOTE {
            token.push(c);
            chars.next();
            let mut closed = false;
            for next in chars.by_ref() {
                token.push(next);
                if next == QUOTE {
                    closed = true;
                    break;
                }
            }
            if !closed {
                return None;
            }
        } else {
            // A quote in the middle of a word is an ordinary character
            while let Some(&next) = chars.peek() {
                if is_token_whitespace(next) {
                    break;
                }
                token.push(next);
                chars.next();
            }
        }

        tokens.push(token);
    }

    Some(tokens)
}

/// Tokenize then rejoin with single spaces.
pub fn collapse_whitespace(input: &str) -> String {
    tokenize(input).join(" ")
}

/// Replace query-syntax characters with a space so neighbouring words stay apart.
pub fn strip_forbidden_chars(input: &str) -> String {
    input
        .chars()
        .map(|c| if FORBIDDEN_CHARACTERS.contains(&c) { ' ' } else { c })
        .collect()
}

pub fn strip_commas(input: &str) -> String {
    input.replace(',', "")
}

/// Searches like "apple inc." match better without the period in "inc".
pub fn strip_trailing_periods(input: &str) -> String {
    tokenize(input)
        .iter()
        .map(|token| token.trim_end_matches('.'))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drop every "LLC" / "L.L.C" / "L.L.C." token.
pub fn strip_llc_tokens(input: &str) -> String {
    tokenize(input)
        .into_iter()
        .filter(|token| {
            let upper = token.to_uppercase();
            !LLC_TOKENS.contains(&upper.as_str())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_quoted_span(token: &str) -> bool {
    token.starts_with(QUOTE) && token.ends_with(QUOTE)
}

/// Append `*` to every token longer than two characters that isn't a quoted span.
pub fn add_wildcards(input: &str) -> String {
    tokenize(input)
        .into_iter()
        .map(|token| {
            if is_quoted_span(&token) || token.chars().count() <= 2 {
                token
            } else {
                format!("{}*", token)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Full business-name pipeline.
///
/// LLC removal has to run before trailing periods are stripped, otherwise
/// "L.L.C." would no longer be recognised.
pub fn normalize_business_name(input: &str) -> String {
    let cleaned = strip_forbidden_chars(input);
    let cleaned = strip_commas(&cleaned);
    let cleaned = strip_llc_tokens(&cleaned);
    let cleaned = strip_trailing_periods(&cleaned);
    add_wildcards(&cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_preserves_quoted_span() {
        assert_eq!(
            tokenize("\"name of  company\"   sci"),
            vec!["\"name of  company\"", "sci"]
        );
    }

    #[test]
    fn test_tokenize_quote_inside_word_is_ordinary() {
        assert_eq!(tokenize("ab\"c d"), vec!["ab\"c", "d"]);
    }

    #[test]
    fn test_tokenize_closing_quote_ends_token() {
        assert_eq!(tokenize("\"abc\"def"), vec!["\"abc\"", "def"]);
    }

    #[test]
    fn test_tokenize_unbalanced_quotes_fall_back() {
        assert_eq!(
            tokenize("\"name of  company\"   \"sci"),
            vec!["\"name", "of", "company\"", "\"sci"]
        );
    }

    #[test]
    fn test_tokenize_whitespace_only() {
        assert!(tokenize("  \t\t\n\n").is_empty());
    }

    #[test]
    fn test_strip_forbidden_chars_replaces_with_space() {
        assert_eq!(strip_forbidden_chars("a-b&c|d{e}f^g\\h"), "a b c d e f g h");
    }

    #[test]
    fn test_strip_llc_variants() {
        for llc in ["llc", "LLC", "L.L.C.", "l.l.c", "L.L.C"] {
            assert_eq!(strip_llc_tokens(&format!("company name {}", llc)), "company name");
        }
        assert_eq!(strip_llc_tokens("llcs group"), "llcs group");
    }

    #[test]
    fn test_strip_trailing_periods() {
        assert_eq!(strip_trailing_periods("test company. inc.."), "test company inc");
    }

    #[test]
    fn test_add_wildcards() {
        assert_eq!(add_wildcards("b h photo"), "b h photo*");
        assert_eq!(add_wildcards("\"exact name\" of co"), "\"exact name\" of co");
    }

    #[test]
    fn test_normalize_business_name_llc() {
        assert_eq!(normalize_business_name("Thermo Fisher L.L.C."), "Thermo* Fisher*");
    }

    #[test]
    fn test_normalize_business_name_quoted() {
        assert_eq!(
            normalize_business_name("\"name of  company\"   sci"),
            "\"name of  company\" sci*"
        );
    }

    #[test]
    fn test_normalize_business_name_commas() {
        assert_eq!(
            normalize_business_name("test, company , inc in,c"),
            "test* company* inc* inc*"
        );
    }

    #[test]
    fn test_normalize_business_name_forbidden() {
        assert_eq!(normalize_business_name("company&name"), "company* name*");
    }

    #[test]
    fn test_normalize_is_idempotent_per_input() {
        let input = "Lowe's Home, Improvement L.L.C.";
        assert_eq!(normalize_business_name(input), normalize_business_name(input));
    }
}
