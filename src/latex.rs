//! LaTeX accent normalization.
//!
//! Author names in BibTeX files carry accents as LaTeX escapes
//! (`M{\"u}ller`, `Mu\~noz`, `Jos"e`). This module turns them into the
//! Unicode characters the site displays and strips whatever brace and
//! backslash markup is left over.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Accents recognised in every spelling, including the bare form
/// (`"o` with no backslash or braces).
const BARE_ACCENTS: &[(char, char, &str)] = &[
    ('~', 'n', "ñ"),
    ('\'', 'e', "é"),
    ('`', 'e', "è"),
    ('"', 'o', "ö"),
    ('"', 'a', "ä"),
    ('"', 'u', "ü"),
    ('"', 'i', "ï"),
    ('"', 'I', "Ï"),
];

/// Accents recognised only behind a backslash. A bare `'a` would eat
/// ordinary apostrophes in names like `O'adams`.
const ESCAPED_ACCENTS: &[(char, char, &str)] = &[
    ('"', 'O', "Ö"),
    ('"', 'A', "Ä"),
    ('"', 'U', "Ü"),
    ('\'', 'E', "É"),
    ('\'', 'a', "á"),
    ('\'', 'i', "í"),
    ('\'', 'o', "ó"),
    ('\'', 'u', "ú"),
    ('`', 'a', "à"),
];

/// Every escape spelling paired with its replacement, longest first.
static ACCENT_TABLE: Lazy<Vec<(String, &'static str)>> = Lazy::new(|| {
    let mut table = Vec::new();

    for &(accent, letter, out) in BARE_ACCENTS {
        for pattern in escaped_spellings(accent, letter) {
            table.push((pattern, out));
        }
        table.push((format!("{{{accent}{letter}}}"), out));
        table.push((format!("{accent}{letter}"), out));
    }
    for &(accent, letter, out) in ESCAPED_ACCENTS {
        for pattern in escaped_spellings(accent, letter) {
            table.push((pattern, out));
        }
    }
    // Cedilla is a letter command, so it needs a separator before the letter.
    for pattern in [r"{\c{c}}", r"{\c c}", r"\c{c}", r"\c c"] {
        table.push((pattern.to_string(), "ç"));
    }
    // Dotless i: `\'\i` and `\"\i` are the usual spellings for í and ï.
    for (accent, out) in [('\'', "í"), ('"', "ï")] {
        for pattern in [
            format!(r"{{\{accent}{{\i}}}}"),
            format!(r"{{\{accent}\i}}"),
            format!(r"\{accent}{{\i}}"),
            format!(r"\{accent}\i"),
        ] {
            table.push((pattern, out));
        }
    }

    // Stable sort keeps equal-length spellings in table order.
    table.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    table
});

static ACCENT_LOOKUP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    ACCENT_TABLE
        .iter()
        .map(|(pattern, out)| (pattern.as_str(), *out))
        .collect()
});

/// One alternation over the table. The regex engine prefers earlier
/// alternatives at the same position, so the longest spelling wins.
static ACCENT_RE: Lazy<Regex> = Lazy::new(|| {
    let alternation = ACCENT_TABLE
        .iter()
        .map(|(pattern, _)| regex::escape(pattern))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&alternation).expect("accent table builds a valid regex")
});

static MARKUP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[{}\\]").unwrap());

fn escaped_spellings(accent: char, letter: char) -> [String; 4] {
    [
        format!("{{\\{accent}{{{letter}}}}}"),
        format!("{{\\{accent}{letter}}}"),
        format!("\\{accent}{{{letter}}}"),
        format!("\\{accent}{letter}"),
    ]
}

/// Replaces LaTeX accent escapes with Unicode characters and strips the
/// remaining brace and backslash markup.
///
/// Substitution and stripping repeat until the text stops changing, so the
/// result is a fixed point: cleaning it again returns it unchanged.
///
/// # Examples
///
/// ```
/// use pubgen::clean_latex;
///
/// assert_eq!(clean_latex(r#"M{\"u}ller"#), "Müller");
/// assert_eq!(clean_latex(r"Mu\~noz"), "Muñoz");
/// assert_eq!(clean_latex("{van} Berg"), "van Berg");
/// ```
pub fn clean_latex(text: &str) -> String {
    let mut cleaned = text.to_string();
    loop {
        // Each round that changes anything removes at least one character.
        let next = strip_markup(&substitute_accents(&cleaned));
        if next == cleaned {
            break;
        }
        cleaned = next;
    }

    if cleaned != text {
        debug!(raw = text, cleaned = %cleaned, "cleaned LaTeX markup");
    }
    cleaned
}

/// One left-to-right pass over the accent table.
fn substitute_accents(text: &str) -> String {
    ACCENT_RE
        .replace_all(text, |caps: &regex::Captures| {
            let matched = &caps[0];
            ACCENT_LOOKUP.get(matched).copied().unwrap_or(matched).to_string()
        })
        .into_owned()
}

/// Drops `{}` pairs, stray backslashes and isolated braces.
fn strip_markup(text: &str) -> String {
    MARKUP_RE.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_spellings_of_o_umlaut_agree() {
        for raw in [r#"{\"o}"#, r#"{"o}"#, r#""o}"#, r#"\"o"#, r#"\"{o}"#, r#"{\"{o}}"#, r#""o"#] {
            assert_eq!(clean_latex(raw), "ö", "spelling {:?}", raw);
        }
    }

    #[test]
    fn test_supported_characters() {
        let cases = [
            (r"Mu{\~n}oz", "Muñoz"),
            (r"Mu{~n}oz", "Muñoz"),
            ("Mu~noz", "Muñoz"),
            (r"Jos{\'e}", "José"),
            ("Jos{'e}", "José"),
            ("Jos'e", "José"),
            (r"Cr{\`e}me", "Crème"),
            ("Cr`eme", "Crème"),
            (r#"M{\"a}rz"#, "März"),
            (r#"M{\"u}ller"#, "Müller"),
            (r#"Ha{\"i}ti"#, "Haïti"),
            (r#"{\"I}le"#, "Ïle"),
        ];
        for (raw, expected) in cases {
            assert_eq!(clean_latex(raw), expected, "input {:?}", raw);
        }
    }

    #[test]
    fn test_escaped_only_characters() {
        assert_eq!(clean_latex(r#"{\"O}zt{\"u}rk"#), "Öztürk");
        assert_eq!(clean_latex(r"Garc{\'i}a"), "García");
        assert_eq!(clean_latex(r"Fran{\c{c}}ois"), "François");
        assert_eq!(clean_latex(r"\'Eric"), "Éric");
    }

    #[test]
    fn test_dotless_i() {
        for raw in [r"Garc{\'\i}a", r"Garc\'{\i}a", r"Garc{\'{\i}}a", r"Garc\'\i{}a"] {
            assert_eq!(clean_latex(raw), "García", "spelling {:?}", raw);
        }
        assert_eq!(clean_latex(r#"Ha{\"\i}ti"#), "Haïti");
    }

    #[test]
    fn test_bare_apostrophe_kept_for_escaped_only_letters() {
        // 'a has no bare spelling, so the apostrophe survives
        assert_eq!(clean_latex("O'adams"), "O'adams");
    }

    #[test]
    fn test_strips_residual_markup() {
        assert_eq!(clean_latex("{van der} Berg"), "van der Berg");
        assert_eq!(clean_latex(r"\LaTeX{}"), "LaTeX");
        assert_eq!(clean_latex("a}b{c"), "abc");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(clean_latex("Andreas"), "Andreas");
        assert_eq!(clean_latex(""), "");
    }

    #[test]
    fn test_markup_revealed_by_stripping_is_resolved() {
        // "{o} only becomes "o once the braces are gone
        assert_eq!(clean_latex(r#""{o}"#), "ö");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            r#"M{\"u}ller"#,
            r#""{o}"#,
            r#"{{"}o}"#,
            r"Mu\~{n}oz",
            "Jos'e O'adams",
            r"\\{}{}\{",
        ];
        for raw in inputs {
            let once = clean_latex(raw);
            assert_eq!(clean_latex(&once), once, "input {:?}", raw);
        }
    }

    #[test]
    fn test_longest_spelling_wins() {
        // {\"o} must not be consumed as "o} leaving a stray {\
        assert_eq!(substitute_accents(r#"{\"o}"#), "ö");
        assert_eq!(substitute_accents(r#"{"o}"#), "ö");
        assert_eq!(substitute_accents(r#""o}"#), "ö}");
    }
}
