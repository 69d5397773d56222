//! BibTeX reading and canonical re-serialization.
//!
//! The site keeps one entry per `.bib` file, so the reader stops at the
//! first regular entry. `@string` macros seen before it are expanded,
//! `@comment` and `@preamble` blocks are skipped, and lines starting with
//! `%` between blocks are ignored.

use std::collections::HashMap;

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    combinator::{map, opt},
    error::{Error as NomError, ErrorKind},
    IResult,
};
use thiserror::Error;

/// Errors that can occur when reading a BibTeX source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("no BibTeX entry found")]
    NoEntries,

    #[error("malformed BibTeX block at line {line}")]
    Malformed { line: usize },
}

/// A single `name = {value}` pair, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibField {
    pub name: String,
    pub value: String,
}

/// One author as written in the source: raw given names and raw last name,
/// LaTeX escapes included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub first: String,
    pub last: String,
}

impl Author {
    pub fn new(first: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            last: last.into(),
        }
    }
}

/// A parsed BibTeX entry.
///
/// Entry type and field names are lower-cased; values are the verbatim
/// text between the outer delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibEntry {
    pub entry_type: String,
    pub key: String,
    pub fields: Vec<BibField>,
}

impl BibEntry {
    pub fn new(entry_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            entry_type: entry_type.into().to_lowercase(),
            key: key.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field, keeping insertion order.
    pub fn add_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push(BibField {
            name: name.into().to_lowercase(),
            value: value.into(),
        });
    }

    /// Returns a field value by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
            .map(|f| f.value.as_str())
    }

    /// The author list, or `None` if the entry has no author field.
    pub fn authors(&self) -> Option<Vec<Author>> {
        self.get("author").map(parse_names)
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title")
    }

    pub fn year(&self) -> Option<&str> {
        self.get("year")
    }
}

/// Parses the first regular entry of a BibTeX source.
///
/// # Errors
///
/// Returns [`ParseError::Malformed`] if a block before or at the first
/// entry cannot be parsed, and [`ParseError::NoEntries`] if the source holds
/// no entry at all.
pub fn parse_first_entry(input: &str) -> Result<BibEntry, ParseError> {
    let mut strings: HashMap<String, String> = HashMap::new();
    let mut remaining = input;

    while let Some(start) = next_block_start(remaining) {
        let block = &remaining[start..];
        match parse_block(block, &strings) {
            Ok((_, Block::Entry(entry))) => return Ok(entry),
            Ok((rest, Block::String(name, value))) => {
                strings.insert(name, value);
                remaining = rest;
            }
            Ok((rest, Block::Skipped)) => remaining = rest,
            Err(_) => {
                let offset = input.len() - block.len();
                return Err(ParseError::Malformed {
                    line: input[..offset].matches('\n').count() + 1,
                });
            }
        }
    }

    Err(ParseError::NoEntries)
}

/// Serializes an entry to the canonical text shown under "copy citation".
///
/// One tab-indented `name = {value},` line per field in source order; the
/// output parses back to the same field list.
pub fn format_bibtex(entry: &BibEntry) -> String {
    let mut lines = vec![format!("@{}{{{},", entry.entry_type, entry.key)];
    for field in &entry.fields {
        lines.push(format!("\t{} = {{{}}},", field.name, field.value));
    }
    lines.push("}".to_string());
    lines.join("\n").trim().to_string()
}

/// Splits an author field on top-level `and` into individual names.
///
/// Names may be written `Last, First`, `Last, Jr, First` or
/// `First von Last`. Brace groups are never split.
pub fn parse_names(value: &str) -> Vec<Author> {
    let words = split_top_level(value, char::is_whitespace);

    words
        .split(|w| w.eq_ignore_ascii_case("and"))
        .filter(|name| !name.is_empty())
        .map(|name| parse_name(&name.join(" ")))
        .collect()
}

fn parse_name(name: &str) -> Author {
    let parts: Vec<&str> = split_top_level(name, |c| c == ',');

    match parts.as_slice() {
        [] => Author::new("", ""),
        [whole] => {
            let words = split_top_level(whole, char::is_whitespace);
            let (last_word, given) = match words.split_last() {
                Some(split) => split,
                None => return Author::new("", ""),
            };
            // A lowercase word starts the "von" part, which belongs to the last name.
            let von = given
                .iter()
                .position(|w| w.chars().next().is_some_and(char::is_lowercase))
                .unwrap_or(given.len());
            let mut last = given[von..].to_vec();
            last.push(*last_word);
            Author::new(given[..von].join(" "), last.join(" "))
        }
        [last, first] => Author::new(*first, *last),
        [last, _jr, first, ..] => Author::new(*first, *last),
    }
}

/// Splits on separator characters outside braces, trimming pieces and
/// dropping empty ones.
fn split_top_level(text: &str, is_sep: impl Fn(char) -> bool) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            c if depth == 0 && is_sep(c) => {
                pieces.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    pieces.push(&text[start..]);

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Finds the next `@`, skipping lines whose first non-blank character is `%`.
fn next_block_start(text: &str) -> Option<usize> {
    let mut in_comment = false;
    let mut line_start = true;
    for (i, c) in text.char_indices() {
        match c {
            '\n' => {
                in_comment = false;
                line_start = true;
            }
            '%' if line_start => in_comment = true,
            '@' if !in_comment => return Some(i),
            c if !c.is_whitespace() => line_start = false,
            _ => {}
        }
    }
    None
}

enum Block {
    Entry(BibEntry),
    String(String, String),
    Skipped,
}

fn parse_block<'a>(input: &'a str, strings: &HashMap<String, String>) -> IResult<&'a str, Block> {
    let (rest, _) = char('@')(input)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, kind) = take_while1(|c: char| c.is_ascii_alphanumeric())(rest)?;
    let (rest, _) = multispace0(rest)?;

    match kind.to_lowercase().as_str() {
        "comment" | "preamble" => {
            let (rest, _) = braced(rest)?;
            Ok((rest, Block::Skipped))
        }
        "string" => {
            let (rest, _) = char('{')(rest)?;
            let (rest, (name, value)) = field(rest, strings)?;
            let (rest, _) = multispace0(rest)?;
            let (rest, _) = char('}')(rest)?;
            Ok((rest, Block::String(name, value)))
        }
        _ => {
            let (rest, entry) = entry_body(rest, kind, strings)?;
            Ok((rest, Block::Entry(entry)))
        }
    }
}

fn entry_body<'a>(
    input: &'a str,
    kind: &str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, BibEntry> {
    let (rest, _) = char('{')(input)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, key) =
        take_while1(|c: char| !c.is_whitespace() && !matches!(c, ',' | '{' | '}'))(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (mut remaining, separator) = opt(char(','))(rest)?;

    let mut entry = BibEntry::new(kind, key);
    let mut expect_field = separator.is_some();

    loop {
        let (rest, _) = multispace0(remaining)?;
        if let Some(rest) = rest.strip_prefix('}') {
            return Ok((rest, entry));
        }
        if !expect_field {
            return Err(nom::Err::Error(NomError::new(rest, ErrorKind::Char)));
        }

        let (rest, (name, value)) = field(rest, strings)?;
        entry.add_field(name, value);

        let (rest, _) = multispace0(rest)?;
        let (rest, separator) = opt(char(','))(rest)?;
        expect_field = separator.is_some();
        remaining = rest;
    }
}

/// `name = value`, where value may be a `#` concatenation.
fn field<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, (String, String)> {
    let (rest, _) = multispace0(input)?;
    let (rest, name) =
        take_while1(|c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':' | '.'))(
            rest,
        )?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('=')(rest)?;

    let mut value = String::new();
    let mut remaining = rest;
    loop {
        let (rest, _) = multispace0(remaining)?;
        let (rest, piece) = alt((
            map(braced, str::to_string),
            map(quoted, str::to_string),
            map(take_while1(|c: char| c.is_ascii_digit()), str::to_string),
            map(
                take_while1(|c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':')),
                |name: &str| {
                    strings
                        .get(&name.to_lowercase())
                        .cloned()
                        .unwrap_or_else(|| name.to_string())
                },
            ),
        ))(rest)?;
        value.push_str(&piece);

        let (rest, _) = multispace0(rest)?;
        match rest.strip_prefix('#') {
            Some(rest) => remaining = rest,
            None => return Ok((rest, (name.to_lowercase(), value))),
        }
    }
}

/// `{...}` with nested braces; yields the inner text.
fn braced(input: &str) -> IResult<&str, &str> {
    if !input.starts_with('{') {
        return Err(nom::Err::Error(NomError::new(input, ErrorKind::Char)));
    }

    let mut depth = 0usize;
    for (i, c) in input.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[i + 1..], &input[1..i]));
                }
            }
            _ => {}
        }
    }

    Err(nom::Err::Error(NomError::new(input, ErrorKind::TakeUntil)))
}

/// `"..."`; a quote inside braces does not terminate the value. Braces
/// must balance, as they must inside `{...}` values.
fn quoted(input: &str) -> IResult<&str, &str> {
    if !input.starts_with('"') {
        return Err(nom::Err::Error(NomError::new(input, ErrorKind::Char)));
    }

    let mut depth = 0usize;
    for (i, c) in input.char_indices().skip(1) {
        match c {
            '{' => depth += 1,
            '}' => match depth.checked_sub(1) {
                Some(outer) => depth = outer,
                None => return Err(nom::Err::Error(NomError::new(&input[i..], ErrorKind::Char))),
            },
            '"' if depth == 0 => return Ok((&input[i + 1..], &input[1..i])),
            _ => {}
        }
    }

    Err(nom::Err::Error(NomError::new(input, ErrorKind::TakeUntil)))
}
