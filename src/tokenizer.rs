//! Tokenizer for console input.
//!
//! Splits a command line into words with support for:
//! - Quoted strings (single and double quotes)
//! - Escape sequences within quotes

/// A command line split into the command name and its raw arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// The command name as typed.
    pub name: String,
    /// Raw argument tokens, in order.
    pub arguments: Vec<String>,
}

impl CommandLine {
    /// Tokenizes `input`. Returns `None` for a blank line.
    pub fn parse(input: &str) -> Option<Self> {
        let mut tokens = tokenize(input).into_iter();
        let name = tokens.next()?;
        Some(Self {
            name,
            arguments: tokens.collect(),
        })
    }
}

/// Tokenizes a command line.
///
/// Handles:
/// - Whitespace-separated tokens
/// - Double-quoted strings: `"hello world"` → `hello world`
/// - Single-quoted strings: `'hello world'` → `hello world`
/// - Escape sequences in quotes: `"say \"hi\""` → `say "hi"`
/// - Quotes inside a word: `name="John Doe"` → `name=John Doe`
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        // Skip whitespace
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let (word, quoted) = collect_word_or_quoted(&mut chars);
        if !word.is_empty() || quoted {
            tokens.push(word);
        }
    }

    tokens
}

/// Returns true if `input` ends with whitespace, i.e. its last word is complete.
pub fn ends_with_separator(input: &str) -> bool {
    input.chars().last().is_some_and(char::is_whitespace)
}

/// Collects a word, handling quoted strings. Returns the word and whether any
/// part of it was quoted (so `""` yields an empty token).
fn collect_word_or_quoted(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> (String, bool) {
    let mut result = String::new();
    let mut quoted = false;

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            break;
        }

        if c == '"' || c == '\'' {
            chars.next();
            quoted = true;
            result.push_str(&collect_quoted(chars, c));
            continue;
        }

        chars.next();
        result.push(c);
    }

    (result, quoted)
}

/// Collects characters inside quotes, handling escape sequences.
fn collect_quoted(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, quote: char) -> String {
    let mut result = String::new();
    let mut escaped = false;

    for c in chars.by_ref() {
        if escaped {
            match c {
                'n' => result.push('\n'),
                't' => result.push('\t'),
                'r' => result.push('\r'),
                '\\' => result.push('\\'),
                '"' => result.push('"'),
                '\'' => result.push('\''),
                _ => {
                    // Unknown escape, keep as-is
                    result.push('\\');
                    result.push(c);
                }
            }
            escaped = false;
            continue;
        }

        if c == '\\' {
            escaped = true;
            continue;
        }

        if c == quote {
            break;
        }

        result.push(c);
    }

    result
}
