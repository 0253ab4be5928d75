//! Entry-point classification for client sources.
//!
//! A source file is an entry point when it declares a function literally
//! named `main` at package scope — not nested inside another function,
//! and not a method on a receiver. The rule lives behind
//! [`SourceClassifier`] so the traversal in [`crate::scan`] stays
//! independent of any one language's convention.
//!
//! [`GoEntryClassifier`] does not parse Go fully. It runs a lexical
//! scanner that is exact about the three things the rule depends on:
//! comments, string/rune literals, and brace depth. `func main` inside
//! any of those is not a declaration; `func main` at depth zero is. A
//! method declaration reads `func (recv T) main(...)`, so requiring the
//! identifier `main` directly after the `func` keyword excludes methods
//! without modeling receivers.
//!
//! Malformed input — an unterminated string or comment, unbalanced
//! braces — is a hard error, never a silent "not an entry point". A
//! file the classifier cannot read correctly is a file the compiler
//! cannot compile, and the build should say so before dispatching
//! anything.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("error parsing {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}

/// Decides whether a source file is an independently compilable entry
/// point. Implementations own the language convention; the scanner owns
/// the traversal.
pub trait SourceClassifier {
    fn classify(&self, path: &Path) -> Result<bool, ClassifyError>;
}

/// Production classifier: top-level `func main` detection for Go.
#[derive(Debug, Default)]
pub struct GoEntryClassifier;

impl SourceClassifier for GoEntryClassifier {
    fn classify(&self, path: &Path) -> Result<bool, ClassifyError> {
        let text = std::fs::read_to_string(path).map_err(|source| ClassifyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        has_top_level_main(&text).map_err(|reason| ClassifyError::Parse {
            path: path.to_path_buf(),
            reason,
        })
    }
}

/// Scan source text for a package-scope `func main` declaration.
fn has_top_level_main(src: &str) -> Result<bool, String> {
    let bytes = src.as_bytes();
    let mut i = 0;
    let mut depth: u32 = 0;
    let mut found = false;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => i = skip_line_comment(bytes, i),
            b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_block_comment(bytes, i)?,
            b'"' => i = skip_quoted(bytes, i, b'"', "string literal")?,
            b'\'' => i = skip_quoted(bytes, i, b'\'', "rune literal")?,
            b'`' => i = skip_raw_string(bytes, i)?,
            b'{' => {
                depth += 1;
                i += 1;
            }
            b'}' => {
                if depth == 0 {
                    return Err("unbalanced braces".to_string());
                }
                depth -= 1;
                i += 1;
            }
            c if is_ident_start(c) => {
                let start = i;
                i = skip_ident(bytes, i);
                if depth == 0 && &src[start..i] == "func" {
                    // Peek past trivia: an identifier here is the
                    // function name (a `(` instead means a receiver).
                    let j = skip_trivia(bytes, i)?;
                    if j < bytes.len() && is_ident_start(bytes[j]) {
                        let name_end = skip_ident(bytes, j);
                        if &src[j..name_end] == "main" {
                            let k = skip_trivia(bytes, name_end)?;
                            if bytes.get(k) == Some(&b'(') {
                                found = true;
                            }
                        }
                        i = name_end;
                    }
                }
            }
            _ => i += 1,
        }
    }

    if depth != 0 {
        return Err("unbalanced braces at end of file".to_string());
    }
    Ok(found)
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c >= 0x80
}

fn is_ident_continue(c: u8) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

fn skip_ident(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && is_ident_continue(bytes[i]) {
        i += 1;
    }
    i
}

fn skip_line_comment(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i] != b'\n' {
        i += 1;
    }
    i
}

fn skip_block_comment(bytes: &[u8], start: usize) -> Result<usize, String> {
    let mut i = start + 2;
    while i + 1 < bytes.len() {
        if bytes[i] == b'*' && bytes[i + 1] == b'/' {
            return Ok(i + 2);
        }
        i += 1;
    }
    Err("unterminated block comment".to_string())
}

/// Skip an interpreted string or rune literal, honoring backslash
/// escapes. Neither may span a newline.
fn skip_quoted(bytes: &[u8], start: usize, quote: u8, what: &str) -> Result<usize, String> {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => break,
            c if c == quote => return Ok(i + 1),
            _ => i += 1,
        }
    }
    Err(format!("unterminated {what}"))
}

/// Skip a raw string literal (backquoted; newlines allowed, no escapes).
fn skip_raw_string(bytes: &[u8], start: usize) -> Result<usize, String> {
    let mut i = start + 1;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            return Ok(i + 1);
        }
        i += 1;
    }
    Err("unterminated raw string literal".to_string())
}

/// Skip whitespace and comments without touching anything else.
fn skip_trivia(bytes: &[u8], mut i: usize) -> Result<usize, String> {
    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if bytes.get(i) == Some(&b'/') && bytes.get(i + 1) == Some(&b'/') {
            i = skip_line_comment(bytes, i);
        } else if bytes.get(i) == Some(&b'/') && bytes.get(i + 1) == Some(&b'*') {
            i = skip_block_comment(bytes, i)?;
        } else {
            return Ok(i);
        }
    }
}
