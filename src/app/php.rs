//! Whitespace and comment stripping for PHP sources.
//!
//! Inline HTML, string literals and heredoc/nowdoc bodies are copied verbatim.
//! Inside PHP code, comments are dropped and every whitespace run becomes a
//! single space. All delimiters are ASCII, so scanning bytes never splits a
//! UTF-8 sequence.

use crate::app::minify::Minify;

pub const OPEN_TAG: &str = "<?php";

#[derive(Debug, Default, Clone, Copy)]
pub struct PhpMinifier;

impl Minify for PhpMinifier {
    fn minify(&self, source: &str) -> String {
        Stripper::new(source).run()
    }

    fn opening_marker(&self) -> Option<&str> {
        Some(OPEN_TAG)
    }
}

struct Stripper<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    out: String,
    prev_space: bool,
}

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

fn is_ident(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

/// Bytes that may start something other than an ordinary code run.
fn is_special(b: u8) -> bool {
    is_space(b) || matches!(b, b'?' | b'#' | b'/' | b'\'' | b'"' | b'`' | b'<')
}

impl<'a> Stripper<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            out: String::with_capacity(src.len()),
            prev_space: false,
        }
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn emit(&mut self, start: usize, end: usize) {
        self.out.push_str(&self.src[start..end]);
    }

    fn space(&mut self) {
        if !self.prev_space {
            self.out.push(' ');
            self.prev_space = true;
        }
    }

    fn run(mut self) -> String {
        while self.pos < self.bytes.len() {
            match self.find_open_tag() {
                Some((start, end)) => {
                    self.emit(self.pos, end);
                    self.prev_space = end > start && is_space(self.bytes[end - 1]);
                    self.pos = end;
                    self.code();
                }
                None => {
                    self.emit(self.pos, self.bytes.len());
                    self.pos = self.bytes.len();
                }
            }
        }
        self.out
    }

    /// Finds the next `<?php` or `<?=` tag; returns its start and the end of the tag token.
    fn find_open_tag(&self) -> Option<(usize, usize)> {
        let len = self.bytes.len();
        let mut i = self.pos;
        while i + 1 < len {
            if self.bytes[i] == b'<' && self.bytes[i + 1] == b'?' {
                if self.bytes.get(i + 2) == Some(&b'=') {
                    return Some((i, i + 3));
                }
                let word = self.bytes.get(i + 2..i + 5);
                if word.is_some_and(|w| w.eq_ignore_ascii_case(b"php")) {
                    let end = i + 5;
                    match self.bytes.get(end) {
                        None => return Some((i, end)),
                        Some(b'\r') if self.bytes.get(end + 1) == Some(&b'\n') => {
                            return Some((i, end + 2))
                        }
                        Some(&b) if is_space(b) => return Some((i, end + 1)),
                        _ => {}
                    }
                }
            }
            i += 1;
        }
        None
    }

    /// Strips PHP code until the closing tag (consumed) or end of input.
    fn code(&mut self) {
        let len = self.bytes.len();
        while self.pos < len {
            let b = self.bytes[self.pos];
            match b {
                b'?' if self.peek(1) == Some(b'>') => {
                    self.close_tag();
                    return;
                }
                _ if is_space(b) => {
                    while self.pos < len && is_space(self.bytes[self.pos]) {
                        self.pos += 1;
                    }
                    self.space();
                }
                b'#' if self.peek(1) != Some(b'[') => self.line_comment(),
                b'/' if self.peek(1) == Some(b'/') => self.line_comment(),
                b'/' if self.peek(1) == Some(b'*') => self.block_comment(),
                b'\'' | b'"' | b'`' => {
                    let end = skip_quoted(self.bytes, self.pos, b);
                    self.emit(self.pos, end);
                    self.pos = end;
                    self.prev_space = false;
                }
                b'<' if self.bytes[self.pos..].starts_with(b"<<<") => self.heredoc(),
                _ => {
                    let start = self.pos;
                    self.pos += 1;
                    while self.pos < len && !is_special(self.bytes[self.pos]) {
                        self.pos += 1;
                    }
                    self.emit(start, self.pos);
                    self.prev_space = false;
                }
            }
        }
    }

    /// The closing tag token includes one directly following newline.
    fn close_tag(&mut self) {
        let start = self.pos;
        self.pos += 2;
        if self.bytes[self.pos..].starts_with(b"\r\n") {
            self.pos += 2;
        } else if self.peek(0) == Some(b'\n') {
            self.pos += 1;
        }
        self.emit(start, self.pos);
        self.prev_space = false;
    }

    /// `//` and `#` comments end at a newline or a closing tag, which stays in the input.
    fn line_comment(&mut self) {
        let len = self.bytes.len();
        while self.pos < len {
            match self.bytes[self.pos] {
                b'\n' | b'\r' => break,
                b'?' if self.peek(1) == Some(b'>') => break,
                _ => self.pos += 1,
            }
        }
        self.space();
    }

    fn block_comment(&mut self) {
        let body = self.pos + 2;
        self.pos = match self.src[body..].find("*/") {
            Some(offset) => body + offset + 2,
            None => self.bytes.len(),
        };
        self.space();
    }

    fn heredoc(&mut self) {
        let start = self.pos;
        let Some((label, body_start)) = self.heredoc_label() else {
            self.emit(start, start + 3);
            self.pos = start + 3;
            self.prev_space = false;
            return;
        };

        let Some(end) = find_heredoc_end(self.bytes, body_start, label) else {
            self.emit(start, self.bytes.len());
            self.pos = self.bytes.len();
            return;
        };
        self.emit(start, end);
        self.pos = end;

        // The closing label keeps a line of its own, so the token after it ends with a newline.
        match self.peek(0) {
            Some(b) if is_space(b) => {
                while self.peek(0).is_some_and(is_space) {
                    self.pos += 1;
                }
            }
            Some(b'?') | None => {
                self.prev_space = false;
                return;
            }
            Some(_) => {
                let next = self.src[self.pos..].chars().next().map_or(1, char::len_utf8);
                self.emit(self.pos, self.pos + next);
                self.pos += next;
            }
        }
        self.out.push('\n');
        self.prev_space = true;
    }

    /// Parses `<<<LABEL`, `<<<"LABEL"` or `<<<'LABEL'` up to and including the newline.
    fn heredoc_label(&self) -> Option<(&'a [u8], usize)> {
        let bytes = self.bytes;
        let mut i = self.pos + 3;
        while matches!(bytes.get(i), Some(b' ' | b'\t')) {
            i += 1;
        }
        let quote = match bytes.get(i) {
            Some(&q @ (b'"' | b'\'')) => {
                i += 1;
                Some(q)
            }
            _ => None,
        };
        let label_start = i;
        if !bytes.get(i).copied().is_some_and(is_ident_start) {
            return None;
        }
        while bytes.get(i).copied().is_some_and(is_ident) {
            i += 1;
        }
        let label = &bytes[label_start..i];
        if let Some(q) = quote {
            if bytes.get(i) != Some(&q) {
                return None;
            }
            i += 1;
        }
        match bytes.get(i) {
            Some(b'\n') => Some((label, i + 1)),
            Some(b'\r') if bytes.get(i + 1) == Some(&b'\n') => Some((label, i + 2)),
            _ => None,
        }
    }
}

/// End (exclusive) of the quoted literal starting at `start`, including `{$...}` interpolations.
fn skip_quoted(bytes: &[u8], start: usize, quote: u8) -> usize {
    let len = bytes.len();
    let mut i = start + 1;
    while i < len {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            b'{' if quote != b'\'' && bytes.get(i + 1) == Some(&b'$') => {
                i = skip_interpolation(bytes, i + 1);
            }
            _ => i += 1,
        }
    }
    len
}

fn skip_interpolation(bytes: &[u8], start: usize) -> usize {
    let len = bytes.len();
    let mut depth = 1;
    let mut i = start;
    while i < len && depth > 0 {
        match bytes[i] {
            b'{' => {
                depth += 1;
                i += 1;
            }
            b'}' => {
                depth -= 1;
                i += 1;
            }
            q @ (b'"' | b'\'') => i = skip_quoted(bytes, i, q),
            _ => i += 1,
        }
    }
    i
}

/// Position right after the closing label: first line whose trimmed start is the
/// label not followed by an identifier byte.
fn find_heredoc_end(bytes: &[u8], body_start: usize, label: &[u8]) -> Option<usize> {
    let mut line = body_start;
    while line < bytes.len() {
        let mut i = line;
        while matches!(bytes.get(i), Some(b' ' | b'\t')) {
            i += 1;
        }
        if bytes[i..].starts_with(label) {
            let end = i + label.len();
            if !bytes.get(end).copied().is_some_and(is_ident) {
                return Some(end);
            }
        }
        match bytes[line..].iter().position(|&b| b == b'\n') {
            Some(offset) => line += offset + 1,
            None => break,
        }
    }
    None
}
