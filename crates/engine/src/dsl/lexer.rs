use std::{iter::Peekable, ops::Range, str::CharIndices};

/// A `key:value` token found in a raw query.
///
/// `key` is a run of word characters, `value` the run of non-whitespace
/// characters right after the colon (it may itself contain colons).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldToken<'a> {
    pub key: &'a str,
    pub value: &'a str,
    pub span: Range<usize>,
}

/// Result of scanning a query: every field token plus the text around them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scan<'a> {
    pub fields: Vec<FieldToken<'a>>,
    /// Input with all field tokens removed, whitespace collapsed.
    pub free_text: String,
}

pub struct Scanner<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    fn advance_until(&mut self, end: usize) {
        while let Some(&(i, _)) = self.chars.peek() {
            if i >= end {
                break;
            }
            self.chars.next();
        }
    }

    /// Consume a word run starting at `start`; returns its end offset.
    fn scan_word(&mut self, start: usize, first_char: char) -> usize {
        let mut end = start + first_char.len_utf8();
        while let Some(&(i, c)) = self.chars.peek() {
            if !is_word_char(c) {
                break;
            }
            end = i + c.len_utf8();
            self.chars.next();
        }
        end
    }

    /// Return the next field token, skipping anything that is not one.
    pub fn next_field(&mut self) -> Option<FieldToken<'a>> {
        while let Some((start, c)) = self.chars.next() {
            if !is_word_char(c) {
                continue;
            }

            let key_end = self.scan_word(start, c);

            // A key only counts when a colon and at least one non-space char follow.
            // Starting later inside the same word cannot succeed either, so the
            // scan simply carries on after the word.
            if !matches!(self.chars.peek(), Some(&(_, ':'))) {
                continue;
            }
            let value_start = key_end + 1;
            let value_end = self.input[value_start..]
                .find(char::is_whitespace)
                .map_or(self.input.len(), |rel| value_start + rel);
            if value_end == value_start {
                continue;
            }

            self.advance_until(value_end);
            return Some(FieldToken {
                key: &self.input[start..key_end],
                value: &self.input[value_start..value_end],
                span: start..value_end,
            });
        }
        None
    }
}

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Split `input` into field tokens and the leftover free text.
pub fn scan(input: &str) -> Scan<'_> {
    let mut scanner = Scanner::new(input);
    let mut fields = Vec::new();
    let mut remainder = String::with_capacity(input.len());
    let mut last = 0;

    while let Some(tok) = scanner.next_field() {
        // Tokens are cut out without leaving a separator behind.
        remainder.push_str(&input[last..tok.span.start]);
        last = tok.span.end;
        fields.push(tok);
    }
    remainder.push_str(&input[last..]);

    Scan {
        fields,
        free_text: collapse_whitespace(&remainder),
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[path = "lexer_tests.rs"]
mod tests;
