// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A minimal streaming text parser for SVG attribute grammars.

use std::str::FromStr;

pub(crate) trait ByteExt {
    /// Checks if a byte is a numeric sign.
    fn is_sign(&self) -> bool;

    /// Checks if a byte is a digit.
    ///
    /// `[0-9]`
    fn is_digit(&self) -> bool;

    /// Checks if a byte is a space.
    ///
    /// `[ \r\n\t]`
    fn is_space(&self) -> bool;

    /// Checks if a byte is an ASCII ident char.
    fn is_ascii_ident(&self) -> bool;
}

impl ByteExt for u8 {
    #[inline]
    fn is_sign(&self) -> bool {
        matches!(*self, b'+' | b'-')
    }

    #[inline]
    fn is_digit(&self) -> bool {
        matches!(*self, b'0'..=b'9')
    }

    #[inline]
    fn is_space(&self) -> bool {
        matches!(*self, b' ' | b'\t' | b'\n' | b'\r')
    }

    #[inline]
    fn is_ascii_ident(&self) -> bool {
        matches!(*self, b'0'..=b'9' | b'A'..=b'Z' | b'a'..=b'z' | b'-' | b'_')
    }
}

/// A number parsing error.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct InvalidNumber;

/// A streaming text parsing interface.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Stream<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> From<&'a str> for Stream<'a> {
    #[inline]
    fn from(text: &'a str) -> Self {
        Stream { text, pos: 0 }
    }
}

impl<'a> Stream<'a> {
    /// Checks if the stream is reached the end.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    #[inline]
    fn curr_byte_unchecked(&self) -> u8 {
        self.text.as_bytes()[self.pos]
    }

    /// Checks that current byte is equal to provided.
    ///
    /// Returns `false` if no bytes left.
    #[inline]
    pub fn is_curr_byte_eq(&self, c: u8) -> bool {
        if !self.at_end() {
            self.curr_byte_unchecked() == c
        } else {
            false
        }
    }

    /// Advances by `n` bytes.
    #[inline]
    pub fn advance(&mut self, n: usize) {
        debug_assert!(self.pos + n <= self.text.len());
        self.pos += n;
    }

    /// Skips whitespaces.
    ///
    /// Accepted values: `' ' \n \r \t`.
    pub fn skip_spaces(&mut self) {
        while !self.at_end() && self.curr_byte_unchecked().is_space() {
            self.advance(1);
        }
    }

    /// Checks that the stream starts with a selected text.
    #[inline]
    pub fn starts_with(&self, text: &[u8]) -> bool {
        self.text.as_bytes()[self.pos..].starts_with(text)
    }

    fn skip_bytes<F>(&mut self, f: F)
    where
        F: Fn(u8) -> bool,
    {
        while !self.at_end() && f(self.curr_byte_unchecked()) {
            self.advance(1);
        }
    }

    #[inline]
    fn slice_back(&self, pos: usize) -> &'a str {
        &self.text[pos..self.pos]
    }

    /// Slices data from the current position to the end.
    #[inline]
    pub fn slice_tail(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// Consumes a single ident consisting of ASCII characters, if available.
    pub fn consume_ascii_ident(&mut self) -> &'a str {
        let start = self.pos;
        self.skip_bytes(|c| c.is_ascii_ident());
        self.slice_back(start)
    }

    /// Skips digits.
    fn skip_digits(&mut self) {
        self.skip_bytes(|c| c.is_digit());
    }

    /// Parses number from the stream.
    ///
    /// <https://www.w3.org/TR/SVG2/types.html#InterfaceSVGNumber>
    pub fn parse_number(&mut self) -> Result<f64, InvalidNumber> {
        self.skip_spaces();

        if self.at_end() {
            return Err(InvalidNumber);
        }

        let start = self.pos;

        if self.curr_byte_unchecked().is_sign() {
            self.advance(1);
        }

        self.skip_digits();

        if self.is_curr_byte_eq(b'.') {
            self.advance(1);
            self.skip_digits();
        }

        // Exponent part. `e`/`E` may also start the `em`/`ex` unit suffix,
        // so it only counts as an exponent when followed by a digit or sign.
        if self.starts_with(b"e") || self.starts_with(b"E") {
            let bytes = self.text.as_bytes();
            if let Some(&c) = bytes.get(self.pos + 1) {
                if c.is_digit() || c.is_sign() {
                    self.advance(1);
                    if self.curr_byte_unchecked().is_sign() {
                        self.advance(1);
                    }
                    self.skip_digits();
                }
            }
        }

        let s = self.slice_back(start);
        match f64::from_str(s) {
            Ok(n) if n.is_finite() => Ok(n),
            _ => {
                // Roll back so the caller sees where parsing stopped.
                self.pos = start;
                Err(InvalidNumber)
            }
        }
    }

    /// Parses number from a list of numbers.
    ///
    /// Accepts whitespace and/or a single comma as separators.
    pub fn parse_list_number(&mut self) -> Result<f64, InvalidNumber> {
        let n = self.parse_number()?;
        self.skip_spaces();
        self.parse_list_separator();
        Ok(n)
    }

    #[inline]
    pub fn parse_list_separator(&mut self) {
        if self.is_curr_byte_eq(b',') {
            self.advance(1);
        }
    }
}
