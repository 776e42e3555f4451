use super::FormatError;

/// Hex characters per memory word.
pub const WORD_CHARS: usize = 8;

/// One validated row of a raw memory dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLine<'a> {
    text: &'a str,
}

/// A 32-bit word together with the exact text it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryWord<'a> {
    pub text: &'a str,
    pub value: u32,
}

impl MemoryWord<'_> {
    pub fn is_zero(&self) -> bool {
        self.value == 0
    }
}

impl<'a> RawLine<'a> {
    /// Validate a dump row with its line terminator already stripped.
    /// `line` is the 1-based line number used in errors.
    pub fn parse(text: &'a str, line: usize) -> Result<Self, FormatError> {
        for (idx, c) in text.chars().enumerate() {
            if !c.is_ascii_hexdigit() {
                return Err(FormatError::InvalidHexDigit {
                    line,
                    column: idx + 1,
                    char: c,
                });
            }
        }

        Self::checked_length(text, line)
    }

    /// Validate a dump row read as raw bytes. Any byte that is not an ASCII
    /// hex digit, including non-UTF-8 bytes, is reported as `InvalidHexDigit`.
    pub fn parse_bytes(bytes: &'a [u8], line: usize) -> Result<Self, FormatError> {
        for (idx, &b) in bytes.iter().enumerate() {
            if !b.is_ascii_hexdigit() {
                return Err(FormatError::InvalidHexDigit {
                    line,
                    column: idx + 1,
                    char: char::from(b),
                });
            }
        }

        // All ASCII at this point.
        let text = std::str::from_utf8(bytes).map_err(|e| FormatError::InvalidHexDigit {
            line,
            column: e.valid_up_to() + 1,
            char: char::REPLACEMENT_CHARACTER,
        })?;
        Self::checked_length(text, line)
    }

    fn checked_length(text: &'a str, line: usize) -> Result<Self, FormatError> {
        if !text.len().is_multiple_of(WORD_CHARS) {
            return Err(FormatError::InvalidWordLength {
                line,
                length: text.len(),
            });
        }

        Ok(Self { text })
    }

    pub fn as_str(&self) -> &'a str {
        self.text
    }

    pub fn word_count(&self) -> usize {
        self.text.len() / WORD_CHARS
    }

    /// Words from the end of the row toward its start. The rightmost word
    /// sits at the lowest address.
    pub fn words(&self) -> Words<'a> {
        Words {
            text: self.text,
            start: 0,
            end: self.text.len(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Words<'a> {
    text: &'a str,
    start: usize,
    end: usize,
}

impl<'a> Iterator for Words<'a> {
    type Item = MemoryWord<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.end <= self.start {
            return None;
        }
        let word = &self.text[self.end - WORD_CHARS..self.end];
        self.end -= WORD_CHARS;
        Some(memory_word(word))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end - self.start) / WORD_CHARS;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for Words<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.end <= self.start {
            return None;
        }
        let word = &self.text[self.start..self.start + WORD_CHARS];
        self.start += WORD_CHARS;
        Some(memory_word(word))
    }
}

impl ExactSizeIterator for Words<'_> {}

fn memory_word(text: &str) -> MemoryWord<'_> {
    // Digits were checked in RawLine::parse.
    let value = text
        .bytes()
        .fold(0u32, |acc, b| (acc << 4) | hex_nibble(b) as u32);
    MemoryWord { text, value }
}

fn hex_nibble(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'A'..=b'F' => b - b'A' + 10,
        b'a'..=b'f' => b - b'a' + 10,
        _ => 0,
    }
}
