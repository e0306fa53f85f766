//! Block tokenizer for the tagged NC1 layout.
//!
//! A block starts at a line holding exactly two uppercase letters (`ST`, `AK`,
//! `IK`, `BO`, ...) and runs until the next such line. Tokenizing stops at
//! `EN`; lines before the first tag are dropped.

/// Tag that ends the block stream.
pub const END_TAG: &str = "EN";

/// One tagged block with its raw lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'a> {
    /// Two-letter block code.
    pub tag: &'a str,
    /// Lines following the tag line, untrimmed.
    pub lines: Vec<&'a str>,
}

impl<'a> Block<'a> {
    fn new(tag: &'a str) -> Self {
        Self {
            tag,
            lines: Vec::new(),
        }
    }

    /// Check the block tag.
    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }
}

/// Check whether a line opens a block.
pub fn is_tag_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() == 2 && trimmed.bytes().all(|b| b.is_ascii_uppercase())
}

/// Line iterator accepting `\n`, `\r\n` and bare `\r` terminators.
///
/// A trailing terminator does not produce an extra empty line.
#[derive(Debug, Clone)]
pub struct SplitLines<'a> {
    rest: &'a str,
}

impl<'a> Iterator for SplitLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }

        match self.rest.find(|c: char| c == '\r' || c == '\n') {
            Some(pos) => {
                let line = &self.rest[..pos];
                let skip = if self.rest[pos..].starts_with("\r\n") {
                    2
                } else {
                    1
                };
                self.rest = &self.rest[pos + skip..];
                Some(line)
            }
            None => {
                let line = self.rest;
                self.rest = "";
                Some(line)
            }
        }
    }
}

/// Split text into lines regardless of line-ending convention.
pub fn split_lines(text: &str) -> SplitLines<'_> {
    SplitLines { rest: text }
}

/// Iterator over the blocks of one NC1 text.
///
/// Cloning the iterator (or calling [`tokenize_blocks`] again) restarts the
/// scan; the source text is never copied.
#[derive(Debug, Clone)]
pub struct Blocks<'a> {
    lines: SplitLines<'a>,
    current: Option<Block<'a>>,
    finished: bool,
}

impl<'a> Iterator for Blocks<'a> {
    type Item = Block<'a>;

    fn next(&mut self) -> Option<Block<'a>> {
        if self.finished {
            return None;
        }

        for line in self.lines.by_ref() {
            if is_tag_line(line) {
                let tag = line.trim();
                let closed = self.current.take();

                if tag == END_TAG {
                    self.finished = true;
                    return closed;
                }

                self.current = Some(Block::new(tag));
                if closed.is_some() {
                    return closed;
                }
            } else if let Some(block) = self.current.as_mut() {
                block.lines.push(line);
            }
        }

        self.finished = true;
        self.current.take()
    }
}

/// Tokenize NC1 text into tagged blocks.
pub fn tokenize_blocks(text: &str) -> Blocks<'_> {
    Blocks {
        lines: split_lines(text),
        current: None,
        finished: false,
    }
}
