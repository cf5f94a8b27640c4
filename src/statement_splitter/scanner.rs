// WHY: Four-mode lexical scanner over chars with one character of lookahead
// Only Normal mode gives meaning to terminators and comment openers

use super::{DetectedStatement, Span, STATEMENT_TERMINATOR};

/// Lexical mode of the scanning cursor. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexMode {
    Normal,
    InSingleQuotedString,
    InLineComment,
    InBlockComment,
}

/// 1-based line/column of the character under the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineCol {
    line: usize,
    col: usize,
}

impl LineCol {
    fn start() -> Self {
        Self { line: 1, col: 1 }
    }

    fn advance(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
    }
}

/// Text of the statement being assembled plus the positions of its
/// first and last non-whitespace characters
struct Accumulator {
    text: String,
    first: Option<LineCol>,
    last: LineCol,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            text: String::new(),
            first: None,
            last: LineCol::start(),
        }
    }

    fn push(&mut self, ch: char, at: LineCol) {
        self.text.push(ch);
        if !ch.is_whitespace() {
            self.first.get_or_insert(at);
            self.last = at;
        }
    }

    /// Emit the trimmed statement if it has any content, then reset
    fn flush_into(&mut self, statements: &mut Vec<DetectedStatement>) {
        // first is only set once a non-whitespace char was pushed
        if let Some(first) = self.first {
            statements.push(DetectedStatement {
                index: statements.len(),
                sql: self.text.trim().to_string(),
                span: Span {
                    start_line: first.line,
                    start_col: first.col,
                    end_line: self.last.line,
                    end_col: self.last.col,
                },
            });
        }
        self.text.clear();
        self.first = None;
    }
}

/// Single left-to-right pass producing located statements in source order
pub(super) fn scan(text: &str) -> Vec<DetectedStatement> {
    let chars: Vec<char> = text.chars().collect();
    let mut statements = Vec::new();
    let mut acc = Accumulator::new();
    let mut mode = LexMode::Normal;
    let mut pos = LineCol::start();

    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        let next = chars.get(i + 1).copied();
        // Number of chars this step consumes (1, or 2 for a two-char token)
        let mut width = 1;

        match mode {
            LexMode::Normal => match (ch, next) {
                ('\'', _) => {
                    acc.push(ch, pos);
                    mode = LexMode::InSingleQuotedString;
                }
                ('-', Some('-')) => {
                    mode = LexMode::InLineComment;
                    width = 2;
                }
                ('/', Some('*')) => {
                    mode = LexMode::InBlockComment;
                    width = 2;
                }
                (c, _) if c == STATEMENT_TERMINATOR => acc.flush_into(&mut statements),
                _ => acc.push(ch, pos),
            },
            LexMode::InSingleQuotedString => {
                acc.push(ch, pos);
                if ch == '\'' {
                    if next == Some('\'') {
                        // Escaped quote: both chars stay in the literal
                        let mut second = pos;
                        second.advance(ch);
                        acc.push('\'', second);
                        width = 2;
                    } else {
                        mode = LexMode::Normal;
                    }
                }
            }
            LexMode::InLineComment => {
                if ch == '\n' {
                    acc.push(ch, pos);
                    mode = LexMode::Normal;
                }
            }
            LexMode::InBlockComment => {
                if ch == '*' && next == Some('/') {
                    mode = LexMode::Normal;
                    width = 2;
                }
            }
        }

        for &consumed in &chars[i..i + width] {
            pos.advance(consumed);
        }
        i += width;
    }

    // Input without a trailing terminator, or ending inside a string or comment
    acc.flush_into(&mut statements);
    statements
}
