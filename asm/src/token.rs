use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pos {
    pub line: usize,
    pub col: usize,
}

impl Pos {
    pub fn new(line: usize, col: usize) -> Self {
        Pos { line, col }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

pub const NEWLINE: &str = "\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    pub pos: Pos,
}

impl Token {
    pub fn new(value: impl Into<String>, pos: Pos) -> Self {
        Token {
            value: value.into(),
            pos,
        }
    }

    pub fn is_newline(&self) -> bool {
        self.value == NEWLINE
    }

    pub fn is(&self, s: &str) -> bool {
        self.value == s
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_newline() {
            write!(f, "newline")
        } else {
            write!(f, "{}", self.value)
        }
    }
}
