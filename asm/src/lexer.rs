use crate::error::Error;
use crate::token::{Pos, Token, NEWLINE};

pub struct Lexer<'a> {
    code: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(code: &'a str) -> Self {
        Self { code }
    }

    /// Split the source into positioned tokens. Every `\n` becomes a newline token.
    pub fn parse(self) -> Result<Vec<Token>, Error> {
        let mut tokens = Vec::new();
        let mut rows = self.code.split('\n').enumerate().peekable();
        while let Some((idx, line)) = rows.next() {
            let line_no = idx + 1;
            let col = LineLexer::new(line, line_no).parse(&mut tokens)?;
            if rows.peek().is_some() {
                tokens.push(Token::new(NEWLINE, Pos::new(line_no, col)));
            }
        }
        Ok(tokens)
    }
}

struct LineLexer<'a> {
    line: &'a str,
    row: usize,
    col: usize,
    word: Option<(String, Pos)>,
}

impl<'a> LineLexer<'a> {
    fn new(line: &'a str, row: usize) -> Self {
        Self {
            line,
            row,
            col: 1,
            word: None,
        }
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

impl LineLexer<'_> {
    fn flush(&mut self, tokens: &mut Vec<Token>) {
        if let Some((value, pos)) = self.word.take() {
            tokens.push(Token::new(value, pos));
        }
    }
}

fn is_special(ch: char) -> bool {
    matches!(ch, '(' | ')' | '$' | ',' | '*')
}

fn is_word(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | ':' | '-')
}

// ----------------------------------------------------------------------------
// Lexer
// ----------------------------------------------------------------------------

impl LineLexer<'_> {
    /// Returns the column just past the last character of the line.
    fn parse(mut self, tokens: &mut Vec<Token>) -> Result<usize, Error> {
        let line = self.line;
        let mut comment = false;
        for ch in line.chars() {
            if ch == '\r' {
                continue;
            }
            let pos = Pos::new(self.row, self.col);
            self.col += 1;

            if comment {
                continue;
            }
            if ch == '#' {
                self.flush(tokens);
                comment = true;
            } else if is_special(ch) {
                self.flush(tokens);
                tokens.push(Token::new(ch.to_string(), pos));
            } else if ch == ' ' || ch == '\t' {
                self.flush(tokens);
            } else if is_word(ch) {
                self.word.get_or_insert_with(|| (String::new(), pos)).0.push(ch);
            } else {
                return Err(Error::IllegalCharacter(pos, ch));
            }
        }
        self.flush(tokens);
        Ok(self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(code: &str) -> Vec<String> {
        Lexer::new(code)
            .parse()
            .unwrap()
            .into_iter()
            .map(|t| t.value)
            .collect()
    }

    #[test]
    fn trailing_newline() {
        assert_eq!(values("halt\n"), vec!["halt", "\n"]);
        assert_eq!(values("halt"), vec!["halt"]);
    }

    #[test]
    fn crlf() {
        assert_eq!(values("nop\r\nhalt\r\n"), vec!["nop", "\n", "halt", "\n"]);
    }
}
