use arch::{inst::Inst, op::OpKind, reg::Reg};
use std::num::IntErrorKind;
use std::str::FromStr;

use crate::error::Error;
use crate::token::{Pos, Token};

/// Written where a label operand goes until the label is resolved.
/// `0x5_` is not a valid opcode, so an unpatched operand is easy to spot.
pub const PLACEHOLDER: u32 = 0x5A5A_5A5A;
pub const PLACEHOLDER_DISP: i8 = 0x5A;

const NIBBLE: &str = "1 nibble";
const BYTE: &str = "1 byte";
const WORD: &str = "4 bytes";

// ----------------------------------------------------------------------------
// Statement

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Label(String),
    Pos(u32),
    Long(Imm),
    Code(Inst, Option<LabelRef>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Imm {
    Literal(u32),
    Label(String, Pos),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Absolute,
    Relative,
}

/// A label operand inside an instruction, `offset` bytes from its start.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRef {
    pub name: String,
    pub pos: Pos,
    pub offset: u32,
    pub kind: RefKind,
}

/// One parsed statement with the position and text of its first token.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub pos: Pos,
    pub stmt: Stmt,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    Pos,
    Long,
}

impl FromStr for Directive {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ".pos" => Ok(Directive::Pos),
            ".long" | ".data" => Ok(Directive::Long),
            _ => Err(()),
        }
    }
}

// ----------------------------------------------------------------------------
// Parser

pub struct Parser<'a> {
    tokens: &'a [Token],
    idx: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser { tokens, idx: 0 }
    }

    /// Parse the next statement, skipping blank lines. `None` at end of input.
    pub fn next_line(&mut self) -> Result<Option<Line>, Error> {
        while let Some(head) = self.peek() {
            let start = self.idx;
            self.idx += 1;
            if head.is_newline() {
                continue;
            }

            // Labels may share a line with the statement that follows them.
            if let Some(name) = label_binding(&head.value) {
                return Ok(Some(Line {
                    pos: head.pos,
                    stmt: Stmt::Label(name.to_string()),
                    text: head.value.clone(),
                }));
            }

            let stmt = self.stmt(head)?;
            let text = render(&self.tokens[start..self.idx]);
            self.end_of_stmt()?;
            return Ok(Some(Line {
                pos: head.pos,
                stmt,
                text,
            }));
        }
        Ok(None)
    }

    fn stmt(&mut self, head: &'a Token) -> Result<Stmt, Error> {
        if let Ok(directive) = head.value.parse::<Directive>() {
            return match directive {
                Directive::Pos => Ok(Stmt::Pos(word(self.bump()?)?)),
                Directive::Long => Ok(Stmt::Long(self.imm()?)),
            };
        }
        match OpKind::parse(&head.value) {
            Some(op) => self.code(op),
            None => Err(Error::UnexpectedToken(head.pos, head.value.clone())),
        }
    }

    fn end_of_stmt(&mut self) -> Result<(), Error> {
        if let Some(tok) = self.peek() {
            self.idx += 1;
            if !tok.is_newline() {
                return Err(Error::ExpectedNewline(tok.pos, tok.value.clone()));
            }
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Cursor

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.idx)
    }

    /// Consume the next token of the current statement.
    fn bump(&mut self) -> Result<&'a Token, Error> {
        match self.tokens.get(self.idx) {
            Some(tok) if tok.is_newline() => Err(Error::UnexpectedNewline(tok.pos)),
            Some(tok) => {
                self.idx += 1;
                Ok(tok)
            }
            None => {
                let prev = self.idx.checked_sub(1).and_then(|i| self.tokens.get(i));
                Err(match prev {
                    Some(tok) => Error::UnexpectedEof(tok.pos, tok.value.clone()),
                    None => Error::UnexpectedEof(Pos::new(1, 1), String::new()),
                })
            }
        }
    }

    fn expect(&mut self, s: &str) -> Result<&'a Token, Error> {
        let tok = self.bump()?;
        if tok.is(s) {
            Ok(tok)
        } else {
            Err(Error::Expected(tok.pos, format!("`{s}`"), tok.to_string()))
        }
    }

    fn reg(&mut self) -> Result<Reg, Error> {
        reg(self.bump()?)
    }

    /// `rs , rd`
    fn two_regs(&mut self) -> Result<(Reg, Reg), Error> {
        let rs = self.reg()?;
        self.expect(",")?;
        Ok((rs, self.reg()?))
    }

    /// The rest of `( rb )` or `( rb , ri , 4 )` after the opening parenthesis.
    fn base(&mut self) -> Result<(Reg, Option<Reg>), Error> {
        let rb = self.reg()?;
        let tok = self.bump()?;
        if tok.is(")") {
            return Ok((rb, None));
        }
        if !tok.is(",") {
            return Err(Error::Expected(tok.pos, "`,` or `)`".to_string(), tok.to_string()));
        }
        let ri = self.reg()?;
        self.expect(",")?;
        self.expect("4")?;
        self.expect(")")?;
        Ok((rb, Some(ri)))
    }

    /// `( rb )` following an explicit offset.
    fn paren_reg(&mut self) -> Result<Reg, Error> {
        self.expect("(")?;
        let r = self.reg()?;
        self.expect(")")?;
        Ok(r)
    }

    /// `$ n ,` returning the literal token and its value.
    fn dollar(
        &mut self,
        part: &'static str,
        width: &'static str,
    ) -> Result<(&'a Token, u64), Error> {
        self.expect("$")?;
        let tok = self.bump()?;
        let n = unsigned(tok).map_err(|err| narrow(err, tok, part, width))?;
        self.expect(",")?;
        Ok((tok, n))
    }

    fn imm(&mut self) -> Result<Imm, Error> {
        let tok = self.bump()?;
        if is_label(&tok.value) {
            Ok(Imm::Label(tok.value.clone(), tok.pos))
        } else {
            Ok(Imm::Literal(word(tok)?))
        }
    }

    /// Branch target: a label, or an even signed displacement whose half fits a byte.
    fn target(&mut self) -> Result<(i8, Option<LabelRef>), Error> {
        let tok = self.bump()?;
        if is_label(&tok.value) {
            let label = LabelRef::new(tok, 1, RefKind::Relative);
            return Ok((PLACEHOLDER_DISP, Some(label)));
        }
        let n = signed(tok).map_err(|err| narrow(err, tok, "half of ", BYTE))?;
        if n % 2 != 0 {
            return Err(Error::Misaligned(tok.pos, tok.value.clone(), 2));
        }
        let half = i8::try_from(n / 2).map_err(|_| out_of_range(tok, "half of ", BYTE))?;
        Ok((half, None))
    }
}

// ----------------------------------------------------------------------------
// Operation

impl Parser<'_> {
    fn code(&mut self, op: OpKind) -> Result<Stmt, Error> {
        let (inst, label) = match op {
            OpKind::Halt => (Inst::Halt, None),
            OpKind::Nop => (Inst::Nop, None),

            OpKind::Mov => {
                let (rs, rd) = self.two_regs()?;
                (Inst::Mov(rs, rd), None)
            }
            OpKind::Add => {
                let (rs, rd) = self.two_regs()?;
                (Inst::Add(rs, rd), None)
            }
            OpKind::And => {
                let (rs, rd) = self.two_regs()?;
                (Inst::And(rs, rd), None)
            }

            OpKind::Inc => (Inst::Inc(self.reg()?), None),
            OpKind::Inca => (Inst::Inca(self.reg()?), None),
            OpKind::Dec => (Inst::Dec(self.reg()?), None),
            OpKind::Deca => (Inst::Deca(self.reg()?), None),
            OpKind::Not => (Inst::Not(self.reg()?), None),

            OpKind::Shl => {
                let (tok, n) = self.dollar("", BYTE)?;
                if n > 0x7F {
                    return Err(out_of_range(tok, "", BYTE));
                }
                (Inst::Shl(n as u8, self.reg()?), None)
            }
            OpKind::Shr => {
                let (tok, n) = self.dollar("", BYTE)?;
                if n > 0x80 {
                    return Err(out_of_range(tok, "", BYTE));
                }
                (Inst::Shr(n as u8, self.reg()?), None)
            }
            OpKind::Gpc => {
                let (tok, n) = self.dollar("half of ", NIBBLE)?;
                if n % 2 != 0 {
                    return Err(Error::Misaligned(tok.pos, tok.value.clone(), 2));
                }
                if n / 2 > 0xF {
                    return Err(out_of_range(tok, "half of ", NIBBLE));
                }
                (Inst::Gpc((n / 2) as u8, self.reg()?), None)
            }

            OpKind::Ld => self.load()?,
            OpKind::St => (self.store()?, None),
            OpKind::J => self.jump()?,

            OpKind::Br => {
                let (disp, label) = self.target()?;
                (Inst::Branch(disp), label)
            }
            OpKind::Beq => {
                let r = self.reg()?;
                self.expect(",")?;
                let (disp, label) = self.target()?;
                (Inst::BranchEq(r, disp), label)
            }
            OpKind::Bgt => {
                let r = self.reg()?;
                self.expect(",")?;
                let (disp, label) = self.target()?;
                (Inst::BranchGt(r, disp), label)
            }
        };
        Ok(Stmt::Code(inst, label))
    }

    fn load(&mut self) -> Result<(Inst, Option<LabelRef>), Error> {
        let tok = self.bump()?;
        if tok.is("$") {
            // ld $v, rd
            let imm = self.imm()?;
            self.expect(",")?;
            let rd = self.reg()?;
            return Ok(match imm {
                Imm::Literal(v) => (Inst::LoadImm(rd, v), None),
                Imm::Label(name, pos) => {
                    let label = LabelRef {
                        name,
                        pos,
                        offset: 2,
                        kind: RefKind::Absolute,
                    };
                    (Inst::LoadImm(rd, PLACEHOLDER), Some(label))
                }
            });
        }

        let inst = if tok.is("(") {
            // ld (rb), rd | ld (rb, ri, 4), rd
            let (rb, ri) = self.base()?;
            self.expect(",")?;
            let rd = self.reg()?;
            match ri {
                None => Inst::LoadOffset(0, rb, rd),
                Some(ri) => Inst::LoadIndexed(rb, ri, rd),
            }
        } else {
            // ld o(rb), rd
            let quarter = scaled(tok, 4, 0xF, NIBBLE)?;
            let rb = self.paren_reg()?;
            self.expect(",")?;
            Inst::LoadOffset(quarter, rb, self.reg()?)
        };
        Ok((inst, None))
    }

    fn store(&mut self) -> Result<Inst, Error> {
        let rs = self.reg()?;
        self.expect(",")?;
        let tok = self.bump()?;
        if tok.is("(") {
            // st rs, (rd) | st rs, (rd, ri, 4)
            let (rd, ri) = self.base()?;
            return Ok(match ri {
                None => Inst::StoreOffset(rs, 0, rd),
                Some(ri) => Inst::StoreIndexed(rs, rd, ri),
            });
        }
        // st rs, o(rd)
        let quarter = scaled(tok, 4, 0xF, NIBBLE)?;
        Ok(Inst::StoreOffset(rs, quarter, self.paren_reg()?))
    }

    fn jump(&mut self) -> Result<(Inst, Option<LabelRef>), Error> {
        let tok = self.bump()?;
        let inst = if tok.is("*") {
            let tok = self.bump()?;
            if tok.is("(") {
                // j *(rb) | j *(rb, ri, 4)
                match self.base()? {
                    (rb, None) => Inst::JumpIndirect(0, rb),
                    (rb, Some(ri)) => Inst::JumpIndexed(rb, ri),
                }
            } else {
                // j *o(rb)
                let quarter = scaled(tok, 4, 0xFF, BYTE)?;
                Inst::JumpIndirect(quarter, self.paren_reg()?)
            }
        } else if tok.is("(") {
            // j (rb)
            let rb = self.reg()?;
            self.expect(")")?;
            Inst::JumpOffset(0, rb)
        } else if self.peek().is_some_and(|next| next.is("(")) {
            // j o(rb)
            let half = scaled(tok, 2, 0xFF, BYTE)?;
            Inst::JumpOffset(half, self.paren_reg()?)
        } else if is_label(&tok.value) {
            // j label
            let label = LabelRef::new(tok, 2, RefKind::Absolute);
            return Ok((Inst::Jump(PLACEHOLDER), Some(label)));
        } else {
            // j addr
            Inst::Jump(word(tok)?)
        };
        Ok((inst, None))
    }
}

impl LabelRef {
    fn new(tok: &Token, offset: u32, kind: RefKind) -> Self {
        LabelRef {
            name: tok.value.clone(),
            pos: tok.pos,
            offset,
            kind,
        }
    }
}

// ----------------------------------------------------------------------------
// Helpers

fn out_of_range(tok: &Token, part: &'static str, width: &'static str) -> Error {
    Error::OutOfRange {
        pos: tok.pos,
        value: tok.value.clone(),
        part,
        width,
    }
}

fn reg(tok: &Token) -> Result<Reg, Error> {
    Reg::parse(&tok.value).ok_or_else(|| Error::InvalidRegister(tok.pos, tok.to_string()))
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_label(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(head) if head.is_ascii_alphabetic() || head == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// `name:` in binding position, returning `name`.
fn label_binding(s: &str) -> Option<&str> {
    s.strip_suffix(':').filter(|name| is_label(name))
}

/// Decimal, or hexadecimal with a `0x` prefix. The whole token must be consumed.
///
/// Well-formed literals too large for any field fail as out of range.
pub fn unsigned(tok: &Token) -> Result<u64, Error> {
    let malformed = || Error::MalformedNumber(tok.pos, tok.to_string());
    let (digits, radix) = match tok.value.strip_prefix("0x") {
        Some(hex) => (hex, 16),
        None => (tok.value.as_str(), 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(malformed());
    }
    u64::from_str_radix(digits, radix).map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow => out_of_range(tok, "", WORD),
        _ => malformed(),
    })
}

/// Like [`unsigned`] with an optional leading `-`.
pub fn signed(tok: &Token) -> Result<i64, Error> {
    let (negative, body) = match tok.value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, tok.value.as_str()),
    };
    let magnitude = unsigned(&Token::new(body, tok.pos)).map_err(|err| match err {
        Error::OutOfRange { .. } => out_of_range(tok, "", WORD),
        _ => Error::MalformedNumber(tok.pos, tok.to_string()),
    })?;
    let magnitude = i64::try_from(magnitude).map_err(|_| out_of_range(tok, "", WORD))?;
    Ok(if negative { -magnitude } else { magnitude })
}

/// Restate an overflowing literal against the field it was written for.
fn narrow(err: Error, tok: &Token, part: &'static str, width: &'static str) -> Error {
    match err {
        Error::OutOfRange { .. } => out_of_range(tok, part, width),
        err => err,
    }
}

/// An unsigned literal that must fit 4 bytes.
fn word(tok: &Token) -> Result<u32, Error> {
    u32::try_from(unsigned(tok)?).map_err(|_| out_of_range(tok, "", WORD))
}

/// An unsigned offset that must be a multiple of `divisor`; returns `offset / divisor`.
fn scaled(tok: &Token, divisor: u64, max: u64, width: &'static str) -> Result<u8, Error> {
    let part = if divisor == 2 { "half of " } else { "a quarter of " };
    let n = unsigned(tok).map_err(|err| narrow(err, tok, part, width))?;
    if n % divisor != 0 {
        return Err(Error::Misaligned(tok.pos, tok.value.clone(), divisor as u32));
    }
    if n / divisor > max {
        return Err(out_of_range(tok, part, width));
    }
    Ok((n / divisor) as u8)
}

/// Source text of a statement, re-spaced for listings.
fn render(tokens: &[Token]) -> String {
    let mut text = String::new();
    let mut prev: Option<&str> = None;
    for tok in tokens.iter().filter(|t| !t.is_newline()) {
        let value = tok.value.as_str();
        let space = match (prev, value) {
            (None, _) | (_, "," | ")") | (Some("(" | "$" | "*"), _) => false,
            (Some(p), "(") => !p.starts_with(|c: char| c.is_ascii_digit() || c == '-'),
            _ => true,
        };
        if space {
            text.push(' ');
        }
        text.push_str(value);
        prev = Some(value);
    }
    text
}
