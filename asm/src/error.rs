use crate::msg::Msg;
use crate::token::Pos;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Lexical
    #[error("{0}: illegal character `{1}`")]
    IllegalCharacter(Pos, char),

    // Syntactic
    #[error("{0}: unrecognized token `{1}`")]
    UnexpectedToken(Pos, String),

    #[error("{0}: unexpected newline")]
    UnexpectedNewline(Pos),

    #[error("{0}: expected token after `{1}`, but reached end of file")]
    UnexpectedEof(Pos, String),

    #[error("{0}: expected {1}, but got `{2}`")]
    Expected(Pos, String, String),

    #[error("{0}: expected newline, but got `{1}`")]
    ExpectedNewline(Pos, String),

    #[error("{0}: malformed number `{1}`")]
    MalformedNumber(Pos, String),

    #[error("{0}: expected r[0-7], got `{1}`")]
    InvalidRegister(Pos, String),

    // Semantic
    #[error("{pos}: out of range: {part}{value} must fit in {width}")]
    OutOfRange {
        pos: Pos,
        value: String,
        part: &'static str,
        width: &'static str,
    },

    #[error("{0}: {1} must be divisible by {2}")]
    Misaligned(Pos, String, u32),

    #[error("{0}: cannot reuse label `{1}`")]
    DuplicateLabel(Pos, String, Pos),

    #[error("{0}: unbound label `{1}`")]
    UnboundLabel(Pos, String),

    #[error("{0}: offset to label `{1}` must be divisible by two, currently {2}")]
    MisalignedRelative(Pos, String, String),

    #[error("{0}: use of label `{1}` may not be more than 0x80 from its binding, currently {2}")]
    DisplacementOutOfRange(Pos, String, String),

    #[error("{0}: address overflows 4 bytes")]
    AddressOverflow(Pos),

    // I/O
    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),
}

impl Error {
    pub fn pos(&self) -> Option<Pos> {
        match self {
            Error::IllegalCharacter(pos, _)
            | Error::UnexpectedToken(pos, _)
            | Error::UnexpectedNewline(pos)
            | Error::UnexpectedEof(pos, _)
            | Error::Expected(pos, ..)
            | Error::ExpectedNewline(pos, _)
            | Error::MalformedNumber(pos, _)
            | Error::InvalidRegister(pos, _)
            | Error::OutOfRange { pos, .. }
            | Error::Misaligned(pos, ..)
            | Error::DuplicateLabel(pos, ..)
            | Error::UnboundLabel(pos, _)
            | Error::MisalignedRelative(pos, ..)
            | Error::DisplacementOutOfRange(pos, ..)
            | Error::AddressOverflow(pos) => Some(*pos),
            Error::FileOpen(..) | Error::FileWrite(..) => None,
        }
    }

    /// Print error with diagnostic information showing file location and line content
    pub fn print_diag(&self, file: &str, source: &[&str]) {
        let msg = Msg::Error(self.to_string());
        match self.pos() {
            Some(pos) => msg.diag(file, pos, source),
            None => msg.print(),
        }
        if let Error::DuplicateLabel(_, name, prev) = self {
            Msg::Note(format!("`{}` is already bound here", name)).diag(file, *prev, source);
        }
    }
}
