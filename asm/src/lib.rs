pub mod assembler;
pub mod error;
pub mod label;
pub mod layout;
pub mod lexer;
pub mod msg;
pub mod parser;
pub mod token;
pub mod util;

pub use assembler::{assemble, Assembler, Output};
pub use error::Error;
pub use lexer::Lexer;
