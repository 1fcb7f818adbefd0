use crate::error::Error;
use crate::label::{self, LabelUse, Labels};
use crate::layout::{self, Block, Overlap};
use crate::parser::{Imm, Line, Parser, RefKind, Stmt, PLACEHOLDER};
use crate::token::{Pos, Token};
use crate::util::Listing;

/// Result of a successful assembly.
#[derive(Debug)]
pub struct Output {
    /// Memory image from address 0, ready to be written verbatim.
    pub image: Vec<u8>,
    /// Overlapping blocks. Not fatal; the later block's bytes are kept.
    pub overlaps: Vec<Overlap>,
    pub listing: Listing,
    pub labels: Labels,
}

/// Pass 1 state: the block being filled, finished blocks, bindings and pending uses.
pub struct Assembler {
    blocks: Vec<Block>,
    curr: Block,
    /// May reach `1 << 32` once the last byte of memory is filled.
    pc: u64,
    labels: Labels,
    uses: Vec<LabelUse>,
    listing: Listing,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Assembler {
    pub fn new() -> Self {
        Assembler {
            blocks: vec![],
            curr: Block::new(0, None),
            pc: 0,
            labels: Labels::new(),
            uses: vec![],
            listing: vec![],
        }
    }

    pub fn feed(&mut self, line: Line) -> Result<(), Error> {
        let start = self.pc;
        match &line.stmt {
            Stmt::Label(name) => {
                self.labels.bind(name.clone(), self.addr(line.pos)?, line.pos)?;
            }
            Stmt::Pos(addr) => {
                let next = Block::new(*addr, Some(line.pos));
                self.blocks.push(std::mem::replace(&mut self.curr, next));
                self.pc = *addr as u64;
            }
            Stmt::Long(Imm::Literal(value)) => {
                self.emit(&value.to_be_bytes(), line.pos)?;
            }
            Stmt::Long(Imm::Label(name, pos)) => {
                let at = self.emit(&PLACEHOLDER.to_be_bytes(), line.pos)?;
                self.refer(name, *pos, at, RefKind::Absolute);
            }
            Stmt::Code(inst, label) => {
                let at = self.emit(&inst.to_bytes(), line.pos)?;
                if let Some(label) = label {
                    self.refer(&label.name, label.pos, at + label.offset, label.kind);
                }
            }
        }
        let entry = match line.stmt {
            Stmt::Pos(addr) => (addr, 0),
            _ => (start as u32, (self.pc - start) as u32),
        };
        self.listing.push((entry.0, entry.1, line));
        Ok(())
    }

    /// Pass 2: lay out the blocks and patch every label use.
    pub fn finish(mut self) -> Result<Output, Error> {
        self.blocks.push(self.curr);
        let overlaps = layout::overlaps(&self.blocks);
        let mut image = layout::flatten(&self.blocks);
        label::resolve(&mut image, &self.labels, &self.uses)?;
        Ok(Output {
            image,
            overlaps,
            listing: self.listing,
            labels: self.labels,
        })
    }

    fn refer(&mut self, name: &str, pos: Pos, at: u32, kind: RefKind) {
        self.uses.push(LabelUse {
            at,
            kind,
            name: name.to_string(),
            pos,
        });
    }

    /// Current address, which must still be inside memory.
    fn addr(&self, pos: Pos) -> Result<u32, Error> {
        u32::try_from(self.pc).map_err(|_| Error::AddressOverflow(pos))
    }

    /// Append `bytes` at the current address and return that address.
    fn emit(&mut self, bytes: &[u8], pos: Pos) -> Result<u32, Error> {
        let start = self.addr(pos)?;
        let end = self.pc + bytes.len() as u64;
        if end > 1 << 32 {
            return Err(Error::AddressOverflow(pos));
        }
        self.curr.bytes.extend_from_slice(bytes);
        self.pc = end;
        Ok(start)
    }
}

/// Assemble a token stream into a memory image.
pub fn assemble(tokens: &[Token]) -> Result<Output, Error> {
    let mut parser = Parser::new(tokens);
    let mut asm = Assembler::new();
    while let Some(line) = parser.next_line()? {
        asm.feed(line)?;
    }
    asm.finish()
}
