use indexmap::IndexMap;

use crate::error::Error;
use crate::parser::RefKind;
use crate::token::Pos;
use crate::util::hex;

/// Label name -> (bound address, where it was bound)
#[derive(Debug, Default)]
pub struct Labels(IndexMap<String, (u32, Pos)>);

impl Labels {
    pub fn new() -> Self {
        Labels(IndexMap::new())
    }

    /// Bind `name` to `addr`. A name can be bound only once.
    pub fn bind(&mut self, name: String, addr: u32, pos: Pos) -> Result<(), Error> {
        if let Some((_, prev)) = self.0.get(&name) {
            return Err(Error::DuplicateLabel(pos, name, *prev));
        }
        self.0.insert(name, (addr, pos));
        Ok(())
    }

    pub fn get_val(&self, name: &str) -> Option<u32> {
        self.0.get(name).map(|(addr, _)| *addr)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &(u32, Pos))> {
        self.0.iter()
    }
}

/// A placeholder in the output waiting for the address of `name`.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelUse {
    pub at: u32,
    pub kind: RefKind,
    pub name: String,
    pub pos: Pos,
}

impl LabelUse {
    /// Displacement byte for a PC-relative use of a label bound at `addr`.
    fn displacement(&self, addr: u32) -> Result<u8, Error> {
        let diff = (self.at as i64 + 1) - addr as i64;
        if diff % 2 != 0 {
            return Err(Error::MisalignedRelative(self.pos, self.name.clone(), hex(diff)));
        }
        match i8::try_from(diff / 2) {
            Ok(half) => Ok(half as u8),
            Err(_) => Err(Error::DisplacementOutOfRange(
                self.pos,
                self.name.clone(),
                hex(diff),
            )),
        }
    }
}

/// Patch every use into `image` once all bindings are known.
///
/// Uses never depend on each other, so the order they are applied in does not matter.
pub fn resolve(image: &mut [u8], labels: &Labels, uses: &[LabelUse]) -> Result<(), Error> {
    for used in uses {
        let addr = labels
            .get_val(&used.name)
            .ok_or_else(|| Error::UnboundLabel(used.pos, used.name.clone()))?;
        let at = used.at as usize;
        match used.kind {
            RefKind::Absolute => image[at..at + 4].copy_from_slice(&addr.to_be_bytes()),
            RefKind::Relative => image[at] = used.displacement(addr)?,
        }
    }
    Ok(())
}
