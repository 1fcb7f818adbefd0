use crate::reg::Reg;

/// One SM213 instruction with all fields already range checked.
///
/// Offsets are stored the way they are encoded: `quarter` fields hold
/// `offset / 4`, `half` fields hold `offset / 2`, and branch displacements
/// hold the halved signed distance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inst {
    Halt,
    Nop,

    Mov(Reg, Reg),
    Add(Reg, Reg),
    And(Reg, Reg),

    Inc(Reg),
    Inca(Reg),
    Dec(Reg),
    Deca(Reg),
    Not(Reg),

    Shl(u8, Reg),
    Shr(u8, Reg),
    Gpc(u8, Reg),

    LoadImm(Reg, u32),
    LoadOffset(u8, Reg, Reg),
    LoadIndexed(Reg, Reg, Reg),
    StoreOffset(Reg, u8, Reg),
    StoreIndexed(Reg, Reg, Reg),

    Branch(i8),
    BranchEq(Reg, i8),
    BranchGt(Reg, i8),

    Jump(u32),
    JumpOffset(u8, Reg),
    JumpIndirect(u8, Reg),
    JumpIndexed(Reg, Reg),
}

fn pack(hi: u8, lo: u8) -> u8 {
    (hi << 4) | (lo & 0x0F)
}

impl Inst {
    pub fn to_bytes(&self) -> Vec<u8> {
        let (b0, b1) = match *self {
            Inst::Halt => (0xF0, 0x00),
            Inst::Nop => (0xFF, 0x00),

            Inst::Mov(s, d) => (0x60, pack(s.num(), d.num())),
            Inst::Add(s, d) => (0x61, pack(s.num(), d.num())),
            Inst::And(s, d) => (0x62, pack(s.num(), d.num())),

            Inst::Inc(d) => (0x63, d.num()),
            Inst::Inca(d) => (0x64, d.num()),
            Inst::Dec(d) => (0x65, d.num()),
            Inst::Deca(d) => (0x66, d.num()),
            Inst::Not(d) => (0x67, d.num()),

            Inst::Shl(n, d) => (0x70 | d.num(), n),
            Inst::Shr(n, d) => (0x70 | d.num(), n.wrapping_neg()),
            Inst::Gpc(half, d) => (0x6F, pack(half, d.num())),

            Inst::LoadImm(d, _) => (d.num(), 0x00),
            Inst::LoadOffset(quarter, s, d) => (0x10 | quarter, pack(s.num(), d.num())),
            Inst::LoadIndexed(s, i, d) => (0x20 | s.num(), pack(i.num(), d.num())),
            Inst::StoreOffset(s, quarter, d) => (0x30 | s.num(), pack(quarter, d.num())),
            Inst::StoreIndexed(s, d, i) => (0x40 | s.num(), pack(d.num(), i.num())),

            Inst::Branch(disp) => (0x80, disp as u8),
            Inst::BranchEq(r, disp) => (0x90 | r.num(), disp as u8),
            Inst::BranchGt(r, disp) => (0xA0 | r.num(), disp as u8),

            Inst::Jump(_) => (0xB0, 0x00),
            Inst::JumpOffset(half, r) => (0xC0 | r.num(), half),
            Inst::JumpIndirect(quarter, r) => (0xD0 | r.num(), quarter),
            Inst::JumpIndexed(b, i) => (0xE0 | b.num(), pack(i.num(), 0)),
        };

        let mut bytes = vec![b0, b1];
        match *self {
            Inst::LoadImm(_, value) | Inst::Jump(value) => bytes.extend(value.to_be_bytes()),
            _ => {}
        }
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Reg::*;

    #[test]
    fn fixed() {
        assert_eq!(Inst::Halt.to_bytes(), vec![0xF0, 0x00]);
        assert_eq!(Inst::Nop.to_bytes(), vec![0xFF, 0x00]);
    }

    #[test]
    fn alu() {
        assert_eq!(Inst::Mov(R1, R2).to_bytes(), vec![0x60, 0x12]);
        assert_eq!(Inst::Add(R3, R4).to_bytes(), vec![0x61, 0x34]);
        assert_eq!(Inst::And(R7, R0).to_bytes(), vec![0x62, 0x70]);
        assert_eq!(Inst::Not(R6).to_bytes(), vec![0x67, 0x06]);
        assert_eq!(Inst::Gpc(3, R6).to_bytes(), vec![0x6F, 0x36]);
    }

    #[test]
    fn shift() {
        assert_eq!(Inst::Shl(0x7F, R2).to_bytes(), vec![0x72, 0x7F]);
        assert_eq!(Inst::Shr(1, R2).to_bytes(), vec![0x72, 0xFF]);
        assert_eq!(Inst::Shr(0x80, R0).to_bytes(), vec![0x70, 0x80]);
    }

    #[test]
    fn memory() {
        assert_eq!(
            Inst::LoadImm(R5, 0x12345678).to_bytes(),
            vec![0x05, 0x00, 0x12, 0x34, 0x56, 0x78]
        );
        assert_eq!(Inst::LoadOffset(2, R1, R3).to_bytes(), vec![0x12, 0x13]);
        assert_eq!(Inst::LoadIndexed(R1, R2, R3).to_bytes(), vec![0x21, 0x23]);
        assert_eq!(Inst::StoreOffset(R1, 2, R3).to_bytes(), vec![0x31, 0x23]);
        assert_eq!(Inst::StoreIndexed(R1, R2, R3).to_bytes(), vec![0x41, 0x23]);
    }

    #[test]
    fn control() {
        assert_eq!(Inst::Branch(-1).to_bytes(), vec![0x80, 0xFF]);
        assert_eq!(Inst::BranchEq(R2, 4).to_bytes(), vec![0x92, 0x04]);
        assert_eq!(Inst::BranchGt(R3, 0x7F).to_bytes(), vec![0xA3, 0x7F]);
        assert_eq!(Inst::Jump(0x1000).to_bytes(), vec![0xB0, 0x00, 0x00, 0x00, 0x10, 0x00]);
        assert_eq!(Inst::JumpOffset(4, R1).to_bytes(), vec![0xC1, 0x04]);
        assert_eq!(Inst::JumpIndirect(4, R1).to_bytes(), vec![0xD1, 0x04]);
        assert_eq!(Inst::JumpIndexed(R1, R2).to_bytes(), vec![0xE1, 0x20]);
    }
}
