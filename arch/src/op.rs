use strum::{Display, EnumString};

/// Mnemonic selected by the leading token of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum OpKind {
    Ld,
    St,
    Halt,
    Nop,
    Mov,
    Add,
    And,
    Inc,
    Inca,
    Dec,
    Deca,
    Not,
    Shl,
    Shr,
    Gpc,
    J,
    Br,
    Beq,
    Bgt,
}

impl OpKind {
    pub fn parse(s: &str) -> Option<Self> {
        s.parse::<Self>().ok()
    }
}

#[test]
fn test() {
    assert_eq!(OpKind::parse("ld"), Some(OpKind::Ld));
    assert_eq!(OpKind::parse("inca"), Some(OpKind::Inca));
    assert_eq!(OpKind::parse("bgt"), Some(OpKind::Bgt));
    assert_eq!(OpKind::parse("LD"), None);
    assert_eq!(OpKind::parse("hoge"), None);
    assert_eq!(OpKind::Deca.to_string(), "deca");
}
