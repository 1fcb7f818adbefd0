use num_enum::IntoPrimitive;
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, IntoPrimitive, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum Reg {
    #[default]
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
}

impl Reg {
    /// Accepts exactly `r0` .. `r7`.
    pub fn parse(s: &str) -> Option<Self> {
        s.parse::<Self>().ok()
    }

    pub fn num(self) -> u8 {
        self.into()
    }
}

#[test]
fn test() {
    assert_eq!(Reg::parse("r0"), Some(Reg::R0));
    assert_eq!(Reg::parse("r7"), Some(Reg::R7));
    assert_eq!(Reg::parse("r8"), None);
    assert_eq!(Reg::parse("R1"), None);
    assert_eq!(Reg::parse("r01"), None);
    assert_eq!(Reg::R5.num(), 5);
    assert_eq!(Reg::R3.to_string(), "r3");
}
