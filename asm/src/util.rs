use crate::label::Labels;
use crate::parser::{Line, Stmt};
use color_print::cformat;

/// Signed hex as used in messages: `0x1f`, `-0x102`.
pub fn hex(value: i64) -> String {
    if value < 0 {
        format!("-0x{:x}", value.unsigned_abs())
    } else {
        format!("0x{:x}", value)
    }
}

/// `(address, length)` of each statement, in source order.
pub type Listing = Vec<(u32, u32, Line)>;

pub fn print_dump(listing: &Listing, image: &[u8], labels: &Labels) {
    let rule = format!("{}+{}", "-".repeat(30), "-".repeat(45));
    println!("{}", rule);
    for (addr, len, line) in listing {
        let bytes = image
            .get(*addr as usize..*addr as usize + *len as usize)
            .unwrap_or_default()
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ");

        let text = match &line.stmt {
            Stmt::Label(_) => cformat!("<g>{}</>", line.text),
            Stmt::Pos(_) | Stmt::Long(_) => cformat!("<c>{}</>", line.text),
            Stmt::Code(..) => match line.text.split_once(' ') {
                Some((op, args)) => cformat!("  <red>{:<5}</><blue>{}</>", op, args),
                None => cformat!("  <red>{}</>", line.text),
            },
        };

        let left = match &line.stmt {
            Stmt::Pos(_) => String::new(),
            _ => format!("[{:08X}] {}", addr, bytes),
        };
        println!("{:30}| {:>4}: {}", left, line.pos.line, text);
    }
    println!("{}", rule);

    for (name, (addr, _)) in labels.iter() {
        println!("{}", cformat!("<g>{:08X}</> {}", addr, name));
    }
}

#[test]
fn test() {
    assert_eq!(hex(0x1f), "0x1f");
    assert_eq!(hex(0), "0x0");
    assert_eq!(hex(-0x102), "-0x102");
}
