use crate::token::Pos;
use color_print::cprintln;

#[derive(Debug)]
pub enum Msg {
    Error(String),
    Warn(String),
    Note(String),
}

impl Msg {
    pub fn print(&self) {
        match self {
            Msg::Error(msg) => cprintln!("<red,bold>error</>: {}", msg),
            Msg::Warn(msg) => cprintln!("<yellow,bold>warn</>: {}", msg),
            Msg::Note(msg) => cprintln!("<green,bold>note</>: {}", msg),
        }
    }

    /// Print the message followed by the source line it points at.
    pub fn diag(&self, file: &str, pos: Pos, source: &[&str]) {
        self.print();
        let raw = source.get(pos.line.saturating_sub(1)).copied().unwrap_or("");
        cprintln!("     <blue>--></> <underline>{}:{}</>", file, pos);
        cprintln!("      <blue>|</>");
        cprintln!(" <blue>{:>4} |</> {}", pos.line, raw);
        let pad = " ".repeat(pos.col.saturating_sub(1));
        cprintln!("      <blue>|</> {}<red,bold>^</>", pad);
    }
}
