use crate::grammer::ast::Loc;
use color_print::cprintln;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Error(String),
    Warn(String),
    Note(String),
}

impl Msg {
    pub fn print(&self, file: &str) {
        self.header();
        cprintln!("     <blue>--></> <underline>{}</>", file);
    }

    /// With the offending line and a caret under the column
    pub fn print_at(&self, file: &str, loc: Loc, raw: &str) {
        self.header();
        cprintln!("     <blue>--></> <underline>{}:{}</>", file, loc);
        cprintln!("      <blue>|</>");
        cprintln!(" <blue>{:>4} |</> {}", loc.line + 1, raw);
        cprintln!("      <blue>|</> {}<red,bold>^</>", " ".repeat(loc.col));
    }

    fn header(&self) {
        match self {
            Msg::Error(msg) => cprintln!("<red,bold>error</>: {}", msg),
            Msg::Warn(msg) => cprintln!("<yellow,bold>warn</>: {}", msg),
            Msg::Note(msg) => cprintln!("<green,bold>note</>: {}", msg),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Msg::Error(_))
    }
}

pub fn dump(msgs: &[Msg], file: &str) {
    for msg in msgs {
        msg.print(file);
    }
}
