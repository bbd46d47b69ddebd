pub mod assemble;
pub mod error;
pub mod grammer;
pub mod msg;
pub mod package;
pub mod util;

pub use assemble::{Assembly, Processor};
pub use error::Error;
pub use grammer::lexer::Lexer;
pub use grammer::parsercore::Parser;
pub use package::Package;
pub use util::maps::LabelMap;

/// Source text -> package, with a fresh processor
pub fn assemble(file: &str, source: &str, strict: bool) -> Result<Assembly, Error> {
    let tokens = Lexer::new(file, source).parse();
    let module = Parser::new(tokens).parse()?;
    let mut processor = if strict {
        Processor::strict()
    } else {
        Processor::new()
    };
    processor.module(&module)?;
    Ok(processor.finish())
}
