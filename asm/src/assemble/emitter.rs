use crate::error::Error;
use arch::marker::MAGIC;

/// One thing to append: a literal value or a name looked up in the opcode table.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Op(String),
    Val(i64),
}

impl From<&str> for Item {
    fn from(name: &str) -> Self {
        Item::Op(name.to_string())
    }
}

impl From<String> for Item {
    fn from(name: String) -> Self {
        Item::Op(name)
    }
}

impl From<i64> for Item {
    fn from(val: i64) -> Self {
        Item::Val(val)
    }
}

impl From<u8> for Item {
    fn from(val: u8) -> Self {
        Item::Val(val as i64)
    }
}

impl Item {
    fn resolve(self) -> Result<i64, Error> {
        match self {
            Item::Val(val) => Ok(val),
            Item::Op(name) => arch::opcode::resolve(&name).ok_or(Error::UnknownOpcode(name, None)),
        }
    }
}

#[macro_export]
macro_rules! items {
    ($($item:expr),* $(,)?) => {
        [$($crate::assemble::emitter::Item::from($item)),*]
    };
}

/// Main instruction stream and data section stream.
///
/// Values are not range-checked here; that happens when the package is
/// serialized.
#[derive(Debug, Clone)]
pub struct Emitter {
    main: Vec<i64>,
    data: Vec<i64>,
}

impl Emitter {
    pub fn new() -> Self {
        Emitter {
            main: MAGIC.iter().map(|&b| b as i64).collect(),
            data: vec![],
        }
    }

    pub fn emit<I: IntoIterator<Item = Item>>(&mut self, items: I) -> Result<(), Error> {
        for item in items {
            self.main.push(item.resolve()?);
        }
        Ok(())
    }

    pub fn emit_data<I: IntoIterator<Item = Item>>(&mut self, items: I) -> Result<(), Error> {
        for item in items {
            self.data.push(item.resolve()?);
        }
        Ok(())
    }

    /// Copy the whole data stream into the main stream
    pub fn splice_data(&mut self) {
        self.main.extend_from_slice(&self.data);
    }

    pub fn main(&self) -> &[i64] {
        &self.main
    }

    pub fn data(&self) -> &[i64] {
        &self.data
    }

    pub fn into_main(self) -> Vec<i64> {
        self.main
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}
