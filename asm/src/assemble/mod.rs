//! Syntax tree -> byte stream.
//!
//! One depth-first, left-to-right walk. Every handler either emits bytes,
//! returns a value to its parent, or updates the label table, and labels are
//! resolved the moment they are referenced. There is no second pass, so a
//! jump label must be declared before anything refers to it.

pub mod emitter;
pub mod eval;
pub mod labels;

use crate::error::Error;
use crate::grammer::ast::{Binary, Body, Chunk, Expr, Field, Inst, Module, Operand, Stmt};
use crate::items;
use crate::msg::Msg;
use crate::package::Package;
use crate::util::maps::LabelMap;
use arch::marker::{BinType, Section, SECTION_MARKER};
use arch::size::{Size, Width};
use emitter::{Emitter, Item};
use labels::Labels;
use std::fs;
use std::path::Path;

/// Id of the function the data section is spliced into
pub const ENTRY_FUNC: i64 = 0;

/// Translator state for one assembly run.
pub struct Processor {
    labels: Labels,
    emitter: Emitter,
    jmp_labels: i64,
    heap_offset_ptr: i64,
    strict: bool,
    msgs: Vec<Msg>,
}

/// Everything a finished run produces.
#[derive(Debug)]
pub struct Assembly {
    pub package: Package,
    pub labels: Labels,
    pub msgs: Vec<Msg>,
}

impl Assembly {
    /// Write the package and, if asked, the label map. Either both end up
    /// on disk or neither does.
    pub fn write(&self, output: &Path, map: Option<&Path>) -> Result<(), Error> {
        let yaml = match map {
            Some(_) => Some(LabelMap::new(&self.labels).to_yaml()?),
            None => None,
        };

        self.package.write(output)?;

        if let (Some(map), Some(yaml)) = (map, yaml) {
            if let Err(err) = fs::write(map, yaml) {
                let _ = fs::remove_file(output);
                return Err(err.into());
            }
        }
        Ok(())
    }
}

impl Processor {
    pub fn new() -> Self {
        Processor {
            labels: Labels::new(),
            emitter: Emitter::new(),
            jmp_labels: 0,
            heap_offset_ptr: 0,
            strict: false,
            msgs: vec![],
        }
    }

    /// Reject label redefinition instead of overwriting
    pub fn strict() -> Self {
        Processor {
            strict: true,
            ..Self::new()
        }
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn main(&self) -> &[i64] {
        self.emitter.main()
    }

    pub fn data(&self) -> &[i64] {
        self.emitter.data()
    }

    pub fn heap_offset(&self) -> i64 {
        self.heap_offset_ptr
    }

    pub fn finish(self) -> Assembly {
        Assembly {
            package: Package::new(self.emitter.into_main()),
            labels: self.labels,
            msgs: self.msgs,
        }
    }

    fn eval(&self, expr: &Expr) -> Result<i64, Error> {
        eval::eval(expr, &self.labels)
    }

    /// Reserve `size` bytes of heap, returning where they start
    fn alloc(&mut self, size: i64) -> Result<i64, Error> {
        let start = self.heap_offset_ptr;
        self.heap_offset_ptr = start
            .checked_add(size)
            .ok_or(Error::ArithmeticOverflow)?;
        Ok(start)
    }

    fn define(&mut self, name: &str, value: i64) -> Result<(), Error> {
        if self.strict && self.labels.contains(name) {
            return Err(Error::RedefinedLabel(name.to_string()));
        }
        if let Some(prev) = self.labels.insert(name, value) {
            self.msgs
                .push(Msg::Warn(format!("Re-defined label: `{}`", name)));
            self.msgs.push(Msg::Note(format!(
                "Previous value {} has been overridden with {}. If this is not intentional, please rename one of them.",
                prev, value
            )));
        }
        Ok(())
    }
}

impl Default for Processor {
    fn default() -> Self {
        Self::new()
    }
}

// ----------------------------------------------------------------------------
// Structure
// ----------------------------------------------------------------------------

impl Processor {
    pub fn module(&mut self, module: &Module) -> Result<(), Error> {
        let Module(binary) = module;
        self.binary(binary)
    }

    fn binary(&mut self, binary: &Binary) -> Result<(), Error> {
        self.emitter.emit(items![
            "section",
            SECTION_MARKER,
            u8::from(Section::Binary),
            "binary",
            u8::from(BinType::InlineEntry),
        ])?;
        if let Some(data) = &binary.data {
            self.ddata(data)?;
        }
        self.body(&binary.body)
    }

    fn ddata(&mut self, values: &[Expr]) -> Result<(), Error> {
        self.emitter
            .emit(items!["section", SECTION_MARKER, u8::from(Section::Data)])?;
        for value in values {
            let byte = self.eval(value)?;
            self.emitter.emit(items!["meta", byte])?;
        }
        Ok(())
    }

    fn body(&mut self, body: &Body) -> Result<(), Error> {
        let Body(stmts) = body;
        for stmt in stmts {
            self.stmt(stmt)?;
        }
        Ok(())
    }

    fn stmt(&mut self, stmt: &Stmt) -> Result<(), Error> {
        match stmt {
            Stmt::Extern(items) => self.dextern(items),
            Stmt::Asciz(chunks, label) => self.dasciz(chunks, label.as_deref()),
            Stmt::Byte(value, label) => self.dbyte(value, label.as_deref()),
            Stmt::Offset(size, label) => self.doffset(size, label.as_deref()),
            Stmt::Func(id, label, insts) => self.dfunc(id, label.as_deref(), insts),
        }
    }
}

// ----------------------------------------------------------------------------
// Directives
// ----------------------------------------------------------------------------

impl Processor {
    fn dextern(&mut self, items: &[(Expr, Vec<String>)]) -> Result<(), Error> {
        for (value, labels) in items {
            let addr = self.eval(value)?;
            for label in labels {
                self.define(label, addr)?;
            }
        }
        Ok(())
    }

    fn dasciz(&mut self, chunks: &[Chunk], label: Option<&str>) -> Result<(), Error> {
        let mut bytes = vec![];
        for chunk in chunks {
            match chunk {
                Chunk::Text(text) => bytes.extend(text.chars().map(|c| c as i64)),
                Chunk::Expr(expr) => bytes.push(self.eval(expr)?),
            }
        }
        bytes.push(0);

        let len = bytes.len() as i64;
        let addr = self.alloc(len)?;
        if let Some(label) = label {
            self.define(label, addr)?;
        }

        self.emitter.emit_data(items!["asciz", len])?;
        self.emitter.emit_data(bytes.into_iter().map(Item::from))
    }

    /// Named constant only: nothing is emitted
    fn dbyte(&mut self, value: &Expr, label: Option<&str>) -> Result<(), Error> {
        let byte = self.eval(value)?;
        if let Some(label) = label {
            self.define(label, byte)?;
        }
        Ok(())
    }

    fn doffset(&mut self, size: &Expr, label: Option<&str>) -> Result<(), Error> {
        let align = self.eval(size)?;
        if align < 0 {
            return Err(Error::NegativeOffset(align));
        }
        let addr = self.alloc(align)?;
        if let Some(label) = label {
            self.define(label, addr)?;
        }
        self.emitter.emit_data(items!["offset", align])
    }

    fn dfunc(&mut self, id: &Expr, label: Option<&str>, insts: &[Inst]) -> Result<(), Error> {
        let id = self.eval(id)?;
        if let Some(label) = label {
            self.define(label, id)?;
        }

        self.emitter.emit(items!["func", SECTION_MARKER, id])?;
        if id == ENTRY_FUNC {
            self.emitter.splice_data();
        }

        for inst in insts {
            self.inst(inst)?;
        }

        self.emitter.emit(items!["ret"])
    }
}

// ----------------------------------------------------------------------------
// Instructions
// ----------------------------------------------------------------------------

impl Processor {
    fn inst(&mut self, inst: &Inst) -> Result<(), Error> {
        match inst {
            Inst::Typed(mnemonic, size, operands, loc) => self
                .inst_typed(mnemonic, size, operands)
                .map_err(|err| err.at(*loc)),
            Inst::Typeless(mnemonic, operands, loc) => self
                .inst_typeless(mnemonic, operands)
                .map_err(|err| err.at(*loc)),
            Inst::AnonLabel(target) => self.anon_label(target),
            Inst::JmpLabel(label) => self.jmp_label(label),
        }
    }

    fn inst_typeless(&mut self, mnemonic: &str, operands: &[Operand]) -> Result<(), Error> {
        self.emitter.emit(items![mnemonic])?;

        let mut values = vec![];
        for operand in operands {
            values.push(Item::from(self.operand(operand)?));
        }
        self.emitter.emit(values)
    }

    fn inst_typed(&mut self, mnemonic: &str, size: &str, operands: &[Operand]) -> Result<(), Error> {
        let tag = size.parse::<Size>().ok();
        let width = match tag {
            Some(tag) => tag.width(),
            // Any other table entry is taken as a bit count
            None => {
                let bits = arch::opcode::lookup(size)
                    .ok_or_else(|| Error::UnknownOpcode(size.to_string(), None))?;
                Width::try_from(bits).map_err(|_| Error::InvalidEncodingWidth(size.to_string()))?
            }
        };

        if tag.is_some_and(|tag| tag.is_signed()) {
            self.emitter.emit(items!["sf"])?;
        }

        self.emitter.emit(items![mnemonic, size])?;

        let mut bytes = vec![];
        for operand in operands {
            let num = self.operand(operand)?;
            bytes.extend(width.split(num).into_iter().map(Item::from));
        }
        self.emitter.emit(bytes)
    }

    /// Inline reference to a label target, not a declaration
    fn anon_label(&mut self, target: &Expr) -> Result<(), Error> {
        let to = self.eval(target)?;
        self.emitter.emit(items!["label", SECTION_MARKER, to])
    }

    fn jmp_label(&mut self, label: &str) -> Result<(), Error> {
        let id = self.jmp_labels;
        self.define(label, id)?;
        self.emitter.emit(items!["label", SECTION_MARKER, id])?;
        self.jmp_labels += 1;
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Operands
// ----------------------------------------------------------------------------

impl Processor {
    fn operand(&mut self, operand: &Operand) -> Result<i64, Error> {
        match operand {
            Operand::Imm(expr) => self.operand_imm(expr),
            Operand::ExtRef(head, tail) => self.operand_extref(head, tail),
        }
    }

    fn operand_imm(&mut self, expr: &Expr) -> Result<i64, Error> {
        self.eval(expr)
    }

    /// `<X.Y>`: X goes straight into the main stream, Y is the operand value
    fn operand_extref(&mut self, head: &Field, tail: &Field) -> Result<i64, Error> {
        let head = self.field(head)?;
        self.emitter.emit(items![head])?;
        self.field(tail)
    }

    fn field(&self, field: &Field) -> Result<i64, Error> {
        match field {
            Field::Ident(name, loc) => self.labels.get(name).map_err(|err| err.at(*loc)),
            Field::Expr(expr) => self.eval(expr),
        }
    }
}
