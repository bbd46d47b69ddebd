//! Instruction set description of the KTRO stack machine.
//!
//! The assembler and anything that reads packages share these tables: the
//! mnemonic namespace ([`opcode`]), operand size tags ([`size`]) and the
//! fixed markers that frame a package ([`marker`]).

pub mod marker;
pub mod opcode;
pub mod size;
