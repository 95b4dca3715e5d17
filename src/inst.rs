use std::fmt;

use serde::{Deserialize, Serialize};

use crate::operand::Operand;

/// Opcode number of a target instruction. Targets define their own closed
/// enumeration and convert into this; any other value is an unknown opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Opcode(pub u32);

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A decoded instruction, owned by the caller and never mutated by the printer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineInst {
    pub opcode: Opcode,
    pub operands: Vec<Operand>,
}

impl MachineInst {
    pub fn new(opcode: impl Into<Opcode>, operands: Vec<Operand>) -> Self {
        Self { opcode: opcode.into(), operands }
    }

    pub fn num_operands(&self) -> usize {
        self.operands.len()
    }

    /// Operand at `index`.
    ///
    /// Panics when `index` is out of range: the syntax table and the decoded
    /// instruction disagree and no sensible text can be produced.
    pub fn operand(&self, index: usize) -> &Operand {
        match self.operands.get(index) {
            Some(op) => op,
            None => panic!(
                "operand index {index} out of range for opcode {} with {} operands",
                self.opcode,
                self.operands.len()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "operand index 3 out of range")]
    fn out_of_range_operand_is_fatal() {
        let inst = MachineInst::new(Opcode(1), vec![Operand::Imm(0)]);
        let _ = inst.operand(3);
    }
}
