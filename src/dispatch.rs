use std::collections::HashMap;

use crate::error::TargetError;
use crate::inst::Opcode;
use crate::syntax::AsmSyntax;

/// Opcode to render routine. Every opcode has at most one syntax; opcodes
/// with none print as unknown.
#[derive(Debug, Clone, Default)]
pub struct DispatchTable {
    entries: HashMap<Opcode, AsmSyntax>,
}

impl DispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, opcode: Opcode, syntax: AsmSyntax) -> Result<(), TargetError> {
        if self.entries.contains_key(&opcode) {
            return Err(TargetError::DuplicateOpcode { opcode, mnemonic: syntax.mnemonic });
        }
        self.entries.insert(opcode, syntax);
        Ok(())
    }

    pub fn get(&self, opcode: Opcode) -> Option<&AsmSyntax> {
        self.entries.get(&opcode)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in opcode order.
    pub fn sorted(&self) -> Vec<(Opcode, &AsmSyntax)> {
        let mut v: Vec<_> = self.entries.iter().map(|(op, s)| (*op, s)).collect();
        v.sort_by_key(|(op, _)| *op);
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_syntax_per_opcode() {
        let mut t = DispatchTable::new();
        t.insert(Opcode(1), AsmSyntax::parse("nop", "", &[]).unwrap()).unwrap();
        let err = t.insert(Opcode(1), AsmSyntax::parse("halt", "", &[]).unwrap()).unwrap_err();
        assert_eq!(err, TargetError::DuplicateOpcode { opcode: Opcode(1), mnemonic: "halt" });
        assert_eq!(t.len(), 1);
        assert_eq!(t.get(Opcode(1)).unwrap().mnemonic, "nop");
        assert!(t.get(Opcode(2)).is_none());
    }
}
