use std::collections::HashMap;

use bitvec::prelude::*;

use crate::error::TargetError;
use crate::inst::Opcode;

/// Maps a logical immediate to the value the binary encoder would emit.
pub type RawEncoder = fn(i64) -> i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImmediateKey {
    pub opcode: Opcode,
    pub index: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct ImmediateRecord {
    /// Name of the encoded format field, e.g. `imm20`.
    pub field: &'static str,
    pub raw_encoder: RawEncoder,
}

/// `(opcode, operand index)` to raw encoder. Filled while a target is built,
/// read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ImmediateRegistry {
    records: HashMap<ImmediateKey, ImmediateRecord>,
}

impl ImmediateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        opcode: Opcode,
        index: usize,
        field: &'static str,
        raw_encoder: RawEncoder,
    ) -> Result<(), TargetError> {
        let key = ImmediateKey { opcode, index };
        if self.records.contains_key(&key) {
            return Err(TargetError::DuplicateEncoder { opcode, index });
        }
        self.records.insert(key, ImmediateRecord { field, raw_encoder });
        Ok(())
    }

    pub fn lookup(&self, opcode: Opcode, index: usize) -> Option<&ImmediateRecord> {
        self.records.get(&ImmediateKey { opcode, index })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Entries ordered by opcode, then operand index.
    pub fn entries(&self) -> Vec<(ImmediateKey, ImmediateRecord)> {
        let mut v: Vec<_> = self.records.iter().map(|(k, r)| (*k, *r)).collect();
        v.sort_by_key(|(k, _)| *k);
        v
    }
}

/// Unsigned field of `width` bits starting at bit `lo` of the two's
/// complement pattern of `value`.
pub fn bit_field(value: i64, lo: usize, width: usize) -> i64 {
    debug_assert!(width > 0 && lo + width <= 64);
    let raw = value as u64;
    raw.view_bits::<Lsb0>()[lo..lo + width].load_le::<u64>() as i64
}

/// Common raw encoders shared by targets.
pub mod encoders {
    use super::bit_field;

    pub fn identity(v: i64) -> i64 {
        v
    }

    /// Upper 20 bits of a `lui`/`auipc` style value.
    pub fn upper20(v: i64) -> i64 {
        bit_field(v, 12, 20)
    }

    pub fn uimm5(v: i64) -> i64 {
        bit_field(v, 0, 5)
    }

    pub fn uimm6(v: i64) -> i64 {
        bit_field(v, 0, 6)
    }
}
