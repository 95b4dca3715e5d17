use crate::operand::RegId;

/// Register id to display name. Ids index the table directly.
#[derive(Debug, Clone, Default)]
pub struct RegisterNameTable {
    names: Vec<&'static str>,
}

impl RegisterNameTable {
    pub fn new(names: &[&'static str]) -> Self {
        Self { names: names.to_vec() }
    }

    pub fn name_of(&self, reg: RegId) -> Option<&'static str> {
        self.names.get(reg.0 as usize).copied()
    }

    /// Reverse lookup, used by front ends that accept register names.
    pub fn id_of(&self, name: &str) -> Option<RegId> {
        self.names.iter().position(|n| *n == name).map(|i| RegId(i as u16))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_both_ways() {
        let t = RegisterNameTable::new(&["zero", "ra", "sp"]);
        assert_eq!(t.name_of(RegId(2)), Some("sp"));
        assert_eq!(t.name_of(RegId(3)), None);
        assert_eq!(t.id_of("ra"), Some(RegId(1)));
        assert_eq!(t.len(), 3);
    }
}
