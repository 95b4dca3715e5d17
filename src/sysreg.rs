use std::fmt::{self, Write};

/// A fixed class of control/status registers addressed by index, such as
/// the RISC-V CSR space.
#[derive(Debug, Clone, Copy)]
pub struct SystemRegisterClass {
    pub name: &'static str,
    /// Optional index to name table. Only consulted when symbolic printing is
    /// switched on.
    pub symbols: &'static [(i64, &'static str)],
}

impl SystemRegisterClass {
    pub const fn numeric(name: &'static str) -> Self {
        Self { name, symbols: &[] }
    }

    pub const fn with_symbols(name: &'static str, symbols: &'static [(i64, &'static str)]) -> Self {
        Self { name, symbols }
    }

    pub fn symbol(&self, index: i64) -> Option<&'static str> {
        self.symbols.iter().find(|(i, _)| *i == index).map(|(_, n)| *n)
    }

    /// Writes the register index. Decimal unless `symbolic` is set and the
    /// class knows a name for it.
    pub fn print<W: Write + ?Sized>(&self, index: i64, symbolic: bool, out: &mut W) -> fmt::Result {
        if symbolic {
            if let Some(name) = self.symbol(index) {
                return out.write_str(name);
            }
        }
        write!(out, "{index}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMED: SystemRegisterClass = SystemRegisterClass::with_symbols("csr", &[(0x300, "mstatus")]);

    fn render(class: &SystemRegisterClass, index: i64, symbolic: bool) -> String {
        let mut s = String::new();
        class.print(index, symbolic, &mut s).unwrap();
        s
    }

    #[test]
    fn numeric_by_default() {
        assert_eq!(render(&NAMED, 0x300, false), "768");
        assert_eq!(render(&SystemRegisterClass::numeric("csr"), 5, true), "5");
        assert_eq!(render(&NAMED, -3, false), "-3");
    }

    #[test]
    fn symbolic_when_asked_and_known() {
        assert_eq!(render(&NAMED, 0x300, true), "mstatus");
        assert_eq!(render(&NAMED, 0x301, true), "769");
    }
}
