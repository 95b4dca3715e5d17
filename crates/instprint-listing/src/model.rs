use anyhow::{anyhow, ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use instprint::isa::rv64::Rv64Opcode;
use instprint::{Expr, MachineInst, Opcode, Operand, Target};

/// Address as a JSON number or a hex/decimal string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AddrRepr {
    Num(u64),
    Text(String),
}

impl Default for AddrRepr {
    fn default() -> Self {
        AddrRepr::Num(0)
    }
}

impl AddrRepr {
    pub fn resolve(&self) -> Result<u64> {
        match self {
            AddrRepr::Num(n) => Ok(*n),
            AddrRepr::Text(s) => parse_addr(s),
        }
    }
}

/// Opcode as a raw number or an RV64 name/mnemonic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OpcodeRef {
    Num(u32),
    Name(String),
}

impl OpcodeRef {
    pub fn resolve(&self) -> Result<Opcode> {
        match self {
            OpcodeRef::Num(n) => Ok(Opcode(*n)),
            OpcodeRef::Name(s) => Ok(s.parse::<Rv64Opcode>()?.into()),
        }
    }
}

/// Register as a numeric id or a name from the target's register table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegRepr {
    Id(u16),
    Name(String),
}

/// Listing-side operand. Same tagging as [`Operand`], but registers may be
/// given by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperandRepr {
    Reg(RegRepr),
    Imm(i64),
    Expr(Expr),
}

impl OperandRepr {
    pub fn resolve(self, target: &Target) -> Result<Operand> {
        Ok(match self {
            OperandRepr::Reg(RegRepr::Id(id)) => Operand::reg(id),
            OperandRepr::Reg(RegRepr::Name(name)) => Operand::Reg(
                target
                    .registers
                    .id_of(&name)
                    .ok_or_else(|| anyhow!("unknown {} register `{name}`", target.name))?,
            ),
            OperandRepr::Imm(v) => Operand::Imm(v),
            OperandRepr::Expr(e) => Operand::Expr(e),
        })
    }
}

/// One decoded instruction of a listing file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub address: AddrRepr,
    pub opcode: OpcodeRef,
    #[serde(default)]
    pub operands: Vec<OperandRepr>,
    #[serde(default)]
    pub annotation: String,
}

/// Entry with address and opcode resolved.
#[derive(Debug, Clone)]
pub struct Line {
    pub address: u64,
    pub inst: MachineInst,
    pub annotation: String,
}

pub fn parse_addr(s: &str) -> Result<u64> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Ok(u64::from_str_radix(hex, 16)?)
    } else {
        Ok(s.parse::<u64>()?)
    }
}

/// Parse and resolve a listing against the RV64 target. Entries must carry
/// every operand their syntax reads; the printer treats a missing one as a
/// caller bug and panics.
pub fn parse_listing(text: &str) -> Result<Vec<Line>> {
    let target = instprint::isa::rv64::target()?;
    let entries: Vec<Entry> = serde_json::from_str(text).context("listing is not a JSON array of entries")?;
    entries
        .into_iter()
        .enumerate()
        .map(|(i, e)| -> Result<Line> {
            let address = e.address.resolve().with_context(|| format!("entry {i}: bad address"))?;
            let opcode = e.opcode.resolve().with_context(|| format!("entry {i}: bad opcode"))?;
            let operands = e
                .operands
                .into_iter()
                .map(|op| op.resolve(target))
                .collect::<Result<Vec<_>>>()
                .with_context(|| format!("entry {i}: bad operand"))?;
            if let Some(syntax) = target.dispatch.get(opcode) {
                if let Some(needed) = syntax.operand_indices().max() {
                    ensure!(
                        needed < operands.len(),
                        "entry {i}: `{}` reads operand {needed} but only {} given",
                        syntax.mnemonic,
                        operands.len()
                    );
                }
            }
            Ok(Line { address, inst: MachineInst { opcode, operands }, annotation: e.annotation })
        })
        .collect()
}

pub fn load_listing(path: &Path) -> Result<Vec<Line>> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_listing(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_addr_hex_and_dec() {
        assert_eq!(parse_addr("0x10").unwrap(), 0x10);
        assert_eq!(parse_addr("16").unwrap(), 16);
        assert!(parse_addr("zz").is_err());
    }

    #[test]
    fn entries_resolve() {
        let lines = parse_listing(
            r#"[
                {"address": "0x1000", "opcode": "addi", "operands": [{"reg": 10}, {"reg": 0}, {"imm": 5}]},
                {"address": 4100, "opcode": 9999},
                {"opcode": "JAL", "operands": [{"reg": 1}, {"expr": {"symbol": "main"}}], "annotation": "call"}
            ]"#,
        )
        .unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].address, 0x1000);
        assert_eq!(lines[0].inst.opcode, Opcode::from(Rv64Opcode::ADDI));
        assert_eq!(lines[1].inst.opcode, Opcode(9999));
        assert!(lines[1].inst.operands.is_empty());
        assert_eq!(lines[2].address, 0);
        assert_eq!(lines[2].inst.operands[1], Operand::Expr(Expr::symbol("main")));
        assert_eq!(lines[2].annotation, "call");
    }

    #[test]
    fn bad_mnemonic_is_reported() {
        let err = parse_listing(r#"[{"opcode": "frobnicate"}]"#).unwrap_err();
        assert!(format!("{err:#}").contains("frobnicate"));
    }

    #[test]
    fn short_entry_is_rejected() {
        let err = parse_listing(r#"[{"opcode": "ecall"}, {"opcode": "addi", "operands": [{"reg": 10}]}]"#).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("entry 1"), "{msg}");
        assert!(msg.contains("addi"), "{msg}");
        // Unknown opcodes have no syntax and need no operands.
        assert!(parse_listing(r#"[{"opcode": 9999, "operands": [{"reg": 1}]}]"#).is_ok());
    }

    #[test]
    fn registers_by_name() {
        let lines = parse_listing(
            r#"[{"opcode": "addi", "operands": [{"reg": "a0"}, {"reg": "zero"}, {"imm": 1}]}]"#,
        )
        .unwrap();
        assert_eq!(lines[0].inst.operands[0], Operand::reg(10));
        assert_eq!(lines[0].inst.operands[1], Operand::reg(0));
        let err = parse_listing(r#"[{"opcode": "addi", "operands": [{"reg": "x99"}, {"reg": 0}, {"imm": 1}]}]"#)
            .unwrap_err();
        assert!(format!("{err:#}").contains("x99"));
    }

    #[test]
    fn loader_reads_file() {
        let cwd = std::env::current_dir().unwrap();
        let path = cwd.join("_test_listing.json");
        std::fs::write(&path, r#"[{"opcode": "ecall"}]"#).unwrap();
        let lines = load_listing(&path).unwrap();
        assert_eq!(lines.len(), 1);
        let _ = std::fs::remove_file(&path);
    }
}
