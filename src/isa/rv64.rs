//! RV64IM + Zicsr printer tables.
//!
//! Operand order follows the decoder: destination first, then sources.
//! Loads, stores and `jalr` carry `(reg, base, offset)`; stores put the
//! value register first.

use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::{OpcodeParseError, TargetError};
use crate::immediate::encoders;
use crate::inst::Opcode;
use crate::sysreg::SystemRegisterClass;
use crate::target::Target;

macro_rules! rv64_insts {
    ($($variant:ident = $mnemonic:literal, $template:literal;)*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u32)]
        #[allow(non_camel_case_types)]
        pub enum Rv64Opcode {
            $($variant,)*
        }

        impl Rv64Opcode {
            pub const ALL: &'static [Rv64Opcode] = &[$(Rv64Opcode::$variant,)*];

            pub fn mnemonic(self) -> &'static str {
                match self {
                    $(Rv64Opcode::$variant => $mnemonic,)*
                }
            }

            /// Upper-case identifier used in listings, e.g. `ADDI`.
            pub fn name(self) -> &'static str {
                match self {
                    $(Rv64Opcode::$variant => stringify!($variant),)*
                }
            }

            pub fn template(self) -> &'static str {
                match self {
                    $(Rv64Opcode::$variant => $template,)*
                }
            }
        }
    };
}

rv64_insts! {
    LUI = "lui", "{0}, {1:enc}";
    AUIPC = "auipc", "{0}, {1:enc}";
    JAL = "jal", "{0}, {1:pcrel}";
    JALR = "jalr", "{0}, {2}({1})";

    BEQ = "beq", "{0}, {1}, {2:pcrel}";
    BNE = "bne", "{0}, {1}, {2:pcrel}";
    BLT = "blt", "{0}, {1}, {2:pcrel}";
    BGE = "bge", "{0}, {1}, {2:pcrel}";
    BLTU = "bltu", "{0}, {1}, {2:pcrel}";
    BGEU = "bgeu", "{0}, {1}, {2:pcrel}";

    LB = "lb", "{0}, {2}({1})";
    LH = "lh", "{0}, {2}({1})";
    LW = "lw", "{0}, {2}({1})";
    LD = "ld", "{0}, {2}({1})";
    LBU = "lbu", "{0}, {2}({1})";
    LHU = "lhu", "{0}, {2}({1})";
    LWU = "lwu", "{0}, {2}({1})";
    SB = "sb", "{0}, {2}({1})";
    SH = "sh", "{0}, {2}({1})";
    SW = "sw", "{0}, {2}({1})";
    SD = "sd", "{0}, {2}({1})";

    ADDI = "addi", "{0}, {1}, {2}";
    SLTI = "slti", "{0}, {1}, {2}";
    SLTIU = "sltiu", "{0}, {1}, {2}";
    XORI = "xori", "{0}, {1}, {2}";
    ORI = "ori", "{0}, {1}, {2}";
    ANDI = "andi", "{0}, {1}, {2}";
    SLLI = "slli", "{0}, {1}, {2:enc}";
    SRLI = "srli", "{0}, {1}, {2:enc}";
    SRAI = "srai", "{0}, {1}, {2:enc}";
    ADDIW = "addiw", "{0}, {1}, {2}";
    SLLIW = "slliw", "{0}, {1}, {2:enc}";
    SRLIW = "srliw", "{0}, {1}, {2:enc}";
    SRAIW = "sraiw", "{0}, {1}, {2:enc}";

    ADD = "add", "{0}, {1}, {2}";
    SUB = "sub", "{0}, {1}, {2}";
    SLL = "sll", "{0}, {1}, {2}";
    SLT = "slt", "{0}, {1}, {2}";
    SLTU = "sltu", "{0}, {1}, {2}";
    XOR = "xor", "{0}, {1}, {2}";
    SRL = "srl", "{0}, {1}, {2}";
    SRA = "sra", "{0}, {1}, {2}";
    OR = "or", "{0}, {1}, {2}";
    AND = "and", "{0}, {1}, {2}";
    ADDW = "addw", "{0}, {1}, {2}";
    SUBW = "subw", "{0}, {1}, {2}";
    SLLW = "sllw", "{0}, {1}, {2}";
    SRLW = "srlw", "{0}, {1}, {2}";
    SRAW = "sraw", "{0}, {1}, {2}";

    MUL = "mul", "{0}, {1}, {2}";
    MULH = "mulh", "{0}, {1}, {2}";
    MULHSU = "mulhsu", "{0}, {1}, {2}";
    MULHU = "mulhu", "{0}, {1}, {2}";
    DIV = "div", "{0}, {1}, {2}";
    DIVU = "divu", "{0}, {1}, {2}";
    REM = "rem", "{0}, {1}, {2}";
    REMU = "remu", "{0}, {1}, {2}";
    MULW = "mulw", "{0}, {1}, {2}";
    DIVW = "divw", "{0}, {1}, {2}";
    DIVUW = "divuw", "{0}, {1}, {2}";
    REMW = "remw", "{0}, {1}, {2}";
    REMUW = "remuw", "{0}, {1}, {2}";

    FENCE = "fence", "";
    FENCE_I = "fence.i", "";
    ECALL = "ecall", "";
    EBREAK = "ebreak", "";
    MRET = "mret", "";
    WFI = "wfi", "";

    CSRRW = "csrrw", "{0}, {1:csr}, {2}";
    CSRRS = "csrrs", "{0}, {1:csr}, {2}";
    CSRRC = "csrrc", "{0}, {1:csr}, {2}";
    CSRRWI = "csrrwi", "{0}, {1:csr}, {2:enc}";
    CSRRSI = "csrrsi", "{0}, {1:csr}, {2:enc}";
    CSRRCI = "csrrci", "{0}, {1:csr}, {2:enc}";
}

impl From<Rv64Opcode> for Opcode {
    fn from(op: Rv64Opcode) -> Self {
        Opcode(op as u32)
    }
}

impl TryFrom<Opcode> for Rv64Opcode {
    type Error = Opcode;

    fn try_from(op: Opcode) -> Result<Self, Self::Error> {
        Rv64Opcode::ALL.get(op.0 as usize).copied().ok_or(op)
    }
}

impl FromStr for Rv64Opcode {
    type Err = OpcodeParseError;

    /// Accepts the listing name (`FENCE_I`) or the mnemonic (`fence.i`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rv64Opcode::ALL
            .iter()
            .copied()
            .find(|op| op.name().eq_ignore_ascii_case(s) || op.mnemonic().eq_ignore_ascii_case(s))
            .ok_or_else(|| OpcodeParseError(s.to_string()))
    }
}

#[rustfmt::skip]
pub const XREG_NAMES: [&str; 32] = [
    "zero", "ra", "sp",  "gp",  "tp", "t0", "t1", "t2",
    "s0",   "s1", "a0",  "a1",  "a2", "a3", "a4", "a5",
    "a6",   "a7", "s2",  "s3",  "s4", "s5", "s6", "s7",
    "s8",   "s9", "s10", "s11", "t3", "t4", "t5", "t6",
];

#[rustfmt::skip]
const CSR_NAMES: &[(i64, &str)] = &[
    (0x001, "fflags"),   (0x002, "frm"),      (0x003, "fcsr"),
    (0x100, "sstatus"),  (0x104, "sie"),      (0x105, "stvec"),
    (0x140, "sscratch"), (0x141, "sepc"),     (0x142, "scause"),
    (0x143, "stval"),    (0x144, "sip"),      (0x180, "satp"),
    (0x300, "mstatus"),  (0x301, "misa"),     (0x304, "mie"),
    (0x305, "mtvec"),    (0x340, "mscratch"), (0x341, "mepc"),
    (0x342, "mcause"),   (0x343, "mtval"),    (0x344, "mip"),
    (0xC00, "cycle"),    (0xC01, "time"),     (0xC02, "instret"),
    (0xF14, "mhartid"),
];

pub const CSR: SystemRegisterClass = SystemRegisterClass::with_symbols("csr", CSR_NAMES);

/// Builds a fresh copy of the tables. Most callers want [`target`].
pub fn build() -> Result<Target, TargetError> {
    use Rv64Opcode::*;

    let mut b = Target::builder("rv64").registers(&XREG_NAMES).system_register_class(CSR);
    for &op in Rv64Opcode::ALL {
        b = b.inst(op, op.mnemonic(), op.template());
    }
    b.raw_encoder(LUI, 1, "imm20", encoders::upper20)
        .raw_encoder(AUIPC, 1, "imm20", encoders::upper20)
        .raw_encoder(SLLI, 2, "shamt", encoders::uimm6)
        .raw_encoder(SRLI, 2, "shamt", encoders::uimm6)
        .raw_encoder(SRAI, 2, "shamt", encoders::uimm6)
        .raw_encoder(SLLIW, 2, "shamtw", encoders::uimm5)
        .raw_encoder(SRLIW, 2, "shamtw", encoders::uimm5)
        .raw_encoder(SRAIW, 2, "shamtw", encoders::uimm5)
        .raw_encoder(CSRRWI, 2, "zimm", encoders::uimm5)
        .raw_encoder(CSRRSI, 2, "zimm", encoders::uimm5)
        .raw_encoder(CSRRCI, 2, "zimm", encoders::uimm5)
        .build()
}

/// The process-wide RV64 target, built on first use.
pub fn target() -> Result<&'static Target, TargetError> {
    static TARGET: OnceLock<Result<Target, TargetError>> = OnceLock::new();
    TARGET.get_or_init(build).as_ref().map_err(|e| e.clone())
}
