pub mod config;
pub mod dispatch;
pub mod error;
pub mod immediate;
pub mod inst;
pub mod operand;
pub mod printer;
pub mod regs;
pub mod syntax;
pub mod sysreg;
pub mod target;

pub mod isa {
    pub mod rv64; // RV64IM + Zicsr
}

pub use config::{PrintFlags, PrinterConfig};
pub use error::{OpcodeParseError, TargetError};
pub use inst::{MachineInst, Opcode};
pub use operand::{BinOp, Expr, Operand, RegId};
pub use printer::{AnnotationPrinter, CommentAnnotation, InstPrinter, VerbatimAnnotation, UNKNOWN_INSTRUCTION};
pub use target::{Target, TargetBuilder};
