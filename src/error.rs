use crate::inst::Opcode;

/// Errors raised while assembling a [`Target`](crate::target::Target).
/// Rendering itself never fails except through the output sink.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetError {
    #[error("opcode {opcode} ({mnemonic}) registered twice")]
    DuplicateOpcode { opcode: Opcode, mnemonic: &'static str },
    #[error("raw encoder for opcode {opcode} operand {index} registered twice")]
    DuplicateEncoder { opcode: Opcode, index: usize },
    #[error("bad syntax for {mnemonic}: {message}")]
    Syntax { mnemonic: &'static str, message: String },
    #[error("unknown system register class `{0}`")]
    UnknownSystemRegisterClass(String),
    #[error("system register class `{0}` declared twice")]
    DuplicateSystemRegisterClass(&'static str),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown mnemonic `{0}`")]
pub struct OpcodeParseError(pub String);
