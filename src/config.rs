use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintFlags: u32 {
const HEX_IMMEDIATES = 1 << 0; // 0x-prefixed immediates instead of decimal
const ABSOLUTE_TARGETS = 1 << 1; // pc-relative operands as address + offset
const SYMBOLIC_SYSREGS = 1 << 2; // system register names where the class has them
}
}

impl Default for PrintFlags {
    fn default() -> Self {
        PrintFlags::empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterConfig {
    pub flags: PrintFlags,
    /// Comment leader used by [`CommentAnnotation`](crate::printer::CommentAnnotation).
    pub comment_string: String,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            flags: PrintFlags::empty(),
            comment_string: "#".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: PrinterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, PrinterConfig::default());
        let cfg: PrinterConfig =
            serde_json::from_str(r#"{"flags": "HEX_IMMEDIATES | SYMBOLIC_SYSREGS", "comment_string": "//"}"#)
                .unwrap();
        assert!(cfg.flags.contains(PrintFlags::HEX_IMMEDIATES));
        assert!(!cfg.flags.contains(PrintFlags::ABSOLUTE_TARGETS));
        assert_eq!(cfg.comment_string, "//");
    }
}
