//! Per-opcode assembly syntax.
//!
//! A syntax is a mnemonic plus an operand template such as `"{0}, {2}({1})"`.
//! Placeholders name an operand index and optionally how to print it:
//!
//! * `{N}` prints the operand as is (register name, decimal, expression text)
//! * `{N:enc}` runs the raw encoder registered for this opcode and index first
//! * `{N:pcrel}` prints a pc-relative offset, or its absolute target
//! * `{N:<class>}` prints a system register index of the named class
//!
//! Everything outside braces is copied verbatim.

use crate::error::TargetError;
use crate::sysreg::SystemRegisterClass;

#[derive(Debug, Clone, Copy)]
pub enum OperandStyle {
    Generic,
    Encoded,
    PcRel,
    SystemRegister(SystemRegisterClass),
}

#[derive(Debug, Clone)]
pub enum Piece {
    Text(String),
    Operand { index: usize, style: OperandStyle },
}

#[derive(Debug, Clone)]
pub struct AsmSyntax {
    pub mnemonic: &'static str,
    pub template: &'static str,
    pub pieces: Vec<Piece>,
}

impl AsmSyntax {
    pub fn parse(
        mnemonic: &'static str,
        template: &'static str,
        classes: &[SystemRegisterClass],
    ) -> Result<Self, TargetError> {
        let err = |message: String| TargetError::Syntax { mnemonic, message };
        let mut pieces = Vec::new();
        let mut text = String::new();
        let mut rest = template;
        while let Some(c) = rest.chars().next() {
            match c {
                '{' => {
                    let Some(close) = rest.find('}') else {
                        return Err(err(format!("unterminated placeholder in `{template}`")));
                    };
                    let body = &rest[1..close];
                    rest = &rest[close + 1..];
                    let (index, style) = match body.split_once(':') {
                        Some((i, s)) => (i, Some(s)),
                        None => (body, None),
                    };
                    let index: usize = index
                        .trim()
                        .parse()
                        .map_err(|_| err(format!("bad operand index `{index}`")))?;
                    let style = match style.map(str::trim) {
                        None => OperandStyle::Generic,
                        Some("enc") => OperandStyle::Encoded,
                        Some("pcrel") => OperandStyle::PcRel,
                        Some(name) => match classes.iter().find(|c| c.name == name) {
                            Some(class) => OperandStyle::SystemRegister(*class),
                            None => return Err(TargetError::UnknownSystemRegisterClass(name.to_string())),
                        },
                    };
                    if !text.is_empty() {
                        pieces.push(Piece::Text(std::mem::take(&mut text)));
                    }
                    pieces.push(Piece::Operand { index, style });
                }
                '}' => return Err(err(format!("stray `}}` in `{template}`"))),
                _ => {
                    text.push(c);
                    rest = &rest[c.len_utf8()..];
                }
            }
        }
        if !text.is_empty() {
            pieces.push(Piece::Text(text));
        }
        Ok(Self { mnemonic, template, pieces })
    }

    /// Operand indices this syntax reads, in print order.
    pub fn operand_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.pieces.iter().filter_map(|p| match p {
            Piece::Operand { index, .. } => Some(*index),
            Piece::Text(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSR: SystemRegisterClass = SystemRegisterClass::numeric("csr");

    #[test]
    fn splits_text_and_operands() {
        let s = AsmSyntax::parse("ld", "{0}, {2:enc}({1})", &[]).unwrap();
        assert_eq!(s.operand_indices().collect::<Vec<_>>(), vec![0, 2, 1]);
        assert_eq!(s.pieces.len(), 6);
        assert!(matches!(s.pieces[2], Piece::Operand { index: 2, style: OperandStyle::Encoded }));
        assert!(matches!(&s.pieces[5], Piece::Text(t) if t == ")"));
    }

    #[test]
    fn system_register_classes_resolve() {
        let s = AsmSyntax::parse("csrrw", "{0}, {1:csr}, {2}", &[CSR]).unwrap();
        assert!(matches!(
            s.pieces[2],
            Piece::Operand { index: 1, style: OperandStyle::SystemRegister(c) } if c.name == "csr"
        ));
        let e = AsmSyntax::parse("csrrw", "{1:fcsr}", &[CSR]).unwrap_err();
        assert_eq!(e, TargetError::UnknownSystemRegisterClass("fcsr".into()));
    }

    #[test]
    fn empty_template_has_no_pieces() {
        let s = AsmSyntax::parse("ecall", "", &[]).unwrap();
        assert!(s.pieces.is_empty());
    }

    #[test]
    fn malformed_templates() {
        assert!(matches!(AsmSyntax::parse("x", "{0", &[]), Err(TargetError::Syntax { .. })));
        assert!(matches!(AsmSyntax::parse("x", "{a}", &[]), Err(TargetError::Syntax { .. })));
        assert!(matches!(AsmSyntax::parse("x", "0}", &[]), Err(TargetError::Syntax { .. })));
    }
}
