use std::fmt::{self, Write};

use tracing::{debug, trace, warn};

use crate::config::{PrintFlags, PrinterConfig};
use crate::inst::MachineInst;
use crate::operand::{Operand, RegId};
use crate::syntax::{AsmSyntax, OperandStyle, Piece};
use crate::sysreg::SystemRegisterClass;
use crate::target::Target;

/// Text printed for opcodes missing from the dispatch table.
pub const UNKNOWN_INSTRUCTION: &str = "unknown instruction";

/// Writes the trailing annotation of a printed instruction.
pub trait AnnotationPrinter: Send + Sync {
    fn print_annotation(&self, annot: &str, config: &PrinterConfig, out: &mut dyn Write) -> fmt::Result;
}

/// Appends the annotation unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerbatimAnnotation;

impl AnnotationPrinter for VerbatimAnnotation {
    fn print_annotation(&self, annot: &str, _config: &PrinterConfig, out: &mut dyn Write) -> fmt::Result {
        out.write_str(annot)
    }
}

/// Appends a non-empty annotation as an assembler comment.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommentAnnotation;

impl AnnotationPrinter for CommentAnnotation {
    fn print_annotation(&self, annot: &str, config: &PrinterConfig, out: &mut dyn Write) -> fmt::Result {
        if annot.is_empty() {
            return Ok(());
        }
        write!(out, " {} {}", config.comment_string, annot)
    }
}

/// Renders [`MachineInst`]s of one target as assembly text.
pub struct InstPrinter<'t> {
    target: &'t Target,
    config: PrinterConfig,
    annotations: Box<dyn AnnotationPrinter + 't>,
}

impl<'t> InstPrinter<'t> {
    pub fn new(target: &'t Target) -> Self {
        Self {
            target,
            config: PrinterConfig::default(),
            annotations: Box::new(VerbatimAnnotation),
        }
    }

    pub fn with_config(mut self, config: PrinterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_annotation_printer(mut self, printer: impl AnnotationPrinter + 't) -> Self {
        self.annotations = Box::new(printer);
        self
    }

    pub fn target(&self) -> &'t Target {
        self.target
    }

    pub fn config(&self) -> &PrinterConfig {
        &self.config
    }

    /// Tab, instruction text, annotation.
    pub fn print_inst(
        &self,
        inst: &MachineInst,
        address: u64,
        annot: &str,
        out: &mut dyn Write,
    ) -> fmt::Result {
        out.write_char('\t')?;
        out.write_str(&self.inst_to_string(inst, address))?;
        self.annotations.print_annotation(annot, &self.config, out)
    }

    /// Mnemonic and operands, or [`UNKNOWN_INSTRUCTION`].
    pub fn inst_to_string(&self, inst: &MachineInst, address: u64) -> String {
        let Some(syntax) = self.target.dispatch.get(inst.opcode) else {
            debug!(opcode = inst.opcode.0, "no syntax for opcode");
            return UNKNOWN_INSTRUCTION.to_string();
        };
        let mut s = String::new();
        // Writing into a String cannot fail.
        let _ = self.print_syntax(syntax, inst, address, &mut s);
        s
    }

    fn print_syntax(
        &self,
        syntax: &AsmSyntax,
        inst: &MachineInst,
        address: u64,
        out: &mut dyn Write,
    ) -> fmt::Result {
        out.write_str(syntax.mnemonic)?;
        if syntax.pieces.is_empty() {
            return Ok(());
        }
        out.write_char(' ')?;
        for piece in &syntax.pieces {
            match piece {
                Piece::Text(t) => out.write_str(t)?,
                Piece::Operand { index, style } => match style {
                    OperandStyle::Generic => self.print_operand(inst.operand(*index), out)?,
                    OperandStyle::Encoded => {
                        let op = self.adjust_immediate_op(inst, *index);
                        self.print_operand(&op, out)?
                    }
                    OperandStyle::PcRel => self.print_pcrel(inst.operand(*index), address, out)?,
                    OperandStyle::SystemRegister(class) => {
                        self.print_system_register(class, inst, *index, out)?
                    }
                },
            }
        }
        Ok(())
    }

    /// Operand `index` after its raw encoder, if one is registered and the
    /// operand is a constant. Anything else comes back unchanged.
    pub fn adjust_immediate_op(&self, inst: &MachineInst, index: usize) -> Operand {
        let original = inst.operand(index);
        let Some(value) = original.evaluate_constant_imm() else {
            return original.clone();
        };
        match self.target.encoders.lookup(inst.opcode, index) {
            Some(record) => {
                let encoded = (record.raw_encoder)(value);
                trace!(opcode = inst.opcode.0, index, field = record.field, value, encoded, "raw encoder applied");
                Operand::Imm(encoded)
            }
            None => original.clone(),
        }
    }

    pub fn print_reg_name(&self, reg: RegId, out: &mut dyn Write) -> fmt::Result {
        match self.target.registers.name_of(reg) {
            Some(name) => out.write_str(name),
            None => {
                warn!(reg = reg.0, isa = self.target.name, "register id outside name table");
                write!(out, "<unknown reg {}>", reg.0)
            }
        }
    }

    /// Register, immediate or expression with no operand-specific treatment.
    pub fn print_operand(&self, op: &Operand, out: &mut dyn Write) -> fmt::Result {
        match op {
            Operand::Reg(r) => self.print_reg_name(*r, out),
            Operand::Imm(v) => self.print_imm(*v, out),
            Operand::Expr(e) => write!(out, "{e}"),
        }
    }

    fn print_imm(&self, v: i64, out: &mut dyn Write) -> fmt::Result {
        if self.config.flags.contains(PrintFlags::HEX_IMMEDIATES) {
            if v < 0 {
                write!(out, "-{:#x}", v.unsigned_abs())
            } else {
                write!(out, "{v:#x}")
            }
        } else {
            write!(out, "{v}")
        }
    }

    fn print_pcrel(&self, op: &Operand, address: u64, out: &mut dyn Write) -> fmt::Result {
        if self.config.flags.contains(PrintFlags::ABSOLUTE_TARGETS) {
            if let Some(offset) = op.evaluate_constant_imm() {
                return write!(out, "{:#x}", address.wrapping_add(offset as u64));
            }
        }
        self.print_operand(op, out)
    }

    /// System register operand of `class`: the raw index in decimal, or its
    /// name when symbolic printing is on and the class has one.
    pub fn print_system_register(
        &self,
        class: &SystemRegisterClass,
        inst: &MachineInst,
        index: usize,
        out: &mut dyn Write,
    ) -> fmt::Result {
        let op = inst.operand(index);
        match op.evaluate_constant_imm() {
            Some(v) => class.print(v, self.config.flags.contains(PrintFlags::SYMBOLIC_SYSREGS), out),
            None => self.print_operand(op, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inst::Opcode;
    use crate::operand::Expr;
    use pretty_assertions::assert_eq;

    const SR: SystemRegisterClass = SystemRegisterClass::with_symbols("sr", &[(5, "status")]);

    fn shl2(v: i64) -> i64 {
        v << 2
    }

    fn toy() -> Target {
        Target::builder("toy")
            .registers(&["r0", "r1", "r2", "r3"])
            .system_register_class(SR)
            .inst(Opcode(1), "ADD", "{0}, {1}, {2}")
            .inst(Opcode(2), "LI", "{0}, {1:enc}")
            .inst(Opcode(3), "MFSR", "{0:sr}, {1}")
            .inst(Opcode(4), "BR", "{0:pcrel}")
            .inst(Opcode(5), "NOP", "")
            .raw_encoder(Opcode(2), 1, "imm", shl2)
            .build()
            .unwrap()
    }

    #[test]
    fn adjust_leaves_registers_and_symbols() {
        let t = toy();
        let p = InstPrinter::new(&t);
        let inst = MachineInst::new(Opcode(2), vec![Operand::reg(1), Operand::Expr(Expr::symbol("x"))]);
        assert_eq!(p.adjust_immediate_op(&inst, 0), Operand::reg(1));
        assert_eq!(p.adjust_immediate_op(&inst, 1), Operand::Expr(Expr::symbol("x")));
    }

    #[test]
    fn adjust_folds_constant_expressions() {
        let t = toy();
        let p = InstPrinter::new(&t);
        let e = Expr::add(Expr::Constant(1), Expr::Constant(2));
        let inst = MachineInst::new(Opcode(2), vec![Operand::reg(1), Operand::Expr(e)]);
        assert_eq!(p.adjust_immediate_op(&inst, 1), Operand::Imm(12));
    }

    #[test]
    fn operandless_mnemonic_has_no_trailing_space() {
        let t = toy();
        let p = InstPrinter::new(&t);
        assert_eq!(p.inst_to_string(&MachineInst::new(Opcode(5), vec![]), 0), "NOP");
    }

    #[test]
    fn flags_change_immediates_and_targets() {
        let t = toy();
        let cfg = PrinterConfig {
            flags: PrintFlags::HEX_IMMEDIATES | PrintFlags::ABSOLUTE_TARGETS,
            ..PrinterConfig::default()
        };
        let p = InstPrinter::new(&t).with_config(cfg);
        let li = MachineInst::new(Opcode(2), vec![Operand::reg(0), Operand::Imm(-4)]);
        assert_eq!(p.inst_to_string(&li, 0), "LI r0, -0x10");
        let br = MachineInst::new(Opcode(4), vec![Operand::Imm(-8)]);
        assert_eq!(p.inst_to_string(&br, 0x1000), "BR 0xff8");
        let sym = MachineInst::new(Opcode(4), vec![Operand::Expr(Expr::symbol("loop"))]);
        assert_eq!(p.inst_to_string(&sym, 0x1000), "BR loop");

        let plain = InstPrinter::new(&t);
        assert_eq!(plain.inst_to_string(&br, 0x1000), "BR -8");
    }

    #[test]
    fn symbolic_system_registers_are_opt_in() {
        let t = toy();
        let inst = MachineInst::new(Opcode(3), vec![Operand::Imm(5), Operand::reg(2)]);
        assert_eq!(InstPrinter::new(&t).inst_to_string(&inst, 0), "MFSR 5, r2");
        let cfg = PrinterConfig { flags: PrintFlags::SYMBOLIC_SYSREGS, ..PrinterConfig::default() };
        assert_eq!(InstPrinter::new(&t).with_config(cfg).inst_to_string(&inst, 0), "MFSR status, r2");
    }

    #[test]
    fn constant_expression_in_system_register_slot() {
        let t = toy();
        let e = Expr::add(Expr::Constant(5), Expr::Constant(0));
        let inst = MachineInst::new(Opcode(3), vec![Operand::Expr(e), Operand::reg(1)]);
        assert_eq!(InstPrinter::new(&t).inst_to_string(&inst, 0), "MFSR 5, r1");
        let cfg = PrinterConfig { flags: PrintFlags::SYMBOLIC_SYSREGS, ..PrinterConfig::default() };
        assert_eq!(InstPrinter::new(&t).with_config(cfg).inst_to_string(&inst, 0), "MFSR status, r1");
        let sym = MachineInst::new(Opcode(3), vec![Operand::Expr(Expr::symbol("sr_base")), Operand::reg(1)]);
        assert_eq!(InstPrinter::new(&t).inst_to_string(&sym, 0), "MFSR sr_base, r1");
    }

    #[test]
    fn unknown_register_ids_are_marked() {
        let t = toy();
        let inst = MachineInst::new(Opcode(1), vec![Operand::reg(0), Operand::reg(1), Operand::reg(9)]);
        assert_eq!(InstPrinter::new(&t).inst_to_string(&inst, 0), "ADD r0, r1, <unknown reg 9>");
    }

    #[test]
    fn comment_annotations() {
        let t = toy();
        let p = InstPrinter::new(&t).with_annotation_printer(CommentAnnotation);
        let nop = MachineInst::new(Opcode(5), vec![]);
        let mut out = String::new();
        p.print_inst(&nop, 0, "padding", &mut out).unwrap();
        assert_eq!(out, "\tNOP # padding");
        out.clear();
        p.print_inst(&nop, 0, "", &mut out).unwrap();
        assert_eq!(out, "\tNOP");
    }
}
