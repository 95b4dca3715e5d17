use serde::Serialize;
use std::fmt::Write as _;

use instprint::isa::rv64::Rv64Opcode;
use instprint::{InstPrinter, Target};

use crate::model::Line;

/// Prints every line, one instruction per output line.
pub fn render_listing(printer: &InstPrinter, lines: &[Line], show_address: bool) -> String {
    let mut buf = String::new();
    for line in lines {
        if show_address {
            let _ = write!(buf, "{:#010x}:", line.address);
        }
        let _ = printer.print_inst(&line.inst, line.address, &line.annotation, &mut buf);
        buf.push('\n');
    }
    buf
}

#[derive(Debug, Clone, Serialize)]
pub struct OpcodeRow {
    pub opcode: u32,
    pub name: Option<&'static str>,
    pub mnemonic: &'static str,
    pub template: &'static str,
}

pub fn opcode_rows(target: &Target) -> Vec<OpcodeRow> {
    target
        .dispatch
        .sorted()
        .into_iter()
        .map(|(op, syntax)| OpcodeRow {
            opcode: op.0,
            name: Rv64Opcode::try_from(op).ok().map(Rv64Opcode::name),
            mnemonic: syntax.mnemonic,
            template: syntax.template,
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct EncoderRow {
    pub opcode: u32,
    pub mnemonic: Option<&'static str>,
    pub index: usize,
    pub field: &'static str,
}

pub fn encoder_rows(target: &Target) -> Vec<EncoderRow> {
    target
        .encoders
        .entries()
        .into_iter()
        .map(|(key, record)| EncoderRow {
            opcode: key.opcode.0,
            mnemonic: target.dispatch.get(key.opcode).map(|s| s.mnemonic),
            index: key.index,
            field: record.field,
        })
        .collect()
}
