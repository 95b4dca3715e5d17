use crate::dispatch::DispatchTable;
use crate::error::TargetError;
use crate::immediate::{ImmediateRegistry, RawEncoder};
use crate::inst::Opcode;
use crate::regs::RegisterNameTable;
use crate::syntax::AsmSyntax;
use crate::sysreg::SystemRegisterClass;

/// Everything the printer needs to know about one ISA. Built once, then
/// shared read-only.
#[derive(Debug, Clone)]
pub struct Target {
    pub name: &'static str,
    pub registers: RegisterNameTable,
    pub system_registers: Vec<SystemRegisterClass>,
    pub encoders: ImmediateRegistry,
    pub dispatch: DispatchTable,
}

impl Target {
    pub fn builder(name: &'static str) -> TargetBuilder {
        TargetBuilder::new(name)
    }

    pub fn system_register_class(&self, name: &str) -> Option<&SystemRegisterClass> {
        self.system_registers.iter().find(|c| c.name == name)
    }
}

struct InstDecl {
    opcode: Opcode,
    mnemonic: &'static str,
    template: &'static str,
}

struct EncoderDecl {
    opcode: Opcode,
    index: usize,
    field: &'static str,
    raw_encoder: RawEncoder,
}

/// Collects the tables of a target; [`TargetBuilder::build`] validates them.
pub struct TargetBuilder {
    name: &'static str,
    registers: RegisterNameTable,
    classes: Vec<SystemRegisterClass>,
    insts: Vec<InstDecl>,
    encoders: Vec<EncoderDecl>,
}

impl TargetBuilder {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            registers: RegisterNameTable::default(),
            classes: Vec::new(),
            insts: Vec::new(),
            encoders: Vec::new(),
        }
    }

    pub fn registers(mut self, names: &[&'static str]) -> Self {
        self.registers = RegisterNameTable::new(names);
        self
    }

    pub fn system_register_class(mut self, class: SystemRegisterClass) -> Self {
        self.classes.push(class);
        self
    }

    pub fn inst(mut self, opcode: impl Into<Opcode>, mnemonic: &'static str, template: &'static str) -> Self {
        self.insts.push(InstDecl { opcode: opcode.into(), mnemonic, template });
        self
    }

    pub fn raw_encoder(
        mut self,
        opcode: impl Into<Opcode>,
        index: usize,
        field: &'static str,
        raw_encoder: RawEncoder,
    ) -> Self {
        self.encoders.push(EncoderDecl { opcode: opcode.into(), index, field, raw_encoder });
        self
    }

    pub fn build(self) -> Result<Target, TargetError> {
        for (i, class) in self.classes.iter().enumerate() {
            if self.classes[..i].iter().any(|c| c.name == class.name) {
                return Err(TargetError::DuplicateSystemRegisterClass(class.name));
            }
        }

        let mut dispatch = DispatchTable::new();
        for decl in &self.insts {
            let syntax = AsmSyntax::parse(decl.mnemonic, decl.template, &self.classes)?;
            dispatch.insert(decl.opcode, syntax)?;
        }

        let mut encoders = ImmediateRegistry::new();
        for decl in &self.encoders {
            encoders.register(decl.opcode, decl.index, decl.field, decl.raw_encoder)?;
        }

        tracing::debug!(
            isa = self.name,
            insts = dispatch.len(),
            encoders = encoders.len(),
            "target tables built"
        );

        Ok(Target {
            name: self.name,
            registers: self.registers,
            system_registers: self.classes,
            encoders,
            dispatch,
        })
    }
}
