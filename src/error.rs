use std::fmt;

/// The numeric process exit code taxonomy from the interpreter's contract.
/// Bit-exact: tests depend on these values.
#[derive(Clone, Copy, PartialEq, Eq, Debug, num_derive::FromPrimitive, num_derive::ToPrimitive)]
pub enum ExitCode {
    Success = 0,
    MissingArgs = 10,
    FileOpenFailed = 11,
    XmlParseError = 31,
    XmlStructureError = 32,
    Semantic = 52,
    TypeMismatch = 53,
    VarNotDeclared = 54,
    FrameMissing = 55,
    ValueMissing = 56,
    BadOperandValue = 57,
    EncodingError = 58,
    Internal = 99,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// A fault raised while executing an already-built [`crate::program::Program`].
///
/// Each variant maps to exactly one [`ExitCode`] via the `From` impl below,
/// mirroring the teacher's `ParseError` → `Error` conversion chain
/// (`vasm/src/error.rs`): rich internal detail at the point of failure,
/// collapsed to the narrow public vocabulary the process exit code requires.
#[derive(Clone, PartialEq, Debug)]
pub enum EngineFault {
    /// `DEFVAR` named a variable that already exists in its frame.
    VarRedefined(String),
    /// A `LABEL` instruction repeats a name already registered in the pre-pass.
    LabelRedefined(String),
    /// `CALL`/`JUMP`/`JUMPIFEQ`/`JUMPIFNEQ` named a label with no matching
    /// `LABEL` instruction anywhere in the program.
    LabelUndefined(String),
    /// An operation received an operand of the wrong `Value` variant.
    TypeMismatch(&'static str),
    /// A `VarRef` named a variable never declared with `DEFVAR` in its frame.
    VarNotDeclared(String),
    /// `LF`/`TF` was referenced while no local/temporary frame exists.
    FrameMissing(&'static str),
    /// A slot holding `Undef` was read where a defined value was required,
    /// or `POPS`/`RETURN` was attempted against an empty stack.
    ValueMissing(&'static str),
    /// `IDIV` attempted division by zero.
    DivisionByZero,
    /// `EXIT`'s operand was an `Int` outside `[0, 49]`.
    ExitValueOutOfRange(i64),
    /// `INT2CHAR`/`STRI2INT`/`GETCHAR`/`SETCHAR` hit an out-of-range code
    /// point or index.
    Encoding(String),
    /// A dispatch-table miss on an opcode the arity table already accepted —
    /// indicates an engine bug, never a user-program fault.
    Internal(String),
}

impl fmt::Display for EngineFault {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EngineFault::VarRedefined(name) => write!(f, "variable already defined: {}", name),
            EngineFault::LabelRedefined(name) => write!(f, "label already defined: {}", name),
            EngineFault::LabelUndefined(name) => write!(f, "undefined label: {}", name),
            EngineFault::TypeMismatch(msg) => write!(f, "type mismatch: {}", msg),
            EngineFault::VarNotDeclared(name) => write!(f, "variable not declared: {}", name),
            EngineFault::FrameMissing(which) => write!(f, "frame not available: {}", which),
            EngineFault::ValueMissing(what) => write!(f, "missing value: {}", what),
            EngineFault::DivisionByZero => write!(f, "division by zero"),
            EngineFault::ExitValueOutOfRange(n) => {
                write!(f, "EXIT value out of range [0, 49]: {}", n)
            }
            EngineFault::Encoding(msg) => write!(f, "encoding error: {}", msg),
            EngineFault::Internal(msg) => write!(f, "internal engine error: {}", msg),
        }
    }
}

impl std::error::Error for EngineFault {}

impl From<&EngineFault> for ExitCode {
    fn from(fault: &EngineFault) -> ExitCode {
        match fault {
            EngineFault::VarRedefined(_) => ExitCode::Semantic,
            EngineFault::LabelRedefined(_) => ExitCode::Semantic,
            EngineFault::LabelUndefined(_) => ExitCode::Semantic,
            EngineFault::TypeMismatch(_) => ExitCode::TypeMismatch,
            EngineFault::VarNotDeclared(_) => ExitCode::VarNotDeclared,
            EngineFault::FrameMissing(_) => ExitCode::FrameMissing,
            EngineFault::ValueMissing(_) => ExitCode::ValueMissing,
            EngineFault::DivisionByZero => ExitCode::BadOperandValue,
            EngineFault::ExitValueOutOfRange(_) => ExitCode::BadOperandValue,
            EngineFault::Encoding(_) => ExitCode::EncodingError,
            EngineFault::Internal(_) => ExitCode::Internal,
        }
    }
}

impl From<EngineFault> for ExitCode {
    fn from(fault: EngineFault) -> ExitCode {
        ExitCode::from(&fault)
    }
}

/// An [`EngineFault`] paired with the address of the instruction that
/// raised it. spec.md §7 requires every diagnostic to carry the failing
/// instruction's 1-based address; `Engine::run` builds one of these from
/// the program counter at the moment `step` fails, since `step` itself
/// never advances `pc` on an `Err` path.
#[derive(Clone, PartialEq, Debug)]
pub struct Fault {
    pub address: usize,
    pub kind: EngineFault,
}

impl Fault {
    pub fn new(address: usize, kind: EngineFault) -> Fault {
        Fault { address, kind }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "instruction {}: {}", self.address + 1, self.kind)
    }
}

impl std::error::Error for Fault {}

impl From<&Fault> for ExitCode {
    fn from(fault: &Fault) -> ExitCode {
        ExitCode::from(&fault.kind)
    }
}

impl From<Fault> for ExitCode {
    fn from(fault: Fault) -> ExitCode {
        ExitCode::from(&fault.kind)
    }
}

/// A fault raised while assembling [`crate::program::Program::build`]
/// from a raw instruction stream — the label pre-pass and operand decoding
/// described in spec §4.1/§4.4.
#[derive(Clone, PartialEq, Debug)]
pub enum ProgramError {
    /// Two instructions share the same `order` attribute.
    DuplicateOrder(u64),
    /// The opcode string did not match any known mnemonic.
    UnknownOpcode(String),
    /// An instruction has the wrong number, or kind, of operands for its opcode.
    BadArity(String),
    /// An `int` argument's text did not match the integer literal grammar.
    BadIntLiteral(String),
    /// A `string` argument contained a malformed `\ddd` escape.
    BadStringLiteral(String),
    /// A `var`/`bool`/`type`/`nil` argument's text did not match its kind's
    /// grammar (e.g. a `var` with no `@`, or an unrecognized frame tag).
    BadOperand(String),
    /// A `LABEL` instruction repeats a name already registered.
    DuplicateLabel(String),
    /// A label named by `CALL`/`JUMP`/`JUMPIFEQ`/`JUMPIFNEQ` has no matching
    /// `LABEL` anywhere in the program.
    UndefinedLabel(String),
    /// An operand decoded to the wrong `Operand` variant for a slot the
    /// arity table already approved — indicates a bug in `decode`/`program`,
    /// never a malformed source program.
    Internal(String),
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProgramError::DuplicateOrder(order) => {
                write!(f, "duplicate instruction order: {}", order)
            }
            ProgramError::UnknownOpcode(op) => write!(f, "unknown opcode: {}", op),
            ProgramError::BadArity(opcode) => write!(f, "wrong operand shape for {}", opcode),
            ProgramError::BadIntLiteral(text) => write!(f, "invalid integer literal: {}", text),
            ProgramError::BadStringLiteral(text) => write!(f, "invalid string literal: {}", text),
            ProgramError::BadOperand(text) => write!(f, "invalid operand: {}", text),
            ProgramError::DuplicateLabel(name) => write!(f, "duplicate label: {}", name),
            ProgramError::UndefinedLabel(name) => write!(f, "undefined label: {}", name),
            ProgramError::Internal(msg) => write!(f, "internal build error: {}", msg),
        }
    }
}

impl std::error::Error for ProgramError {}

impl From<&ProgramError> for ExitCode {
    fn from(err: &ProgramError) -> ExitCode {
        match err {
            ProgramError::DuplicateOrder(_) => ExitCode::XmlStructureError,
            ProgramError::UnknownOpcode(_) => ExitCode::XmlStructureError,
            ProgramError::BadArity(_) => ExitCode::XmlStructureError,
            ProgramError::BadIntLiteral(_) => ExitCode::XmlStructureError,
            ProgramError::BadStringLiteral(_) => ExitCode::EncodingError,
            ProgramError::BadOperand(_) => ExitCode::XmlStructureError,
            ProgramError::DuplicateLabel(_) => ExitCode::Semantic,
            ProgramError::UndefinedLabel(_) => ExitCode::Semantic,
            ProgramError::Internal(_) => ExitCode::Internal,
        }
    }
}

impl From<ProgramError> for ExitCode {
    fn from(err: ProgramError) -> ExitCode {
        ExitCode::from(&err)
    }
}

/// A [`ProgramError`] paired with the address of the instruction that
/// raised it, mirroring [`Fault`] on the build side of the pipeline.
///
/// `DuplicateOrder` is the one case with no address: the duplicate scan
/// runs before `order` values are sorted into addresses at all, so there
/// is no instruction position yet to blame — the `order` value the
/// variant already carries is the locator in that case.
#[derive(Clone, PartialEq, Debug)]
pub struct BuildFault {
    pub address: Option<usize>,
    pub kind: ProgramError,
}

impl BuildFault {
    pub fn new(address: usize, kind: ProgramError) -> BuildFault {
        BuildFault {
            address: Some(address),
            kind,
        }
    }

    pub fn unlocated(kind: ProgramError) -> BuildFault {
        BuildFault {
            address: None,
            kind,
        }
    }
}

impl fmt::Display for BuildFault {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.address {
            Some(address) => write!(f, "instruction {}: {}", address + 1, self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for BuildFault {}

impl From<&BuildFault> for ExitCode {
    fn from(err: &BuildFault) -> ExitCode {
        ExitCode::from(&err.kind)
    }
}

impl From<BuildFault> for ExitCode {
    fn from(err: BuildFault) -> ExitCode {
        ExitCode::from(&err.kind)
    }
}
