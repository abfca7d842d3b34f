//! Typed error taxonomy for the assembler and the runtime.

use thiserror::Error;

/// Errors raised while building a barrel program.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum AssembleError {
    #[error("label `{0}` is defined more than once")]
    DuplicateLabel(String),

    #[error("vertical {vertical} already carries label `{existing}`, cannot also attach `{new}`")]
    RedundantLabel {
        vertical: usize,
        existing: String,
        new: String,
    },

    #[error("label `{0}` is referenced but never defined")]
    UndefinedLabel(String),

    #[error("jump distance {0} exceeds the maximum of 7 studs in either direction")]
    JumpTooFar(i64),

    #[error("jump distance of 0 is not representable (use the implicit +1 instead)")]
    ZeroJump,

    #[error("stud `{0}` does not exist")]
    UnknownStud(String),
}

/// Errors raised while driving the mechanical simulation.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum EngineError {
    #[error("component {0:?} was placed on the advance list without being marked driven")]
    NotDriven(String),

    #[error("component {0:?} is already driven this time unit; cannot drive it again")]
    DoubleDriven(String),

    #[error("gear {0:?} is mechanically over-constrained: driven by two sources at once")]
    MeshConflict(String),

    #[error("wheel {0:?} was asked to move by more than one position in a single advance")]
    IllegalWheelMove(String),

    #[error("mesh partner of {0:?} has an unexpected component kind")]
    MeshTypeMismatch(String),

    #[error("value overflowed the {0}-digit register; the engine must abort rather than continue in a deranged state")]
    Overflow(usize),

    #[error("barrel {0:?} has no program loaded")]
    NoProgram(String),

    #[error("unknown component name `{0}`")]
    UnknownName(String),
}

pub type AssembleResult<T> = Result<T, AssembleError>;
pub type EngineResult<T> = Result<T, EngineError>;
