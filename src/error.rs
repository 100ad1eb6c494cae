/// Identifier of a recorded computation trace.
pub type TapeTag = u16;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// A passive value was requested from a differentiable scalar while its
    /// operations are being recorded. Reading it would detach the result from
    /// the recorded dependency graph.
    #[error("{op} is not allowed while tape {tag} is recording")]
    TapingNotAllowed { op: &'static str, tag: TapeTag },

    #[error("value is not representable as {target}")]
    NotRepresentable { target: &'static str },

    #[error("tape {0} is already recording")]
    AlreadyRecording(TapeTag),

    #[error("no tape is recording")]
    NotRecording,

    #[error("no tape recorded under {0}")]
    UnknownTape(TapeTag),

    #[error("expected {expected} independent values, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("gradient needs exactly one dependent, tape has {dependents}")]
    NotScalarValued { dependents: usize },

    #[error("tape {0} could not link an operation to its arguments")]
    Corrupted(TapeTag),
}

pub type Result<T> = core::result::Result<T, Error>;
