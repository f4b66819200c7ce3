use crate::model::{LogicAction, LogicTarget};
use thiserror::Error;

/// Errors raised by [`FormEditor`](crate::editor::FormEditor) operations.
///
/// Every operation checks its preconditions before writing, so when one of
/// these is returned the graph is exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error("Question '{0}' does not exist in this form")]
    QuestionNotFound(String),

    #[error("Answer '{answer_id}' does not exist on question '{question_id}'")]
    AnswerNotFound {
        question_id: String,
        answer_id: String,
    },

    #[error("End page '{0}' does not exist in this form")]
    EndPageNotFound(String),

    #[error("Logic {action} on answer '{answer_id}' of question '{question_id}' is invalid: {problem}")]
    InvalidTarget {
        question_id: String,
        answer_id: String,
        action: LogicAction,
        problem: TargetProblem,
    },

    #[error("Invalid reorder request for {scope}: {reason}")]
    InvalidPermutation { scope: String, reason: String },

    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error("Id generator produced {attempts} colliding ids in a row")]
    IdExhausted { attempts: usize },
}

/// Why a logic action was refused by the editor.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetProblem {
    #[error("the target does not exist")]
    Missing,
    #[error("a question cannot jump to itself")]
    SelfLoop,
}

/// Structural rules an edit would break.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("Cannot remove the last answer of question '{question_id}'")]
    LastAnswer { question_id: String },

    #[error("Index {index} is out of range for a sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{target} is still the target of {} answer logic(s)", .referenced_by.len())]
    TargetInUse {
        target: LogicTarget,
        referenced_by: Vec<String>,
    },

    #[error("A form with questions must keep a start question")]
    StartRequired,
}

/// Errors that can occur when resolving the next step at fill time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Question '{0}' not found in the form")]
    QuestionNotFound(String),

    #[error("Answer '{answer_id}' not found on question '{question_id}'")]
    AnswerNotFound {
        question_id: String,
        answer_id: String,
    },

    #[error("Answer '{answer_id}' routes to {target}, which no longer exists")]
    DanglingTarget {
        answer_id: String,
        target: LogicTarget,
    },

    #[error("The form has questions but no start question")]
    NoStartQuestion,
}

/// A single broken invariant reported by
/// [`FormGraph::check_well_formed`](crate::model::FormGraph::check_well_formed).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("Answer '{answer_id}' on question '{question_id}' routes to missing {target}")]
    DanglingTarget {
        question_id: String,
        answer_id: String,
        target: LogicTarget,
    },

    #[error("Question orders {found:?} are not a dense 0..{expected_len} sequence")]
    QuestionOrderNotDense {
        found: Vec<usize>,
        expected_len: usize,
    },

    #[error("Answer orders {found:?} on question '{question_id}' are not dense")]
    AnswerOrderNotDense {
        question_id: String,
        found: Vec<usize>,
    },

    #[error("Answer '{answer_id}' on question '{question_id}' jumps to its own question")]
    SelfLoop {
        question_id: String,
        answer_id: String,
    },

    #[error("The form has questions but no start question")]
    MissingStart,

    #[error("Start question '{0}' does not exist")]
    StartNotFound(String),

    #[error("Id '{0}' is used by more than one node")]
    DuplicateId(String),
}

/// Errors raised while saving or loading a [`FormSnapshot`](crate::model::FormSnapshot).
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Failed to encode snapshot: {0}")]
    Encode(String),

    #[error("Failed to decode snapshot: {0}")]
    Decode(String),

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported snapshot format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

/// Errors that can occur when converting a custom user format into a `FormGraph`.
#[derive(Error, Debug, Clone)]
pub enum FormConversionError {
    #[error("Invalid custom data: {0}")]
    ValidationError(String),
}
