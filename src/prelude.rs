//! Prelude module for convenient imports
//!
//! Re-exports the types most callers need to edit, validate and navigate a
//! form graph.
//!
//! # Example
//!
//! ```rust,no_run
//! use bunki::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/form.json")?;
//! let graph: FormGraph = serde_json::from_str(&json)?;
//!
//! let report = validate(&graph);
//! if report.has_errors() {
//!     println!("{:?}", report);
//! }
//!
//! let start = Navigator::new(&graph).start()?;
//! println!("Respondents start at {}", start);
//! # Ok(())
//! # }
//! ```

// Editing
pub use crate::editor::{
    ClearedLogic, DanglingPolicy, EndPageRemoval, FormEditor, FormEditorBuilder, InsertedQuestion,
    PropagationOutcome, QuestionRemoval, StartChange, propagate,
};
pub use crate::ids::{IdGenerator, IdKind, RandomIdGenerator, SequentialIdGenerator};

// Graph model
pub use crate::model::{
    Answer, AnswerId, AnswerRef, EndPage, EndPageId, FormGraph, FormSnapshot, IntoFormGraph,
    LogicAction, LogicTarget, Question, QuestionId, SelectionMode,
};

// Navigation
pub use crate::resolver::{FillPath, NavigationStep, Navigator, PathOutcome, PathStep, resolve_next};

// Validation
pub use crate::validator::{DanglingTarget, ValidationReport, validate};

// Error types
pub use crate::error::{
    FormConversionError, InvariantViolation, MutationError, PreconditionError, ResolutionError,
    SnapshotError,
};

// Path formatting
pub use crate::trace::PathFormatter;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
