//! # Bunki - Conditional Branching Engine for Lead-Generation Forms
//!
//! **Bunki** owns the routing graph behind a multi-step form: questions with
//! selectable answers, per-answer logic that jumps, submits or closes, and
//! themed end pages. It keeps that graph consistent while authors edit it and
//! answers "what comes next?" while respondents fill it in.
//!
//! ## Core Workflow
//!
//! The engine is storage-agnostic. It works on a canonical [`FormGraph`](model::FormGraph):
//!
//! 1.  **Load Your Data**: Parse your stored form into your own structs and implement
//!     [`IntoFormGraph`](model::IntoFormGraph) for them, or deserialize a `FormGraph` directly.
//! 2.  **Edit**: Hand the graph to a [`FormEditor`](editor::FormEditor). Every structural
//!     edit keeps orders dense and never leaves logic pointing at a missing node.
//! 3.  **Validate**: Run [`validate`](validator::validate) before preview or export to find
//!     unreachable questions, broken targets and dead ends.
//! 4.  **Navigate**: Use a [`Navigator`](resolver::Navigator) at fill time to resolve the
//!     step that follows each chosen answer.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bunki::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut editor = FormEditor::builder(FormGraph::new())
//!         .with_id_generator(SequentialIdGenerator::new())
//!         .build();
//!
//!     // Two questions, each created with one blank answer.
//!     let budget = editor.insert_question(None)?;
//!     let timeline = editor.insert_question(None)?;
//!     editor.rename_question(&budget.question_id, "What is your budget?")?;
//!     editor.rename_question(&timeline.question_id, "When do you want to start?")?;
//!
//!     // Big budgets skip straight to a dedicated end page.
//!     let big = editor.insert_answer(&budget.question_id, None)?;
//!     let sales = editor.add_end_page("Talk to sales", None)?;
//!     editor.set_answer_logic(&budget.question_id, &big, Some(LogicAction::submit_to(&sales)))?;
//!
//!     let report = validate(editor.graph());
//!     println!("Clean: {}", report.is_clean());
//!
//!     let navigator = Navigator::new(editor.graph());
//!     let path = navigator.walk(&[big.as_str()])?;
//!     println!("{}", PathFormatter::format_path(&path, editor.graph()));
//!
//!     Ok(())
//! }
//! ```

pub mod editor;
pub mod error;
pub mod ids;
pub mod model;
pub mod prelude;
pub mod resolver;
pub mod trace;
pub mod validator;
pub mod visualizer;
