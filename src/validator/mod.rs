//! Whole-graph consistency checks run before preview or export.
//!
//! Validation never fails: every finding is reported in a
//! [`ValidationReport`], and callers decide which findings block them.

use crate::model::{AnswerRef, FormGraph, LogicAction, LogicTarget, QuestionId, SelectionMode};
use serde::{Deserialize, Serialize};
use tracing::info;

mod reachability;

pub use reachability::Reachability;

/// A logic action whose target is missing from the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DanglingTarget {
    pub answer: AnswerRef,
    pub target: LogicTarget,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Questions no path from the start question reaches, in form order.
    pub unreachable_questions: Vec<QuestionId>,
    pub dangling_targets: Vec<DanglingTarget>,
    /// The start question names a missing question, or is unset while
    /// questions exist.
    pub missing_start: bool,
    /// No path from the start reaches a submission or close. A warning:
    /// loops may be intentional.
    pub no_terminal_reachable: bool,
    /// Multi-select questions whose answers carry logic. Routing for several
    /// simultaneous answers is not defined, so authors should avoid it.
    pub multi_select_logic: Vec<QuestionId>,
    /// Questions without any answer to choose.
    pub unanswerable_questions: Vec<QuestionId>,
}

impl ValidationReport {
    /// Findings that make the graph unusable as-is.
    pub fn has_errors(&self) -> bool {
        self.missing_start || !self.dangling_targets.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        self.no_terminal_reachable
            || !self.unreachable_questions.is_empty()
            || !self.multi_select_logic.is_empty()
            || !self.unanswerable_questions.is_empty()
    }

    /// True when there is nothing at all to tell the author.
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

/// Produces the consistency report for `graph`.
pub fn validate(graph: &FormGraph) -> ValidationReport {
    let missing_start = match graph.start_question_id.as_deref() {
        Some(id) => graph.question(id).is_none(),
        None => !graph.questions.is_empty(),
    };

    let mut dangling_targets = Vec::new();
    for (question, answer) in graph.answers() {
        if let Some(target) = answer.logic.as_ref().and_then(LogicAction::target) {
            if !graph.contains_target(&target) {
                dangling_targets.push(DanglingTarget {
                    answer: AnswerRef {
                        question_id: question.id.clone(),
                        answer_id: answer.id.clone(),
                    },
                    target,
                });
            }
        }
    }

    let reachability = Reachability::explore(graph);
    let unreachable_questions = graph
        .questions
        .iter()
        .filter(|q| !reachability.reaches(&q.id))
        .map(|q| q.id.clone())
        .collect();

    let multi_select_logic = graph
        .questions
        .iter()
        .filter(|q| q.selection == SelectionMode::Multiple)
        .filter(|q| q.answers.iter().any(|a| a.logic.is_some()))
        .map(|q| q.id.clone())
        .collect();

    let unanswerable_questions = graph
        .questions
        .iter()
        .filter(|q| q.answers.is_empty())
        .map(|q| q.id.clone())
        .collect();

    let report = ValidationReport {
        unreachable_questions,
        dangling_targets,
        missing_start,
        no_terminal_reachable: !reachability.terminal_reachable(),
        multi_select_logic,
        unanswerable_questions,
    };

    info!(
        errors = report.has_errors(),
        warnings = report.has_warnings(),
        unreachable = report.unreachable_questions.len(),
        dangling = report.dangling_targets.len(),
        "Validated form graph"
    );
    report
}
