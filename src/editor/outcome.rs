use crate::model::{AnswerId, AnswerRef, EndPage, LogicAction, Question, QuestionId};
use serde::{Deserialize, Serialize};

/// What to do with logic that points at a node being removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DanglingPolicy {
    /// Reset every referencing answer to "no logic" and report it.
    #[default]
    Clear,
    /// Refuse the removal while anything still points at the node.
    Reject,
}

/// Ids created by [`FormEditor::insert_question`](super::FormEditor::insert_question).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertedQuestion {
    pub question_id: QuestionId,
    pub answer_id: AnswerId,
}

/// An answer whose logic was reset because its target disappeared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearedLogic {
    pub answer: AnswerRef,
    pub previous: LogicAction,
}

/// How the start question was affected by a removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartChange {
    Unchanged,
    Reassigned { from: QuestionId, to: QuestionId },
    Cleared { from: QuestionId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRemoval {
    pub removed: Question,
    pub cleared: Vec<ClearedLogic>,
    pub start: StartChange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndPageRemoval {
    pub removed: EndPage,
    pub cleared: Vec<ClearedLogic>,
}

/// Result of a bulk propagation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagationOutcome {
    /// Number of answers that received the action.
    pub applied: usize,
    /// Answers below the source that kept their own logic, in order.
    pub skipped: Vec<AnswerId>,
}
