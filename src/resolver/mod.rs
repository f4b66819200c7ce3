use crate::error::ResolutionError;
use crate::model::{EndPageId, FormGraph, LogicAction, LogicTarget, Question, QuestionId};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

mod path;

pub use path::{DEFAULT_STEP_LIMIT, FillPath, PathOutcome, PathStep};

/// What the form-fill UI should render after an answer is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationStep {
    ToQuestion(QuestionId),
    ToEndPage(EndPageId),
    /// The respondent aborted the form through a close action.
    Closed,
    /// The form was submitted without a named end page.
    Submitted,
}

impl NavigationStep {
    /// True for every step that ends the fill session.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, NavigationStep::ToQuestion(_))
    }
}

impl fmt::Display for NavigationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationStep::ToQuestion(id) => write!(f, "question '{}'", id),
            NavigationStep::ToEndPage(id) => write!(f, "end page '{}'", id),
            NavigationStep::Closed => write!(f, "closed"),
            NavigationStep::Submitted => write!(f, "submitted"),
        }
    }
}

/// Resolves navigation over a read-only form graph.
///
/// Building a `Navigator` indexes the graph once, so it is the cheap way to
/// resolve many steps against the same snapshot. It never mutates the graph
/// and can be shared freely between preview and rendering paths.
pub struct Navigator<'a> {
    graph: &'a FormGraph,
    by_id: AHashMap<&'a str, &'a Question>,
    by_order: AHashMap<usize, &'a Question>,
    step_limit: usize,
}

impl<'a> Navigator<'a> {
    pub fn new(graph: &'a FormGraph) -> Self {
        let mut by_id = AHashMap::with_capacity(graph.questions.len());
        let mut by_order = AHashMap::with_capacity(graph.questions.len());
        for question in &graph.questions {
            by_id.entry(question.id.as_str()).or_insert(question);
            by_order.entry(question.order).or_insert(question);
        }
        Self {
            graph,
            by_id,
            by_order,
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }

    /// Caps the number of answers [`Navigator::walk`] will follow.
    pub fn with_step_limit(mut self, step_limit: usize) -> Self {
        self.step_limit = step_limit;
        self
    }

    pub fn graph(&self) -> &'a FormGraph {
        self.graph
    }

    pub fn question(&self, question_id: &str) -> Option<&'a Question> {
        self.by_id.get(question_id).copied()
    }

    /// The step a respondent lands on when opening the form.
    ///
    /// An empty form submits immediately.
    pub fn start(&self) -> Result<NavigationStep, ResolutionError> {
        match &self.graph.start_question_id {
            Some(id) if self.by_id.contains_key(id.as_str()) => {
                Ok(NavigationStep::ToQuestion(id.clone()))
            }
            Some(id) => Err(ResolutionError::QuestionNotFound(id.clone())),
            None if self.graph.questions.is_empty() => Ok(NavigationStep::Submitted),
            None => Err(ResolutionError::NoStartQuestion),
        }
    }

    /// Computes the step that follows choosing `chosen_answer_id` on
    /// `current_question_id`.
    ///
    /// Without logic the respondent moves to the question with the next
    /// `order`, or submits when the current question is the last one. Jumps
    /// may go backwards and cycles are followed as-is.
    pub fn resolve_next(
        &self,
        current_question_id: &str,
        chosen_answer_id: &str,
    ) -> Result<NavigationStep, ResolutionError> {
        let question = self
            .question(current_question_id)
            .ok_or_else(|| ResolutionError::QuestionNotFound(current_question_id.to_string()))?;
        let answer = question
            .answer(chosen_answer_id)
            .ok_or_else(|| ResolutionError::AnswerNotFound {
                question_id: current_question_id.to_string(),
                answer_id: chosen_answer_id.to_string(),
            })?;

        let step = match &answer.logic {
            None => self.implicit_next(question),
            Some(LogicAction::GoToQuestion { target_question_id }) => {
                if !self.by_id.contains_key(target_question_id.as_str()) {
                    return Err(ResolutionError::DanglingTarget {
                        answer_id: answer.id.clone(),
                        target: LogicTarget::Question(target_question_id.clone()),
                    });
                }
                NavigationStep::ToQuestion(target_question_id.clone())
            }
            Some(LogicAction::SubmitForm { target_end_page_id }) => {
                if self.graph.end_page(target_end_page_id).is_none() {
                    return Err(ResolutionError::DanglingTarget {
                        answer_id: answer.id.clone(),
                        target: LogicTarget::EndPage(target_end_page_id.clone()),
                    });
                }
                NavigationStep::ToEndPage(target_end_page_id.clone())
            }
            Some(LogicAction::CloseForm) => NavigationStep::Closed,
        };

        trace!(
            question_id = current_question_id,
            answer_id = chosen_answer_id,
            %step,
            "Resolved next step"
        );
        Ok(step)
    }

    /// The default step after `question` when the chosen answer has no logic.
    pub fn implicit_next(&self, question: &Question) -> NavigationStep {
        match question
            .order
            .checked_add(1)
            .and_then(|order| self.by_order.get(&order))
        {
            Some(next) => NavigationStep::ToQuestion(next.id.clone()),
            None => NavigationStep::Submitted,
        }
    }
}

/// Resolves a single step without keeping an index around.
pub fn resolve_next(
    graph: &FormGraph,
    current_question_id: &str,
    chosen_answer_id: &str,
) -> Result<NavigationStep, ResolutionError> {
    Navigator::new(graph).resolve_next(current_question_id, chosen_answer_id)
}
