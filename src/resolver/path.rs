use super::{NavigationStep, Navigator};
use crate::error::ResolutionError;
use crate::model::{AnswerId, QuestionId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default cap on answers followed by a single walk.
pub const DEFAULT_STEP_LIMIT: usize = 256;

/// One answered question along a respondent's path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub question_id: QuestionId,
    pub answer_id: AnswerId,
    pub next: NavigationStep,
}

/// Where a walk stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathOutcome {
    /// A terminal step was reached.
    Finished(NavigationStep),
    /// The choices ran out while the respondent is on this question.
    AwaitingAnswer(QuestionId),
    /// The step limit was hit, usually because the choices loop forever.
    StepLimitReached,
}

/// The route a scripted respondent took through a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillPath {
    pub steps: Vec<PathStep>,
    pub outcome: PathOutcome,
}

impl FillPath {
    /// Questions visited, in order, including the one awaiting an answer.
    pub fn visited_questions(&self) -> Vec<&str> {
        let mut visited: Vec<&str> = self.steps.iter().map(|s| s.question_id.as_str()).collect();
        if let PathOutcome::AwaitingAnswer(id) = &self.outcome {
            visited.push(id);
        }
        visited
    }
}

impl Navigator<'_> {
    /// Follows the resolver from the start question, consuming one answer id
    /// per visited question.
    ///
    /// Cycles are followed as long as there are choices left, bounded by the
    /// navigator's step limit.
    pub fn walk<S: AsRef<str>>(&self, choices: &[S]) -> Result<FillPath, ResolutionError> {
        let mut steps = Vec::new();
        let mut current = self.start()?;
        let mut choices = choices.iter();

        let outcome = loop {
            let question_id = match &current {
                NavigationStep::ToQuestion(id) => id.clone(),
                terminal => break PathOutcome::Finished(terminal.clone()),
            };
            if steps.len() >= self.step_limit {
                break PathOutcome::StepLimitReached;
            }
            let Some(answer_id) = choices.next() else {
                break PathOutcome::AwaitingAnswer(question_id);
            };

            let next = self.resolve_next(&question_id, answer_id.as_ref())?;
            steps.push(PathStep {
                question_id,
                answer_id: answer_id.as_ref().to_string(),
                next: next.clone(),
            });
            current = next;
        };

        debug!(steps = steps.len(), ?outcome, "Walked form path");
        Ok(FillPath { steps, outcome })
    }
}
