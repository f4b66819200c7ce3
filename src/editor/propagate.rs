use super::check_action;
use super::outcome::PropagationOutcome;
use crate::error::MutationError;
use crate::model::{FormGraph, LogicAction};
use tracing::{debug, warn};

/// Copies one routing decision onto the answers below a source answer.
///
/// "Below" means every answer of the same question whose `order` is strictly
/// greater than the source's. The source answer itself is left alone, and so
/// is any answer that already carries logic: those are reported in
/// `skipped`. Each receiving answer gets its own copy of `action`.
///
/// The action is checked like [`FormEditor::set_answer_logic`] before any
/// answer is touched.
///
/// [`FormEditor::set_answer_logic`]: super::FormEditor::set_answer_logic
pub fn propagate(
    graph: &mut FormGraph,
    question_id: &str,
    source_answer_id: &str,
    action: LogicAction,
) -> Result<PropagationOutcome, MutationError> {
    let question = graph
        .question(question_id)
        .ok_or_else(|| MutationError::QuestionNotFound(question_id.to_string()))?;
    let source_order = question
        .answer(source_answer_id)
        .ok_or_else(|| MutationError::AnswerNotFound {
            question_id: question_id.to_string(),
            answer_id: source_answer_id.to_string(),
        })?
        .order;
    check_action(graph, question_id, source_answer_id, &action)?;

    let mut outcome = PropagationOutcome::default();
    let question = graph
        .questions
        .iter_mut()
        .find(|q| q.id == question_id)
        .ok_or_else(|| MutationError::QuestionNotFound(question_id.to_string()))?;
    let mut below: Vec<_> = question
        .answers
        .iter_mut()
        .filter(|a| a.order > source_order)
        .collect();
    below.sort_by_key(|a| a.order);

    for answer in below {
        if answer.logic.is_some() {
            outcome.skipped.push(answer.id.clone());
        } else {
            answer.logic = Some(action.clone());
            outcome.applied += 1;
        }
    }

    if !outcome.skipped.is_empty() {
        warn!(
            question_id,
            skipped = ?outcome.skipped,
            "Propagation kept existing logic on some answers"
        );
    }
    debug!(question_id, source_answer_id, applied = outcome.applied, %action, "Propagated logic");
    Ok(outcome)
}
