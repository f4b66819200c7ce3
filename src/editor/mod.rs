use crate::error::{MutationError, PreconditionError, TargetProblem};
use crate::ids::{IdGenerator, IdKind, RandomIdGenerator};
use crate::model::{
    Answer, AnswerId, AnswerRef, EndPage, EndPageId, FormGraph, FormSnapshot, LogicAction,
    LogicTarget, Question, QuestionId, SelectionMode,
};
use ahash::{AHashMap, AHashSet};
use tracing::{debug, warn};

mod outcome;
pub mod propagate;

pub use outcome::*;
pub use propagate::propagate;

/// How many colliding ids the editor tolerates before giving up.
const MAX_ID_ATTEMPTS: usize = 64;

/// Owns a form graph and applies structural edits to it.
///
/// Each operation either fully applies or returns an error with the graph left
/// untouched. After any successful operation question and answer orders are
/// dense and no logic points at a missing node.
pub struct FormEditor {
    graph: FormGraph,
    ids: Box<dyn IdGenerator>,
    dangling_policy: DanglingPolicy,
    revision: u64,
}

pub struct FormEditorBuilder {
    graph: FormGraph,
    ids: Option<Box<dyn IdGenerator>>,
    dangling_policy: DanglingPolicy,
}

impl FormEditorBuilder {
    pub fn new(graph: FormGraph) -> Self {
        Self {
            graph,
            ids: None,
            dangling_policy: DanglingPolicy::default(),
        }
    }

    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Some(Box::new(ids));
        self
    }

    /// Policy used by `remove_question` and `remove_end_page`.
    pub fn with_dangling_policy(mut self, policy: DanglingPolicy) -> Self {
        self.dangling_policy = policy;
        self
    }

    /// Normalizes the graph and hands it to a new editor.
    ///
    /// Questions and answers are stably sorted by their stored `order` and
    /// renumbered densely. A start question that is unset or names a missing
    /// question is replaced by the first question, or cleared when the graph
    /// is empty.
    pub fn build(self) -> FormEditor {
        let mut graph = self.graph;
        graph.questions.sort_by_key(|q| q.order);
        for question in &mut graph.questions {
            question.answers.sort_by_key(|a| a.order);
        }
        graph.renumber_questions();
        let start_exists = graph
            .start_question_id
            .as_deref()
            .is_some_and(|id| graph.question(id).is_some());
        if !start_exists {
            if let Some(missing) = &graph.start_question_id {
                warn!(start = %missing, "Start question does not exist, entering at the first question");
            }
            graph.start_question_id = graph.questions.first().map(|q| q.id.clone());
        }

        FormEditor {
            graph,
            ids: self
                .ids
                .unwrap_or_else(|| Box::new(RandomIdGenerator::new())),
            dangling_policy: self.dangling_policy,
            revision: 0,
        }
    }
}

impl FormEditor {
    pub fn builder(graph: FormGraph) -> FormEditorBuilder {
        FormEditorBuilder::new(graph)
    }

    pub fn new(graph: FormGraph) -> Self {
        FormEditorBuilder::new(graph).build()
    }

    pub fn graph(&self) -> &FormGraph {
        &self.graph
    }

    pub fn into_graph(self) -> FormGraph {
        self.graph
    }

    /// Number of successful structural changes since the editor was built.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// An owned copy of the current graph for asynchronous consumers.
    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot::new(self.graph.clone(), self.revision)
    }

    // --- Answers ---

    /// Adds a blank answer at `at` (default: after the last answer).
    pub fn insert_answer(
        &mut self,
        question_id: &str,
        at: Option<usize>,
    ) -> Result<AnswerId, MutationError> {
        let qi = self.question_index(question_id)?;
        let len = self.graph.questions[qi].answers.len();
        let index = at.unwrap_or(len);
        if index > len {
            return Err(PreconditionError::IndexOutOfRange { index, len }.into());
        }
        let answer_id = self.fresh_id(IdKind::Answer, &[])?;

        let question = &mut self.graph.questions[qi];
        question
            .answers
            .insert(index, Answer::new(answer_id.clone(), ""));
        question.renumber_answers();
        self.commit();
        debug!(question_id, answer_id = %answer_id, index, "Inserted answer");
        Ok(answer_id)
    }

    /// Removes an answer. A question always keeps at least one answer.
    pub fn remove_answer(
        &mut self,
        question_id: &str,
        answer_id: &str,
    ) -> Result<Answer, MutationError> {
        let qi = self.question_index(question_id)?;
        let ai = self.answer_index(qi, answer_id)?;
        if self.graph.questions[qi].answers.len() == 1 {
            return Err(PreconditionError::LastAnswer {
                question_id: question_id.to_string(),
            }
            .into());
        }

        let question = &mut self.graph.questions[qi];
        let removed = question.answers.remove(ai);
        question.renumber_answers();
        self.commit();
        debug!(question_id, answer_id, "Removed answer");
        Ok(removed)
    }

    /// Reorders the answers of a question. Returns `false` when the requested
    /// order equals the current one, in which case nothing changes.
    pub fn reorder_answers<S: AsRef<str>>(
        &mut self,
        question_id: &str,
        new_order: &[S],
    ) -> Result<bool, MutationError> {
        let qi = self.question_index(question_id)?;
        let current: Vec<&str> = self.graph.questions[qi]
            .answers
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        let indices = permutation_indices(
            &format!("answers of question '{}'", question_id),
            &current,
            new_order,
        )?;
        if is_identity(&indices) {
            return Ok(false);
        }

        let question = &mut self.graph.questions[qi];
        question.answers = apply_permutation(std::mem::take(&mut question.answers), &indices);
        question.renumber_answers();
        self.commit();
        debug!(question_id, "Reordered answers");
        Ok(true)
    }

    pub fn rename_answer(
        &mut self,
        question_id: &str,
        answer_id: &str,
        label: impl Into<String>,
    ) -> Result<(), MutationError> {
        let qi = self.question_index(question_id)?;
        let ai = self.answer_index(qi, answer_id)?;
        self.graph.questions[qi].answers[ai].label = label.into();
        self.commit();
        Ok(())
    }

    // --- Questions ---

    /// Adds a question with one blank answer at `at` (default: last).
    ///
    /// The first question of an empty form becomes its start question.
    pub fn insert_question(&mut self, at: Option<usize>) -> Result<InsertedQuestion, MutationError> {
        let len = self.graph.questions.len();
        let index = at.unwrap_or(len);
        if index > len {
            return Err(PreconditionError::IndexOutOfRange { index, len }.into());
        }
        let question_id = self.fresh_id(IdKind::Question, &[])?;
        let answer_id = self.fresh_id(IdKind::Answer, &[question_id.as_str()])?;

        let question = Question::new(question_id.clone(), "")
            .with_answers(vec![Answer::new(answer_id.clone(), "")]);
        self.graph.questions.insert(index, question);
        self.graph.renumber_questions();
        if self.graph.start_question_id.is_none() {
            self.graph.start_question_id = Some(question_id.clone());
        }
        self.commit();
        debug!(question_id = %question_id, index, "Inserted question");

        Ok(InsertedQuestion {
            question_id,
            answer_id,
        })
    }

    /// Removes a question using the editor's configured [`DanglingPolicy`].
    pub fn remove_question(&mut self, question_id: &str) -> Result<QuestionRemoval, MutationError> {
        self.remove_question_with(question_id, self.dangling_policy)
    }

    /// Removes a question, clearing or rejecting on logic that targets it.
    ///
    /// When the start question is removed, the new first question becomes the
    /// start; removing the only question clears it.
    pub fn remove_question_with(
        &mut self,
        question_id: &str,
        policy: DanglingPolicy,
    ) -> Result<QuestionRemoval, MutationError> {
        let qi = self.question_index(question_id)?;
        let target = LogicTarget::Question(question_id.to_string());
        let references: Vec<AnswerRef> = self
            .graph
            .logic_references(&target)
            .into_iter()
            .filter(|r| r.question_id != question_id)
            .collect();
        if policy == DanglingPolicy::Reject && !references.is_empty() {
            return Err(PreconditionError::TargetInUse {
                target,
                referenced_by: references.into_iter().map(|r| r.answer_id).collect(),
            }
            .into());
        }

        let removed = self.graph.questions.remove(qi);
        let cleared = self.clear_references(references);
        self.graph.renumber_questions();

        let start = if self.graph.start_question_id.as_deref() == Some(question_id) {
            let from = question_id.to_string();
            match self.graph.questions.first().map(|q| q.id.clone()) {
                Some(to) => {
                    self.graph.start_question_id = Some(to.clone());
                    StartChange::Reassigned { from, to }
                }
                None => {
                    self.graph.start_question_id = None;
                    StartChange::Cleared { from }
                }
            }
        } else {
            StartChange::Unchanged
        };
        self.commit();

        if !cleared.is_empty() {
            warn!(
                question_id,
                cleared = cleared.len(),
                "Removed question was a logic target; cleared referencing answers"
            );
        }
        debug!(question_id, ?start, "Removed question");

        Ok(QuestionRemoval {
            removed,
            cleared,
            start,
        })
    }

    /// Reorders the questions, which changes the default traversal sequence.
    pub fn reorder_questions<S: AsRef<str>>(&mut self, new_order: &[S]) -> Result<bool, MutationError> {
        let current: Vec<&str> = self.graph.questions.iter().map(|q| q.id.as_str()).collect();
        let indices = permutation_indices("questions", &current, new_order)?;
        if is_identity(&indices) {
            return Ok(false);
        }

        self.graph.questions =
            apply_permutation(std::mem::take(&mut self.graph.questions), &indices);
        self.graph.renumber_questions();
        self.commit();
        debug!("Reordered questions");
        Ok(true)
    }

    pub fn rename_question(
        &mut self,
        question_id: &str,
        label: impl Into<String>,
    ) -> Result<(), MutationError> {
        let qi = self.question_index(question_id)?;
        self.graph.questions[qi].label = label.into();
        self.commit();
        Ok(())
    }

    pub fn set_selection_mode(
        &mut self,
        question_id: &str,
        selection: SelectionMode,
    ) -> Result<(), MutationError> {
        let qi = self.question_index(question_id)?;
        self.graph.questions[qi].selection = selection;
        self.commit();
        Ok(())
    }

    /// Sets the entry question. `None` is only accepted for an empty form.
    pub fn set_start_question(
        &mut self,
        question_id: Option<&str>,
    ) -> Result<Option<QuestionId>, MutationError> {
        match question_id {
            Some(id) => {
                self.question_index(id)?;
            }
            None if !self.graph.questions.is_empty() => {
                return Err(PreconditionError::StartRequired.into());
            }
            None => {}
        }
        let previous = std::mem::replace(
            &mut self.graph.start_question_id,
            question_id.map(str::to_string),
        );
        self.commit();
        Ok(previous)
    }

    // --- Logic ---

    /// Sets or clears one answer's logic, returning what it had before.
    ///
    /// The target is checked before anything is written; on error the
    /// answer keeps its previous logic.
    pub fn set_answer_logic(
        &mut self,
        question_id: &str,
        answer_id: &str,
        action: Option<LogicAction>,
    ) -> Result<Option<LogicAction>, MutationError> {
        let qi = self.question_index(question_id)?;
        let ai = self.answer_index(qi, answer_id)?;
        if let Some(action) = &action {
            check_action(&self.graph, question_id, answer_id, action)?;
        }

        let previous = std::mem::replace(&mut self.graph.questions[qi].answers[ai].logic, action);
        self.commit();
        debug!(
            question_id,
            answer_id,
            logic = ?self.graph.questions[qi].answers[ai].logic,
            "Updated answer logic"
        );
        Ok(previous)
    }

    /// Applies `action` to every answer below the source answer that has no
    /// logic of its own. See [`propagate`].
    pub fn propagate(
        &mut self,
        question_id: &str,
        source_answer_id: &str,
        action: LogicAction,
    ) -> Result<PropagationOutcome, MutationError> {
        let outcome = propagate::propagate(&mut self.graph, question_id, source_answer_id, action)?;
        if outcome.applied > 0 {
            self.commit();
        }
        Ok(outcome)
    }

    // --- End pages ---

    pub fn add_end_page(
        &mut self,
        name: impl Into<String>,
        content: Option<String>,
    ) -> Result<EndPageId, MutationError> {
        let id = self.fresh_id(IdKind::EndPage, &[])?;
        self.graph.end_pages.push(EndPage {
            id: id.clone(),
            name: name.into(),
            content,
        });
        self.commit();
        debug!(end_page_id = %id, "Added end page");
        Ok(id)
    }

    pub fn remove_end_page(&mut self, end_page_id: &str) -> Result<EndPageRemoval, MutationError> {
        self.remove_end_page_with(end_page_id, self.dangling_policy)
    }

    pub fn remove_end_page_with(
        &mut self,
        end_page_id: &str,
        policy: DanglingPolicy,
    ) -> Result<EndPageRemoval, MutationError> {
        let index = self
            .graph
            .end_pages
            .iter()
            .position(|p| p.id == end_page_id)
            .ok_or_else(|| MutationError::EndPageNotFound(end_page_id.to_string()))?;
        let target = LogicTarget::EndPage(end_page_id.to_string());
        let references = self.graph.logic_references(&target);
        if policy == DanglingPolicy::Reject && !references.is_empty() {
            return Err(PreconditionError::TargetInUse {
                target,
                referenced_by: references.into_iter().map(|r| r.answer_id).collect(),
            }
            .into());
        }

        let removed = self.graph.end_pages.remove(index);
        let cleared = self.clear_references(references);
        self.commit();
        if !cleared.is_empty() {
            warn!(
                end_page_id,
                cleared = cleared.len(),
                "Removed end page was a logic target; cleared referencing answers"
            );
        }
        Ok(EndPageRemoval { removed, cleared })
    }

    // --- Internals ---

    fn commit(&mut self) {
        self.revision += 1;
    }

    fn question_index(&self, question_id: &str) -> Result<usize, MutationError> {
        self.graph
            .question_position(question_id)
            .ok_or_else(|| MutationError::QuestionNotFound(question_id.to_string()))
    }

    fn answer_index(&self, qi: usize, answer_id: &str) -> Result<usize, MutationError> {
        let question = &self.graph.questions[qi];
        question
            .answer_position(answer_id)
            .ok_or_else(|| MutationError::AnswerNotFound {
                question_id: question.id.clone(),
                answer_id: answer_id.to_string(),
            })
    }

    /// Asks the generator for an id not used anywhere in the graph nor in `reserved`.
    fn fresh_id(&mut self, kind: IdKind, reserved: &[&str]) -> Result<String, MutationError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next_id(kind);
            if !self.graph.contains_id(&id) && !reserved.contains(&id.as_str()) {
                return Ok(id);
            }
        }
        Err(MutationError::IdExhausted {
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    fn clear_references(&mut self, references: Vec<AnswerRef>) -> Vec<ClearedLogic> {
        let mut cleared = Vec::with_capacity(references.len());
        for reference in references {
            let answer = self
                .graph
                .questions
                .iter_mut()
                .filter(|q| q.id == reference.question_id)
                .flat_map(|q| q.answers.iter_mut())
                .find(|a| a.id == reference.answer_id);
            if let Some(previous) = answer.and_then(|a| a.logic.take()) {
                cleared.push(ClearedLogic {
                    answer: reference,
                    previous,
                });
            }
        }
        cleared
    }
}

/// Checks that `action` may be attached to the given answer.
pub(crate) fn check_action(
    graph: &FormGraph,
    question_id: &str,
    answer_id: &str,
    action: &LogicAction,
) -> Result<(), MutationError> {
    let problem = match action {
        LogicAction::GoToQuestion { target_question_id } if target_question_id == question_id => {
            Some(TargetProblem::SelfLoop)
        }
        LogicAction::GoToQuestion { target_question_id } => graph
            .question(target_question_id)
            .is_none()
            .then_some(TargetProblem::Missing),
        LogicAction::SubmitForm { target_end_page_id } => graph
            .end_page(target_end_page_id)
            .is_none()
            .then_some(TargetProblem::Missing),
        LogicAction::CloseForm => None,
    };

    match problem {
        Some(problem) => Err(MutationError::InvalidTarget {
            question_id: question_id.to_string(),
            answer_id: answer_id.to_string(),
            action: action.clone(),
            problem,
        }),
        None => Ok(()),
    }
}

/// Maps each requested id to its current index, rejecting anything that is
/// not an exact permutation of `current`.
fn permutation_indices<S: AsRef<str>>(
    scope: &str,
    current: &[&str],
    requested: &[S],
) -> Result<Vec<usize>, MutationError> {
    let invalid = |reason: String| MutationError::InvalidPermutation {
        scope: scope.to_string(),
        reason,
    };
    if requested.len() != current.len() {
        return Err(invalid(format!(
            "expected {} ids, got {}",
            current.len(),
            requested.len()
        )));
    }

    let positions: AHashMap<&str, usize> =
        current.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    let mut seen = AHashSet::with_capacity(requested.len());
    let mut indices = Vec::with_capacity(requested.len());
    for id in requested {
        let id = id.as_ref();
        let index = *positions
            .get(id)
            .ok_or_else(|| invalid(format!("unknown id '{}'", id)))?;
        if !seen.insert(index) {
            return Err(invalid(format!("id '{}' is listed more than once", id)));
        }
        indices.push(index);
    }
    Ok(indices)
}

fn is_identity(indices: &[usize]) -> bool {
    indices.iter().copied().eq(0..indices.len())
}

fn apply_permutation<T>(items: Vec<T>, indices: &[usize]) -> Vec<T> {
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    indices.iter().filter_map(|&i| slots[i].take()).collect()
}
