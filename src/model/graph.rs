use serde::{Deserialize, Serialize};
use std::fmt;

pub type QuestionId = String;
pub type AnswerId = String;
pub type EndPageId = String;

/// The routing decision attached to an answer.
///
/// Exactly one case is active at a time; the enum makes a half-populated
/// action unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicAction {
    GoToQuestion { target_question_id: QuestionId },
    SubmitForm { target_end_page_id: EndPageId },
    CloseForm,
}

impl LogicAction {
    pub fn go_to(question_id: impl Into<QuestionId>) -> Self {
        LogicAction::GoToQuestion {
            target_question_id: question_id.into(),
        }
    }

    pub fn submit_to(end_page_id: impl Into<EndPageId>) -> Self {
        LogicAction::SubmitForm {
            target_end_page_id: end_page_id.into(),
        }
    }

    /// The node this action points at, if any. `CloseForm` has no target.
    pub fn target(&self) -> Option<LogicTarget> {
        match self {
            LogicAction::GoToQuestion { target_question_id } => {
                Some(LogicTarget::Question(target_question_id.clone()))
            }
            LogicAction::SubmitForm { target_end_page_id } => {
                Some(LogicTarget::EndPage(target_end_page_id.clone()))
            }
            LogicAction::CloseForm => None,
        }
    }

    pub fn targets(&self, target: &LogicTarget) -> bool {
        match (self, target) {
            (LogicAction::GoToQuestion { target_question_id }, LogicTarget::Question(id)) => {
                target_question_id == id
            }
            (LogicAction::SubmitForm { target_end_page_id }, LogicTarget::EndPage(id)) => {
                target_end_page_id == id
            }
            _ => false,
        }
    }
}

impl fmt::Display for LogicAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicAction::GoToQuestion { target_question_id } => {
                write!(f, "go to question '{}'", target_question_id)
            }
            LogicAction::SubmitForm { target_end_page_id } => {
                write!(f, "submit to end page '{}'", target_end_page_id)
            }
            LogicAction::CloseForm => write!(f, "close form"),
        }
    }
}

/// A node that logic can point at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicTarget {
    Question(QuestionId),
    EndPage(EndPageId),
}

impl fmt::Display for LogicTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicTarget::Question(id) => write!(f, "question '{}'", id),
            LogicTarget::EndPage(id) => write!(f, "end page '{}'", id),
        }
    }
}

/// Whether a question's answer type lets the respondent pick several answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    #[default]
    Single,
    Multiple,
}

/// A selectable option on a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub id: AnswerId,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub order: usize,
    #[serde(default)]
    pub logic: Option<LogicAction>,
}

impl Answer {
    pub fn new(id: impl Into<AnswerId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            order: 0,
            logic: None,
        }
    }

    pub fn with_logic(mut self, action: LogicAction) -> Self {
        self.logic = Some(action);
        self
    }
}

/// A node presenting one or more answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    #[serde(default)]
    pub order: usize,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub selection: SelectionMode,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

impl Question {
    pub fn new(id: impl Into<QuestionId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            order: 0,
            label: label.into(),
            selection: SelectionMode::Single,
            answers: Vec::new(),
        }
    }

    /// Replaces the answers, numbering them in the given sequence.
    pub fn with_answers(mut self, answers: Vec<Answer>) -> Self {
        self.answers = answers;
        self.renumber_answers();
        self
    }

    pub fn with_selection(mut self, selection: SelectionMode) -> Self {
        self.selection = selection;
        self
    }

    pub fn answer(&self, answer_id: &str) -> Option<&Answer> {
        self.answers.iter().find(|a| a.id == answer_id)
    }

    pub fn answer_position(&self, answer_id: &str) -> Option<usize> {
        self.answers.iter().position(|a| a.id == answer_id)
    }

    pub(crate) fn renumber_answers(&mut self) {
        for (order, answer) in self.answers.iter_mut().enumerate() {
            answer.order = order;
        }
    }
}

/// A terminal node representing a themed submission outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndPage {
    pub id: EndPageId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl EndPage {
    pub fn new(id: impl Into<EndPageId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            content: None,
        }
    }
}

/// Locates one answer inside the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnswerRef {
    pub question_id: QuestionId,
    pub answer_id: AnswerId,
}

/// The aggregate root: every question, end page and the entry point of a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormGraph {
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub end_pages: Vec<EndPage>,
    #[serde(default)]
    pub start_question_id: Option<QuestionId>,
}

impl FormGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from questions in their intended sequence.
    ///
    /// Orders are assigned densely and the first question becomes the start.
    pub fn from_questions(questions: Vec<Question>, end_pages: Vec<EndPage>) -> Self {
        let start_question_id = questions.first().map(|q| q.id.clone());
        let mut graph = Self {
            questions,
            end_pages,
            start_question_id,
        };
        graph.renumber_questions();
        graph
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    pub fn question_position(&self, question_id: &str) -> Option<usize> {
        self.questions.iter().position(|q| q.id == question_id)
    }

    /// The question holding the given `order` value.
    pub fn question_at_order(&self, order: usize) -> Option<&Question> {
        self.questions.iter().find(|q| q.order == order)
    }

    pub fn end_page(&self, end_page_id: &str) -> Option<&EndPage> {
        self.end_pages.iter().find(|p| p.id == end_page_id)
    }

    pub fn contains_target(&self, target: &LogicTarget) -> bool {
        match target {
            LogicTarget::Question(id) => self.question(id).is_some(),
            LogicTarget::EndPage(id) => self.end_page(id).is_some(),
        }
    }

    /// Iterates every answer together with the question that owns it.
    pub fn answers(&self) -> impl Iterator<Item = (&Question, &Answer)> {
        self.questions
            .iter()
            .flat_map(|q| q.answers.iter().map(move |a| (q, a)))
    }

    /// All answers whose logic points at `target`.
    pub fn logic_references(&self, target: &LogicTarget) -> Vec<AnswerRef> {
        self.answers()
            .filter(|(_, a)| a.logic.as_ref().is_some_and(|l| l.targets(target)))
            .map(|(q, a)| AnswerRef {
                question_id: q.id.clone(),
                answer_id: a.id.clone(),
            })
            .collect()
    }

    /// True when `id` is already used by any question, answer or end page.
    pub fn contains_id(&self, id: &str) -> bool {
        self.question(id).is_some()
            || self.end_page(id).is_some()
            || self.answers().any(|(_, a)| a.id == id)
    }

    pub(crate) fn renumber_questions(&mut self) {
        for (order, question) in self.questions.iter_mut().enumerate() {
            question.order = order;
            question.renumber_answers();
        }
    }
}
