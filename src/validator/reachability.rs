use crate::model::{FormGraph, LogicAction, Question};
use ahash::{AHashMap, AHashSet};
use std::collections::VecDeque;

/// Breadth-first exploration of the routes a respondent can take.
///
/// Edges come from each answer of a visited question: the default next
/// question for answers without logic, the target of a `GoToQuestion`, or a
/// terminal for submissions and closes. A question with no answers falls
/// through to its default next question.
pub struct Reachability<'a> {
    visited: AHashSet<&'a str>,
    terminal_reachable: bool,
}

impl<'a> Reachability<'a> {
    pub fn explore(graph: &'a FormGraph) -> Self {
        let by_id: AHashMap<&str, &Question> =
            graph.questions.iter().map(|q| (q.id.as_str(), q)).collect();
        let by_order: AHashMap<usize, &Question> =
            graph.questions.iter().rev().map(|q| (q.order, q)).collect();

        let mut visited = AHashSet::new();
        let mut terminal_reachable = false;
        let mut queue = VecDeque::new();

        match graph.start_question_id.as_deref() {
            Some(start) => {
                if let Some(question) = by_id.get(start) {
                    visited.insert(question.id.as_str());
                    queue.push_back(*question);
                }
            }
            // An empty form submits right away.
            None => terminal_reachable = graph.questions.is_empty(),
        }

        while let Some(question) = queue.pop_front() {
            let mut successors: Vec<&Question> = Vec::new();
            let mut default_next = question.answers.is_empty();

            for answer in &question.answers {
                match &answer.logic {
                    None => default_next = true,
                    Some(LogicAction::GoToQuestion { target_question_id }) => {
                        if let Some(target) = by_id.get(target_question_id.as_str()) {
                            successors.push(*target);
                        }
                    }
                    Some(LogicAction::SubmitForm { target_end_page_id }) => {
                        if graph.end_page(target_end_page_id).is_some() {
                            terminal_reachable = true;
                        }
                    }
                    Some(LogicAction::CloseForm) => terminal_reachable = true,
                }
            }

            if default_next {
                match question.order.checked_add(1).and_then(|o| by_order.get(&o)) {
                    Some(next) => successors.push(*next),
                    None => terminal_reachable = true,
                }
            }

            for next in successors {
                if visited.insert(next.id.as_str()) {
                    queue.push_back(next);
                }
            }
        }

        Self {
            visited,
            terminal_reachable,
        }
    }

    pub fn reaches(&self, question_id: &str) -> bool {
        self.visited.contains(question_id)
    }

    /// True when some explored path ends in a submission or close.
    pub fn terminal_reachable(&self) -> bool {
        self.terminal_reachable
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
