use super::graph::{FormGraph, LogicAction};
use crate::error::InvariantViolation;
use itertools::Itertools;

impl FormGraph {
    /// Checks the structural invariants every editor operation preserves.
    ///
    /// Returns all violations found rather than stopping at the first one.
    pub fn check_well_formed(&self) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        let ids = self
            .questions
            .iter()
            .map(|q| q.id.as_str())
            .chain(self.end_pages.iter().map(|p| p.id.as_str()))
            .chain(self.answers().map(|(_, a)| a.id.as_str()));
        for duplicate in ids.duplicates() {
            violations.push(InvariantViolation::DuplicateId(duplicate.to_string()));
        }

        let question_orders: Vec<usize> = self.questions.iter().map(|q| q.order).collect();
        if !is_dense(&question_orders) {
            violations.push(InvariantViolation::QuestionOrderNotDense {
                found: question_orders,
                expected_len: self.questions.len(),
            });
        }

        for question in &self.questions {
            let answer_orders: Vec<usize> = question.answers.iter().map(|a| a.order).collect();
            if !is_dense(&answer_orders) {
                violations.push(InvariantViolation::AnswerOrderNotDense {
                    question_id: question.id.clone(),
                    found: answer_orders,
                });
            }

            for answer in &question.answers {
                let Some(logic) = &answer.logic else {
                    continue;
                };
                if let LogicAction::GoToQuestion { target_question_id } = logic {
                    if *target_question_id == question.id {
                        violations.push(InvariantViolation::SelfLoop {
                            question_id: question.id.clone(),
                            answer_id: answer.id.clone(),
                        });
                        continue;
                    }
                }
                if let Some(target) = logic.target() {
                    if !self.contains_target(&target) {
                        violations.push(InvariantViolation::DanglingTarget {
                            question_id: question.id.clone(),
                            answer_id: answer.id.clone(),
                            target,
                        });
                    }
                }
            }
        }

        match &self.start_question_id {
            Some(start) if self.question(start).is_none() => {
                violations.push(InvariantViolation::StartNotFound(start.clone()));
            }
            None if !self.questions.is_empty() => {
                violations.push(InvariantViolation::MissingStart);
            }
            _ => {}
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.check_well_formed().is_ok()
    }
}

/// True when `orders` is a permutation of `0..orders.len()`.
fn is_dense(orders: &[usize]) -> bool {
    orders.iter().copied().sorted_unstable().eq(0..orders.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Answer, EndPage, Question};

    fn two_question_graph() -> FormGraph {
        FormGraph::from_questions(
            vec![
                Question::new("q0", "Budget?").with_answers(vec![
                    Answer::new("a0", "Low"),
                    Answer::new("a1", "High").with_logic(LogicAction::submit_to("end")),
                ]),
                Question::new("q1", "Timeline?").with_answers(vec![Answer::new("a2", "Soon")]),
            ],
            vec![EndPage::new("end", "Thanks")],
        )
    }

    #[test]
    fn fresh_graph_is_well_formed() {
        assert!(two_question_graph().is_well_formed());
        assert!(FormGraph::new().is_well_formed());
    }

    #[test]
    fn detects_gaps_in_question_order() {
        let mut graph = two_question_graph();
        graph.questions[1].order = 5;
        let violations = graph.check_well_formed().unwrap_err();
        assert!(matches!(
            violations[0],
            InvariantViolation::QuestionOrderNotDense { expected_len: 2, .. }
        ));
    }

    #[test]
    fn detects_self_loop_and_dangling_target() {
        let mut graph = two_question_graph();
        graph.questions[0].answers[0].logic = Some(LogicAction::go_to("q0"));
        graph.questions[1].answers[0].logic = Some(LogicAction::go_to("gone"));
        let violations = graph.check_well_formed().unwrap_err();
        assert_eq!(violations.len(), 2);
        assert!(violations.contains(&InvariantViolation::SelfLoop {
            question_id: "q0".to_string(),
            answer_id: "a0".to_string(),
        }));
    }

    #[test]
    fn detects_missing_start_and_duplicate_ids() {
        let mut graph = two_question_graph();
        graph.start_question_id = None;
        graph.questions[1].answers[0].id = "a0".to_string();
        let violations = graph.check_well_formed().unwrap_err();
        assert!(violations.contains(&InvariantViolation::MissingStart));
        assert!(violations.contains(&InvariantViolation::DuplicateId("a0".to_string())));
    }
}
