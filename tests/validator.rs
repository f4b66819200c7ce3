//! Tests for whole-graph validation.
mod common;
use bunki::prelude::*;
use bunki::validator::Reachability;
use common::*;

#[test]
fn test_linear_form_is_clean() {
    let report = validate(&linear_form(4));
    assert!(report.is_clean(), "{:?}", report);
    assert!(validate(&FormGraph::new()).is_clean());
}

#[test]
fn test_submit_branch_leaves_later_question_reachable_by_other_answer() {
    // q1-a1 still falls through to q2.
    let report = validate(&submit_branch_form());
    assert!(report.unreachable_questions.is_empty());
    assert!(report.is_clean());
}

#[test]
fn test_bypassed_question_is_unreachable() {
    let mut graph = submit_branch_form();
    graph.questions[1].answers[1].logic = Some(LogicAction::CloseForm);

    let report = validate(&graph);
    assert_eq!(report.unreachable_questions, vec!["q2".to_string()]);
    assert!(!report.no_terminal_reachable);
    assert!(!report.has_errors());
    assert!(report.has_warnings());
}

#[test]
fn test_jump_target_is_reachable_even_if_skipped_linearly() {
    let mut graph = linear_form(4);
    for answer in &mut graph.questions[0].answers {
        answer.logic = Some(LogicAction::go_to("q2"));
    }

    let report = validate(&graph);
    assert_eq!(report.unreachable_questions, vec!["q1".to_string()]);

    let reachability = Reachability::explore(&graph);
    assert!(reachability.reaches("q3"));
    assert!(!reachability.reaches("q1"));
    assert_eq!(reachability.visited_count(), 3);
}

#[test]
fn test_dangling_targets_are_errors() {
    let mut graph = linear_form(2);
    graph.questions[0].answers[1].logic = Some(LogicAction::submit_to("gone"));

    let report = validate(&graph);
    assert!(report.has_errors());
    assert_eq!(report.dangling_targets.len(), 1);
    assert_eq!(report.dangling_targets[0].answer.answer_id, "q0-a1");
    assert_eq!(
        report.dangling_targets[0].target,
        LogicTarget::EndPage("gone".to_string())
    );
}

#[test]
fn test_cycle_without_exit_is_a_warning() {
    let mut graph = linear_form(2);
    for answer in &mut graph.questions[0].answers {
        answer.logic = Some(LogicAction::go_to("q1"));
    }
    for answer in &mut graph.questions[1].answers {
        answer.logic = Some(LogicAction::go_to("q0"));
    }

    let report = validate(&graph);
    assert!(report.no_terminal_reachable);
    assert!(report.unreachable_questions.is_empty());
    assert!(!report.has_errors());
    assert!(report.has_warnings());
}

#[test]
fn test_cycle_with_exit_has_terminal() {
    let mut graph = linear_form(2);
    graph.questions[1].answers[0].logic = Some(LogicAction::go_to("q0"));
    assert!(!validate(&graph).no_terminal_reachable);
}

#[test]
fn test_missing_start_marks_everything_unreachable() {
    let mut graph = linear_form(2);
    graph.start_question_id = None;

    let report = validate(&graph);
    assert!(report.missing_start);
    assert!(report.no_terminal_reachable);
    assert_eq!(report.unreachable_questions, vec!["q0", "q1"]);

    graph.start_question_id = Some("ghost".to_string());
    assert!(validate(&graph).missing_start);
}

#[test]
fn test_multi_select_logic_and_unanswerable_questions() {
    let mut graph = linear_form(3);
    graph.questions[0].selection = SelectionMode::Multiple;
    graph.questions[0].answers[0].logic = Some(LogicAction::go_to("q2"));
    graph.questions[1].selection = SelectionMode::Multiple;
    graph.questions[2].answers.clear();

    let report = validate(&graph);
    assert_eq!(report.multi_select_logic, vec!["q0".to_string()]);
    assert_eq!(report.unanswerable_questions, vec!["q2".to_string()]);
    assert!(!report.no_terminal_reachable);
}

#[test]
fn test_report_serializes_for_the_authoring_ui() {
    let mut graph = submit_branch_form();
    graph.questions[1].answers[1].logic = Some(LogicAction::CloseForm);

    let json = serde_json::to_value(validate(&graph)).unwrap();
    assert_eq!(json["unreachable_questions"][0], "q2");
    assert_eq!(json["missing_start"], false);
}

#[test]
fn test_saturated_order_reaches_submission() {
    let mut question = Question::new("q0", "Last").with_answers(vec![Answer::new("a0", "Ok")]);
    question.order = usize::MAX;
    let graph = FormGraph {
        questions: vec![question],
        end_pages: vec![],
        start_question_id: Some("q0".to_string()),
    };

    let report = validate(&graph);
    assert!(!report.no_terminal_reachable);
    assert!(report.unreachable_questions.is_empty());
}

#[test]
fn test_start_naming_missing_question_in_empty_form() {
    let graph = FormGraph {
        start_question_id: Some("ghost".to_string()),
        ..FormGraph::default()
    };

    let report = validate(&graph);
    assert!(report.missing_start);
    assert!(report.has_errors());
}
