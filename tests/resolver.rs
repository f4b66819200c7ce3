//! Tests for fill-time navigation.
mod common;
use bunki::error::ResolutionError;
use bunki::prelude::*;
use common::*;

#[test]
fn test_default_resolution_moves_to_next_order() {
    let graph = linear_form(5);
    let step = resolve_next(&graph, "q2", "q2-a0").unwrap();
    assert_eq!(step, NavigationStep::ToQuestion("q3".to_string()));
}

#[test]
fn test_last_question_submits_implicitly() {
    let graph = linear_form(5);
    let step = resolve_next(&graph, "q4", "q4-a1").unwrap();
    assert_eq!(step, NavigationStep::Submitted);
    assert!(step.is_terminal());
}

#[test]
fn test_submit_logic_bypasses_remaining_questions() {
    let graph = submit_branch_form();
    let step = resolve_next(&graph, "q1", "q1-a0").unwrap();
    assert_eq!(step, NavigationStep::ToEndPage("e0".to_string()));

    // The other answer still falls through to Q2.
    let step = resolve_next(&graph, "q1", "q1-a1").unwrap();
    assert_eq!(step, NavigationStep::ToQuestion("q2".to_string()));
}

#[test]
fn test_go_to_and_close_logic() {
    let mut graph = linear_form(4);
    graph.questions[3].answers[0].logic = Some(LogicAction::go_to("q1"));
    graph.questions[0].answers[1].logic = Some(LogicAction::CloseForm);

    let navigator = Navigator::new(&graph);
    assert_eq!(
        navigator.resolve_next("q3", "q3-a0").unwrap(),
        NavigationStep::ToQuestion("q1".to_string())
    );
    assert_eq!(
        navigator.resolve_next("q0", "q0-a1").unwrap(),
        NavigationStep::Closed
    );
}

#[test]
fn test_unknown_question_and_answer_are_errors() {
    let graph = linear_form(2);
    assert_eq!(
        resolve_next(&graph, "nope", "q0-a0"),
        Err(ResolutionError::QuestionNotFound("nope".to_string()))
    );
    assert_eq!(
        resolve_next(&graph, "q0", "q1-a0"),
        Err(ResolutionError::AnswerNotFound {
            question_id: "q0".to_string(),
            answer_id: "q1-a0".to_string(),
        })
    );
}

#[test]
fn test_dangling_target_is_reported_not_panicked() {
    let mut graph = linear_form(2);
    graph.questions[0].answers[0].logic = Some(LogicAction::submit_to("gone"));

    let err = resolve_next(&graph, "q0", "q0-a0").unwrap_err();
    assert_eq!(
        err,
        ResolutionError::DanglingTarget {
            answer_id: "q0-a0".to_string(),
            target: LogicTarget::EndPage("gone".to_string()),
        }
    );
    assert!(err.to_string().contains("gone"));
}

#[test]
fn test_start_step() {
    let graph = linear_form(3);
    assert_eq!(
        Navigator::new(&graph).start().unwrap(),
        NavigationStep::ToQuestion("q0".to_string())
    );

    assert_eq!(
        Navigator::new(&FormGraph::new()).start().unwrap(),
        NavigationStep::Submitted
    );

    let mut no_start = linear_form(1);
    no_start.start_question_id = None;
    assert_eq!(
        Navigator::new(&no_start).start(),
        Err(ResolutionError::NoStartQuestion)
    );
}

#[test]
fn test_walk_finishes_on_end_page() {
    let graph = submit_branch_form();
    let path = Navigator::new(&graph).walk(&["q0-a1", "q1-a0"]).unwrap();

    assert_eq!(path.steps.len(), 2);
    assert_eq!(path.visited_questions(), vec!["q0", "q1"]);
    assert_eq!(
        path.outcome,
        PathOutcome::Finished(NavigationStep::ToEndPage("e0".to_string()))
    );
}

#[test]
fn test_walk_awaits_answer_when_choices_run_out() {
    let graph = linear_form(3);
    let path = Navigator::new(&graph).walk(&["q0-a0"]).unwrap();
    assert_eq!(path.outcome, PathOutcome::AwaitingAnswer("q1".to_string()));
    assert_eq!(path.visited_questions(), vec!["q0", "q1"]);
}

#[test]
fn test_walk_stops_at_step_limit_on_cycles() {
    let mut graph = linear_form(2);
    graph.questions[1].answers[0].logic = Some(LogicAction::go_to("q0"));

    let choices: Vec<&str> = ["q0-a0", "q1-a0"].iter().copied().cycle().take(50).collect();
    let path = Navigator::new(&graph)
        .with_step_limit(10)
        .walk(&choices)
        .unwrap();
    assert_eq!(path.steps.len(), 10);
    assert_eq!(path.outcome, PathOutcome::StepLimitReached);
}

#[test]
fn test_walk_propagates_resolution_errors() {
    let graph = linear_form(2);
    let err = Navigator::new(&graph).walk(&["q0-a0", "bogus"]).unwrap_err();
    assert!(matches!(err, ResolutionError::AnswerNotFound { .. }));
}

#[test]
fn test_path_formatter_output() {
    let graph = submit_branch_form();
    let path = Navigator::new(&graph).walk(&["q0-a0", "q1-a0"]).unwrap();

    let text = PathFormatter::format_path(&path, &graph);
    assert!(text.contains("[1] Question 0 -> \"Yes\" => question 'q1'"));
    assert!(text.contains("[2] Question 1 -> \"Yes\" => end page 'e0' (Qualified lead)"));
    assert!(text.ends_with("Outcome: end page 'e0' (Qualified lead)"));

    assert_eq!(PathFormatter::format_route(&path), "q0 > q1 > e0");
}

#[test]
fn test_saturated_order_submits_instead_of_overflowing() {
    let mut question = Question::new("q0", "Last").with_answers(vec![Answer::new("a0", "Ok")]);
    question.order = usize::MAX;
    let graph = FormGraph {
        questions: vec![question],
        end_pages: vec![],
        start_question_id: Some("q0".to_string()),
    };

    assert_eq!(resolve_next(&graph, "q0", "a0"), Ok(NavigationStep::Submitted));
}
