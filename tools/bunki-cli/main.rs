use bunki::prelude::*;
use bunki::visualizer::{to_dot, visualize_graph};
use clap::{ArgAction, Parser, Subcommand};
use serde::Deserialize;
use std::fs;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

// --- JSON Deserialization Structs (Input Format Specific) ---
// These structs match the authoring UI's export format and are only used here for conversion.

#[derive(Deserialize)]
struct RawForm {
    questions: Vec<RawQuestion>,
    #[serde(default, alias = "endPages")]
    end_pages: Vec<RawEndPage>,
    #[serde(default, alias = "startQuestionId")]
    start_question_id: Option<String>,
}

#[derive(Deserialize)]
struct RawQuestion {
    id: String,
    #[serde(default)]
    order: usize,
    #[serde(default, alias = "title")]
    label: String,
    #[serde(default, alias = "answerType")]
    answer_type: Option<String>,
    #[serde(default)]
    answers: Vec<RawAnswer>,
}

#[derive(Deserialize)]
struct RawAnswer {
    id: String,
    #[serde(default)]
    order: usize,
    #[serde(default)]
    label: String,
    #[serde(default)]
    logic: Option<RawLogic>,
}

#[derive(Deserialize)]
struct RawLogic {
    action: String,
    #[serde(default, alias = "targetQuestionId")]
    target_question_id: Option<String>,
    #[serde(default, alias = "targetEndPageId")]
    target_end_page_id: Option<String>,
}

#[derive(Deserialize)]
struct RawEndPage {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    content: Option<String>,
}

// --- Converter Implementation ---
// This implements the conversion from the raw export to Bunki's canonical FormGraph.

impl IntoFormGraph for RawForm {
    fn into_form_graph(self) -> std::result::Result<FormGraph, FormConversionError> {
        let questions = self
            .questions
            .into_iter()
            .map(|raw| -> std::result::Result<Question, FormConversionError> {
                let selection = match raw.answer_type.as_deref() {
                    Some("multi" | "multiple" | "checkbox") => SelectionMode::Multiple,
                    _ => SelectionMode::Single,
                };
                let answers = raw
                    .answers
                    .into_iter()
                    .map(|a| -> std::result::Result<Answer, FormConversionError> {
                        let logic = a.logic.map(|l| convert_logic(&a.id, l)).transpose()?;
                        Ok(Answer {
                            id: a.id,
                            label: a.label,
                            order: a.order,
                            logic,
                        })
                    })
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(Question {
                    id: raw.id,
                    order: raw.order,
                    label: raw.label,
                    selection,
                    answers,
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let end_pages = self
            .end_pages
            .into_iter()
            .map(|p| EndPage {
                id: p.id,
                name: p.name,
                content: p.content,
            })
            .collect();

        Ok(FormGraph {
            questions,
            end_pages,
            start_question_id: self.start_question_id,
        })
    }
}

fn convert_logic(
    answer_id: &str,
    raw: RawLogic,
) -> std::result::Result<LogicAction, FormConversionError> {
    let missing = |field: &str| {
        FormConversionError::ValidationError(format!(
            "Answer '{}' has '{}' logic without a {}",
            answer_id, raw.action, field
        ))
    };
    match raw.action.as_str() {
        "goto" | "go_to_question" | "goToQuestion" => raw
            .target_question_id
            .clone()
            .map(LogicAction::go_to)
            .ok_or_else(|| missing("target question")),
        "submit" | "submit_form" | "submitForm" => raw
            .target_end_page_id
            .clone()
            .map(LogicAction::submit_to)
            .ok_or_else(|| missing("target end page")),
        "close" | "close_form" | "closeForm" => Ok(LogicAction::CloseForm),
        other => Err(FormConversionError::ValidationError(format!(
            "Answer '{}' has unknown logic action '{}'",
            answer_id, other
        ))),
    }
}

/// Inspect, validate and walk branching form graphs
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the form JSON file (or a bincode snapshot with --snapshot)
    form_path: String,

    /// Read the input as a binary snapshot written by `export`
    #[arg(long, global = true)]
    snapshot: bool,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the structural invariants of the graph as stored
    Check,
    /// Run the full validation report on the graph as stored
    Validate {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Follow a scripted respondent through the form
    Walk {
        /// Answer ids to choose, one per visited question
        choices: Vec<String>,
        /// Maximum number of answers to follow
        #[arg(long, default_value_t = bunki::resolver::DEFAULT_STEP_LIMIT)]
        step_limit: usize,
    },
    /// Print a readable listing of questions and routes
    Describe,
    /// Print the graph in Graphviz DOT format
    Dot,
    /// Write the graph as a binary snapshot
    Export {
        /// Output path for the snapshot
        #[arg(short, long, default_value = "form.snapshot")]
        output: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let load_start = Instant::now();
    let mut graph = load_graph(&cli.form_path, cli.snapshot);
    tracing::info!(
        questions = graph.questions.len(),
        end_pages = graph.end_pages.len(),
        elapsed = ?load_start.elapsed(),
        "Loaded form graph"
    );
    if needs_normalized(&cli.command) {
        graph = FormEditor::new(graph).into_graph();
    }

    match cli.command {
        Command::Check => run_check(&graph),
        Command::Validate { json } => run_validate(&graph, json),
        Command::Walk {
            choices,
            step_limit,
        } => run_walk(&graph, &choices, step_limit),
        Command::Describe => print!("{}", visualize_graph(&graph)),
        Command::Dot => print!("{}", to_dot(&graph)),
        Command::Export { output } => {
            FormSnapshot::new(graph, 0)
                .save(&output)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to write snapshot: {}", e)));
            println!("Snapshot written to '{}'", output);
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_graph(path: &str, snapshot: bool) -> FormGraph {
    if snapshot {
        return FormSnapshot::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load snapshot: {}", e)))
            .graph;
    }

    let json = fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read form file '{}': {}", path, e)));
    let raw: RawForm = serde_json::from_str(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse form JSON: {}", e)));
    raw.into_form_graph()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to convert form: {}", e)))
}

/// Whether the command works on the graph as the authoring tool would load it.
/// `check` and `validate` inspect the stored orders and start unchanged.
fn needs_normalized(command: &Command) -> bool {
    !matches!(command, Command::Check | Command::Validate { .. })
}

fn run_check(graph: &FormGraph) {
    match graph.check_well_formed() {
        Ok(()) => println!("Graph is well-formed."),
        Err(violations) => {
            println!("Found {} invariant violation(s):", violations.len());
            for violation in &violations {
                println!("  - {}", violation);
            }
            std::process::exit(2);
        }
    }
}

fn run_validate(graph: &FormGraph, json: bool) {
    let report = validate(graph);
    if json {
        let out = serde_json::to_string_pretty(&report)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to encode report: {}", e)));
        println!("{}", out);
    } else {
        print_report(&report);
    }
    if report.has_errors() {
        std::process::exit(2);
    }
}

fn print_report(report: &ValidationReport) {
    if report.is_clean() {
        println!("No findings.");
        return;
    }
    if report.missing_start {
        println!("[error] The form has no valid start question");
    }
    for dangling in &report.dangling_targets {
        println!(
            "[error] Answer '{}' on question '{}' routes to missing {}",
            dangling.answer.answer_id, dangling.answer.question_id, dangling.target
        );
    }
    for id in &report.unreachable_questions {
        println!("[warn] Question '{}' is unreachable", id);
    }
    if report.no_terminal_reachable {
        println!("[warn] No path from the start question ends the form");
    }
    for id in &report.multi_select_logic {
        println!("[warn] Multi-select question '{}' carries answer logic", id);
    }
    for id in &report.unanswerable_questions {
        println!("[warn] Question '{}' has no answers", id);
    }
}

fn run_walk(graph: &FormGraph, choices: &[String], step_limit: usize) {
    let navigator = Navigator::new(graph).with_step_limit(step_limit);
    let path = navigator
        .walk(choices)
        .unwrap_or_else(|e| exit_with_error(&format!("Walk failed: {}", e)));

    println!("{}", PathFormatter::format_path(&path, graph));
    println!("\nRoute: {}", PathFormatter::format_route(&path));
    if choices.len() > path.steps.len() && path.outcome != PathOutcome::StepLimitReached {
        println!(
            "Note: {} choice(s) left unused after the form ended",
            choices.len() - path.steps.len()
        );
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
