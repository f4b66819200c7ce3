use super::graph::FormGraph;
use crate::error::FormConversionError;

/// A trait for custom data models that can be converted into a `FormGraph`.
///
/// Authoring front-ends store forms in their own shape (document records,
/// UI state dumps, templates). Implementing this trait on those structs is the
/// translation layer that lets the engine edit, resolve and validate them.
///
/// # Example
///
/// ```rust,no_run
/// use bunki::prelude::*;
/// use bunki::error::FormConversionError;
///
/// struct StoredStep { key: String, prompt: String, options: Vec<String> }
/// struct StoredForm { steps: Vec<StoredStep> }
///
/// impl IntoFormGraph for StoredForm {
///     fn into_form_graph(self) -> std::result::Result<FormGraph, FormConversionError> {
///         let questions = self
///             .steps
///             .into_iter()
///             .map(|step| {
///                 let answers = step
///                     .options
///                     .iter()
///                     .enumerate()
///                     .map(|(i, label)| Answer::new(format!("{}-{}", step.key, i), label.as_str()))
///                     .collect();
///                 Question::new(step.key, step.prompt).with_answers(answers)
///             })
///             .collect();
///         Ok(FormGraph::from_questions(questions, vec![]))
///     }
/// }
/// ```
pub trait IntoFormGraph {
    /// Consumes the object and converts it into an engine-compatible graph.
    fn into_form_graph(self) -> Result<FormGraph, FormConversionError>;
}

impl IntoFormGraph for FormGraph {
    fn into_form_graph(self) -> Result<FormGraph, FormConversionError> {
        Ok(self)
    }
}
