//! Instruction Composer - tells the model the exact JSON shape to emit.
//!
//! The block is assembled in a fixed order:
//! 1. A header requesting one unified JSON object
//! 2. Operator customization text, or a default explanation
//! 3. Lock-override instructions, verbatim
//! 4. A fenced JSON example with one entry per enabled category
//! 5. Optional trailing directives

mod examples;

pub use examples::*;

use serde::{Deserialize, Serialize};
use tracing::warn;
use tracker_model::{Category, TrackerConfig};

use crate::formatter::substitute_user;

const HEADER: &str =
    "At the end of every reply, output the tracker state as a single unified JSON object with exactly this structure:";

const DEFAULT_EXPLANATION: &str = "Replace every bracketed placeholder with details that reflect the story as it stands at the end of your reply, keeping {{user}}'s perspective in mind. Keep all keys exactly as shown.";

/// Optional sentences appended after the JSON example.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TrailingDirectives {
    pub carry_over_unchanged: bool,
    pub json_only: bool,
    pub narrative_first: bool,
}

impl TrailingDirectives {
    fn lines(&self) -> Vec<&'static str> {
        let mut lines = Vec::new();
        if self.carry_over_unchanged {
            lines.push("If a value has not changed, repeat it exactly as it appeared in the previous state.");
        }
        if self.json_only {
            lines.push("Do not add comments or explanations inside the JSON block.");
        }
        if self.narrative_first {
            lines.push("Write the story continuation first and place the JSON block at the very end.");
        }
        lines
    }
}

/// Everything that varies between instruction blocks.
#[derive(Debug, Clone, Default)]
pub struct InstructionRequest<'a> {
    pub categories: &'a [Category],
    /// Replaces the default explanation when set.
    pub customization: Option<&'a str>,
    pub lock_instructions: Option<&'a str>,
    pub display_name: &'a str,
    pub directives: TrailingDirectives,
}

/// Builds the instruction block from the tracker configuration.
pub struct InstructionComposer<'a> {
    config: &'a TrackerConfig,
}

impl<'a> InstructionComposer<'a> {
    pub fn new(config: &'a TrackerConfig) -> Self {
        Self { config }
    }

    /// Assemble the instruction block.
    ///
    /// Categories are emitted in fixed order regardless of the order
    /// requested. Returns `""` when no category is enabled.
    pub fn compose(&self, request: &InstructionRequest<'_>) -> String {
        let categories: Vec<Category> = Category::ALL
            .into_iter()
            .filter(|c| request.categories.contains(c))
            .collect();
        if categories.is_empty() {
            return String::new();
        }

        let mut sections = vec![HEADER.to_string()];

        let explanation = request
            .customization
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(DEFAULT_EXPLANATION);
        sections.push(substitute_user(explanation, request.display_name));

        if let Some(locks) = request.lock_instructions.filter(|text| !text.trim().is_empty()) {
            sections.push(locks.to_string());
        }

        sections.push(format!(
            "```json\n{}\n```",
            self.json_example(&categories, request.display_name)
        ));

        let directives = request.directives.lines();
        if !directives.is_empty() {
            sections.push(directives.join("\n"));
        }

        sections.join("\n\n")
    }

    /// The unified JSON example for the given categories, in the order given.
    ///
    /// Each category block is indented so it nests inside the parent object.
    pub fn json_example(&self, categories: &[Category], display_name: &str) -> String {
        let entries: Vec<String> = categories
            .iter()
            .filter_map(|category| {
                let example = category_example(*category, self.config, display_name);
                match serde_json::to_string_pretty(&example) {
                    Ok(block) => Some(format!("  \"{}\": {}", category.key(), indent_continuation(&block, "  "))),
                    Err(err) => {
                        warn!(%category, error = %err, "could not render category example");
                        None
                    }
                }
            })
            .collect();

        format!("{{\n{}\n}}", entries.join(",\n"))
    }
}

/// Indent every line after the first.
fn indent_continuation(block: &str, indent: &str) -> String {
    let mut lines = block.lines();
    let mut out = lines.next().unwrap_or_default().to_string();
    for line in lines {
        out.push('\n');
        out.push_str(indent);
        out.push_str(line);
    }
    out
}
