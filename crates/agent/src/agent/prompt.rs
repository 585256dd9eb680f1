//! Agent instructions and per-query prompt construction.

use askama::Template;

/// Instructions template for the order agent.
#[derive(Template)]
#[template(path = "agent/instructions.txt")]
struct InstructionsTemplate;

/// Render the agent instructions.
pub fn render_instructions() -> String {
    // Static template with no variables.
    InstructionsTemplate.render().unwrap_or_else(|_| {
        String::from("You are a helpful assistant that answers questions about Printavo orders.")
    })
}

/// Append the caller's filter preferences to the query.
#[must_use]
pub fn augment_query(query: &str, exclude_completed: bool, exclude_quotes: bool) -> String {
    format!(
        "{query}\n\nContext: The user wants to {} completed orders and {} quotes.",
        verb(exclude_completed),
        verb(exclude_quotes),
    )
}

const fn verb(exclude: bool) -> &'static str {
    if exclude { "exclude" } else { "include" }
}
