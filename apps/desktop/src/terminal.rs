//! Terminal rendering of the page and its blocking dialogs.

use std::io::{self, BufRead, Write};

use client_core::{FormState, ListItem, ListPatch, Prompt};

pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn alert(&self, message: &str) {
        println!("[!] {message}");
    }

    fn confirm(&self, message: &str) -> bool {
        print!("{message} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(err) => {
                tracing::warn!("failed to read confirmation: {err}");
                false
            }
        }
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

pub fn render_items(items: &[ListItem]) -> String {
    if items.is_empty() {
        return "  (empty)".to_string();
    }
    items
        .iter()
        .map(|item| match item {
            ListItem::Hotel(hotel) => format!("  [{}] {}", hotel.delete.0, hotel.label),
            ListItem::Placeholder(text) => format!("  {text}"),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_patch(patch: &ListPatch) -> String {
    match patch {
        ListPatch::Replace(items) => format!("hotels:\n{}", render_items(items)),
        ListPatch::Remove { element_id } => format!("removed {element_id}"),
    }
}

pub fn render_form(form: &FormState) -> String {
    format!(
        "form: name='{}' local_code='{}' city='{}'",
        form.name, form.local_code, form.city
    )
}
