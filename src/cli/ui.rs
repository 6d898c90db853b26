use crate::core::converter::Snapshot;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Label,
    Result,
    Error,
    Alert,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Label => style(text).bold(),
        StyleType::Result => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Alert => style(text).yellow().bold(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Creates a spinner shown while a conversion is in flight.
pub fn new_spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Shows a blocking notice, the terminal stand-in for an alert dialog.
pub fn alert(message: &str) {
    eprintln!("{}", style_text(&format!("! {message}"), StyleType::Alert));
}

/// Renders the converter state as terminal lines.
pub fn render_snapshot(snapshot: &Snapshot) -> String {
    let mut lines = Vec::new();

    let amount = if snapshot.amount.is_empty() {
        style_text("(enter an amount)", StyleType::Subtle)
    } else {
        snapshot.amount.clone()
    };
    lines.push(format!("{} {}", style_text("Amount:", StyleType::Label), amount));
    if let Some(message) = snapshot.validation_message {
        lines.push(format!("  {}", style_text(message, StyleType::Error)));
    }

    lines.push(format!(
        "{} {} ({})  {} {} ({})",
        style_text("From:", StyleType::Label),
        snapshot.from,
        snapshot.from.name(),
        style_text("To:", StyleType::Label),
        snapshot.to,
        snapshot.to.name(),
    ));

    let button = format!("[ {} ]", snapshot.button_label);
    lines.push(if snapshot.convert_enabled {
        style_text(&button, StyleType::Label)
    } else {
        style_text(&button, StyleType::Subtle)
    });

    if let Some(error) = snapshot.error {
        lines.push(style_text(error, StyleType::Error));
    }
    if snapshot.loading {
        lines.push(style_text(snapshot.button_label, StyleType::Subtle));
    }
    if let Some(result) = &snapshot.result {
        let mut line = style_text(result, StyleType::Result);
        if let Some(date) = snapshot.rate_date {
            line.push_str(&format!(
                " {}",
                style_text(&format!("(rates as of {date})"), StyleType::Subtle)
            ));
        }
        lines.push(line);
    }

    lines.join("\n")
}
