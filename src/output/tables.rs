use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use crate::providers::gitlab::JobAction;

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

/// Colors a job or bridge status the way the GitLab UI does.
pub fn status_cell(status: &str) -> Cell {
    let color = match status {
        "success" => TableColor::Green,
        "failed" => TableColor::Red,
        "running" | "pending" => TableColor::Blue,
        "manual" => TableColor::Magenta,
        "canceled" | "skipped" => TableColor::DarkGrey,
        _ => TableColor::Yellow,
    };
    Cell::new(status).fg(color)
}

pub fn actions_cell(status: &str) -> Cell {
    let actions: Vec<&str> = JobAction::available_for(status)
        .into_iter()
        .map(JobAction::as_str)
        .collect();
    if actions.is_empty() {
        Cell::new("-").fg(TableColor::DarkGrey)
    } else {
        Cell::new(actions.join(", "))
    }
}
