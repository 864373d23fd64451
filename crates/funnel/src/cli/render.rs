//! # Rendering Module
//!
//! Turns [`ViewSnapshot`]s into terminal text or JSON. Nothing here decides what is
//! visible; the snapshot is printed as the engine produced it.
//!
//! ## Table Layout
//!
//! ```text
//! Filters: 1. Role = Admin   2. Application = Diablo
//! Showing 2 of 8 records
//!
//! Name   Role   Application
//! David  Admin  Diablo
//! Joe    Admin  Diablo
//!
//! Options
//!   Name         David, Joe
//! ```
//!
//! Column widths are the widest cell per column, measured with
//! `console::measure_text_width` so styled headers line up with plain rows.

use console::{pad_str, style, Alignment};
use funnelapp::view::ViewSnapshot;
use funnelapp::FilterableField;

/// Gap between table columns.
pub const COLUMN_GAP: &str = "  ";

/// Width of the label column in the options block ("Application" plus padding).
pub const OPTION_LABEL_WIDTH: usize = 13;

pub fn render_view(snapshot: &ViewSnapshot) -> String {
    let mut out = String::new();
    out.push_str(&render_filters(snapshot));
    out.push('\n');
    out.push_str(&format!(
        "Showing {} of {} records\n",
        style(snapshot.visible.len()).bold(),
        snapshot.total
    ));

    if snapshot.visible.is_empty() {
        out.push_str(&format!("\n{}\n", style("No matching records.").dim()));
    } else {
        out.push('\n');
        out.push_str(&render_table(snapshot));
    }

    out.push('\n');
    out.push_str(&render_options(snapshot));
    out
}

fn render_filters(snapshot: &ViewSnapshot) -> String {
    if snapshot.assigned.is_empty() {
        return format!("Filters: {}", style("none").dim());
    }
    let badges: Vec<String> = snapshot
        .assigned
        .iter()
        .map(|filter| {
            let values: Vec<&str> = filter.selected.iter().map(String::as_str).collect();
            format!(
                "{}. {} = {}",
                filter.priority.ordinal(),
                style(filter.field.label()).cyan(),
                values.join(", ")
            )
        })
        .collect();
    format!("Filters: {}", badges.join("   "))
}

fn render_table(snapshot: &ViewSnapshot) -> String {
    let headers: Vec<String> = FilterableField::ALL
        .iter()
        .map(|field| field.label().to_string())
        .collect();
    let rows: Vec<Vec<&str>> = snapshot
        .visible
        .iter()
        .map(|record| {
            FilterableField::ALL
                .iter()
                .map(|field| field.value_of(record))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = (0..headers.len())
        .map(|col| {
            rows.iter()
                .map(|row| console::measure_text_width(row[col]))
                .chain(std::iter::once(console::measure_text_width(&headers[col])))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header_cells: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(header, &width)| style(pad_str(header, width, Alignment::Left, None)).bold().to_string())
        .collect();
    out.push_str(header_cells.join(COLUMN_GAP).trim_end());
    out.push('\n');

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| pad_str(cell, width, Alignment::Left, None).into_owned())
            .collect();
        out.push_str(cells.join(COLUMN_GAP).trim_end());
        out.push('\n');
    }
    out
}

fn render_options(snapshot: &ViewSnapshot) -> String {
    let mut out = format!("{}\n", style("Options").bold());
    for entry in &snapshot.options {
        let label = pad_str(entry.field.label(), OPTION_LABEL_WIDTH, Alignment::Left, None);
        let values = if entry.values.is_empty() {
            style("(none)").dim().to_string()
        } else {
            entry.values.join(", ")
        };
        out.push_str(&format!("  {}{}\n", label, values));
    }
    out
}

/// One value per line, for `funnel options`.
pub fn render_values(values: &[String]) -> String {
    let mut out = String::new();
    for value in values {
        out.push_str(value);
        out.push('\n');
    }
    out
}

pub fn render_json(snapshot: &ViewSnapshot, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(snapshot)
    } else {
        serde_json::to_string(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use funnelapp::store::RecordStore;
    use funnelapp::{FilterEngine, Record};

    fn engine() -> FilterEngine {
        FilterEngine::new(RecordStore::new(vec![
            Record::new("David", "Admin", "Diablo"),
            Record::new("Joe", "Admin", "Frogger"),
            Record::new("Kevin", "User", "Diablo"),
        ]))
    }

    fn plain(text: &str) -> String {
        console::strip_ansi_codes(text).into_owned()
    }

    #[test]
    fn test_unfiltered_view_lists_everything() {
        let out = plain(&render_view(&engine().snapshot()));
        assert!(out.starts_with("Filters: none\n"));
        assert!(out.contains("Showing 3 of 3 records"));
        assert!(out.contains("Name   Role   Application\n"));
        assert!(out.contains("Kevin  User   Diablo\n"));
        assert!(out.contains("  Role         Admin, User\n"));
    }

    #[test]
    fn test_badges_follow_priority_order() {
        let mut engine = engine();
        engine
            .update_selection(FilterableField::ApplicationCode, ["Diablo"])
            .unwrap();
        engine.update_selection(FilterableField::Role, ["Admin"]).unwrap();

        let out = plain(&render_view(&engine.snapshot()));
        assert!(out.starts_with("Filters: 1. Application = Diablo   2. Role = Admin\n"));
        assert!(out.contains("Showing 1 of 3 records"));
        assert!(out.contains("David  Admin  Diablo\n"));
        assert!(!out.contains("Kevin  User"));
    }

    #[test]
    fn test_empty_view_says_so() {
        let mut engine = engine();
        engine.update_selection(FilterableField::Role, ["User"]).unwrap();
        engine
            .update_selection(FilterableField::ApplicationCode, ["Diablo"])
            .unwrap();
        engine.update_selection(FilterableField::Name, ["Kevin"]).unwrap();
        engine.update_selection(FilterableField::Role, ["Admin"]).unwrap();

        let out = plain(&render_view(&engine.snapshot()));
        assert!(out.contains("Showing 0 of 3 records"));
        assert!(out.contains("No matching records."));
    }

    #[test]
    fn test_json_is_a_snapshot() {
        let mut engine = engine();
        engine.update_selection(FilterableField::Role, ["User"]).unwrap();
        let json = render_json(&engine.snapshot(), false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["level"], 1);
        assert_eq!(value["total"], 3);
        assert_eq!(value["assigned"][0]["field"], "role");
        assert_eq!(value["assigned"][0]["priority"], "primary");
        assert_eq!(value["visible"][0]["applicationCode"], "Diablo");
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_values_one_per_line() {
        let values = vec!["Admin".to_string(), "User".to_string()];
        assert_eq!(render_values(&values), "Admin\nUser\n");
        assert_eq!(render_values(&[]), "");
    }
}
