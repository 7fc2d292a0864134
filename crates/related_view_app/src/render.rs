use related_view_core::{ColumnSpec, ColumnType, DisplayRow, LoadState, RelatedViewModel};
use related_view_engine::{Toast, ToastSeverity, ToastSink};

/// Renders the view model as plain text lines for the terminal.
pub fn render(view: &RelatedViewModel) -> Vec<String> {
    let parent = view
        .parent_key
        .as_ref()
        .map(|key| key.to_string())
        .unwrap_or_else(|| "-".to_string());
    let status = match &view.load_state {
        LoadState::Idle => "idle".to_string(),
        LoadState::Loading => "loading".to_string(),
        LoadState::Loaded => "loaded".to_string(),
        LoadState::Failed(err) => format!("failed: {err}"),
    };

    let mut lines = vec![format!(
        "Parent: {parent} | Opportunities: {count} | {status}",
        count = view.number_of_rows
    )];

    if !view.has_rows {
        lines.push("No related opportunities.".to_string());
        return lines;
    }

    let header: Vec<String> = view.columns.iter().map(|c| c.label.to_string()).collect();
    let body: Vec<Vec<String>> = view
        .rows
        .iter()
        .map(|row| view.columns.iter().map(|c| cell(c, row)).collect())
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for cells in &body {
        for (width, text) in widths.iter_mut().zip(cells) {
            *width = (*width).max(text.chars().count());
        }
    }

    lines.push(format_line(&header, &widths));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for cells in &body {
        lines.push(format_line(cells, &widths));
    }
    lines
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(text, &width)| format!("{text:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

fn cell(column: &ColumnSpec, row: &DisplayRow) -> String {
    let text = match column.field {
        "link_url" => row.link_url.clone(),
        "amount" => row.amount.map(format_currency).unwrap_or_default(),
        "stage_name" => row.stage_name.clone(),
        "close_date" => row.close_date.clone().unwrap_or_default(),
        "main_competitors" => row.main_competitors.clone().unwrap_or_default(),
        "probability_label" => row.probability_label.clone(),
        _ => String::new(),
    };
    match (column.column_type, column.type_attributes.label_field) {
        (ColumnType::Url, Some("name")) => format!("{} <{}>", row.name, text),
        _ => text,
    }
}

fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 { "-" } else { "" };
    format!(
        "{sign}${}.{:02}",
        format_with_commas(cents / 100),
        cents % 100
    )
}

fn format_with_commas(value: u64) -> String {
    let mut out = String::new();
    for (i, ch) in value.to_string().chars().rev().enumerate() {
        if i != 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}

/// Shows error toasts on stderr so they don't interleave with the table.
pub struct TerminalToasts;

impl ToastSink for TerminalToasts {
    fn show_toast(&self, toast: Toast) {
        let tag = match toast.severity {
            ToastSeverity::Info => "INFO",
            ToastSeverity::Success => "OK",
            ToastSeverity::Warning => "WARN",
            ToastSeverity::Error => "ERROR",
        };
        eprintln!("[{tag}] {}: {}", toast.title, toast.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use related_view_core::{project, ParentKey, RawRecord, RecordId, COLUMNS};

    fn view_with(records: &[RawRecord]) -> RelatedViewModel {
        let rows = project(records);
        RelatedViewModel {
            parent_key: Some(ParentKey::from("P1")),
            load_state: LoadState::Loaded,
            columns: COLUMNS,
            number_of_rows: rows.len(),
            has_rows: !rows.is_empty(),
            rows,
            ..RelatedViewModel::default()
        }
    }

    #[test]
    fn empty_view_skips_table() {
        let lines = render(&view_with(&[]));
        assert_eq!(
            lines,
            vec![
                "Parent: P1 | Opportunities: 0 | loaded".to_string(),
                "No related opportunities.".to_string(),
            ]
        );
    }

    #[test]
    fn rows_render_under_column_labels() {
        let lines = render(&view_with(&[RawRecord {
            id: RecordId::from("R1"),
            name: "Alpha".to_string(),
            amount: Some(1234567.5),
            stage_name: "Open".to_string(),
            close_date: Some("2026-01-31".to_string()),
            main_competitors: None,
            probability: Some(0.5),
        }]));

        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("Opportunity Name"));
        assert!(lines[3].contains("Alpha </lightning/r/Opportunity/R1/view>"));
        assert!(lines[3].contains("$1,234,567.50"));
        assert!(lines[3].ends_with("0.5%"));
    }

    #[test]
    fn currency_formatting() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(1000.0), "$1,000.00");
        assert_eq!(format_currency(-12.5), "-$12.50");
    }
}
