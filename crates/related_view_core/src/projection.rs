use crate::{DisplayRow, RawRecord, RelevanceTracker};

/// Route of a record's detail page; `{id}` is replaced by the record id.
pub const RECORD_ROUTE: &str = "/lightning/r/Opportunity/{id}/view";

/// Pure, order-preserving mapping from backend records to table rows.
pub fn project(records: &[RawRecord]) -> Vec<DisplayRow> {
    records.iter().map(project_one).collect()
}

pub fn link_url(id: &str) -> String {
    RECORD_ROUTE.replace("{id}", id)
}

/// Backend ratio rendered as-is with a `%` suffix; a missing value renders empty.
pub fn probability_label(probability: Option<f64>) -> String {
    match probability {
        Some(value) => format!("{value}%"),
        None => String::new(),
    }
}

fn project_one(record: &RawRecord) -> DisplayRow {
    DisplayRow {
        name: record.name.clone(),
        link_url: link_url(record.id.as_str()),
        amount: record.amount,
        stage_name: record.stage_name.clone(),
        close_date: record.close_date.clone(),
        main_competitors: record.main_competitors.clone(),
        probability_label: probability_label(record.probability),
    }
}

/// Applies a successful fetch: builds the rows and swaps the relevance set.
#[derive(Debug, Default, Clone, Copy)]
pub struct ViewProjector;

impl ViewProjector {
    pub fn apply(
        &self,
        records: &[RawRecord],
        relevance: &mut RelevanceTracker,
    ) -> Vec<DisplayRow> {
        let rows = project(records);
        relevance.replace_all(records.iter().map(|record| record.id.clone()));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_keeps_backend_precision() {
        assert_eq!(probability_label(Some(0.5)), "0.5%");
        assert_eq!(probability_label(Some(50.0)), "50%");
        assert_eq!(probability_label(Some(12.75)), "12.75%");
        assert_eq!(probability_label(None), "");
    }

    #[test]
    fn link_url_fills_route() {
        assert_eq!(link_url("006xx"), "/lightning/r/Opportunity/006xx/view");
    }
}
