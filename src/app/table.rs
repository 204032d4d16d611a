use std::cmp::Ordering;

use eframe::egui;
use egui_extras::{Column, TableBuilder};

use crate::upload::Record;

/// Preview of one extraction response: columns come from the first record,
/// rows are pre-rendered to text. Sort and search state live on the table so
/// they survive unrelated UI interactions; a new response replaces the data
/// wholesale.
#[derive(Debug, Default)]
pub struct PreviewTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    sort_column: Option<usize>,
    sort_ascending: bool,
    filter: String,
}

impl PreviewTable {
    pub fn from_records(records: &[Record]) -> Self {
        let columns: Vec<String> = records
            .first()
            .map(|first| first.keys().cloned().collect())
            .unwrap_or_default();

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|key| cell_text(record.get(key)))
                    .collect()
            })
            .collect();

        Self {
            columns,
            rows,
            sort_column: None,
            sort_ascending: true,
            filter: String::new(),
        }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cycle a header click: ascending, then descending, then unsorted.
    pub fn toggle_sort(&mut self, column: usize) {
        if self.sort_column != Some(column) {
            self.sort_column = Some(column);
            self.sort_ascending = true;
        } else if self.sort_ascending {
            self.sort_ascending = false;
        } else {
            self.sort_column = None;
            self.sort_ascending = true;
        }
    }

    /// Row indices after search filtering and sorting, in display order.
    pub fn visible_rows(&self) -> Vec<usize> {
        let needle = self.filter.to_lowercase();
        let mut indices: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                needle.is_empty()
                    || row.iter().any(|cell| cell.to_lowercase().contains(&needle))
            })
            .map(|(i, _)| i)
            .collect();

        if let Some(col) = self.sort_column {
            indices.sort_by(|&a, &b| {
                let ord = compare_cells(&self.rows[a][col], &self.rows[b][col]);
                if self.sort_ascending {
                    ord
                } else {
                    ord.reverse()
                }
            });
        }
        indices
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("🔍");
            ui.add(
                egui::TextEdit::singleline(&mut self.filter)
                    .desired_width(220.0)
                    .hint_text("Search all columns"),
            );
            if !self.filter.is_empty() {
                ui.label(format!(
                    "{} of {} row(s)",
                    self.visible_rows().len(),
                    self.rows.len()
                ));
            }
        });
        ui.add_space(6.0);

        let visible = self.visible_rows();
        let mut clicked_column: Option<usize> = None;

        ui.push_id("preview_table", |ui| {
            egui::ScrollArea::horizontal()
                .id_source("preview_table_h")
                .show(ui, |ui| {
                    let mut table = TableBuilder::new(ui)
                        .striped(true)
                        .resizable(true)
                        .cell_layout(egui::Layout::left_to_right(egui::Align::Center));
                    for _ in &self.columns {
                        table = table.column(Column::auto().at_least(80.0));
                    }

                    table
                        .header(22.0, |mut header| {
                            for (i, name) in self.columns.iter().enumerate() {
                                let arrow = if self.sort_column == Some(i) {
                                    if self.sort_ascending {
                                        " ▲"
                                    } else {
                                        " ▼"
                                    }
                                } else {
                                    ""
                                };
                                header.col(|ui| {
                                    if ui.button(format!("{}{}", name, arrow)).clicked() {
                                        clicked_column = Some(i);
                                    }
                                });
                            }
                        })
                        .body(|body| {
                            body.rows(18.0, visible.len(), |row_index, mut row| {
                                for cell in &self.rows[visible[row_index]] {
                                    row.col(|ui| {
                                        ui.label(cell);
                                    });
                                }
                            });
                        });
                });
        });

        if let Some(column) = clicked_column {
            self.toggle_sort(column);
        }
    }
}

/// Null and missing values render as empty cells, never as a literal "null".
fn cell_text(value: Option<&serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Numeric-aware ordering: two parseable cells compare as numbers, anything
/// else falls back to string order.
fn compare_cells(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(value: serde_json::Value) -> Vec<Record> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().unwrap().clone())
            .collect()
    }

    #[test]
    fn columns_come_from_the_first_record() {
        let table = PreviewTable::from_records(&records(serde_json::json!([
            {"player_name": "Ann", "cp": 120, "sex": "Female"},
            {"player_name": "Bob", "cp": 90, "sex": "Male"},
        ])));
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn missing_and_null_values_render_empty() {
        let table = PreviewTable::from_records(&records(serde_json::json!([
            {"a": 1, "b": null},
            {"a": 2},
        ])));
        assert_eq!(table.rows[0], vec!["1", ""]);
        assert_eq!(table.rows[1], vec!["2", ""]);
    }

    #[test]
    fn zero_and_false_keep_their_text() {
        let table = PreviewTable::from_records(&records(serde_json::json!([
            {"kills": 0, "active": false},
        ])));
        assert_eq!(table.rows[0], vec!["0", "false"]);
    }

    #[test]
    fn keys_absent_from_the_first_record_are_not_columns() {
        let table = PreviewTable::from_records(&records(serde_json::json!([
            {"a": 1},
            {"a": 2, "extra": "ignored"},
        ])));
        assert_eq!(table.column_count(), 1);
    }

    #[test]
    fn empty_response_renders_an_empty_table() {
        let table = PreviewTable::from_records(&[]);
        assert_eq!(table.column_count(), 0);
        assert_eq!(table.row_count(), 0);
        assert!(table.visible_rows().is_empty());
    }

    #[test]
    fn search_filters_across_all_columns() {
        let mut table = PreviewTable::from_records(&records(serde_json::json!([
            {"name": "Ann", "id": "X1"},
            {"name": "Bob", "id": "ANNEX"},
            {"name": "Cid", "id": "Z9"},
        ])));
        table.filter = "ann".to_string();
        assert_eq!(table.visible_rows(), vec![0, 1]);
    }

    #[test]
    fn numeric_columns_sort_numerically() {
        let mut table = PreviewTable::from_records(&records(serde_json::json!([
            {"cp": 9},
            {"cp": 100},
            {"cp": 21},
        ])));
        table.toggle_sort(0);
        assert_eq!(table.visible_rows(), vec![0, 2, 1]);
        table.toggle_sort(0);
        assert_eq!(table.visible_rows(), vec![1, 2, 0]);
        // Third click returns to response order.
        table.toggle_sort(0);
        assert_eq!(table.visible_rows(), vec![0, 1, 2]);
    }
}
