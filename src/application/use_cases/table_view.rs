//! Server-side paging, sorting and filtering for the raw records table.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::domain::mission::MissionDataset;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SortSpec {
    pub column: String,
    #[serde(default)]
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ColumnFilter {
    pub column: String,
    pub expression: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TableRequest {
    /// Zero-based page index.
    pub page: usize,
    pub page_size: Option<usize>,
    pub sort_by: Vec<SortSpec>,
    pub filters: Vec<ColumnFilter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TablePage {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub page: usize,
    pub page_size: usize,
    pub total_rows: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Contains,
}

#[derive(Debug, Clone, PartialEq)]
struct CellFilter {
    column: usize,
    op: FilterOp,
    operand: String,
}

impl CellFilter {
    /// `None` when the expression carries no operand.
    fn parse(column: usize, expression: &str) -> Option<Self> {
        let expression = expression.trim();
        let (op, operand) = [
            (">=", FilterOp::Ge),
            ("<=", FilterOp::Le),
            ("!=", FilterOp::Ne),
            (">", FilterOp::Gt),
            ("<", FilterOp::Lt),
            ("=", FilterOp::Eq),
            ("contains ", FilterOp::Contains),
        ]
        .iter()
        .find_map(|(prefix, op)| expression.strip_prefix(prefix).map(|rest| (*op, rest)))
        .unwrap_or((FilterOp::Contains, expression));

        let operand = operand.trim();
        if operand.is_empty() {
            return None;
        }

        Some(Self {
            column,
            op,
            operand: operand.to_string(),
        })
    }

    fn matches(&self, cells: &[String]) -> bool {
        let cell = cells[self.column].as_str();
        if cell.is_empty() {
            return self.op == FilterOp::Ne;
        }

        let ordering = compare_values(cell, &self.operand);
        match self.op {
            FilterOp::Contains => cell.contains(self.operand.as_str()),
            FilterOp::Eq => ordering == Ordering::Equal,
            FilterOp::Ne => ordering != Ordering::Equal,
            FilterOp::Gt => ordering == Ordering::Greater,
            FilterOp::Ge => ordering != Ordering::Less,
            FilterOp::Lt => ordering == Ordering::Less,
            FilterOp::Le => ordering != Ordering::Greater,
        }
    }
}

fn as_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok()
}

/// Numeric when both sides parse as numbers, lexicographic otherwise.
fn compare_values(a: &str, b: &str) -> Ordering {
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => a.cmp(b),
    }
}

/// Sort order: empty cells, then numbers, then text. Total over any mix of cells.
fn compare_cells(a: &str, b: &str) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }

    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

#[derive(Debug, Clone)]
pub struct TableView {
    visible: Vec<usize>,
    columns: Vec<String>,
    default_page_size: usize,
    max_page_size: usize,
}

impl TableView {
    pub fn new(
        dataset: &MissionDataset,
        hidden_columns: &[String],
        default_page_size: usize,
        max_page_size: usize,
    ) -> Self {
        let visible: Vec<usize> = dataset
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, name)| !hidden_columns.contains(name))
            .map(|(index, _)| index)
            .collect();
        let columns = visible
            .iter()
            .map(|&index| dataset.columns()[index].clone())
            .collect();

        let max_page_size = max_page_size.max(1);
        Self {
            visible,
            columns,
            default_page_size: default_page_size.clamp(1, max_page_size),
            max_page_size,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn default_page_size(&self) -> usize {
        self.default_page_size
    }

    /// Dataset column index of a visible column.
    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column == name)
            .map(|position| self.visible[position])
    }

    pub fn page(&self, dataset: &MissionDataset, request: &TableRequest) -> TablePage {
        let filters: Vec<CellFilter> = request
            .filters
            .iter()
            .filter_map(|filter| {
                let column = self.column_index(&filter.column)?;
                CellFilter::parse(column, &filter.expression)
            })
            .collect();

        let sort_keys: Vec<(usize, SortDirection)> = request
            .sort_by
            .iter()
            .filter_map(|spec| Some((self.column_index(&spec.column)?, spec.direction)))
            .collect();

        let mut rows: Vec<&[String]> = dataset
            .records()
            .iter()
            .map(|record| record.cells.as_slice())
            .filter(|cells| filters.iter().all(|filter| filter.matches(cells)))
            .collect();

        if !sort_keys.is_empty() {
            rows.sort_by(|a, b| {
                sort_keys
                    .iter()
                    .map(|&(column, direction)| {
                        let ordering = compare_cells(&a[column], &b[column]);
                        match direction {
                            SortDirection::Asc => ordering,
                            SortDirection::Desc => ordering.reverse(),
                        }
                    })
                    .find(|ordering| *ordering != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
        }

        let page_size = request
            .page_size
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size);
        let total_rows = rows.len();
        let total_pages = total_rows.div_ceil(page_size);

        let rows = rows
            .into_iter()
            .skip(request.page.saturating_mul(page_size))
            .take(page_size)
            .map(|cells| self.visible.iter().map(|&i| cells[i].clone()).collect())
            .collect();

        TablePage {
            columns: self.columns.clone(),
            rows,
            page: request.page,
            page_size,
            total_rows,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::sample_dataset;
    use pretty_assertions::assert_eq;

    fn view(dataset: &MissionDataset) -> TableView {
        TableView::new(dataset, &["Additional information".to_string()], 10, 100)
    }

    fn filter(column: &str, expression: &str) -> ColumnFilter {
        ColumnFilter {
            column: column.to_string(),
            expression: expression.to_string(),
        }
    }

    #[test]
    fn test_hidden_column_is_omitted() {
        let dataset = sample_dataset();
        let page = view(&dataset).page(&dataset, &TableRequest::default());

        assert_eq!(
            page.columns,
            vec![
                "Mission",
                "Spacecraft",
                "Launch Date",
                "Carrier Rocket",
                "Operator",
                "Mission Type",
                "Outcome",
            ]
        );
        assert!(page.rows.iter().all(|row| row.len() == 7));
        assert_eq!(page.rows.len(), 10);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_sort_descending_by_date_puts_missing_last() {
        let dataset = sample_dataset();
        let request = TableRequest {
            sort_by: vec![SortSpec {
                column: "Launch Date".to_string(),
                direction: SortDirection::Desc,
            }],
            ..Default::default()
        };

        let page = view(&dataset).page(&dataset, &request);

        assert_eq!(page.rows[0][2], "1972-11-23");
        assert_eq!(page.rows[9][0], "Hiten-B");
    }

    #[test]
    fn test_multi_column_sort_is_stable() {
        let dataset = sample_dataset();
        let request = TableRequest {
            sort_by: vec![
                SortSpec {
                    column: "Operator".to_string(),
                    direction: SortDirection::Asc,
                },
                SortSpec {
                    column: "Mission".to_string(),
                    direction: SortDirection::Desc,
                },
            ],
            ..Default::default()
        };

        let page = view(&dataset).page(&dataset, &request);
        let missions: Vec<&str> = page.rows.iter().map(|row| row[0].as_str()).collect();

        assert_eq!(
            missions,
            vec![
                "Hiten-B",
                "Soyuz 7K-L3",
                "Luna 9",
                "Luna 18",
                "Luna 17",
                "Luna 16",
                "Luna 15",
                "Surveyor 1",
                "Apollo 13",
                "Apollo 11",
            ]
        );
    }

    #[test]
    fn test_contains_filter() {
        let dataset = sample_dataset();
        let request = TableRequest {
            filters: vec![filter("Operator", "contains Soviet")],
            ..Default::default()
        };
        assert_eq!(view(&dataset).page(&dataset, &request).total_rows, 6);

        let bare = TableRequest {
            filters: vec![filter("Operator", "Soviet")],
            ..Default::default()
        };
        assert_eq!(view(&dataset).page(&dataset, &bare).total_rows, 6);
    }

    #[test]
    fn test_comparison_filters() {
        let dataset = sample_dataset();
        let view = view(&dataset);

        let since_1970 = TableRequest {
            filters: vec![filter("Launch Date", ">= 1970-01-01")],
            ..Default::default()
        };
        assert_eq!(view.page(&dataset, &since_1970).total_rows, 5);

        let exact = TableRequest {
            filters: vec![
                filter("Outcome", "= Launch failure"),
                filter("Mission Type", "!= Orbiter"),
            ],
            ..Default::default()
        };
        let page = view.page(&dataset, &exact);
        assert_eq!(page.total_rows, 1);
        assert_eq!(page.rows[0][0], "Soyuz 7K-L3");
    }

    #[test]
    fn test_numeric_comparison() {
        assert_eq!(compare_values("9", "10"), Ordering::Less);
        assert_eq!(compare_values("Luna 9", "Luna 10"), Ordering::Greater);
        assert_eq!(compare_values("2.0", "2"), Ordering::Equal);
    }

    #[test]
    fn test_mixed_cells_sort_in_a_total_order() {
        let cells = ["1a", "10", "", "9", "b", "-2.5", "10.0", "abc"];
        for a in cells {
            for b in cells {
                assert_eq!(compare_cells(a, b), compare_cells(b, a).reverse());
                for c in cells {
                    if compare_cells(a, b).is_le() && compare_cells(b, c).is_le() {
                        assert!(compare_cells(a, c).is_le(), "{:?} {:?} {:?}", a, b, c);
                    }
                }
            }
        }

        let mut sorted = cells.to_vec();
        sorted.sort_by(|a, b| compare_cells(a, b));
        assert_eq!(sorted, vec!["", "-2.5", "9", "10", "10.0", "1a", "abc", "b"]);
    }

    #[test]
    fn test_sort_mixed_column_puts_numbers_before_text() {
        let columns: Vec<String> = ["Launch Date", "Operator", "Mission Type", "Outcome", "Mass"]
            .iter()
            .map(|c| c.to_string())
            .collect();
        let rows: Vec<Vec<String>> = ["9", "1a", "10", "", "heavy"]
            .iter()
            .map(|mass| {
                ["1966-01-31", "Soviet Union", "Lander", "Successful", mass]
                    .iter()
                    .map(|c| c.to_string())
                    .collect()
            })
            .collect();
        let dataset = MissionDataset::from_rows(columns, rows).unwrap();
        let request = TableRequest {
            sort_by: vec![SortSpec {
                column: "Mass".to_string(),
                direction: SortDirection::Asc,
            }],
            ..Default::default()
        };

        let page = TableView::new(&dataset, &[], 10, 100).page(&dataset, &request);
        let masses: Vec<&str> = page.rows.iter().map(|row| row[4].as_str()).collect();
        assert_eq!(masses, vec!["", "9", "10", "1a", "heavy"]);
    }

    #[test]
    fn test_unknown_and_hidden_columns_are_ignored() {
        let dataset = sample_dataset();
        let request = TableRequest {
            sort_by: vec![SortSpec {
                column: "Budget".to_string(),
                direction: SortDirection::Desc,
            }],
            filters: vec![
                filter("Budget", "> 5"),
                filter("Additional information", "contains Lunokhod"),
                filter("Mission", "   "),
            ],
            ..Default::default()
        };

        let page = view(&dataset).page(&dataset, &request);
        assert_eq!(page.total_rows, 10);
        assert_eq!(page.rows[0][0], "Luna 9");
    }

    #[test]
    fn test_paging() {
        let dataset = sample_dataset();
        let view = view(&dataset);

        let last = view.page(
            &dataset,
            &TableRequest {
                page: 3,
                page_size: Some(3),
                ..Default::default()
            },
        );
        assert_eq!(last.rows.len(), 1);
        assert_eq!(last.total_pages, 4);
        assert_eq!(last.rows[0][0], "Hiten-B");

        let beyond = view.page(
            &dataset,
            &TableRequest {
                page: 7,
                page_size: Some(3),
                ..Default::default()
            },
        );
        assert!(beyond.rows.is_empty());
        assert_eq!(beyond.total_rows, 10);
    }

    #[test]
    fn test_page_size_is_capped() {
        let dataset = sample_dataset();
        let view = TableView::new(&dataset, &[], 10, 4);

        let page = view.page(
            &dataset,
            &TableRequest {
                page_size: Some(500),
                ..Default::default()
            },
        );
        assert_eq!(page.page_size, 4);
        assert_eq!(page.columns.len(), 8);

        let zero = view.page(
            &dataset,
            &TableRequest {
                page_size: Some(0),
                ..Default::default()
            },
        );
        assert_eq!(zero.page_size, 1);
    }

    #[test]
    fn test_request_deserializes_with_defaults() {
        let request: TableRequest = serde_json::from_str(
            r#"{"sort_by":[{"column":"Mission","direction":"desc"},{"column":"Operator"}]}"#,
        )
        .unwrap();

        assert_eq!(request.page, 0);
        assert_eq!(request.page_size, None);
        assert_eq!(request.sort_by[0].direction, SortDirection::Desc);
        assert_eq!(request.sort_by[1].direction, SortDirection::Asc);
        assert!(request.filters.is_empty());
    }
}
