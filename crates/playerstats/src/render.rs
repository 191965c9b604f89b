//! Tables and bar charts for query results
//!
//! Charts are plain data ([`BarChart`]); a surface decides whether to draw
//! them in the terminal ([`BarChart::to_text`]) or hand them to a plotting
//! backend as Vega-Lite ([`BarChart::to_vega_lite`]).

use serde_json::{Value, json};

use crate::query::{AggregateResult, CountResult};
use crate::{Error, Result};

const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<Bar>,
}

impl BarChart {
    /// Horizontal bars scaled so the largest magnitude spans `width` cells
    pub fn to_text(&self, width: usize) -> String {
        let width = width.max(1);
        let label_width = self
            .bars
            .iter()
            .map(|b| b.label.chars().count())
            .max()
            .unwrap_or(0);
        let max = self
            .bars
            .iter()
            .map(|b| b.value.abs())
            .fold(0.0_f64, f64::max);

        let mut out = format!("{}\n", self.title);
        out.push_str(&format!("{} vs {}\n", self.y_label, self.x_label));
        for bar in &self.bars {
            let cells = if max > 0.0 {
                ((bar.value.abs() / max) * width as f64).round() as usize
            } else {
                0
            };
            out.push_str(&format!(
                "{:<label_width$} | {} {}\n",
                bar.label,
                "█".repeat(cells),
                format_value(bar.value),
            ));
        }
        out
    }

    /// Vega-Lite document with inline data, one bar per entry, in order
    pub fn to_vega_lite(&self) -> Value {
        let values: Vec<Value> = self
            .bars
            .iter()
            .map(|b| json!({ "label": b.label, "value": b.value }))
            .collect();
        let order: Vec<&str> = self.bars.iter().map(|b| b.label.as_str()).collect();
        json!({
            "$schema": VEGA_LITE_SCHEMA,
            "title": self.title,
            "data": { "values": values },
            "mark": { "type": "bar" },
            "encoding": {
                "x": {
                    "field": "label",
                    "type": "nominal",
                    "title": self.x_label,
                    "sort": order,
                    "axis": { "labelAngle": -45 }
                },
                "y": {
                    "field": "value",
                    "type": "quantitative",
                    "title": self.y_label
                }
            }
        })
    }
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// One bar per row of the count result, keyed by row index
pub fn count_chart(result: &CountResult) -> Result<BarChart> {
    if result.counts.is_empty() {
        return Err(Error::render("count query returned no rows"));
    }
    Ok(BarChart {
        title: "Count Visualization".to_string(),
        x_label: "Index".to_string(),
        y_label: "Count".to_string(),
        bars: result
            .counts
            .iter()
            .enumerate()
            .map(|(i, c)| Bar {
                label: i.to_string(),
                value: *c as f64,
            })
            .collect(),
    })
}

/// Group keys ranked by value, largest first
pub fn sum_chart(result: &AggregateResult) -> Result<BarChart> {
    let Some(value) = &result.value else {
        return Err(Error::render(format!(
            "no numeric column to chart against '{}'; select at least one numeric column",
            result.key
        )));
    };
    if result.pairs.is_empty() {
        return Err(Error::render("grouped query returned no rows"));
    }

    let mut pairs = result.pairs.clone();
    pairs.sort_by(|a, b| b.1.total_cmp(&a.1));

    Ok(BarChart {
        title: "Sum Visualization".to_string(),
        x_label: result.key.clone(),
        y_label: value.clone(),
        bars: pairs
            .into_iter()
            .map(|(key, v)| Bar {
                label: format!("{key}: {}", format_value(v)),
                value: v,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;
    use arrow_schema::Schema;
    use std::sync::Arc;

    fn empty_table() -> Table {
        Table::new(Arc::new(Schema::empty()), Vec::new())
    }

    fn aggregate(value: Option<&str>, pairs: Vec<(&str, f64)>) -> AggregateResult {
        AggregateResult {
            key: "name".to_string(),
            value: value.map(str::to_string),
            pairs: pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            table: empty_table(),
        }
    }

    #[test]
    fn test_count_chart() {
        let result = CountResult {
            counts: vec![2],
            table: empty_table(),
        };
        let chart = count_chart(&result).unwrap();
        assert_eq!(chart.bars, vec![Bar { label: "0".to_string(), value: 2.0 }]);
        assert_eq!(chart.y_label, "Count");
    }

    #[test]
    fn test_count_chart_empty() {
        let result = CountResult {
            counts: vec![],
            table: empty_table(),
        };
        assert!(matches!(count_chart(&result), Err(Error::Render(_))));
    }

    #[test]
    fn test_sum_chart_sorted_descending() {
        let chart = sum_chart(&aggregate(
            Some("winnings"),
            vec![("Bob", 80.0), ("Alice", 250.5), ("Carol", 120.0)],
        ))
        .unwrap();
        let labels: Vec<&str> = chart.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Alice: 250.5", "Carol: 120", "Bob: 80"]);
        assert_eq!(chart.x_label, "name");
        assert_eq!(chart.y_label, "winnings");
    }

    #[test]
    fn test_sum_chart_without_numeric_column() {
        let err = sum_chart(&aggregate(None, vec![])).unwrap_err();
        assert!(err.to_string().contains("no numeric column"));
    }

    #[test]
    fn test_text_chart() {
        let chart = BarChart {
            title: "Count Visualization".to_string(),
            x_label: "Index".to_string(),
            y_label: "Count".to_string(),
            bars: vec![
                Bar { label: "a".to_string(), value: 4.0 },
                Bar { label: "bb".to_string(), value: 2.0 },
            ],
        };
        let text = chart.to_text(4);
        assert!(text.contains("a  | ████ 4"));
        assert!(text.contains("bb | ██ 2"));
    }

    #[test]
    fn test_vega_lite() {
        let chart = sum_chart(&aggregate(Some("games"), vec![("Alice", 10.0), ("Bob", 5.0)])).unwrap();
        let doc = chart.to_vega_lite();
        assert_eq!(doc["mark"]["type"], "bar");
        assert_eq!(doc["data"]["values"][0]["label"], "Alice: 10");
        assert_eq!(doc["data"]["values"][1]["value"], 5.0);
        assert_eq!(doc["encoding"]["y"]["type"], "quantitative");
    }
}
