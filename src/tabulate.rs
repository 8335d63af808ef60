//! Response tabulator
//!
//! Turns the model's raw markdown-ish reply into a [`TravelTable`] and the
//! derived chart series and CSV rendering. The reply is untrusted text, so
//! the table is located by structural markers (a header row naming all six
//! expected columns) rather than by fixed line offsets, and the numeric
//! columns are coerced with an explicit fallible parse that yields `None`
//! instead of failing the whole row.

use crate::models::{ChartPoint, ChartSeries, TravelOption, TravelTable, TABLE_COLUMNS};
use crate::{PlannerError, Result};
use tracing::{debug, instrument, warn};

/// Parse a raw model reply into an ordered travel table.
///
/// Fails with a tabulation error when no header row naming all six columns
/// is present, or when the table body contains no usable rows.
#[instrument(skip(raw), fields(len = raw.len()))]
pub fn tabulate(raw: &str) -> Result<TravelTable> {
    let mut lines = raw.lines();

    // Locate the header row by content, not position
    let header_found = lines
        .by_ref()
        .any(|line| split_table_row(line).is_some_and(|cells| is_header_row(&cells)));
    if !header_found {
        return Err(PlannerError::tabulation(
            "No table header with the expected columns found in the reply",
        ));
    }

    let mut options = Vec::new();
    for line in lines {
        let Some(cells) = split_table_row(line) else {
            // Prose before the body is tolerated; prose after it ends the table
            if options.is_empty() {
                continue;
            }
            break;
        };

        if is_separator_row(&cells) {
            continue;
        }

        if cells.len() != TABLE_COLUMNS.len() {
            warn!(
                "Skipping table row with {} cells (expected {}): {line:?}",
                cells.len(),
                TABLE_COLUMNS.len()
            );
            continue;
        }

        options.push(TravelOption {
            travel_type: cells[0].clone(),
            estimated_price: coerce_numeric(&cells[1]),
            estimated_time: coerce_numeric(&cells[2]),
            description: cells[3].clone(),
            comfort_level: cells[4].clone(),
            directness: cells[5].clone(),
        });
    }

    if options.is_empty() {
        return Err(PlannerError::tabulation(
            "Table header found but no data rows could be parsed",
        ));
    }

    debug!("Tabulated {} travel options", options.len());
    Ok(TravelTable { options })
}

/// Split a `|`-delimited table row into trimmed cells, dropping the empty
/// segments produced by the leading and trailing bars. Returns `None` for
/// lines that are not table rows.
fn split_table_row(line: &str) -> Option<Vec<String>> {
    let trimmed = line.trim();
    if !trimmed.starts_with('|') {
        return None;
    }

    let cells: Vec<String> = trimmed
        .trim_start_matches('|')
        .trim_end_matches('|')
        .split('|')
        .map(|cell| cell.trim().to_string())
        .collect();

    if cells.is_empty() { None } else { Some(cells) }
}

/// A header row names all six expected columns, in any case
fn is_header_row(cells: &[String]) -> bool {
    TABLE_COLUMNS.iter().all(|column| {
        let column = column.to_lowercase();
        cells
            .iter()
            .any(|cell| cell.to_lowercase().contains(&column))
    })
}

/// Markdown alignment rows consist only of dashes, colons and spaces
fn is_separator_row(cells: &[String]) -> bool {
    cells
        .iter()
        .all(|cell| !cell.is_empty() && cell.chars().all(|c| matches!(c, '-' | ':' | ' ')))
}

/// Permissive numeric coercion: strip every character that is not an ASCII
/// digit or decimal point, then parse. `"₹1,200"` -> 1200, `"2.5 hrs"` -> 2.5,
/// `"N/A"` -> `None`.
#[must_use]
pub fn coerce_numeric(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse::<f64>().ok()
}

impl TravelTable {
    /// Price-by-mode bar chart data, row order preserved
    #[must_use]
    pub fn price_chart(&self) -> ChartSeries {
        ChartSeries {
            title: "Price Comparison".to_string(),
            x_label: "Travel Type".to_string(),
            y_label: "Price (₹)".to_string(),
            points: self
                .options
                .iter()
                .map(|option| ChartPoint {
                    label: option.travel_type.clone(),
                    value: option.estimated_price,
                })
                .collect(),
        }
    }

    /// Time-by-mode bar chart data, row order preserved
    #[must_use]
    pub fn time_chart(&self) -> ChartSeries {
        ChartSeries {
            title: "Time Comparison".to_string(),
            x_label: "Travel Type".to_string(),
            y_label: "Time (Hours)".to_string(),
            points: self
                .options
                .iter()
                .map(|option| ChartPoint {
                    label: option.travel_type.clone(),
                    value: option.estimated_time,
                })
                .collect(),
        }
    }

    /// Render the full table as CSV with the fixed header row. Missing
    /// numeric values become empty cells.
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer
            .write_record(TABLE_COLUMNS)
            .map_err(|e| PlannerError::general(format!("Failed to write CSV header: {e}")))?;

        for option in &self.options {
            writer
                .write_record([
                    option.travel_type.as_str(),
                    &format_numeric(option.estimated_price),
                    &format_numeric(option.estimated_time),
                    option.description.as_str(),
                    option.comfort_level.as_str(),
                    option.directness.as_str(),
                ])
                .map_err(|e| PlannerError::general(format!("Failed to write CSV row: {e}")))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| PlannerError::general(format!("Failed to flush CSV writer: {e}")))?;
        String::from_utf8(bytes)
            .map_err(|e| PlannerError::general(format!("CSV output was not valid UTF-8: {e}")))
    }
}

fn format_numeric(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const WELL_FORMED_REPLY: &str = "\
Here are your travel options from Mumbai to Pune:

| Travel Type | Price (Estimated) | Time (Estimated) | Description | Comfort Level (1-5, 5 being highest) | Directness (Direct/Indirect) |
|-------------|-------------------|------------------|-------------|--------------------------------------|------------------------------|
| Cab/Taxi    | ₹2500             | 3 hrs            | Door to door, flexible timing | 4 | Direct |
| Train       | ₹120              | 3.5 hrs          | Frequent local and express trains | 3 | Direct |
| Bus         | ₹400              | 4 hrs            | Volvo and sleeper options | 3 | Direct |
| Flight      | N/A               | N/A              | No commercial flights on this route | 5 | Indirect |
| Ola/Uber    | ₹2200             | 3 hrs            | App-based cab, surge pricing applies | 4 | Direct |

Prices are approximate and may vary by season.
";

    #[rstest]
    #[case("₹1200", Some(1200.0))]
    #[case("₹1,200", Some(1200.0))]
    #[case("2.5 hrs", Some(2.5))]
    #[case("$ 45.50", Some(45.5))]
    #[case("N/A", None)]
    #[case("", None)]
    #[case("unavailable", None)]
    #[case("1.2.3", None)]
    fn test_coerce_numeric(#[case] raw: &str, #[case] expected: Option<f64>) {
        assert_eq!(coerce_numeric(raw), expected);
    }

    #[test]
    fn test_tabulate_well_formed_reply() {
        let table = tabulate(WELL_FORMED_REPLY).unwrap();
        assert_eq!(table.options.len(), 5);

        let types: Vec<&str> = table
            .options
            .iter()
            .map(|o| o.travel_type.as_str())
            .collect();
        assert_eq!(types, ["Cab/Taxi", "Train", "Bus", "Flight", "Ola/Uber"]);

        let train = &table.options[1];
        assert_eq!(train.estimated_price, Some(120.0));
        assert_eq!(train.estimated_time, Some(3.5));
        assert_eq!(train.comfort_level, "3");
        assert_eq!(train.directness, "Direct");

        // Unavailable mode keeps its row, with missing numbers
        let flight = &table.options[3];
        assert_eq!(flight.estimated_price, None);
        assert_eq!(flight.estimated_time, None);
    }

    #[test]
    fn test_tabulate_is_idempotent() {
        let first = tabulate(WELL_FORMED_REPLY).unwrap();
        let second = tabulate(WELL_FORMED_REPLY).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_tabulate_without_header_fails() {
        let result = tabulate("Sorry, I cannot help with that request.");
        assert!(matches!(
            result.unwrap_err(),
            PlannerError::Tabulation { .. }
        ));
    }

    #[test]
    fn test_tabulate_too_short_reply_fails() {
        // Fewer than header + separator + one data row
        let result = tabulate("| Travel Type | Price (Estimated) | Time (Estimated) | Description | Comfort Level | Directness |");
        assert!(matches!(
            result.unwrap_err(),
            PlannerError::Tabulation { .. }
        ));
    }

    #[test]
    fn test_tabulate_skips_malformed_rows() {
        let reply = "\
| Travel Type | Price (Estimated) | Time (Estimated) | Description | Comfort Level | Directness |
|---|---|---|---|---|---|
| Train | ₹120 | 3.5 hrs | Express | 3 | Direct |
| Bus | ₹400 | broken row |
| Flight | ₹3000 | 1 hr | Short hop | 5 | Direct |
";
        let table = tabulate(reply).unwrap();
        assert_eq!(table.options.len(), 2);
        assert_eq!(table.options[1].travel_type, "Flight");
    }

    #[test]
    fn test_tabulate_stops_at_trailing_prose() {
        let reply = "\
| Travel Type | Price (Estimated) | Time (Estimated) | Description | Comfort Level | Directness |
|---|---|---|---|---|---|
| Train | ₹120 | 3.5 hrs | Express | 3 | Direct |
Let me know if you need anything else!
| Train | ₹999 | 9 hrs | ghost row | 1 | Indirect |
";
        let table = tabulate(reply).unwrap();
        assert_eq!(table.options.len(), 1);
    }

    #[test]
    fn test_csv_header_is_exact() {
        let table = tabulate(WELL_FORMED_REPLY).unwrap();
        let csv = table.to_csv().unwrap();
        let header = csv.lines().next().unwrap();
        assert_eq!(
            header,
            "Travel Type,Price (Estimated),Time (Estimated),Description,Comfort Level,Directness"
        );
        // Header plus five data rows
        assert_eq!(csv.lines().count(), 6);
    }

    #[test]
    fn test_csv_missing_values_are_empty_cells() {
        let table = tabulate(WELL_FORMED_REPLY).unwrap();
        let csv = table.to_csv().unwrap();
        let flight_row = csv.lines().nth(4).unwrap();
        assert!(flight_row.starts_with("Flight,,,"));
    }

    #[test]
    fn test_csv_quotes_descriptions_with_commas() {
        let reply = "\
| Travel Type | Price (Estimated) | Time (Estimated) | Description | Comfort Level | Directness |
|---|---|---|---|---|---|
| Train | ₹120 | 3.5 hrs | Cheap, frequent, reliable | 3 | Direct |
";
        let csv = tabulate(reply).unwrap().to_csv().unwrap();
        assert!(csv.contains("\"Cheap, frequent, reliable\""));
    }

    #[test]
    fn test_charts_have_five_categories() {
        let table = tabulate(WELL_FORMED_REPLY).unwrap();

        let price_chart = table.price_chart();
        assert_eq!(price_chart.points.len(), 5);
        assert_eq!(price_chart.x_label, "Travel Type");
        assert_eq!(price_chart.points[0].label, "Cab/Taxi");
        assert_eq!(price_chart.points[0].value, Some(2500.0));

        let time_chart = table.time_chart();
        assert_eq!(time_chart.points.len(), 5);
        assert_eq!(time_chart.y_label, "Time (Hours)");
        // Missing time carried through as a null point, not dropped
        assert_eq!(time_chart.points[3].value, None);
    }
}
