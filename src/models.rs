//! Core data types for travel queries and parsed travel options

use crate::PlannerError;
use serde::{Deserialize, Serialize};

/// Column headers of the travel options table, in order. Also the exact
/// CSV header row.
pub const TABLE_COLUMNS: [&str; 6] = [
    "Travel Type",
    "Price (Estimated)",
    "Time (Estimated)",
    "Description",
    "Comfort Level",
    "Directness",
];

/// The five travel modes the model is asked to fill in
pub const TRAVEL_MODES: [&str; 5] = ["Cab/Taxi", "Train", "Bus", "Flight", "Ola/Uber"];

/// A single travel request: where from, where to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelQuery {
    /// Source city, free text
    pub source: String,
    /// Destination city, free text
    pub destination: String,
}

impl TravelQuery {
    pub fn new<S: Into<String>>(source: S, destination: S) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Check that both cities are present before any request is sent.
    /// Whitespace-only input counts as empty.
    pub fn validate(&self) -> Result<(), PlannerError> {
        if self.source.trim().is_empty() || self.destination.trim().is_empty() {
            return Err(PlannerError::validation(
                "Please enter both source and destination cities.",
            ));
        }
        Ok(())
    }
}

/// One parsed row of the travel options table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelOption {
    /// Travel mode label, e.g. "Train"
    pub travel_type: String,
    /// Parsed price, `None` if the cell held no usable number
    pub estimated_price: Option<f64>,
    /// Parsed travel time in hours, `None` if the cell held no usable number
    pub estimated_time: Option<f64>,
    /// Free-text description from the model
    pub description: String,
    /// Comfort level as reported (1-5 scale, kept as text)
    pub comfort_level: String,
    /// Direct/Indirect as reported
    pub directness: String,
}

/// Ordered set of parsed travel options for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelTable {
    pub options: Vec<TravelOption>,
}

/// One bar in a categorical chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    /// `None` renders as a missing bar rather than zero
    pub value: Option<f64>,
}

/// Data for one categorical bar chart, rendered client-side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ChartPoint>,
}
