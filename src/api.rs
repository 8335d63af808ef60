//! HTTP API for the travel planner form
//!
//! One POST endpoint turns a query into parsed options plus chart data, and
//! a sibling endpoint renders rows the client sends back as a CSV download
//! without touching the model again. Validation failures never reach the
//! upstream model.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use tracing::{error, info};

use crate::llm::TravelOptionsGenerator;
use crate::models::{ChartSeries, TravelOption, TravelQuery, TravelTable};
use crate::{PlannerError, tabulate};

/// Shared state: the text-generation backend behind the composer seam
pub type Generator = Arc<dyn TravelOptionsGenerator>;

#[derive(Serialize)]
struct TravelOptionsResponse {
    query: TravelQuery,
    options: Vec<TravelOption>,
    price_chart: ChartSeries,
    time_chart: ChartSeries,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

pub fn router(generator: Generator) -> Router {
    Router::new()
        .route("/travel-options", post(get_travel_options))
        .route("/travel-options/csv", post(download_travel_options_csv))
        .with_state(generator)
}

/// Map a planner error to the status and user-facing message the form shows
fn error_response(err: &PlannerError) -> Response {
    let status = match err {
        PlannerError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        PlannerError::Generation { .. } | PlannerError::Tabulation { .. } => {
            StatusCode::BAD_GATEWAY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    error!("Request failed: {err}");
    (
        status,
        Json(ErrorBody {
            error: err.user_message(),
        }),
    )
        .into_response()
}

/// Run one query end to end: validate, generate, tabulate
async fn plan_trip(generator: &Generator, query: &TravelQuery) -> Result<TravelTable, PlannerError> {
    query.validate()?;

    info!(
        "Generating travel options from {} to {}",
        query.source, query.destination
    );
    let raw = generator.generate(query).await?;

    tabulate::tabulate(&raw)
}

async fn get_travel_options(
    State(generator): State<Generator>,
    Json(query): Json<TravelQuery>,
) -> Response {
    match plan_trip(&generator, &query).await {
        Ok(table) => {
            let price_chart = table.price_chart();
            let time_chart = table.time_chart();
            Json(TravelOptionsResponse {
                query,
                options: table.options,
                price_chart,
                time_chart,
            })
            .into_response()
        }
        Err(err) => error_response(&err),
    }
}

/// Serialize rows the client already holds. The model is nondeterministic,
/// so re-querying here could hand the user a CSV that disagrees with the
/// table and charts on screen.
async fn download_travel_options_csv(Json(table): Json<TravelTable>) -> Response {
    if table.options.is_empty() {
        return error_response(&PlannerError::validation("No travel options to export."));
    }

    let csv = match table.to_csv() {
        Ok(csv) => csv,
        Err(err) => return error_response(&err),
    };

    (
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"travel_data.csv\"",
            ),
        ],
        csv,
    )
        .into_response()
}
