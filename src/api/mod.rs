use axum::{
    Router,
    extract::{Json, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::core::{BandSchedule, CURRENCY_SYMBOL, CommissionResult, calculate, format_money};

mod input;

pub use input::{InputError, RevenueInput, parse_revenue, revenue_from_number};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

const PLACEHOLDER_TOTAL: &str = "£0.00";
const EMPTY_BREAKDOWN_HINT: &str = "Enter revenue to see commission breakdown";

#[derive(Parser, Debug)]
#[command(
    name = "commission",
    about = "Banded commission calculator (marginal rates per revenue band)",
    after_help = "Run `commission serve [port]` to start the web calculator (default port 8080)."
)]
struct Cli {
    #[arg(
        allow_hyphen_values = true,
        help = "Revenue to calculate commission on, e.g. 25000"
    )]
    revenue: Option<String>,
    #[arg(long, help = "Print the result as JSON")]
    json: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CommissionQuery {
    revenue: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CommissionPayload {
    revenue: Option<RawRevenue>,
}

/// The web page sends the field text, other clients may send a number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawRevenue {
    Number(f64),
    Text(String),
}

impl RawRevenue {
    fn into_input(self) -> Result<RevenueInput, InputError> {
        match self {
            RawRevenue::Number(value) => revenue_from_number(value),
            RawRevenue::Text(text) => parse_revenue(&text),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CommissionResponse {
    has_input: bool,
    total: Option<String>,
    display_total: String,
    breakdown: Vec<BreakdownLine>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BreakdownLine {
    label: String,
    amount: f64,
    display_amount: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_commission_response(schedule: &BandSchedule, input: RevenueInput) -> CommissionResponse {
    let RevenueInput::Revenue(revenue) = input else {
        return CommissionResponse {
            has_input: false,
            total: None,
            display_total: PLACEHOLDER_TOTAL.to_string(),
            breakdown: Vec::new(),
        };
    };

    let CommissionResult { total, breakdown } = calculate(schedule, revenue);
    CommissionResponse {
        has_input: true,
        display_total: format!("{CURRENCY_SYMBOL}{total}"),
        total: Some(total),
        breakdown: breakdown
            .into_iter()
            .map(|entry| BreakdownLine {
                display_amount: format_money(entry.amount),
                label: entry.label,
                amount: entry.amount,
            })
            .collect(),
    }
}

fn render_text(response: &CommissionResponse) -> String {
    let mut out = format!("Total commission: {}\n", response.display_total);
    if response.breakdown.is_empty() {
        out.push_str(EMPTY_BREAKDOWN_HINT);
        out.push('\n');
        return out;
    }

    let width = response
        .breakdown
        .iter()
        .map(|line| line.label.chars().count())
        .max()
        .unwrap_or(0);
    for line in &response.breakdown {
        out.push_str(&format!(
            "  {:<width$}  {}\n",
            line.label, line.display_amount
        ));
    }
    out
}

/// Parses process arguments and renders one calculation.
pub fn run_cli(schedule: &BandSchedule) -> Result<String, String> {
    execute_cli(Cli::parse(), schedule)
}

fn execute_cli(cli: Cli, schedule: &BandSchedule) -> Result<String, String> {
    let input =
        parse_revenue(cli.revenue.as_deref().unwrap_or("")).map_err(|e| e.to_string())?;
    let response = build_commission_response(schedule, input);

    if cli.json {
        serde_json::to_string_pretty(&response)
            .map(|json| json + "\n")
            .map_err(|e| format!("Failed to serialize result: {e}"))
    } else {
        Ok(render_text(&response))
    }
}

pub fn router(schedule: Arc<BandSchedule>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/commission",
            get(commission_get_handler).post(commission_post_handler),
        )
        .fallback(not_found_handler)
        .with_state(schedule)
}

pub async fn run_http_server(port: u16, schedule: BandSchedule) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router(Arc::new(schedule));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "commission HTTP API listening");
    tracing::info!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn commission_get_handler(
    State(schedule): State<Arc<BandSchedule>>,
    Query(query): Query<CommissionQuery>,
) -> Response {
    let input = parse_revenue(query.revenue.as_deref().unwrap_or(""));
    commission_handler_impl(&schedule, input)
}

async fn commission_post_handler(
    State(schedule): State<Arc<BandSchedule>>,
    Json(payload): Json<CommissionPayload>,
) -> Response {
    let input = payload
        .revenue
        .map_or(Ok(RevenueInput::Missing), RawRevenue::into_input);
    commission_handler_impl(&schedule, input)
}

fn commission_handler_impl(
    schedule: &BandSchedule,
    input: Result<RevenueInput, InputError>,
) -> Response {
    let input = match input {
        Ok(input) => input,
        Err(err) => {
            tracing::warn!(error = %err, "rejected revenue input");
            return error_response(StatusCode::BAD_REQUEST, &err.to_string());
        }
    };

    let response = build_commission_response(schedule, input);
    tracing::debug!(?input, total = ?response.total, "calculated commission");
    json_response(StatusCode::OK, response)
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
