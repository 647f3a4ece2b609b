//! Store Dashboard — store efficiency analysis over dashboard snapshots
//!
//! Usage:
//!   store-dashboard serve --port 3001                    — Launch web server with UI
//!   store-dashboard analyze --dataset mart --period 2511 — Print efficiency table
//!   store-dashboard history --dataset mart               — List saved analysis runs

mod view;

use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use clap::{Parser, Subcommand};
use engine::{
    format_number, report_to_record, AnalysisPolicy, EfficiencyReport, Period, SnapshotSource,
};
use persistence::repository::{AnalysisRunRepository, AnalystNoteRecord, NoteRepository};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{error, info, warn};

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "store-dashboard")]
#[command(about = "Store efficiency analysis for retail dashboards", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the dashboard web server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        /// Port to listen on
        #[arg(short, long, default_value_t = 3001)]
        port: u16,
    },
    /// Analyze one dataset/period snapshot from the CLI
    Analyze {
        /// Dataset prefix of the snapshot files (business unit)
        #[arg(long)]
        dataset: String,
        /// Period code, YYMM (e.g. 2511)
        #[arg(long)]
        period: String,
        /// Optional JSON export path
        #[arg(long)]
        export: Option<String>,
        /// Do not record the run summary in the database
        #[arg(long)]
        no_save: bool,
    },
    /// List saved analysis runs for a dataset
    History {
        #[arg(long)]
        dataset: String,
    },
}

#[derive(Clone)]
struct AppState {
    source: Arc<SnapshotSource>,
    db: Arc<persistence::Database>,
    policy: Arc<AnalysisPolicy>,
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug,engine=debug,persistence=debug,store_dashboard=debug")
    } else {
        EnvFilter::new("info,engine=info,store_dashboard=info,sqlx=warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).compact())
        .with(filter)
        .init();
}

// ============================================================================
// Configuration
// ============================================================================

fn data_dir() -> PathBuf {
    std::env::var("STORE_DASHBOARD_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data/dashboard"))
}

/// HTTP base URL wins over the local data directory when set
fn snapshot_source() -> SnapshotSource {
    match std::env::var("STORE_DASHBOARD_DATA_URL") {
        Ok(url) if !url.trim().is_empty() => SnapshotSource::http(url),
        _ => SnapshotSource::directory(data_dir()),
    }
}

fn db_path() -> String {
    std::env::var("STORE_DASHBOARD_DB_PATH")
        .unwrap_or_else(|_| "data/store-dashboard.db".to_string())
}

async fn open_db(path: &str) -> anyhow::Result<persistence::Database> {
    persistence::Database::new(path).await.map_err(|e| {
        error!("Failed to initialize database: {}", e);
        anyhow::anyhow!("Database initialization failed: {}", e)
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Serve { host, port } => {
            cmd_serve(&host, port).await?;
        }
        Commands::Analyze {
            dataset,
            period,
            export,
            no_save,
        } => {
            cmd_analyze(&dataset, &period, export, no_save).await?;
        }
        Commands::History { dataset } => {
            cmd_history(&dataset).await?;
        }
    }

    Ok(())
}

// ============================================================================
// Serve command — Axum web server
// ============================================================================

async fn cmd_serve(host: &str, port: u16) -> anyhow::Result<()> {
    info!("Store Dashboard v{} starting...", APP_VERSION);

    let db_path = db_path();
    let db = open_db(&db_path).await?;
    info!("Database initialized: {}", db_path);

    let source = snapshot_source();
    let state = AppState {
        source: Arc::new(source.clone()),
        db: Arc::new(db),
        policy: Arc::new(AnalysisPolicy::default()),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new().nest("/api", api_routes(state));
    // Raw snapshots stay reachable under the dashboards' path convention
    if let SnapshotSource::Directory(dir) = &source {
        app = app.nest_service("/dashboard", ServeDir::new(dir));
    }
    let app = app
        .fallback_service(ServeDir::new(static_dir()))
        .layer(cors);

    let addr: std::net::SocketAddr = format!("{}:{}", host, port).parse()?;
    println!("\n=== Store Dashboard v{} ===", APP_VERSION);
    println!("Listening on http://{}", addr);
    println!("\nEndpoints:");
    println!("  GET    /api/health                       - Health check");
    println!("  GET    /api/efficiency?dataset=&period=  - Store efficiency analysis");
    println!("  POST   /api/runs                         - Analyze and record a run");
    println!("  GET    /api/history?dataset=             - Saved analysis runs");
    println!("  GET    /api/notes?dataset=&period=       - Analyst notes");
    println!("  PUT    /api/notes                        - Save analyst note");
    println!("  DELETE /api/notes?dataset=&period=       - Delete analyst note");
    println!("\n  Snapshots: {}", source.describe());
    println!("  Database:  {}", db_path);
    println!("\nPress Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api_health))
        .route("/efficiency", get(api_efficiency))
        .route("/runs", post(api_record_run))
        .route("/history", get(api_history))
        .route(
            "/notes",
            get(api_get_notes).put(api_put_note).delete(api_delete_note),
        )
        .with_state(state)
}

/// `dist/` next to the executable, else `./dist`
fn static_dir() -> PathBuf {
    let exe_path = std::env::current_exe().unwrap_or_default();
    let exe_dir = exe_path.parent().unwrap_or(std::path::Path::new("."));
    let dist_dir = exe_dir.join("dist");
    if dist_dir.exists() {
        dist_dir
    } else {
        PathBuf::from("dist")
    }
}

// ============================================================================
// Analyze command — CLI mode (no web server)
// ============================================================================

async fn cmd_analyze(
    dataset: &str,
    period: &str,
    export: Option<String>,
    no_save: bool,
) -> anyhow::Result<()> {
    println!("\n=== Store Dashboard v{} ===", APP_VERSION);

    let period = Period::parse(period)?;
    let source = snapshot_source();
    println!("Snapshots: {}", source.describe());
    println!("Dataset: {} | Period: {}\n", dataset, period.label());

    let snapshot = source.load(dataset, &period).await?;
    let report = snapshot.analyze(&AnalysisPolicy::default());

    print_report(&period, &report);

    if !no_save {
        let db_path = db_path();
        let db = open_db(&db_path).await?;
        let repo = AnalysisRunRepository::new(db.pool());
        repo.save_run(&report_to_record(dataset, &period, &report))
            .await?;
        println!("\nRun saved to {}", db_path);
    }

    if let Some(path) = export {
        let json = serde_json::json!({
            "dataset": dataset,
            "period": period,
            "summary": view::summary(&period, &report),
            "rows": view::store_rows(&report),
            "categories": view::category_rows(&report),
            "report": report,
        });
        std::fs::write(&path, serde_json::to_string_pretty(&json)?)?;
        println!("Exported to {}", path);
    }

    Ok(())
}

fn print_report(period: &Period, report: &EfficiencyReport) {
    let summary = view::summary(period, report);
    if !summary.has_data {
        println!(
            "  No analyzable stores ({} excluded)",
            summary.excluded_count
        );
        return;
    }

    println!(
        "{:>4}  {:<10} {:<16} {:>14} {:>12} {:>10} {:>9}  {}",
        "Rank", "Code", "Store", "Net sales", "Sales/pyeong", "YOY", "Profit%", "Category"
    );
    println!("{}", "-".repeat(96));
    for row in view::store_rows(report) {
        println!(
            "{:>4}  {:<10} {:<16} {:>14} {:>12} {:>10} {:>9}  {}",
            row.rank,
            row.store_code,
            row.store_name,
            row.net_sales,
            row.sales_per_area,
            row.yoy,
            row.profit_rate,
            row.category_label,
        );
    }

    println!("\nCategories:");
    for c in view::category_rows(report) {
        println!(
            "  {:<14} {:>3} stores | sales {:>14} | profit {:>12} | {}/pyeong",
            c.label, c.store_count, c.total_sales, c.total_direct_profit, c.avg_sales_per_area
        );
    }

    println!("\nStores: {} ({} excluded)", summary.store_count, summary.excluded_count);
    println!("Max sales/pyeong:  {}", summary.max_sales_per_area);
    println!("Min sales/pyeong:  {}", summary.min_sales_per_area);
    println!("Avg (profit stores): {}", summary.avg_profit_sales_per_area);
    println!("Breakeven threshold: {}", summary.breakeven_threshold);
    println!("Avg YOY (comparable stores): {}", summary.avg_yoy);
}

// ============================================================================
// History command
// ============================================================================

async fn cmd_history(dataset: &str) -> anyhow::Result<()> {
    let db = open_db(&db_path()).await?;
    let runs = AnalysisRunRepository::new(db.pool())
        .list_runs(dataset)
        .await?;

    if runs.is_empty() {
        println!("No saved runs for {}", dataset);
        return Ok(());
    }

    println!(
        "{:<8} {:>7} {:>9} {:>6} {:>16} {:>12}",
        "Period", "Stores", "Excluded", "Loss", "Total sales", "Breakeven"
    );
    for run in runs {
        let total_sales = run
            .total_sales
            .parse()
            .map(|d| format_number(d, 0))
            .unwrap_or(run.total_sales.clone());
        println!(
            "{:<8} {:>7} {:>9} {:>6} {:>16} {:>12}",
            run.period,
            run.store_count,
            run.excluded_count,
            run.loss_store_count,
            total_sales,
            run.breakeven_threshold.as_deref().unwrap_or("-"),
        );
    }

    Ok(())
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health
async fn api_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "store-dashboard",
        "version": APP_VERSION,
    }))
}

/// Required `dataset` and `period` query parameters
fn scope_params(params: &HashMap<String, String>) -> Result<(String, Period), String> {
    let dataset = params
        .get("dataset")
        .filter(|d| !d.is_empty())
        .cloned()
        .ok_or_else(|| "Missing 'dataset' parameter".to_string())?;
    let period = params
        .get("period")
        .ok_or_else(|| "Missing 'period' parameter".to_string())
        .and_then(|p| Period::parse(p).map_err(|e| e.to_string()))?;
    Ok((dataset, period))
}

/// Load and analyze one snapshot, or the error envelope to return
async fn load_report(
    state: &AppState,
    dataset: &str,
    period: &Period,
) -> Result<EfficiencyReport, Json<serde_json::Value>> {
    match state.source.load(dataset, period).await {
        Ok(snapshot) => Ok(snapshot.analyze(&state.policy)),
        Err(e) => {
            warn!(dataset = %dataset, period = %period, error = %e, "Snapshot unavailable");
            Err(Json(serde_json::json!({
                "success": false,
                "error": format!("Data unavailable: {}", e),
            })))
        }
    }
}

/// GET /api/efficiency — analyze one snapshot and return table-ready rows.
/// Read-only: runs are recorded through `POST /api/runs`.
async fn api_efficiency(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<serde_json::Value> {
    let (dataset, period) = match scope_params(&params) {
        Ok(scope) => scope,
        Err(e) => return Json(serde_json::json!({ "success": false, "error": e })),
    };

    let report = match load_report(&state, &dataset, &period).await {
        Ok(report) => report,
        Err(response) => return response,
    };

    Json(serde_json::json!({
        "success": true,
        "dataset": dataset,
        "period": period,
        "summary": view::summary(&period, &report),
        "rows": view::store_rows(&report),
        "categories": view::category_rows(&report),
        "top": report.top(5).iter().map(|m| view::store_row(&report, m)).collect::<Vec<_>>(),
        "bottom": report.bottom(5).iter().map(|m| view::store_row(&report, m)).collect::<Vec<_>>(),
        "report": report,
    }))
}

#[derive(Debug, Deserialize)]
struct RunRequest {
    dataset: String,
    period: String,
}

/// POST /api/runs — analyze a snapshot and record its run summary
async fn api_record_run(
    State(state): State<AppState>,
    Json(request): Json<RunRequest>,
) -> Json<serde_json::Value> {
    let period = match Period::parse(&request.period) {
        Ok(p) => p,
        Err(e) => return Json(serde_json::json!({ "success": false, "error": e.to_string() })),
    };

    let report = match load_report(&state, &request.dataset, &period).await {
        Ok(report) => report,
        Err(response) => return response,
    };

    let record = report_to_record(&request.dataset, &period, &report);
    let repo = AnalysisRunRepository::new(state.db.pool());
    match repo.save_run(&record).await {
        Ok(_) => {
            info!(dataset = %record.dataset, period = %record.period, "Analysis run recorded");
            Json(serde_json::json!({ "success": true, "run": record }))
        }
        Err(e) => Json(serde_json::json!({
            "success": false,
            "error": format!("Failed to save analysis run: {}", e),
        })),
    }
}

/// GET /api/history — saved run summaries for a dataset
async fn api_history(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<serde_json::Value> {
    let Some(dataset) = params.get("dataset") else {
        return Json(serde_json::json!({
            "success": false,
            "error": "Missing 'dataset' parameter",
            "data": [],
        }));
    };

    let repo = AnalysisRunRepository::new(state.db.pool());
    match repo.list_runs(dataset).await {
        Ok(runs) => Json(serde_json::json!({
            "success": true,
            "data": runs,
            "total": runs.len(),
        })),
        Err(e) => Json(serde_json::json!({
            "success": false,
            "error": format!("Failed to query history: {}", e),
            "data": [],
        })),
    }
}

/// GET /api/notes — analyst notes for a dashboard period
async fn api_get_notes(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<serde_json::Value> {
    let (dataset, period) = match scope_params(&params) {
        Ok(scope) => scope,
        Err(e) => return Json(serde_json::json!({ "success": false, "error": e, "data": [] })),
    };

    let repo = NoteRepository::new(state.db.pool());
    match repo.get_notes(&dataset, &period.code()).await {
        Ok(notes) => Json(serde_json::json!({ "success": true, "data": notes })),
        Err(e) => Json(serde_json::json!({
            "success": false,
            "error": format!("Failed to load notes: {}", e),
            "data": [],
        })),
    }
}

#[derive(Debug, Deserialize)]
struct NoteRequest {
    dataset: String,
    period: String,
    #[serde(default)]
    store_code: String,
    body: String,
    author: Option<String>,
}

/// PUT /api/notes — create or replace a note
async fn api_put_note(
    State(state): State<AppState>,
    Json(request): Json<NoteRequest>,
) -> Json<serde_json::Value> {
    let period = match Period::parse(&request.period) {
        Ok(p) => p,
        Err(e) => return Json(serde_json::json!({ "success": false, "error": e.to_string() })),
    };

    let record = AnalystNoteRecord {
        id: None,
        dataset: request.dataset,
        period: period.code(),
        store_code: request.store_code,
        body: request.body,
        author: request.author,
        updated_at: None,
    };

    let repo = NoteRepository::new(state.db.pool());
    match repo.upsert_note(&record).await {
        Ok(_) => {
            info!(dataset = %record.dataset, period = %record.period, store = %record.store_code, "Note saved");
            Json(serde_json::json!({ "success": true }))
        }
        Err(e) => Json(serde_json::json!({
            "success": false,
            "error": format!("Failed to save note: {}", e),
        })),
    }
}

/// DELETE /api/notes — remove a note (`store_code` omitted = dashboard-level note)
async fn api_delete_note(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<serde_json::Value> {
    let (dataset, period) = match scope_params(&params) {
        Ok(scope) => scope,
        Err(e) => return Json(serde_json::json!({ "success": false, "error": e })),
    };
    let store_code = params.get("store_code").map(|s| s.as_str()).unwrap_or("");

    let repo = NoteRepository::new(state.db.pool());
    match repo.delete_note(&dataset, &period.code(), store_code).await {
        Ok(deleted) => Json(serde_json::json!({ "success": true, "deleted": deleted })),
        Err(e) => Json(serde_json::json!({
            "success": false,
            "error": format!("Failed to delete note: {}", e),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DASHBOARD: &str = r#"{
        "period": "2511",
        "stores": [
            {"storeCode": "S1", "storeName": "본점", "netSales": 1000, "netSalesPrev": 800,
             "directProfit": 150, "area": 10},
            {"storeCode": "S2", "storeName": "역점", "netSales": 200, "directProfit": -5, "area": 20}
        ]
    }"#;

    async fn test_state(dir: &std::path::Path) -> AppState {
        std::fs::write(dir.join("mart-dashboard-data-2511.json"), DASHBOARD).unwrap();
        AppState {
            source: Arc::new(SnapshotSource::directory(dir)),
            db: Arc::new(persistence::Database::in_memory().await.unwrap()),
            policy: Arc::new(AnalysisPolicy::default()),
        }
    }

    fn scope(dataset: &str, period: &str) -> Query<HashMap<String, String>> {
        Query(HashMap::from([
            ("dataset".to_string(), dataset.to_string()),
            ("period".to_string(), period.to_string()),
        ]))
    }

    async fn saved_runs(state: &AppState) -> usize {
        AnalysisRunRepository::new(state.db.pool())
            .list_runs("mart")
            .await
            .unwrap()
            .len()
    }

    #[tokio::test]
    async fn test_efficiency_read_does_not_record_run() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;

        let Json(body) = api_efficiency(State(state.clone()), scope("mart", "2511")).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["rows"].as_array().unwrap().len(), 2);
        assert_eq!(body["summary"]["period_label"], "2025-11");

        assert_eq!(saved_runs(&state).await, 0);
    }

    #[tokio::test]
    async fn test_record_run_saves_summary() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;

        let request = RunRequest {
            dataset: "mart".into(),
            period: "2511".into(),
        };
        let Json(body) = api_record_run(State(state.clone()), Json(request)).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["run"]["store_count"], 2);
        assert_eq!(saved_runs(&state).await, 1);

        // Recording the same period again replaces the row
        let request = RunRequest {
            dataset: "mart".into(),
            period: "2511".into(),
        };
        api_record_run(State(state.clone()), Json(request)).await;
        assert_eq!(saved_runs(&state).await, 1);
    }

    #[tokio::test]
    async fn test_missing_snapshot_reports_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;

        let Json(body) = api_efficiency(State(state.clone()), scope("outlet", "2511")).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().starts_with("Data unavailable"));

        let Json(body) = api_efficiency(State(state), scope("mart", "2513")).await;
        assert_eq!(body["success"], false);
    }
}
