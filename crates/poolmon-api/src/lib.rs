use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use poolmon_core::alerts::{
    analyze, sort_for_display, suggested_interval_days, upcoming_reminders, MaintenanceSource,
};
use poolmon_core::classify::{classify, status_style, ParameterStatus, StatusStyle};
use poolmon_core::decimal::{normalize_decimal, parse_decimal};
use poolmon_core::dosing::dose_named;
use poolmon_core::ranges::range_for;
use poolmon_core::types::{MaintenanceRecord, Measurement, Parameter, TaskState};
use poolmon_store::{PoolInfo, PoolStore, StoreError};

pub struct AppState {
    ready: AtomicBool,
    store: Mutex<Box<dyn PoolStore>>,
}

pub fn build_app(store: Box<dyn PoolStore>) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        ready: AtomicBool::new(false),
        store: Mutex::new(store),
    });

    let router = Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route(
            "/api/v1/measurements",
            get(list_measurements).post(create_measurement),
        )
        .route("/api/v1/status", get(status_cards))
        .route("/api/v1/alerts", get(alerts))
        .route(
            "/api/v1/maintenance",
            get(list_maintenance).post(create_maintenance),
        )
        .route("/api/v1/maintenance/clear-reminder", post(clear_reminder))
        .route("/api/v1/reminders", get(reminders))
        .route("/api/v1/pool", get(pool_info).put(update_pool_info))
        .route("/api/v1/dosing", post(dosing))
        .with_state(Arc::clone(&state));

    (router, state)
}

pub fn set_ready(state: &Arc<AppState>, is_ready: bool) {
    state.ready.store(is_ready, Ordering::Relaxed);
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn readyz(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.ready.load(Ordering::Relaxed) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

fn error_response(e: StoreError) -> axum::response::Response {
    let status = match &e {
        StoreError::InvalidRecord(_) => StatusCode::UNPROCESSABLE_ENTITY,
        StoreError::UserNotAuthorized(_) | StoreError::UserInactive(_) => StatusCode::FORBIDDEN,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    tracing::warn!(error = %e, "store operation failed");
    (status, Json(serde_json::json!({"error": e.to_string()}))).into_response()
}

fn bad_input(message: String) -> axum::response::Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(serde_json::json!({"error": message})),
    )
        .into_response()
}

// --- Measurements ----------------------------------------------------------

#[derive(Deserialize)]
struct LimitQuery {
    limit: Option<usize>,
}

async fn list_measurements(
    State(state): State<Arc<AppState>>,
    Query(q): Query<LimitQuery>,
) -> impl IntoResponse {
    let store = state.store.lock().await;
    match store.measurements().await {
        Ok(mut all) => {
            if let Some(limit) = q.limit {
                let start = all.len().saturating_sub(limit);
                all.drain(0..start);
            }
            (StatusCode::OK, Json(all)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Measurement as submitted by a client. Numeric cells arrive as decimal
/// strings; comma and point separators are both accepted.
#[derive(Debug, Deserialize)]
pub struct NewMeasurement {
    pub date: NaiveDate,
    /// "HH:MM"
    pub time: String,
    #[serde(default)]
    pub ph: Option<String>,
    #[serde(default)]
    pub conductivity: Option<String>,
    #[serde(default)]
    pub tds: Option<String>,
    #[serde(default)]
    pub salinity: Option<String>,
    #[serde(default)]
    pub orp: Option<String>,
    #[serde(default)]
    pub fac: Option<String>,
    #[serde(default)]
    pub temperature: Option<String>,
}

impl NewMeasurement {
    fn into_measurement(self) -> Result<Measurement, String> {
        let time = NaiveTime::parse_from_str(self.time.trim(), "%H:%M")
            .map_err(|e| format!("bad time {:?}: {}", self.time, e))?;
        Ok(Measurement {
            date: self.date,
            time,
            ph: numeric_field("pH", self.ph.as_deref())?,
            conductivity: numeric_field("Conductividad", self.conductivity.as_deref())?,
            tds: numeric_field("TDS", self.tds.as_deref())?,
            salinity: numeric_field("Sal", self.salinity.as_deref())?,
            orp: numeric_field("ORP", self.orp.as_deref())?,
            fac: numeric_field("FAC", self.fac.as_deref())?,
            temperature: numeric_field("Temperatura", self.temperature.as_deref())?,
        })
    }
}

/// A blank cell is "not measured"; a non-blank cell that fails to parse is
/// an explicit input error, never silently dropped.
fn numeric_field(name: &str, raw: Option<&str>) -> Result<Option<f64>, String> {
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_decimal(s)
            .map(Some)
            .map_err(|e| format!("{}: {}", name, e)),
    }
}

async fn create_measurement(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewMeasurement>,
) -> impl IntoResponse {
    let measurement = match input.into_measurement() {
        Ok(m) => m,
        Err(message) => return bad_input(message),
    };
    let mut store = state.store.lock().await;
    match store.append_measurement(&measurement).await {
        Ok(()) => (StatusCode::CREATED, Json(measurement)).into_response(),
        Err(e) => error_response(e),
    }
}

// --- Dashboard status ------------------------------------------------------

/// One dashboard card: the latest reading of a parameter with its
/// classification and display attributes.
#[derive(Debug, Serialize)]
pub struct StatusCard {
    pub parameter: &'static str,
    pub icon: &'static str,
    pub unit: &'static str,
    pub range_min: f64,
    pub range_max: f64,
    pub value: Option<f64>,
    /// Point-decimal rendering, "--" when unmeasured.
    pub display: String,
    pub status: ParameterStatus,
    pub style: StatusStyle,
}

async fn status_cards(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = state.store.lock().await;
    let measurements = match store.measurements().await {
        Ok(all) => all,
        Err(e) => return error_response(e),
    };
    let latest = measurements.last();

    let cards: Vec<StatusCard> = Parameter::ALL
        .iter()
        .map(|&parameter| {
            let range = range_for(parameter);
            let value = latest.and_then(|m| m.value(parameter));
            let status = match value {
                Some(v) => classify(parameter, v),
                None => ParameterStatus::Unknown,
            };
            StatusCard {
                parameter: parameter.name(),
                icon: range.icon,
                unit: range.unit,
                range_min: range.min,
                range_max: range.max,
                value,
                display: value
                    .map(|v| normalize_decimal(&v.to_string()))
                    .unwrap_or_else(|| "--".to_string()),
                status,
                style: status_style(status),
            }
        })
        .collect();

    (StatusCode::OK, Json(cards)).into_response()
}

// --- Alerts and reminders --------------------------------------------------

#[derive(Deserialize)]
struct TodayQuery {
    /// Override for deterministic output; defaults to the local date.
    today: Option<NaiveDate>,
}

fn resolve_today(q: &TodayQuery) -> NaiveDate {
    q.today
        .unwrap_or_else(|| chrono::Local::now().date_naive())
}

async fn alerts(
    State(state): State<Arc<AppState>>,
    Query(q): Query<TodayQuery>,
) -> impl IntoResponse {
    let today = resolve_today(&q);
    let store = state.store.lock().await;
    let measurements = match store.measurements().await {
        Ok(all) => all,
        Err(e) => return error_response(e),
    };
    // A failed maintenance log degrades the analysis instead of failing it.
    let maintenance = match store.maintenance().await {
        Ok(records) => Some(records),
        Err(e) => {
            tracing::warn!(error = %e, "maintenance log unavailable, analyzing without it");
            None
        }
    };
    let source = match maintenance.as_deref() {
        Some(records) => MaintenanceSource::Records(records),
        None => MaintenanceSource::Unavailable,
    };

    let mut alerts = analyze(&measurements, source, today);
    sort_for_display(&mut alerts);
    (StatusCode::OK, Json(alerts)).into_response()
}

async fn reminders(
    State(state): State<Arc<AppState>>,
    Query(q): Query<TodayQuery>,
) -> impl IntoResponse {
    let today = resolve_today(&q);
    let store = state.store.lock().await;
    match store.maintenance().await {
        Ok(records) => (StatusCode::OK, Json(upcoming_reminders(&records, today))).into_response(),
        Err(e) => error_response(e),
    }
}

// --- Maintenance -----------------------------------------------------------

async fn list_maintenance(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = state.store.lock().await;
    match store.maintenance().await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct NewMaintenance {
    pub date: NaiveDate,
    pub kind: String,
    /// Sheet label ("Bueno", "Regular", "Malo", "Crítico").
    #[serde(default)]
    pub state_before: Option<String>,
    #[serde(default)]
    pub minutes_spent: u32,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub next_due: Option<NaiveDate>,
    /// When set and no explicit `next_due` is given, schedule the next
    /// occurrence at the suggested interval for this task kind.
    #[serde(default)]
    pub schedule_next: bool,
}

async fn create_maintenance(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewMaintenance>,
) -> impl IntoResponse {
    let state_before = match input.state_before.as_deref() {
        None => TaskState::Good,
        Some(label) => match TaskState::from_label(label) {
            Some(s) => s,
            None => return bad_input(format!("unrecognized task state {:?}", label)),
        },
    };
    let next_due = input.next_due.or_else(|| {
        input.schedule_next.then(|| {
            input.date + chrono::Duration::days(suggested_interval_days(&input.kind) as i64)
        })
    });
    let record = MaintenanceRecord {
        date: input.date,
        kind: input.kind,
        state_before,
        minutes_spent: input.minutes_spent,
        notes: input.notes,
        next_due,
    };
    let mut store = state.store.lock().await;
    match store.append_maintenance(&record).await {
        Ok(()) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct ClearReminder {
    pub kind: String,
    pub due: NaiveDate,
}

async fn clear_reminder(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ClearReminder>,
) -> impl IntoResponse {
    let mut store = state.store.lock().await;
    match store.clear_reminder(&input.kind, input.due).await {
        Ok(cleared) => (StatusCode::OK, Json(serde_json::json!({"cleared": cleared}))).into_response(),
        Err(e) => error_response(e),
    }
}

// --- Pool info and dosing --------------------------------------------------

async fn pool_info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = state.store.lock().await;
    match store.pool_info().await {
        Ok(info) => (StatusCode::OK, Json(info)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn update_pool_info(
    State(state): State<Arc<AppState>>,
    Json(info): Json<PoolInfo>,
) -> impl IntoResponse {
    let mut store = state.store.lock().await;
    match store.update_pool_info(&info).await {
        Ok(()) => (StatusCode::OK, Json(info)).into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct DosingRequest {
    /// Chemical id: "ph_minus", "ph_plus", "sal", "cloro_shock",
    /// "alguicida", "clarificador".
    pub chemical: String,
    #[serde(default)]
    pub current: f64,
    #[serde(default)]
    pub target: f64,
    /// Overrides the stored pool volume when set.
    #[serde(default)]
    pub volume_liters: Option<f64>,
}

async fn dosing(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DosingRequest>,
) -> impl IntoResponse {
    let volume = match req.volume_liters {
        Some(v) => v,
        None => {
            let store = state.store.lock().await;
            match store.pool_info().await {
                Ok(info) => info.effective_volume_liters(),
                Err(e) => return error_response(e),
            }
        }
    };
    let outcome = dose_named(volume, &req.chemical, req.current, req.target);
    (StatusCode::OK, Json(outcome)).into_response()
}
