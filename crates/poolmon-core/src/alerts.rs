//! Alert derivation over measurement and maintenance history
//!
//! Everything here is a deterministic pure function over its inputs. The
//! current date is injected by the caller rather than read from the wall
//! clock, so staleness and overdue checks are reproducible in tests.

use chrono::NaiveDate;

use crate::classify::{classify, ParameterStatus};
use crate::ranges::range_for;
use crate::types::{
    Alert, AlertDetails, AlertKind, AlertPriority, MaintenanceRecord, Measurement, OverdueTask,
    Parameter, ParameterFinding,
};

/// Parameters scanned by the critical-alert pass.
///
/// Temperature is deliberately excluded: it is shown on the dashboard but
/// has no danger framing. Do not "fix" this by adding it.
pub const CRITICAL_SCAN: [Parameter; 6] = [
    Parameter::Ph,
    Parameter::Salinity,
    Parameter::Fac,
    Parameter::Orp,
    Parameter::Tds,
    Parameter::Conductivity,
];

/// Days without a measurement before a staleness alert fires.
pub const STALE_AFTER_DAYS: i64 = 3;
/// Days without a measurement before the staleness alert turns high priority.
pub const STALE_URGENT_AFTER_DAYS: i64 = 7;

/// Number of trailing measurements a trend is evaluated over.
const TREND_WINDOW: usize = 3;

/// Maintenance history as seen by the analyzer.
///
/// `Unavailable` keeps the distinction between "the collaborator failed"
/// and "there is no maintenance log": both suppress maintenance alerts,
/// but the caller can still report the failure elsewhere.
#[derive(Debug, Clone, Copy)]
pub enum MaintenanceSource<'a> {
    /// No maintenance log was requested for this pass.
    Absent,
    /// The maintenance collaborator failed; analysis continues without it.
    Unavailable,
    Records(&'a [MaintenanceRecord]),
}

/// Analyze measurement history (chronologically ascending) and produce
/// alerts in fixed emission order: critical parameters, staleness, trends,
/// overdue maintenance. Use [`sort_for_display`] before rendering.
///
/// An empty history yields no alerts; a failed maintenance source only
/// suppresses the overdue-maintenance pass.
pub fn analyze(
    measurements: &[Measurement],
    maintenance: MaintenanceSource<'_>,
    today: NaiveDate,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    let Some(latest) = measurements.last() else {
        return alerts;
    };

    if let Some(alert) = critical_parameters_alert(latest) {
        alerts.push(alert);
    }
    if let Some(alert) = staleness_alert(latest, today) {
        alerts.push(alert);
    }
    alerts.extend(trend_alerts(measurements));
    if let MaintenanceSource::Records(records) = maintenance {
        if let Some(alert) = overdue_maintenance_alert(records, today) {
            alerts.push(alert);
        }
    }

    alerts
}

/// Group alerts by priority for rendering: high before medium, emission
/// order preserved within each group.
pub fn sort_for_display(alerts: &mut [Alert]) {
    // sort_by_key is stable, so emission order survives within a priority.
    alerts.sort_by_key(|a| a.priority);
}

fn critical_parameters_alert(latest: &Measurement) -> Option<Alert> {
    let mut findings = Vec::new();
    for parameter in CRITICAL_SCAN {
        let Some(value) = latest.value(parameter) else {
            continue;
        };
        let status = classify(parameter, value);
        if matches!(status, ParameterStatus::Low | ParameterStatus::High) {
            let range = range_for(parameter);
            findings.push(ParameterFinding {
                parameter,
                value,
                status,
                unit: range.unit,
                icon: range.icon,
            });
        }
    }

    if findings.is_empty() {
        return None;
    }
    Some(Alert {
        kind: AlertKind::Critical,
        priority: AlertPriority::High,
        title: "🚨 Parámetros Críticos",
        message: format!("{} parámetro(s) fuera de rango", findings.len()),
        details: Some(AlertDetails::Parameters(findings)),
    })
}

fn staleness_alert(latest: &Measurement, today: NaiveDate) -> Option<Alert> {
    let days_since = (today - latest.date).num_days();
    if days_since < STALE_AFTER_DAYS {
        return None;
    }
    let priority = if days_since >= STALE_URGENT_AFTER_DAYS {
        AlertPriority::High
    } else {
        AlertPriority::Medium
    };
    Some(Alert {
        kind: AlertKind::Maintenance,
        priority,
        title: "📅 Medición Pendiente",
        message: format!("Han pasado {} días desde la última medición", days_since),
        details: None,
    })
}

fn trend_alerts(measurements: &[Measurement]) -> Vec<Alert> {
    let mut alerts = Vec::new();
    if measurements.len() < TREND_WINDOW {
        return alerts;
    }
    let window = &measurements[measurements.len() - TREND_WINDOW..];

    // pH strictly decreasing across the window and ending below 7.0.
    let ph: Vec<f64> = window.iter().filter_map(|m| m.ph).collect();
    if ph.len() == TREND_WINDOW {
        let strictly_decreasing = ph.windows(2).all(|pair| pair[0] > pair[1]);
        let last = ph[TREND_WINDOW - 1];
        if strictly_decreasing && last < 7.0 {
            alerts.push(Alert {
                kind: AlertKind::Trend,
                priority: AlertPriority::Medium,
                title: "📉 pH en Descenso",
                message: format!("pH bajando consistentemente. Actual: {}", last),
                details: None,
            });
        }
    }

    // FAC persistently below the disinfection floor.
    let fac: Vec<f64> = window.iter().filter_map(|m| m.fac).collect();
    if fac.len() == TREND_WINDOW && fac.iter().all(|v| *v < 1.0) {
        alerts.push(Alert {
            kind: AlertKind::Trend,
            priority: AlertPriority::Medium,
            title: "🟡 FAC Persistentemente Bajo",
            message: "FAC por debajo de 1.0 ppm en últimas 3 mediciones".to_string(),
            details: None,
        });
    }

    alerts
}

fn overdue_maintenance_alert(records: &[MaintenanceRecord], today: NaiveDate) -> Option<Alert> {
    let mut overdue = Vec::new();
    for record in records {
        let Some(due) = record.next_due else {
            continue;
        };
        if due > today {
            continue;
        }
        // Resolved once any record of the same kind is dated on or after
        // the due date, even if that record carries no reminder itself.
        let resolved = records
            .iter()
            .any(|other| other.kind == record.kind && other.date >= due);
        if !resolved {
            overdue.push(OverdueTask {
                kind: record.kind.clone(),
                due,
            });
        }
    }

    if overdue.is_empty() {
        return None;
    }
    Some(Alert {
        kind: AlertKind::Maintenance,
        priority: AlertPriority::High,
        title: "🔧 Mantenimiento Vencido",
        message: format!("{} tarea(s) de mantenimiento pendiente(s)", overdue.len()),
        details: Some(AlertDetails::Tasks(overdue)),
    })
}

// ---------------------------------------------------------------------------
// Upcoming reminders
// ---------------------------------------------------------------------------

/// Proximity bucket of a future reminder, used for dashboard coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderUrgency {
    /// Due within 2 days.
    Imminent,
    /// Due within a week.
    Soon,
    Scheduled,
}

/// A not-yet-due maintenance reminder.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct UpcomingReminder {
    pub kind: String,
    pub due: NaiveDate,
    pub days_until: i64,
    pub urgency: ReminderUrgency,
}

/// Future reminders (due strictly after `today`), soonest first.
pub fn upcoming_reminders(
    records: &[MaintenanceRecord],
    today: NaiveDate,
) -> Vec<UpcomingReminder> {
    let mut upcoming: Vec<UpcomingReminder> = records
        .iter()
        .filter_map(|record| {
            let due = record.next_due?;
            if due <= today {
                return None;
            }
            let days_until = (due - today).num_days();
            let urgency = if days_until <= 2 {
                ReminderUrgency::Imminent
            } else if days_until <= 7 {
                ReminderUrgency::Soon
            } else {
                ReminderUrgency::Scheduled
            };
            Some(UpcomingReminder {
                kind: record.kind.clone(),
                due,
                days_until,
                urgency,
            })
        })
        .collect();
    upcoming.sort_by_key(|r| r.due);
    upcoming
}

/// Suggested days until the next occurrence of a task kind.
pub fn suggested_interval_days(kind: &str) -> u32 {
    match kind {
        "Limpieza filtro" => 5,
        "Adición de químicos" => 3,
        "Limpieza skimmers" => 3,
        "Aspirado fondo" => 3,
        "Calibración sondas" => 30,
        "Revisión célula sal" => 30,
        "Cambio filtro" => 365,
        _ => 14,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaskState;
    use chrono::NaiveTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn measurement(day: NaiveDate, ph: f64, fac: f64) -> Measurement {
        Measurement {
            date: day,
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            ph: Some(ph),
            conductivity: Some(6000.0),
            tds: Some(3000.0),
            salinity: Some(3000.0),
            orp: Some(700.0),
            fac: Some(fac),
            temperature: Some(26.0),
        }
    }

    fn task(day: NaiveDate, kind: &str, next_due: Option<NaiveDate>) -> MaintenanceRecord {
        MaintenanceRecord {
            date: day,
            kind: kind.to_string(),
            state_before: TaskState::Good,
            minutes_spent: 15,
            notes: String::new(),
            next_due,
        }
    }

    /// Fixed "today" used across tests.
    fn today() -> NaiveDate {
        date(2024, 6, 10)
    }

    // --- Critical parameters -------------------------------------------------

    #[test]
    fn test_low_ph_yields_exactly_one_finding() {
        let mut m = measurement(today(), 6.8, 1.5);
        m.salinity = Some(3000.0); // in range
        let alerts = analyze(&[m], MaintenanceSource::Absent, today());

        assert_eq!(alerts.len(), 1);
        let alert = &alerts[0];
        assert_eq!(alert.kind, AlertKind::Critical);
        assert_eq!(alert.priority, AlertPriority::High);
        assert_eq!(alert.message, "1 parámetro(s) fuera de rango");
        match alert.details.as_ref().unwrap() {
            AlertDetails::Parameters(findings) => {
                assert_eq!(findings.len(), 1);
                assert_eq!(findings[0].parameter, Parameter::Ph);
                assert_eq!(findings[0].status, ParameterStatus::Low);
                assert_eq!(findings[0].value, 6.8);
            }
            other => panic!("expected parameter details, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_temperature_is_not_critical() {
        let mut m = measurement(today(), 7.4, 1.5);
        m.temperature = Some(40.0); // out of range but excluded from the scan
        let alerts = analyze(&[m], MaintenanceSource::Absent, today());
        assert!(
            alerts.is_empty(),
            "temperature must not trigger the critical scan: {:?}",
            alerts
        );
    }

    #[test]
    fn test_missing_parameter_is_skipped() {
        let mut m = measurement(today(), 7.4, 1.5);
        m.orp = None;
        let alerts = analyze(&[m], MaintenanceSource::Absent, today());
        assert!(alerts.is_empty());
    }

    // --- Staleness -----------------------------------------------------------

    #[test]
    fn test_two_day_old_measurement_is_not_stale() {
        let m = measurement(today() - chrono::Duration::days(2), 7.4, 1.5);
        let alerts = analyze(&[m], MaintenanceSource::Absent, today());
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_five_day_staleness_is_medium_priority() {
        let m = measurement(today() - chrono::Duration::days(5), 7.4, 1.5);
        let alerts = analyze(&[m], MaintenanceSource::Absent, today());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::Maintenance);
        assert_eq!(alerts[0].priority, AlertPriority::Medium);
        assert_eq!(
            alerts[0].message,
            "Han pasado 5 días desde la última medición"
        );
    }

    #[test]
    fn test_eight_day_staleness_is_high_priority() {
        let m = measurement(today() - chrono::Duration::days(8), 7.4, 1.5);
        let alerts = analyze(&[m], MaintenanceSource::Absent, today());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].priority, AlertPriority::High);
    }

    #[test]
    fn test_exactly_three_days_fires_staleness() {
        let m = measurement(today() - chrono::Duration::days(3), 7.4, 1.5);
        let alerts = analyze(&[m], MaintenanceSource::Absent, today());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].priority, AlertPriority::Medium);
    }

    // --- Trends --------------------------------------------------------------

    #[test]
    fn test_monotonic_ph_descent_below_seven_fires_trend() {
        let days = [
            today() - chrono::Duration::days(2),
            today() - chrono::Duration::days(1),
            today(),
        ];
        let history = vec![
            measurement(days[0], 7.5, 1.5),
            measurement(days[1], 7.3, 1.5),
            measurement(days[2], 6.9, 1.5),
        ];
        let alerts = analyze(&history, MaintenanceSource::Absent, today());

        // 6.9 is also below the optimal pH range, so the critical alert
        // fires first; the trend alert follows.
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].kind, AlertKind::Critical);
        assert_eq!(alerts[1].kind, AlertKind::Trend);
        assert_eq!(alerts[1].title, "📉 pH en Descenso");
        assert_eq!(alerts[1].message, "pH bajando consistentemente. Actual: 6.9");
    }

    #[test]
    fn test_non_monotonic_ph_does_not_fire_trend() {
        let history = vec![
            measurement(today() - chrono::Duration::days(2), 7.5, 1.5),
            measurement(today() - chrono::Duration::days(1), 7.6, 1.5),
            measurement(today(), 6.9, 1.5),
        ];
        let alerts = analyze(&history, MaintenanceSource::Absent, today());
        assert!(
            !alerts.iter().any(|a| a.kind == AlertKind::Trend),
            "non-monotonic descent must not fire a trend alert: {:?}",
            alerts
        );
    }

    #[test]
    fn test_descending_ph_ending_above_seven_does_not_fire() {
        let history = vec![
            measurement(today() - chrono::Duration::days(2), 7.6, 1.5),
            measurement(today() - chrono::Duration::days(1), 7.5, 1.5),
            measurement(today(), 7.4, 1.5),
        ];
        let alerts = analyze(&history, MaintenanceSource::Absent, today());
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_persistently_low_fac_fires_trend() {
        let history = vec![
            measurement(today() - chrono::Duration::days(2), 7.4, 0.8),
            measurement(today() - chrono::Duration::days(1), 7.4, 0.5),
            measurement(today(), 7.4, 0.9),
        ];
        let alerts = analyze(&history, MaintenanceSource::Absent, today());

        // Latest FAC 0.9 is below range, so critical fires too.
        let trend: Vec<_> = alerts.iter().filter(|a| a.kind == AlertKind::Trend).collect();
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].title, "🟡 FAC Persistentemente Bajo");
        assert_eq!(trend[0].priority, AlertPriority::Medium);
    }

    #[test]
    fn test_trends_need_three_measurements() {
        let history = vec![
            measurement(today() - chrono::Duration::days(1), 7.5, 0.5),
            measurement(today(), 6.9, 0.5),
        ];
        let alerts = analyze(&history, MaintenanceSource::Absent, today());
        assert!(!alerts.iter().any(|a| a.kind == AlertKind::Trend));
    }

    #[test]
    fn test_trend_window_is_exactly_last_three() {
        // Older out-of-window descent must not matter; the last three are
        // not strictly decreasing.
        let history = vec![
            measurement(today() - chrono::Duration::days(4), 7.8, 1.5),
            measurement(today() - chrono::Duration::days(3), 7.5, 1.5),
            measurement(today() - chrono::Duration::days(2), 6.9, 1.5),
            measurement(today() - chrono::Duration::days(1), 6.9, 1.5),
            measurement(today(), 6.8, 1.5),
        ];
        let alerts = analyze(&history, MaintenanceSource::Absent, today());
        assert!(!alerts.iter().any(|a| a.kind == AlertKind::Trend));
    }

    // --- Overdue maintenance -------------------------------------------------

    #[test]
    fn test_unresolved_reminder_is_overdue() {
        let m = measurement(today(), 7.4, 1.5);
        let records = vec![task(
            today() - chrono::Duration::days(10),
            "Limpieza filtro",
            Some(today() - chrono::Duration::days(2)),
        )];
        let alerts = analyze(&[m], MaintenanceSource::Records(&records), today());

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].title, "🔧 Mantenimiento Vencido");
        assert_eq!(alerts[0].priority, AlertPriority::High);
        match alerts[0].details.as_ref().unwrap() {
            AlertDetails::Tasks(tasks) => {
                assert_eq!(tasks.len(), 1);
                assert_eq!(tasks[0].kind, "Limpieza filtro");
            }
            other => panic!("expected task details, got {:?}", other),
        }
    }

    #[test]
    fn test_later_same_kind_record_resolves_reminder() {
        let m = measurement(today(), 7.4, 1.5);
        let due = today() - chrono::Duration::days(2);
        let records = vec![
            task(today() - chrono::Duration::days(10), "Limpieza filtro", Some(due)),
            // Later record of the same kind, itself without a reminder.
            task(today() - chrono::Duration::days(1), "Limpieza filtro", None),
        ];
        let alerts = analyze(&[m], MaintenanceSource::Records(&records), today());
        assert!(alerts.is_empty(), "resolved reminder must not alert: {:?}", alerts);
    }

    #[test]
    fn test_later_record_of_other_kind_does_not_resolve() {
        let m = measurement(today(), 7.4, 1.5);
        let due = today() - chrono::Duration::days(2);
        let records = vec![
            task(today() - chrono::Duration::days(10), "Limpieza filtro", Some(due)),
            task(today() - chrono::Duration::days(1), "Aspirado fondo", None),
        ];
        let alerts = analyze(&[m], MaintenanceSource::Records(&records), today());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].title, "🔧 Mantenimiento Vencido");
    }

    #[test]
    fn test_future_reminder_is_not_overdue() {
        let m = measurement(today(), 7.4, 1.5);
        let records = vec![task(
            today(),
            "Limpieza filtro",
            Some(today() + chrono::Duration::days(5)),
        )];
        let alerts = analyze(&[m], MaintenanceSource::Records(&records), today());
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_unavailable_maintenance_does_not_disturb_analysis() {
        let m = measurement(today() - chrono::Duration::days(5), 6.8, 1.5);
        let alerts = analyze(&[m], MaintenanceSource::Unavailable, today());
        // Critical + staleness still fire; no maintenance-overdue alert.
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].kind, AlertKind::Critical);
        assert_eq!(alerts[1].title, "📅 Medición Pendiente");
    }

    // --- General -------------------------------------------------------------

    #[test]
    fn test_empty_history_yields_no_alerts() {
        let alerts = analyze(&[], MaintenanceSource::Absent, today());
        assert!(alerts.is_empty());

        let records = vec![task(today(), "Limpieza filtro", Some(today()))];
        let alerts = analyze(&[], MaintenanceSource::Records(&records), today());
        assert!(
            alerts.is_empty(),
            "no measurements means no analysis pass at all"
        );
    }

    #[test]
    fn test_display_order_groups_high_before_medium() {
        // Critical (high), staleness at 5 days (medium), pH trend (medium),
        // overdue maintenance (high).
        let days = [
            today() - chrono::Duration::days(7),
            today() - chrono::Duration::days(6),
            today() - chrono::Duration::days(5),
        ];
        let history = vec![
            measurement(days[0], 7.5, 1.5),
            measurement(days[1], 7.3, 1.5),
            measurement(days[2], 6.9, 1.5),
        ];
        let records = vec![task(
            today() - chrono::Duration::days(20),
            "Limpieza filtro",
            Some(today() - chrono::Duration::days(1)),
        )];

        let mut alerts = analyze(&history, MaintenanceSource::Records(&records), today());
        assert_eq!(alerts.len(), 4);

        sort_for_display(&mut alerts);
        assert_eq!(alerts[0].kind, AlertKind::Critical);
        assert_eq!(alerts[1].title, "🔧 Mantenimiento Vencido");
        assert_eq!(alerts[2].title, "📅 Medición Pendiente");
        assert_eq!(alerts[3].kind, AlertKind::Trend);
        assert!(alerts
            .windows(2)
            .all(|pair| pair[0].priority <= pair[1].priority));
    }

    // --- Upcoming reminders --------------------------------------------------

    #[test]
    fn test_upcoming_reminders_sorted_and_bucketed() {
        let records = vec![
            task(today(), "Calibración sondas", Some(today() + chrono::Duration::days(20))),
            task(today(), "Limpieza filtro", Some(today() + chrono::Duration::days(1))),
            task(today(), "Aspirado fondo", Some(today() + chrono::Duration::days(5))),
            // Already due: belongs to the overdue pass, not here.
            task(today(), "Limpieza skimmers", Some(today())),
            task(today(), "Limpieza bomba", None),
        ];
        let upcoming = upcoming_reminders(&records, today());

        assert_eq!(upcoming.len(), 3);
        assert_eq!(upcoming[0].kind, "Limpieza filtro");
        assert_eq!(upcoming[0].urgency, ReminderUrgency::Imminent);
        assert_eq!(upcoming[1].kind, "Aspirado fondo");
        assert_eq!(upcoming[1].urgency, ReminderUrgency::Soon);
        assert_eq!(upcoming[2].kind, "Calibración sondas");
        assert_eq!(upcoming[2].urgency, ReminderUrgency::Scheduled);
    }

    #[test]
    fn test_suggested_intervals() {
        assert_eq!(suggested_interval_days("Limpieza filtro"), 5);
        assert_eq!(suggested_interval_days("Cambio filtro"), 365);
        assert_eq!(suggested_interval_days("Otro"), 14);
    }
}
