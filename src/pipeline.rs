use crate::config::DashboardConfig;
use crate::fallback;
use crate::fetch::{FetchError, Fetcher};
use crate::models::{DashboardState, DataSource, ParseDiagnostics};
use crate::parse::parse_sheet;
use crate::state::AppState;
use crate::stats::build_state;
use std::time::Duration;
use tracing::{error, info, warn};

/// One full pipeline run: fetch -> parse -> aggregate, degrading to the
/// static snapshot on any fetch or parse failure. Always yields a state.
pub async fn run_once(fetcher: &Fetcher, config: &DashboardConfig) -> DashboardState {
    resolve(fetcher.fetch_csv().await, config)
}

/// The synchronous tail of a run, split out so failure paths are testable
/// without a network.
pub fn resolve(
    fetched: Result<(String, DataSource), FetchError>,
    config: &DashboardConfig,
) -> DashboardState {
    match fetched {
        Ok((text, source)) => match parse_sheet(&text, &config.window, &config.technicians) {
            Ok(outcome) => {
                info!(
                    "parsed sheet: {} rows applied, {} skipped",
                    outcome.diagnostics.rows_applied,
                    outcome.diagnostics.skipped.len()
                );
                build_state(config, outcome.series, source, outcome.diagnostics)
            }
            Err(err) => {
                warn!("parse failed, using static snapshot: {err}");
                static_state(config)
            }
        },
        Err(err) => {
            error!("both fetch paths failed, using static snapshot: {err}");
            static_state(config)
        }
    }
}

pub fn static_state(config: &DashboardConfig) -> DashboardState {
    let days = config.window.days_in_month() as usize;
    build_state(
        config,
        fallback::static_series(days),
        DataSource::Static,
        ParseDiagnostics::default(),
    )
}

/// Timer-driven re-entry. Runs are serialized within this task: a slow fetch
/// delays the next tick instead of overlapping it.
pub async fn refresh_loop(app: AppState) {
    let fetcher = Fetcher::new(&app.config.sheet_id);
    let period = Duration::from_secs(app.config.refresh_minutes * 60);
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        let next = run_once(&fetcher, &app.config).await;
        info!(
            "publishing dashboard state: collected={} pending={} source={:?}",
            next.total_collected, next.total_pending, next.source
        );
        *app.dashboard.lock().await = next;
    }
}
