use crate::config::DashboardConfig;
use crate::models::{
    DashboardState, DataSource, ParseDiagnostics, TeamMemberSummary, TechnicianSeries,
};
use chrono::Local;

/// Folds raw per-day series into the full dashboard state: cumulative sums,
/// combined totals, the linear goal line and the derived scalars. Pure over
/// its inputs apart from the timestamp; `build_state_at` pins it for tests.
pub fn build_state(
    config: &DashboardConfig,
    raw: Vec<Vec<u32>>,
    source: DataSource,
    diagnostics: ParseDiagnostics,
) -> DashboardState {
    build_state_at(
        Local::now().format("%d/%m/%Y %H:%M").to_string(),
        config,
        raw,
        source,
        diagnostics,
    )
}

pub fn build_state_at(
    last_update: String,
    config: &DashboardConfig,
    raw: Vec<Vec<u32>>,
    source: DataSource,
    diagnostics: ParseDiagnostics,
) -> DashboardState {
    let days = config.window.days_in_month() as usize;

    let mut technicians = Vec::with_capacity(config.technicians.len());
    for (index, tech) in config.technicians.iter().enumerate() {
        let mut daily = raw.get(index).cloned().unwrap_or_default();
        daily.resize(days, 0);

        let mut cumulative = Vec::with_capacity(days);
        let mut sum = 0u32;
        for &value in &daily {
            sum = sum.saturating_add(value);
            cumulative.push(sum);
        }

        technicians.push(TechnicianSeries {
            key: tech.key.clone(),
            name: tech.name.clone(),
            daily,
            cumulative,
        });
    }

    let mut combined_daily = vec![0u32; days];
    let mut combined_cumulative = vec![0u32; days];
    for tech in &technicians {
        for (i, &value) in tech.daily.iter().enumerate() {
            combined_daily[i] = combined_daily[i].saturating_add(value);
            combined_cumulative[i] = combined_cumulative[i].saturating_add(tech.cumulative[i]);
        }
    }

    let goal = (1..=days as u32)
        .map(|day| day.saturating_mul(config.goals.per_day))
        .collect();

    let total_collected = technicians
        .iter()
        .fold(0u32, |acc, tech| acc.saturating_add(tech.total()));
    let total_pending = i64::from(config.total_assets) - i64::from(total_collected);
    let percent_complete = format!(
        "{:.1}",
        f64::from(total_collected) / f64::from(config.total_assets) * 100.0
    );

    DashboardState {
        technicians,
        labels: (1..=days).map(|day| day.to_string()).collect(),
        combined_daily,
        combined_cumulative,
        goal,
        total_collected,
        total_pending,
        percent_complete,
        last_update,
        source,
        diagnostics,
    }
}

/// Per-technician summary block: share of the combined total and average
/// per-day rate over the whole month.
pub fn team_summaries(config: &DashboardConfig, state: &DashboardState) -> Vec<TeamMemberSummary> {
    let days = state.labels.len().max(1);
    let combined = state.total_collected;

    config
        .technicians
        .iter()
        .zip(&state.technicians)
        .map(|(tech, series)| {
            let total = series.total();
            let share = if combined > 0 {
                f64::from(total) / f64::from(combined) * 100.0
            } else {
                0.0
            };
            TeamMemberSummary {
                key: tech.key.clone(),
                name: tech.name.clone(),
                role: tech.role.clone(),
                avatar: tech.avatar.clone(),
                color: tech.color.clone(),
                total,
                share_percent: format!("{share:.1}"),
                per_day: format!("{:.1}", f64::from(total) / days as f64),
            }
        })
        .collect()
}
