use crate::calendar::build_calendar;
use crate::config::DashboardConfig;
use crate::models::{
    CalendarGrid, ChartDataset, ChartPayload, DashboardResponse, DashboardState,
    TeamMemberSummary,
};
use crate::stats::team_summaries;

/// Assembles the full payload the page script redraws from.
pub fn dashboard_response(config: &DashboardConfig, state: &DashboardState) -> DashboardResponse {
    DashboardResponse {
        company: config.company.name.clone(),
        month_label: config.window.label.clone(),
        total_collected: state.total_collected,
        total_pending: state.total_pending,
        total_assets: config.total_assets,
        percent_complete: state.percent_complete.clone(),
        last_update: state.last_update.clone(),
        source: state.source,
        team: team_summaries(config, state),
        line_chart: build_line_chart(config, state),
        bar_chart: build_bar_chart(config, state),
        calendar: build_calendar(&config.window),
        diagnostics: state.diagnostics.clone(),
    }
}

/// Daily evolution chart: combined cumulative area, each technician's raw
/// daily series and the dashed linear goal line.
pub fn build_line_chart(config: &DashboardConfig, state: &DashboardState) -> ChartPayload {
    let mut datasets = vec![ChartDataset {
        label: "Total Acumulado".to_string(),
        data: state.combined_cumulative.clone(),
        kind: "line".to_string(),
        border_color: "#1a202c".to_string(),
        background: vec!["rgba(26,32,44,0.05)".to_string()],
        fill: true,
        dashed: false,
    }];

    for (tech, series) in config.technicians.iter().zip(&state.technicians) {
        datasets.push(ChartDataset {
            label: format!("{} (por dia)", first_name(&tech.name)),
            data: series.daily.clone(),
            kind: "line".to_string(),
            border_color: tech.color.clone(),
            background: Vec::new(),
            fill: false,
            dashed: false,
        });
    }

    datasets.push(ChartDataset {
        label: format!("Meta ({}/dia)", config.goals.per_day),
        data: state.goal.clone(),
        kind: "line".to_string(),
        border_color: "#a0aec0".to_string(),
        background: Vec::new(),
        fill: false,
        dashed: true,
    });

    ChartPayload {
        labels: state.labels.clone(),
        datasets,
    }
}

/// Individual performance chart: one bar per technician's month total plus a
/// fixed reference line at the monthly target.
pub fn build_bar_chart(config: &DashboardConfig, state: &DashboardState) -> ChartPayload {
    let labels: Vec<String> = config
        .technicians
        .iter()
        .map(|tech| first_name(&tech.name).to_string())
        .collect();
    let totals: Vec<u32> = state.technicians.iter().map(|series| series.total()).collect();
    let colors: Vec<String> = config
        .technicians
        .iter()
        .map(|tech| tech.color.clone())
        .collect();

    ChartPayload {
        labels,
        datasets: vec![
            ChartDataset {
                label: "Coletado".to_string(),
                data: totals,
                kind: "bar".to_string(),
                border_color: String::new(),
                background: colors,
                fill: false,
                dashed: false,
            },
            ChartDataset {
                label: format!("Meta ({})", config.goals.monthly),
                data: vec![config.goals.monthly; config.technicians.len()],
                kind: "line".to_string(),
                border_color: "#e53e3e".to_string(),
                background: Vec::new(),
                fill: false,
                dashed: false,
            },
        ],
    }
}

fn first_name(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or(name)
}

pub fn render_team(team: &[TeamMemberSummary]) -> String {
    team.iter()
        .map(|member| {
            format!(
                r#"<div class="team-member">
  <div class="member-avatar" style="background:{color}">{avatar}</div>
  <div class="member-info">
    <div class="member-name">{name}</div>
    <div class="member-role">{role}</div>
    <div class="member-progress-bar"><div class="member-progress-fill" style="width:{share}%;background:{color}"></div></div>
  </div>
  <div class="member-stats">
    <div class="member-count">{total}</div>
    <div class="member-rate">{per_day} por dia</div>
  </div>
</div>"#,
                color = member.color,
                avatar = member.avatar,
                name = member.name,
                role = member.role,
                share = member.share_percent,
                total = member.total,
                per_day = member.per_day,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_calendar(grid: &CalendarGrid) -> String {
    let mut html = String::new();
    for header in &grid.headers {
        html.push_str(&format!(
            r#"<div class="calendar-day-header">{header}</div>"#
        ));
    }
    for _ in 0..grid.leading_blanks {
        html.push_str(r#"<div class="calendar-day empty"></div>"#);
    }
    for cell in &grid.cells {
        html.push_str(&format!(
            r#"<div class="calendar-day {}">{}</div>"#,
            cell.kind.css_class(),
            cell.day
        ));
    }
    html
}

/// Fills the page template. The same response payload the API serves is
/// embedded for the page script, with `</` escaped so it cannot close the
/// carrying script tag.
pub fn render_index(config: &DashboardConfig, state: &DashboardState) -> String {
    let response = dashboard_response(config, state);
    let percent: f64 = state.percent_complete.parse().unwrap_or(0.0);
    let payload = serde_json::to_string(&response)
        .unwrap_or_else(|_| "{}".to_string())
        .replace("</", "<\\/");

    INDEX_HTML
        .replace("{{COMPANY}}", &config.company.name)
        .replace("{{SUBTITLE}}", &config.company.subtitle)
        .replace("{{MONTH_LABEL}}", &config.window.label)
        .replace("{{COLLECTED}}", &state.total_collected.to_string())
        .replace("{{PENDING}}", &state.total_pending.to_string())
        .replace("{{PERCENT}}", &state.percent_complete)
        .replace("{{LAST_UPDATE}}", &state.last_update)
        .replace("{{COLLECTED_BAR}}", &format!("{percent:.1}"))
        .replace("{{PENDING_BAR}}", &format!("{:.1}", 100.0 - percent))
        .replace("{{PROGRESS_BAR}}", &format!("{percent:.1}"))
        .replace("{{TEAM}}", &render_team(&response.team))
        .replace("{{CALENDAR}}", &render_calendar(&response.calendar))
        .replace("{{REFRESH_MS}}", &(config.refresh_minutes * 60_000).to_string())
        .replace("{{PAYLOAD}}", &payload)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{COMPANY}} — {{SUBTITLE}}</title>
  <script src="https://cdn.jsdelivr.net/npm/chart.js@4"></script>
  <style>
    :root {
      --primary: #0e7490;
      --secondary: #22c55e;
      --ink: #1a202c;
      --neutral: #718096;
      --bg: #fafbfc;
    }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Segoe UI", "Helvetica Neue", Arial, sans-serif;
      padding: 24px 18px 48px;
    }

    .dashboard {
      width: min(1100px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 20px;
    }

    header h1 { margin: 0; font-size: 1.6rem; font-weight: 600; }
    header p { margin: 4px 0 0; color: var(--neutral); }
    header .meta { font-size: 0.85rem; color: #a0aec0; }

    .stats {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
      gap: 16px;
    }

    .stat-card {
      background: white;
      border: 1px solid #e2e8f0;
      border-radius: 12px;
      padding: 18px;
    }

    .stat-card .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--neutral);
    }

    .stat-card .value { font-size: 1.8rem; font-weight: 600; margin: 6px 0 10px; }

    .progress-track {
      height: 6px;
      border-radius: 999px;
      background: #edf2f7;
      overflow: hidden;
    }

    .progress-fill {
      height: 100%;
      border-radius: 999px;
      background: var(--primary);
      transition: width 400ms ease;
    }

    .panels {
      display: grid;
      grid-template-columns: 2fr 1fr;
      gap: 16px;
    }

    @media (max-width: 900px) { .panels { grid-template-columns: 1fr; } }

    .panel {
      background: white;
      border: 1px solid #e2e8f0;
      border-radius: 12px;
      padding: 18px;
    }

    .panel h2 { margin: 0 0 12px; font-size: 1.05rem; font-weight: 600; }

    .chart-box { position: relative; height: 300px; }
    .chart-box canvas { display: none; }
    .chart-loading {
      position: absolute;
      inset: 0;
      display: grid;
      place-items: center;
      color: var(--neutral);
      font-size: 0.9rem;
    }

    .team-member {
      display: flex;
      align-items: center;
      gap: 12px;
      padding: 10px 0;
      border-bottom: 1px solid #edf2f7;
    }
    .team-member:last-child { border-bottom: none; }

    .member-avatar {
      width: 40px;
      height: 40px;
      border-radius: 50%;
      display: grid;
      place-items: center;
      color: white;
      font-weight: 600;
      font-size: 0.85rem;
      flex: none;
    }

    .member-info { flex: 1; }
    .member-name { font-weight: 600; }
    .member-role { font-size: 0.8rem; color: var(--neutral); }

    .member-progress-bar {
      margin-top: 6px;
      height: 4px;
      border-radius: 999px;
      background: #edf2f7;
      overflow: hidden;
    }
    .member-progress-fill { height: 100%; border-radius: 999px; }

    .member-stats { text-align: right; }
    .member-count { font-weight: 600; }
    .member-rate { font-size: 0.8rem; color: var(--neutral); }

    .calendar-grid {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 6px;
    }

    .calendar-day-header {
      text-align: center;
      font-size: 0.7rem;
      color: var(--neutral);
      padding: 4px 0;
    }

    .calendar-day {
      text-align: center;
      padding: 8px 0;
      border-radius: 8px;
      font-size: 0.85rem;
      background: #f7fafc;
    }

    .calendar-day.empty { background: transparent; }
    .calendar-day.weekend { background: #edf2f7; color: #a0aec0; }
    .calendar-day.today { background: var(--primary); color: white; font-weight: 600; }
  </style>
</head>
<body>
  <main class="dashboard">
    <header>
      <h1>{{COMPANY}}</h1>
      <p>{{SUBTITLE}} — {{MONTH_LABEL}}</p>
      <p class="meta">Última atualização: <span id="lastUpdate">{{LAST_UPDATE}}</span></p>
    </header>

    <section class="stats">
      <div class="stat-card">
        <span class="label">Coletados</span>
        <div class="value" id="coletados">{{COLLECTED}}</div>
        <div class="progress-track"><div class="progress-fill" id="coletadosProgress" style="width:{{COLLECTED_BAR}}%"></div></div>
      </div>
      <div class="stat-card">
        <span class="label">Pendentes</span>
        <div class="value" id="pendentes">{{PENDING}}</div>
        <div class="progress-track"><div class="progress-fill" id="pendentesProgress" style="width:{{PENDING_BAR}}%;background:#a0aec0"></div></div>
      </div>
      <div class="stat-card">
        <span class="label">Progresso</span>
        <div class="value" id="progresso">{{PERCENT}}%</div>
        <div class="progress-track"><div class="progress-fill" id="progressoProgress" style="width:{{PROGRESS_BAR}}%;background:var(--secondary)"></div></div>
      </div>
    </section>

    <section class="panels">
      <div class="panel">
        <h2>Evolução Diária</h2>
        <div class="chart-box">
          <div class="chart-loading" id="loadingLine">Carregando...</div>
          <canvas id="lineChart"></canvas>
        </div>
      </div>
      <div class="panel">
        <h2>Performance Individual</h2>
        <div class="chart-box">
          <div class="chart-loading" id="loadingBar">Carregando...</div>
          <canvas id="barChart"></canvas>
        </div>
      </div>
    </section>

    <section class="panels">
      <div class="panel">
        <h2>Equipe</h2>
        <div id="teamMembers">{{TEAM}}</div>
      </div>
      <div class="panel">
        <h2>{{MONTH_LABEL}}</h2>
        <div class="calendar-grid" id="calendarGrid">{{CALENDAR}}</div>
      </div>
    </section>
  </main>

  <script id="dashboard-data" type="application/json">{{PAYLOAD}}</script>
  <script>
    let lineChartInstance = null;
    let barChartInstance = null;

    const toDataset = (ds) => ({
      label: ds.label,
      data: ds.data,
      type: ds.kind,
      borderColor: ds.border_color || 'transparent',
      backgroundColor: ds.background.length > 1 ? ds.background
        : (ds.background[0] || 'transparent'),
      fill: ds.fill,
      borderDash: ds.dashed ? [4, 4] : [],
      tension: 0.1,
      pointRadius: ds.kind === 'line' ? 0 : undefined,
      borderWidth: ds.kind === 'bar' ? 0 : 1.5,
      barThickness: ds.kind === 'bar' ? 40 : undefined
    });

    const buildCharts = (data) => {
      document.getElementById('loadingLine').style.display = 'none';
      document.getElementById('loadingBar').style.display = 'none';
      const lineEl = document.getElementById('lineChart');
      const barEl = document.getElementById('barChart');
      lineEl.style.display = 'block';
      barEl.style.display = 'block';

      if (lineChartInstance) lineChartInstance.destroy();
      if (barChartInstance) barChartInstance.destroy();

      lineChartInstance = new Chart(lineEl, {
        type: 'line',
        data: {
          labels: data.line_chart.labels,
          datasets: data.line_chart.datasets.map(toDataset)
        },
        options: {
          responsive: true,
          maintainAspectRatio: false,
          interaction: { intersect: false, mode: 'index' },
          plugins: { legend: { position: 'top', align: 'end' } },
          scales: { y: { beginAtZero: true } }
        }
      });

      barChartInstance = new Chart(barEl, {
        type: 'bar',
        data: {
          labels: data.bar_chart.labels,
          datasets: data.bar_chart.datasets.map(toDataset)
        },
        options: {
          responsive: true,
          maintainAspectRatio: false,
          plugins: { legend: { position: 'top', align: 'end' } },
          scales: { y: { beginAtZero: true } }
        }
      });
    };

    const renderTeam = (team) => team.map((m) => `
      <div class="team-member">
        <div class="member-avatar" style="background:${m.color}">${m.avatar}</div>
        <div class="member-info">
          <div class="member-name">${m.name}</div>
          <div class="member-role">${m.role}</div>
          <div class="member-progress-bar"><div class="member-progress-fill" style="width:${m.share_percent}%;background:${m.color}"></div></div>
        </div>
        <div class="member-stats">
          <div class="member-count">${m.total}</div>
          <div class="member-rate">${m.per_day} por dia</div>
        </div>
      </div>`).join('');

    const renderCalendar = (cal) => {
      const headers = cal.headers.map((h) => `<div class="calendar-day-header">${h}</div>`);
      const blanks = Array.from({ length: cal.leading_blanks },
        () => '<div class="calendar-day empty"></div>');
      const days = cal.cells.map((c) => `<div class="calendar-day ${c.kind}">${c.day}</div>`);
      return headers.concat(blanks, days).join('');
    };

    const apply = (data) => {
      document.getElementById('coletados').textContent = data.total_collected;
      document.getElementById('pendentes').textContent = data.total_pending;
      document.getElementById('progresso').textContent = data.percent_complete + '%';
      document.getElementById('lastUpdate').textContent = data.last_update;

      const pct = parseFloat(data.percent_complete) || 0;
      document.getElementById('coletadosProgress').style.width = pct + '%';
      document.getElementById('pendentesProgress').style.width = (100 - pct) + '%';
      document.getElementById('progressoProgress').style.width = pct + '%';

      document.getElementById('teamMembers').innerHTML = renderTeam(data.team);
      document.getElementById('calendarGrid').innerHTML = renderCalendar(data.calendar);
      buildCharts(data);
    };

    const refresh = async () => {
      const res = await fetch('/api/dashboard');
      if (!res.ok) throw new Error('refresh failed');
      apply(await res.json());
    };

    apply(JSON.parse(document.getElementById('dashboard-data').textContent));
    setInterval(() => refresh().catch((err) => console.error(err)), {{REFRESH_MS}});
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DataSource, ParseDiagnostics};
    use crate::pipeline::static_state;
    use crate::stats::build_state_at;

    fn config() -> DashboardConfig {
        DashboardConfig::default()
    }

    fn sample_state() -> DashboardState {
        static_state(&config())
    }

    #[test]
    fn line_chart_carries_all_series_and_the_goal() {
        let config = config();
        let state = sample_state();
        let chart = build_line_chart(&config, &state);
        assert_eq!(chart.labels.len(), 31);
        assert_eq!(chart.datasets.len(), 4);
        assert_eq!(chart.datasets[0].label, "Total Acumulado");
        assert!(chart.datasets[3].dashed);
        assert_eq!(chart.datasets[3].data[30], 31 * 60);
    }

    #[test]
    fn bar_chart_has_one_bar_per_technician_and_a_reference_line() {
        let config = config();
        let state = sample_state();
        let chart = build_bar_chart(&config, &state);
        assert_eq!(chart.labels, vec!["Oscar", "Jessica"]);
        assert_eq!(chart.datasets[0].kind, "bar");
        assert_eq!(chart.datasets[0].data, vec![426, 224]);
        assert_eq!(chart.datasets[1].kind, "line");
        assert_eq!(chart.datasets[1].data, vec![584, 584]);
    }

    #[test]
    fn index_page_fills_the_slots() {
        let config = config();
        let state = sample_state();
        let html = render_index(&config, &state);
        assert!(!html.contains("{{"));
        assert!(html.contains("LD CELULOSE"));
        assert!(html.contains(r#"<div class="value" id="coletados">650</div>"#));
        assert!(html.contains(r#"<div class="value" id="pendentes">518</div>"#));
        assert!(html.contains("55.7%"));
        assert!(html.contains("calendar-day-header"));
    }

    #[test]
    fn progress_bars_split_the_percentage() {
        let config = config();
        let state = build_state_at(
            "14/08/2025 09:00".into(),
            &config,
            vec![vec![0; 31], vec![0; 31]],
            DataSource::Live,
            ParseDiagnostics::default(),
        );
        let html = render_index(&config, &state);
        assert!(html.contains(r#"id="coletadosProgress" style="width:0.0%""#));
        assert!(html.contains(r#"id="pendentesProgress" style="width:100.0%"#));
    }

    #[test]
    fn calendar_html_has_blanks_headers_and_days() {
        let grid = crate::calendar::build_calendar_at(
            &config().window,
            chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        );
        let html = render_calendar(&grid);
        assert_eq!(html.matches("calendar-day-header").count(), 7);
        assert_eq!(html.matches("calendar-day empty").count(), 5);
        // Blanks plus one cell per day; headers use a different class.
        assert_eq!(html.matches("calendar-day ").count(), 5 + 31);
    }

    #[test]
    fn team_html_lists_every_member() {
        let config = config();
        let state = sample_state();
        let team = team_summaries(&config, &state);
        let html = render_team(&team);
        assert!(html.contains("Oscar Silva"));
        assert!(html.contains("Jessica Santos"));
        assert_eq!(html.matches("team-member").count(), 2);
    }
}
