use serde::Serialize;

/// Which pipeline branch produced the current dashboard state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Direct CSV export request succeeded.
    Live,
    /// Direct request failed, the CORS relay succeeded.
    Proxy,
    /// Both fetch paths or the parse failed; hardcoded snapshot in use.
    Static,
}

#[derive(Debug, Clone, Serialize)]
pub struct TechnicianSeries {
    pub key: String,
    pub name: String,
    /// Collected count per day of month, index = day - 1.
    pub daily: Vec<u32>,
    /// Running sum of `daily`.
    pub cumulative: Vec<u32>,
}

impl TechnicianSeries {
    pub fn total(&self) -> u32 {
        self.cumulative.last().copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    TooFewFields,
    NoDateMatch,
    OutsideWindow,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedRow {
    /// 1-based position within the consumed data section.
    pub row: usize,
    pub reason: SkipReason,
}

/// Per-run parser observability. Malformed rows are skipped silently from the
/// dashboard's point of view but counted here.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseDiagnostics {
    pub rows_seen: usize,
    pub rows_applied: usize,
    pub skipped: Vec<SkippedRow>,
}

impl ParseDiagnostics {
    pub fn skip(&mut self, row: usize, reason: SkipReason) {
        self.skipped.push(SkippedRow { row, reason });
    }
}

/// The whole renderable dashboard. Built fresh by every pipeline run and
/// swapped into shared state wholesale; read-only afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardState {
    pub technicians: Vec<TechnicianSeries>,
    /// Day-of-month labels, "1" through the month's last day.
    pub labels: Vec<String>,
    pub combined_daily: Vec<u32>,
    pub combined_cumulative: Vec<u32>,
    /// Linear goal line: index i holds (i + 1) * per-day rate.
    pub goal: Vec<u32>,
    pub total_collected: u32,
    /// Target minus collected; uncapped, goes negative past the target.
    pub total_pending: i64,
    /// One-decimal percentage of the target collected, e.g. "55.7".
    pub percent_complete: String,
    pub last_update: String,
    pub source: DataSource,
    pub diagnostics: ParseDiagnostics,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamMemberSummary {
    pub key: String,
    pub name: String,
    pub role: String,
    pub avatar: String,
    pub color: String,
    pub total: u32,
    /// Share of the combined total, one decimal ("0.0" when the team total is 0).
    pub share_percent: String,
    /// Average collected per day over the whole month, one decimal.
    pub per_day: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<u32>,
    /// "line" or "bar"; a line dataset inside the bar chart draws the
    /// reference line at the monthly target.
    pub kind: String,
    pub border_color: String,
    /// Fill colors: one entry per bar for bar datasets, a single area color
    /// for filled lines, empty for plain lines.
    pub background: Vec<String>,
    pub fill: bool,
    pub dashed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartPayload {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DayKind {
    Weekend,
    Today,
    WorkDay,
}

impl DayKind {
    pub fn css_class(self) -> &'static str {
        match self {
            DayKind::Weekend => "weekend",
            DayKind::Today => "today",
            DayKind::WorkDay => "work-day",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarCell {
    pub day: u32,
    pub kind: DayKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarGrid {
    pub headers: Vec<String>,
    /// Empty cells before day 1, equal to its weekday-from-Sunday index.
    pub leading_blanks: u32,
    pub cells: Vec<CalendarCell>,
}

/// Everything the page script needs to redraw the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub company: String,
    pub month_label: String,
    pub total_collected: u32,
    pub total_pending: i64,
    pub total_assets: u32,
    pub percent_complete: String,
    pub last_update: String,
    pub source: DataSource,
    pub team: Vec<TeamMemberSummary>,
    pub line_chart: ChartPayload,
    pub bar_chart: ChartPayload,
    pub calendar: CalendarGrid,
    pub diagnostics: ParseDiagnostics,
}
