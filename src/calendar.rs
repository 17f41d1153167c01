use crate::config::MonthWindow;
use crate::models::{CalendarCell, CalendarGrid, DayKind};
use chrono::{Datelike, Local, NaiveDate};

const DAY_HEADERS: [&str; 7] = ["DOM", "SEG", "TER", "QUA", "QUI", "SEX", "SAB"];

pub fn build_calendar(window: &MonthWindow) -> CalendarGrid {
    build_calendar_at(window, Local::now().date_naive())
}

/// Builds the 7-column month grid: leading blank cells equal to the weekday
/// index of day 1, then one cell per day. Weekends win over "today", which
/// only applies when the real current date falls inside the window.
pub fn build_calendar_at(window: &MonthWindow, today: NaiveDate) -> CalendarGrid {
    let leading_blanks = window
        .first_day()
        .map(|d| d.weekday().num_days_from_sunday())
        .unwrap_or(0);
    let days = window.days_in_month();
    let in_window = today.year() == window.year && today.month() == window.month;

    let cells = (1..=days)
        .map(|day| {
            let weekday = (leading_blanks + day - 1) % 7;
            let kind = if weekday == 0 || weekday == 6 {
                DayKind::Weekend
            } else if in_window && day == today.day() {
                DayKind::Today
            } else {
                DayKind::WorkDay
            };
            CalendarCell { day, kind }
        })
        .collect();

    CalendarGrid {
        headers: DAY_HEADERS.iter().map(|h| h.to_string()).collect(),
        leading_blanks,
        cells,
    }
}
