use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use std::{env, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    pub company: CompanyConfig,
    pub sheet_id: String,
    pub technicians: Vec<TechnicianConfig>,
    /// Total number of assets to be collected over the month.
    pub total_assets: u32,
    pub goals: GoalsConfig,
    pub window: MonthWindow,
    pub refresh_minutes: u64,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompanyConfig {
    pub name: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TechnicianConfig {
    pub key: String,
    pub name: String,
    pub role: String,
    pub avatar: String,
    pub color: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoalsConfig {
    /// Per-day collection rate the goal line is drawn from.
    pub per_day: u32,
    /// Per-technician monthly target, drawn as the bar chart reference line.
    pub monthly: u32,
}

/// The single calendar month the dashboard displays. Rows outside it are
/// ignored by the parser.
#[derive(Debug, Clone, Deserialize)]
pub struct MonthWindow {
    pub year: i32,
    pub month: u32,
    pub label: String,
}

impl MonthWindow {
    pub fn days_in_month(&self) -> u32 {
        let (ny, nm) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(ny, nm, 1)
            .and_then(|d| d.pred_opt())
            .map(|d| d.day())
            .unwrap_or(31)
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            company: CompanyConfig {
                name: "LD CELULOSE".to_string(),
                subtitle: "Levantamento Físico de Ativos Imobilizados".to_string(),
            },
            sheet_id: "1p7RJr9mecGTC2bvRnnd4rN2bUCjXlZGQ9p8c4dC3W3M".to_string(),
            technicians: vec![
                TechnicianConfig {
                    key: "OSCAR".to_string(),
                    name: "Oscar Silva".to_string(),
                    role: "Técnico Especialista".to_string(),
                    avatar: "OS".to_string(),
                    color: "#22c55e".to_string(),
                },
                TechnicianConfig {
                    key: "JESSICA".to_string(),
                    name: "Jessica Santos".to_string(),
                    role: "Técnica Especialista".to_string(),
                    avatar: "JS".to_string(),
                    color: "#0e7490".to_string(),
                },
            ],
            total_assets: 1168,
            goals: GoalsConfig {
                per_day: 60,
                monthly: 584,
            },
            window: MonthWindow {
                year: 2025,
                month: 8,
                label: "Agosto 2025".to_string(),
            },
            refresh_minutes: 5,
            port: default_port(),
        }
    }
}

impl DashboardConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sheet_id.trim().is_empty() {
            return Err(ConfigError::Invalid("sheet_id must not be empty".into()));
        }
        if self.total_assets == 0 {
            return Err(ConfigError::Invalid(
                "total_assets must be greater than zero".into(),
            ));
        }
        if self.goals.per_day == 0 {
            return Err(ConfigError::Invalid(
                "goals.per_day must be greater than zero".into(),
            ));
        }
        if self.refresh_minutes == 0 {
            return Err(ConfigError::Invalid(
                "refresh_minutes must be greater than zero".into(),
            ));
        }
        if !(1..=12).contains(&self.window.month) {
            return Err(ConfigError::Invalid(
                "window.month must be between 1 and 12".into(),
            ));
        }
        if self.technicians.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one technician must be configured".into(),
            ));
        }
        Ok(())
    }
}

fn default_port() -> u16 {
    8080
}

pub fn resolve_config_path() -> PathBuf {
    if let Ok(path) = env::var("DASHBOARD_CONFIG") {
        return PathBuf::from(path);
    }
    PathBuf::from("config/dashboard.toml")
}

/// Loads the deploy-time configuration. A missing file is not an error: the
/// built-in defaults describe the original deployment.
pub fn load_config() -> Result<DashboardConfig, ConfigError> {
    let path = resolve_config_path();
    let config = match std::fs::read_to_string(&path) {
        Ok(text) => toml::from_str(&text)?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => DashboardConfig::default(),
        Err(err) => return Err(ConfigError::Io(err)),
    };
    config.validate()?;
    Ok(config)
}
