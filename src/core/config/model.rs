use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportCfg {
    #[serde(default = "default_true")] pub enabled: bool,
    #[serde(default = "default_report_interval")] pub interval_secs: u64,
    #[serde(default)] pub include_max: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingCfg {
    #[serde(default = "default_log_level")] pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppCfg {
    #[serde(default)] pub report: ReportCfg,
    #[serde(default)] pub logging: LoggingCfg,
}

fn default_true() -> bool { true }
fn default_report_interval() -> u64 { 5 }
fn default_log_level() -> String { "info".to_string() }

impl Default for ReportCfg {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            interval_secs: default_report_interval(),
            include_max: false,
        }
    }
}

impl Default for LoggingCfg {
    fn default() -> Self {
        Self { log_level: default_log_level() }
    }
}

impl Default for AppCfg {
    fn default() -> Self {
        Self {
            report: ReportCfg::default(),
            logging: LoggingCfg::default(),
        }
    }
}
