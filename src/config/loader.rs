use std::{env, time::Duration};

use chrono_tz::Tz;
use url::Url;

use super::env::{
    AppConfig, ChatConfig, ClassifierConfig, ConfigError, DirectoryConfig, LoggingConfig,
    ReportConfig,
};

const DEFAULT_CLASSIFIER_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_ENGINE_LABEL: &str = "Neural Net v2.4 (Indian Context)";
const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Kolkata;

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_lookup(|key| env::var(key).ok())
}

impl AppConfig {
    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_url = var("CLASSIFIER_URL").unwrap_or_else(|| DEFAULT_CLASSIFIER_URL.to_string());
        let base_url = Url::parse(raw_url.trim()).map_err(|err| ConfigError::Invalid {
            key: "CLASSIFIER_URL",
            reason: err.to_string(),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                key: "CLASSIFIER_URL",
                reason: format!("unsupported scheme {}", base_url.scheme()),
            });
        }

        let classifier = ClassifierConfig {
            base_url,
            timeout: Duration::from_millis(parse_millis(&var, "CLASSIFIER_TIMEOUT_MS", 30_000)?),
        };

        let directories = DirectoryConfig {
            logs_dir: var("LOGS_DIR").unwrap_or_else(|| "logs".to_string()),
            data_dir: var("DATA_DIR").unwrap_or_else(|| "data".to_string()),
            history_slot: var("HISTORY_SLOT").unwrap_or_else(|| "scanHistory".to_string()),
        };

        let logging = LoggingConfig {
            level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        };

        let timezone = match var("APP_TIMEZONE") {
            None => DEFAULT_TIMEZONE,
            Some(name) => name.trim().parse::<Tz>().map_err(|_| ConfigError::Invalid {
                key: "APP_TIMEZONE",
                reason: format!("unknown time zone {name}"),
            })?,
        };

        let chat = ChatConfig {
            reply_delay: Duration::from_millis(parse_millis(&var, "CHAT_REPLY_DELAY_MS", 1_200)?),
        };

        let report = ReportConfig {
            filename: var("REPORT_FILENAME").unwrap_or_else(|| "CyberShield_Report.txt".to_string()),
            engine_label: var("REPORT_ENGINE_LABEL")
                .unwrap_or_else(|| DEFAULT_ENGINE_LABEL.to_string()),
        };

        Ok(Self {
            classifier,
            directories,
            logging,
            timezone,
            chat,
            report,
        })
    }
}

fn parse_millis<F>(var: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|err| ConfigError::Invalid {
                key,
                reason: err.to_string(),
            }),
    }
}
