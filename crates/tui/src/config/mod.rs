use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/spendlog.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    /// Raw `Cookie` header value of an authenticated session.
    pub session_cookie: Option<String>,
    pub timezone: String,
    pub currency_symbol: String,
    pub request_timeout_secs: u64,
    /// Shared history link (`?start=<ISO>&end=<ISO>`) to open on start.
    pub link: Option<String>,
    pub log_file: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            session_cookie: None,
            timezone: "Asia/Kolkata".to_string(),
            currency_symbol: "₹".to_string(),
            request_timeout_secs: 10,
            link: None,
            log_file: "spendlog.log".to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "spendlog_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL of the expense service (e.g. http://127.0.0.1:5000).
    #[arg(long)]
    base_url: Option<String>,
    /// Session cookie sent with every request (e.g. "token=...").
    #[arg(long, env = "SPENDLOG_SESSION_COOKIE", hide_env_values = true)]
    session_cookie: Option<String>,
    /// Override timezone (IANA name) used for calendar days.
    #[arg(long)]
    timezone: Option<String>,
    /// Override currency symbol.
    #[arg(long)]
    currency_symbol: Option<String>,
    /// Open a shared history link, e.g. "?start=2026-04-03T00:00:00.000Z&end=...".
    #[arg(long)]
    link: Option<String>,
    /// Override log file path.
    #[arg(long)]
    log_file: Option<String>,
    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("SPENDLOG"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(session_cookie) = args.session_cookie {
        settings.session_cookie = Some(session_cookie);
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }
    if let Some(currency_symbol) = args.currency_symbol {
        settings.currency_symbol = currency_symbol;
    }
    if let Some(link) = args.link {
        settings.link = Some(link);
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = log_file;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }

    Ok(settings)
}
