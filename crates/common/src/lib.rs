use clap::Parser;
use database::Database;

pub mod kind;
pub mod money;
pub mod month;

pub use kind::EntryKind;
pub use month::{MonthKey, MonthKeyError};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Config,
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:budget.db")]
    pub database_url: String,

    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Delay before an expense write is re-checked against its month's budget.
    #[arg(long, env = "ALERT_DELAY_MS", default_value = "500")]
    pub alert_delay_ms: u64,

    /// Notifications kept in memory until a client drains them.
    #[arg(long, env = "NOTIFICATION_CAPACITY", default_value = "50")]
    pub notification_capacity: usize,
}

impl Config {
    pub fn for_tests() -> Self {
        Self {
            database_url: "mem".into(),
            port: 0,
            alert_delay_ms: 0,
            notification_capacity: 50,
        }
    }
}
