//! Budget alerts: how close each category (and the month as a whole) is to
//! its limit, and the notifications raised when an expense pushes a budget
//! into critical territory.

pub mod aggregate;
pub mod classifier;
pub mod handler;
pub mod notify;
pub mod policy;
pub mod service;
pub mod store;
pub mod summary;

#[cfg(test)]
mod testing;

pub use classifier::{BudgetAlert, BudgetAlerts};
pub use notify::{
    NotificationChannel, NotificationFeed, NotificationTrigger, ScheduledTrigger, Severity,
};
pub use policy::AlertLevel;
pub use service::{AlertService, BudgetAlertReport};
pub use store::{BudgetStore, StoreError, TransactionStore};
pub use summary::AlertSummary;
