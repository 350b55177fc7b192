use chrono::NaiveDate;
use common::money;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Goal {
    pub id: i64,
    pub title: String,
    pub target_amount: i64,  // Cents
    pub current_amount: i64, // Cents
    pub deadline: Option<NaiveDate>,
    pub category: Option<String>,
}

impl Goal {
    /// Percentage saved so far. Not capped at 100.
    pub fn progress(&self) -> f64 {
        if self.target_amount <= 0 {
            return 0.0;
        }
        self.current_amount as f64 / self.target_amount as f64 * 100.0
    }

    pub fn is_completed(&self) -> bool {
        self.progress() >= 100.0
    }

    pub fn remaining(&self) -> i64 {
        (self.target_amount - self.current_amount).max(0)
    }
}

#[derive(Debug, Serialize)]
pub struct GoalProgress {
    pub goal: Goal,
    pub progress: f64,
    pub remaining: i64,
    pub is_completed: bool,
}

impl From<Goal> for GoalProgress {
    fn from(goal: Goal) -> Self {
        Self {
            progress: goal.progress(),
            remaining: goal.remaining(),
            is_completed: goal.is_completed(),
            goal,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RawGoalRequest {
    #[validate(length(min = 1, max = 128, message = "Title must be 1-128 characters"))]
    pub title: String,
    #[validate(range(exclusive_min = 0.0, message = "Target must be positive"))]
    pub target_amount_dollars: f64,
    #[validate(range(min = 0.0, message = "Saved amount cannot be negative"))]
    #[serde(default)]
    pub current_amount_dollars: f64,
    pub deadline: Option<String>, // 'YYYY-MM-DD'
    pub category: Option<String>,
}

#[derive(Debug)]
pub struct CreateGoalRequest {
    pub title: String,
    pub target_amount: i64,
    pub current_amount: i64,
    pub deadline: Option<NaiveDate>,
    pub category: Option<String>,
}

impl CreateGoalRequest {
    pub fn new(raw: RawGoalRequest) -> Result<Self, String> {
        raw.validate().map_err(|e| e.to_string())?;

        let title = raw.title.trim().to_string();
        if title.is_empty() {
            return Err("Title cannot be empty".to_string());
        }

        let target_amount = money::to_cents(raw.target_amount_dollars)?;
        if target_amount <= 0 {
            return Err("Target must be at least one cent".to_string());
        }

        let deadline = match raw.deadline.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => Some(
                NaiveDate::parse_from_str(d, "%Y-%m-%d")
                    .map_err(|_| "Invalid deadline, expected YYYY-MM-DD".to_string())?,
            ),
            _ => None,
        };

        let current_amount = money::to_cents(raw.current_amount_dollars)?;

        Ok(Self {
            title,
            target_amount,
            current_amount,
            deadline,
            category: raw
                .category
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddFundsRequest {
    #[validate(range(exclusive_min = 0.0, message = "Amount must be positive"))]
    pub amount_dollars: f64,
}

impl AddFundsRequest {
    pub fn cents(&self) -> Result<i64, String> {
        self.validate().map_err(|e| e.to_string())?;
        match money::to_cents(self.amount_dollars)? {
            c if c > 0 => Ok(c),
            _ => Err("Amount must be at least one cent".to_string()),
        }
    }
}
