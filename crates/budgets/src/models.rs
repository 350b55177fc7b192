use common::{MonthKey, money};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct CategoryLimit {
    pub category: String,
    pub limit: i64, // Cents
}

/// A month's spending plan. `category_limits` keeps the order the user
/// entered them in; alert output follows that order.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Budget {
    pub id: i64,
    pub month: MonthKey,
    pub year: i32,
    pub total_limit: i64, // Cents
    pub category_limits: Vec<CategoryLimit>,
}

impl Budget {
    pub fn limit_for(&self, category: &str) -> Option<i64> {
        self.category_limits
            .iter()
            .find(|l| l.category == category)
            .map(|l| l.limit)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RawCategoryLimit {
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[validate(range(min = 0.0, message = "Category limit cannot be negative"))]
    pub limit_dollars: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RawBudgetRequest {
    pub month: String, // YYYY-MM
    #[validate(range(exclusive_min = 0.0, message = "Total limit must be positive"))]
    pub total_limit_dollars: f64,
    #[validate(nested)]
    #[serde(default)]
    pub category_limits: Vec<RawCategoryLimit>,
}

#[derive(Debug, Serialize)]
pub struct CreateBudgetRequest {
    pub month: MonthKey,
    pub total_limit: i64,
    pub category_limits: Vec<CategoryLimit>,
}

impl CreateBudgetRequest {
    pub fn new(raw: RawBudgetRequest) -> Result<Self, String> {
        raw.validate().map_err(|e| e.to_string())?;

        let month: MonthKey = raw.month.parse().map_err(|e: common::MonthKeyError| e.to_string())?;

        let mut seen = HashSet::new();
        let mut category_limits = Vec::with_capacity(raw.category_limits.len());
        for entry in raw.category_limits {
            let category = entry.category.trim().to_string();
            if category.is_empty() {
                return Err("Category is required".to_string());
            }
            if !seen.insert(category.clone()) {
                return Err(format!("Duplicate category limit: {}", category));
            }
            category_limits.push(CategoryLimit {
                category,
                limit: money::to_cents(entry.limit_dollars)?,
            });
        }

        let total_limit = money::to_cents(raw.total_limit_dollars)?;
        if total_limit <= 0 {
            return Err("Total limit must be at least one cent".to_string());
        }

        Ok(Self {
            month,
            total_limit,
            category_limits,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CopyBudgetRequest {
    pub source_month: String,
    pub target_month: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit(category: &str, dollars: f64) -> RawCategoryLimit {
        RawCategoryLimit { category: category.into(), limit_dollars: dollars }
    }

    fn raw(month: &str, total: f64, limits: Vec<RawCategoryLimit>) -> RawBudgetRequest {
        RawBudgetRequest {
            month: month.into(),
            total_limit_dollars: total,
            category_limits: limits,
        }
    }

    #[test]
    fn test_create_budget_request_keeps_order() {
        let req = CreateBudgetRequest::new(raw(
            "2024-03",
            2000.0,
            vec![limit("Transport", 150.0), limit("Food", 400.0), limit("Fun", 0.0)],
        ))
        .unwrap();

        let order: Vec<&str> = req.category_limits.iter().map(|l| l.category.as_str()).collect();
        assert_eq!(order, vec!["Transport", "Food", "Fun"]);
        assert_eq!(req.total_limit, 200000);
        assert_eq!(req.category_limits[1].limit, 40000);
    }

    #[test]
    fn test_create_budget_request_rejects_bad_input() {
        assert!(CreateBudgetRequest::new(raw("2024-3", 100.0, vec![])).is_err());
        assert!(CreateBudgetRequest::new(raw("2024-03", 0.0, vec![])).is_err());
        assert!(CreateBudgetRequest::new(raw("2024-03", 100.0, vec![limit("Food", -1.0)])).is_err());
        assert!(CreateBudgetRequest::new(raw("2024-03", 100.0, vec![limit("Food", 1.0), limit("Food", 2.0)])).is_err());
    }

    #[test]
    fn test_create_budget_request_rejects_sub_cent_and_huge_totals() {
        let err = CreateBudgetRequest::new(raw("2024-03", 0.001, vec![])).unwrap_err();
        assert_eq!(err, "Total limit must be at least one cent");
        assert!(CreateBudgetRequest::new(raw("2024-03", 1e17, vec![])).is_err());
        assert!(CreateBudgetRequest::new(raw("2024-03", 100.0, vec![limit("Food", 1e17)])).is_err());
    }

    #[test]
    fn test_limit_for() {
        let budget = Budget {
            id: 1,
            month: "2024-03".parse().unwrap(),
            year: 2024,
            total_limit: 100,
            category_limits: vec![CategoryLimit { category: "Food".into(), limit: 50 }],
        };
        assert_eq!(budget.limit_for("Food"), Some(50));
        assert_eq!(budget.limit_for("food"), None);
    }
}
