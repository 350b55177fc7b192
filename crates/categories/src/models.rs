use common::EntryKind;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Category names are the join key between transactions and budget limits,
/// so they are stored exactly as entered (trimmed, never case-folded).
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub kind: EntryKind,
    pub color: String,
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RawCategoryRequest {
    #[validate(length(min = 1, max = 64, message = "Category name must be 1-64 characters"))]
    pub name: String,
    pub kind: EntryKind,
    pub color: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub kind: EntryKind,
    pub color: String,
    pub icon: Option<String>,
}

impl CreateCategoryRequest {
    pub fn new(raw: RawCategoryRequest, fallback_color: String) -> Result<Self, String> {
        raw.validate().map_err(|e| e.to_string())?;

        let name = raw.name.trim().to_string();
        if name.is_empty() {
            return Err("Category name cannot be empty".to_string());
        }

        let color = match raw.color {
            Some(c) if !c.trim().is_empty() => c.trim().to_string(),
            _ => fallback_color,
        };

        Ok(Self {
            name,
            kind: raw.kind,
            color,
            icon: raw.icon.filter(|i| !i.trim().is_empty()),
        })
    }
}
