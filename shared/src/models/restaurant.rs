//! Restaurant Model

use serde::{Deserialize, Serialize};

/// Restaurant entity (餐厅)
///
/// `chair_amount` is the total seat pool the reservation engine accounts
/// against. `owner_id` is fixed at creation and never reassigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Restaurant {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub chair_amount: i64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantCreate {
    pub name: String,
    pub chair_amount: i64,
}

/// Update restaurant payload (owner edit; owner_id is not editable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantUpdate {
    pub name: Option<String>,
    pub chair_amount: Option<i64>,
    pub is_active: Option<bool>,
}
