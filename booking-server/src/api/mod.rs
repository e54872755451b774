//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`restaurants`] - 餐厅管理和余位查询接口
//! - [`reservations`] - 预订接口
//! - [`reviews`] - 评价资格和评价接口

pub mod health;
pub mod reservations;
pub mod restaurants;
pub mod reviews;

use axum::Router;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Assemble all API routes
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(restaurants::router())
        .merge(reservations::router())
        .merge(reviews::router())
}
