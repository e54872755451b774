//! Coral Booking Server - 餐厅预订平台服务端
//!
//! # 架构概述
//!
//! 本模块是预订平台服务端的主入口，提供以下核心功能：
//!
//! - **预订引擎** (`reservations`): 座位容量核算与预订生命周期
//! - **数据库** (`db`): 嵌入式 SQLite 存储
//! - **认证** (`auth`): JWT 校验 (签发在外部身份服务)
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! booking-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 校验
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层
//! ├── reservations/  # 预订引擎
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod reservations;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use reservations::{ReservationError, ReservationManager};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv, 日志)
///
/// 必须在加载配置之前调用
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

/// 打印启动横幅
pub fn print_banner() {
    println!(
        r#"
   ______                 __
  / ____/___  _________ _/ /
 / /   / __ \/ ___/ __ `/ /
/ /___/ /_/ / /  / /_/ / /
\____/\____/_/   \__,_/_/
    ____              __   _
   / __ )____  ____  / /__(_)___  ____ _
  / __  / __ \/ __ \/ //_/ / __ \/ __ `/
 / /_/ / /_/ / /_/ / ,< / / / / / /_/ /
/_____/\____/\____/_/|_/_/_/ /_/\__, /
                               /____/
    "#
    );
}
