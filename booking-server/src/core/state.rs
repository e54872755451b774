use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::reservations::ReservationManager;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是服务端的核心数据结构，持有所有服务的共享引用。
/// 使用 Arc 实现浅拷贝，克隆成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | SqlitePool | 嵌入式数据库连接池 |
/// | jwt_service | Arc<JwtService> | JWT 校验服务 |
/// | reservations | Arc<ReservationManager> | 预订引擎 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SQLite)
    pub db: SqlitePool,
    /// JWT 校验服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 预订引擎 (容量核算 + 生命周期)
    pub reservations: Arc<ReservationManager>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (确保目录存在)
    /// 2. 数据库 (work_dir/database/booking.db, 自动迁移)
    /// 3. JWT 校验服务
    /// 4. 预订引擎
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        // 0. Ensure work_dir structure exists
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        // 1. Initialize DB
        let db_path = config.database_dir().join("booking.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");
        let db = db_service.pool;

        // 2. Initialize services
        let jwt_service = Arc::new(JwtService::new(&config.jwt));
        let reservations = Arc::new(ReservationManager::new(db.clone()));

        Self {
            config: config.clone(),
            db,
            jwt_service,
            reservations,
        }
    }

    /// 获取数据库连接池
    pub fn get_db(&self) -> SqlitePool {
        self.db.clone()
    }
}
