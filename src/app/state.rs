// ==========================================
// 物料标签打印系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::api::{ConfigApi, ImportApi, MaterialApi, PrintApi, PrinterConfigApi};
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::repository::{MaterialRepository, PrinterConfigRepository};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "MATERIAL_LABEL_DB_PATH";

const DB_FILE_NAME: &str = "material_label.db";

/// 应用状态
///
/// 包含所有API实例和共享资源，所有仓储共用同一个连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 物料API
    pub material_api: Arc<MaterialApi>,

    /// 打印机配置API
    pub printer_config_api: Arc<PrinterConfigApi>,

    /// 打印API
    pub print_api: Arc<PrintApi>,

    /// 导入导出API
    pub import_api: Arc<ImportApi>,

    /// 配置管理API
    pub config_api: Arc<ConfigApi>,

    /// 配置管理器（供界面读取分页大小等）
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并建表（幂等）
    /// 2. 初始化所有Repository
    /// 3. 创建所有API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库初始化失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let material_repo = Arc::new(MaterialRepository::from_connection(conn.clone()));
        let printer_repo = Arc::new(PrinterConfigRepository::from_connection(conn.clone()));
        let config_manager = Arc::new(ConfigManager::from_connection(conn));

        // ==========================================
        // 初始化API层
        // ==========================================
        let material_api = Arc::new(MaterialApi::new(material_repo.clone()));
        let printer_config_api = Arc::new(PrinterConfigApi::new(
            printer_repo.clone(),
            config_manager.clone(),
        ));
        let print_api = Arc::new(PrintApi::new(
            material_repo.clone(),
            printer_repo,
            config_manager.clone(),
        ));
        let import_api = Arc::new(ImportApi::new(material_repo));
        let config_api = Arc::new(ConfigApi::new(config_manager.clone()));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            material_api,
            printer_config_api,
            print_api,
            import_api,
            config_api,
            config_manager,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    // 允许通过环境变量显式指定 DB 路径（便于调试/测试）
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from(format!("./{}", DB_FILE_NAME));

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("material-label");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join(DB_FILE_NAME);
        }
    }

    path.to_string_lossy().to_string()
}
