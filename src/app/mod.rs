// ==========================================
// 物料标签打印系统 - 应用层
// ==========================================
// 职责: 组装各 API，维护列表视图状态与用户提示
// ==========================================

pub mod notice;
pub mod state;
pub mod view_state;

// 重导出
pub use notice::{Notice, NoticeLevel};
pub use state::{get_default_db_path, AppState, DB_PATH_ENV};
pub use view_state::ViewState;
