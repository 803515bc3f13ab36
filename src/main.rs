// ==========================================
// 物料标签打印系统 - 主入口
// ==========================================
// 职责: 初始化日志与数据库，输出当前状态
// ==========================================

use anyhow::anyhow;
use material_label::app::{get_default_db_path, AppState};

fn main() -> anyhow::Result<()> {
    material_label::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", material_label::APP_NAME);
    tracing::info!("系统版本: {}", material_label::VERSION);
    tracing::info!("==================================================");

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;

    let page_size = state.config_manager.page_size()?;
    let page = state.material_api.list(1, page_size)?;
    tracing::info!(total = page.total, "物料记录");

    match state.printer_config_api.get_default()? {
        Some(printer) => tracing::info!(
            name = %printer.printer_name,
            endpoint = %printer.endpoint(),
            "默认打印机"
        ),
        None => tracing::warn!("打印机未配置"),
    }

    for entry in state.config_api.list_configs()? {
        tracing::info!(key = %entry.key, value = %entry.value, is_default = entry.is_default, "配置");
    }

    Ok(())
}
