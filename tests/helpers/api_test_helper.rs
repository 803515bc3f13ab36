// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 提供API层集成测试的通用环境
// ==========================================

use std::sync::Arc;
use tempfile::NamedTempFile;

use material_label::api::{ConfigApi, ImportApi, MaterialApi, PrintApi, PrinterConfigApi};
use material_label::config::ConfigManager;
use material_label::domain::{Material, NewMaterial, NewPrinterConfig, PrinterConfig};
use material_label::printer::PrintTransport;
use material_label::repository::{MaterialRepository, PrinterConfigRepository};

use crate::test_helpers::{create_test_db, open_shared_connection};

// ==========================================
// API测试环境
// ==========================================

/// API测试环境
///
/// 包含所有API实例和必要的依赖
pub struct ApiTestEnv {
    pub db_path: String,
    pub material_api: Arc<MaterialApi>,
    pub printer_config_api: Arc<PrinterConfigApi>,
    pub print_api: Arc<PrintApi>,
    pub import_api: Arc<ImportApi>,
    pub config_api: Arc<ConfigApi>,

    // Repository层（用于测试数据准备）
    pub material_repo: Arc<MaterialRepository>,
    pub printer_repo: Arc<PrinterConfigRepository>,
    pub config_manager: Arc<ConfigManager>,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl ApiTestEnv {
    /// 创建测试环境（打印按配置走真实通道）
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        Self::build(None)
    }

    /// 创建测试环境（打印走指定通道）
    pub fn with_transport(
        transport: Arc<dyn PrintTransport>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        Self::build(Some(transport))
    }

    fn build(
        transport: Option<Arc<dyn PrintTransport>>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let (temp_file, db_path) = create_test_db()?;
        let conn = open_shared_connection(&db_path)?;

        let material_repo = Arc::new(MaterialRepository::from_connection(conn.clone()));
        let printer_repo = Arc::new(PrinterConfigRepository::from_connection(conn.clone()));
        let config_manager = Arc::new(ConfigManager::from_connection(conn));

        let mut print_api = PrintApi::new(
            material_repo.clone(),
            printer_repo.clone(),
            config_manager.clone(),
        );
        if let Some(transport) = transport {
            print_api = print_api.with_transport(transport);
        }

        Ok(Self {
            db_path,
            material_api: Arc::new(MaterialApi::new(material_repo.clone())),
            printer_config_api: Arc::new(PrinterConfigApi::new(
                printer_repo.clone(),
                config_manager.clone(),
            )),
            print_api: Arc::new(print_api),
            import_api: Arc::new(ImportApi::new(material_repo.clone())),
            config_api: Arc::new(ConfigApi::new(config_manager.clone())),
            material_repo,
            printer_repo,
            config_manager,
            _temp_file: temp_file,
        })
    }

    /// 插入测试物料
    pub fn insert_materials(&self, materials: Vec<NewMaterial>) -> Vec<Material> {
        self.material_repo
            .insert_batch(materials)
            .expect("插入测试物料失败")
    }

    /// 配置默认打印机
    pub fn configure_printer(&self, ip: &str, port: u16) -> PrinterConfig {
        self.printer_config_api
            .create(NewPrinterConfig {
                printer_ip: ip.to_string(),
                printer_port: port,
                is_default: true,
                ..NewPrinterConfig::default()
            })
            .expect("配置打印机失败")
    }
}
