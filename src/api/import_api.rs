// ==========================================
// 物料标签打印系统 - 导入导出 API
// ==========================================
// 职责: 表格导入、物料导出、模板下载
// ==========================================

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::material::{ImportRow, Material};
use crate::importer::exporter::{export_materials, import_template, ExportFile};
use crate::importer::material_importer::{read_import_rows, ImportSummary, MaterialImporter};
use crate::repository::material_repo::MaterialRepository;

pub struct ImportApi {
    material_repo: Arc<MaterialRepository>,
    importer: MaterialImporter,
}

impl ImportApi {
    pub fn new(material_repo: Arc<MaterialRepository>) -> Self {
        Self {
            importer: MaterialImporter::new(material_repo.clone()),
            material_repo,
        }
    }

    /// 导入表格文件（.xlsx/.xls/.csv）
    pub fn import_file<P: AsRef<Path>>(&self, file_path: P) -> ApiResult<ImportSummary> {
        Ok(self.importer.import_from_file(file_path)?)
    }

    /// 解析文件但不落库
    pub fn preview_file<P: AsRef<Path>>(&self, file_path: P) -> ApiResult<Vec<ImportRow>> {
        Ok(read_import_rows(file_path)?)
    }

    /// 导出指定物料
    #[instrument(skip(self, materials), fields(count = materials.len()))]
    pub fn export_materials(&self, materials: &[Material]) -> ApiResult<ExportFile> {
        if materials.is_empty() {
            return Err(ApiError::InvalidInput("没有数据可导出".to_string()));
        }
        let file = export_materials(materials, Utc::now().date_naive())?;
        info!(filename = %file.filename, bytes = file.bytes.len(), "导出成功");
        Ok(file)
    }

    /// 导出全部物料（列表顺序）
    pub fn export_all(&self) -> ApiResult<ExportFile> {
        let total = self.material_repo.count()?;
        let (materials, _) = self.material_repo.list_page(total.max(1), 0)?;
        self.export_materials(&materials)
    }

    /// 导入模板
    pub fn template(&self) -> ApiResult<ExportFile> {
        Ok(import_template()?)
    }
}
