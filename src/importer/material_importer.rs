// ==========================================
// 物料标签打印系统 - 物料导入器
// ==========================================
// 流程: 文件解析 → 字段映射 → 转换 NewMaterial → 单事务落库
// 约束: print_order = 行序 + 1；状态正常、两把锁均未锁定；物料编号新生成
// ==========================================

use crate::domain::material::{ImportRow, Material, NewMaterial};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use crate::repository::MaterialRepository;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};

/// 导入结果
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub file_name: String,
    pub imported: usize,
    pub materials: Vec<Material>,
    pub elapsed_ms: u64,
}

/// 解析文件为导入行（不落库）
pub fn read_import_rows<P: AsRef<Path>>(file_path: P) -> ImportResult<Vec<ImportRow>> {
    let path = file_path.as_ref();
    let records = UniversalFileParser.parse(path)?;
    if records.is_empty() {
        return Err(ImportError::NoData(path.display().to_string()));
    }
    Ok(FieldMapper.map_all(&records))
}

/// 导入行 → 待插入物料（按行序编号）
pub fn rows_to_new_materials(rows: Vec<ImportRow>) -> Vec<NewMaterial> {
    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| row.into_new_material(idx as i32 + 1))
        .collect()
}

// ==========================================
// MaterialImporter - 物料导入器
// ==========================================
pub struct MaterialImporter {
    material_repo: Arc<MaterialRepository>,
}

impl MaterialImporter {
    pub fn new(material_repo: Arc<MaterialRepository>) -> Self {
        Self { material_repo }
    }

    /// 从表格文件导入
    #[instrument(skip(self, file_path), fields(file = %file_path.as_ref().display()))]
    pub fn import_from_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<ImportSummary> {
        let started = Instant::now();
        let path = file_path.as_ref();

        let rows = read_import_rows(path)?;
        let new_materials = rows_to_new_materials(rows);
        let materials = self.material_repo.insert_batch(new_materials)?;

        let summary = ImportSummary {
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            imported: materials.len(),
            materials,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };

        info!(
            imported = summary.imported,
            elapsed_ms = summary.elapsed_ms,
            "物料导入完成"
        );
        Ok(summary)
    }
}
