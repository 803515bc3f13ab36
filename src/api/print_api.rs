// ==========================================
// 物料标签打印系统 - 打印 API
// ==========================================
// 职责: 打印预览 / 单张打印 / 批量打印 / ZPL 文本下载
// 约束: 批量打印严格顺序执行，结果按成功/失败计数返回
// 约束: 数据库锁不跨 await 持有
// ==========================================

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::material::Material;
use crate::domain::printer::PrinterConfig;
use crate::importer::exporter::{zpl_download, ExportFile};
use crate::label::{LabelGenerator, LabelLayout, LabelPreview};
use crate::printer::{build_transport, BatchPrintReport, PrintDispatcher, PrintJob, PrintTransport};
use crate::repository::material_repo::MaterialRepository;
use crate::repository::printer_config_repo::PrinterConfigRepository;

pub struct PrintApi {
    material_repo: Arc<MaterialRepository>,
    printer_repo: Arc<PrinterConfigRepository>,
    config_manager: Arc<ConfigManager>,
    /// 指定投递通道（为空时按配置构造）
    transport: Option<Arc<dyn PrintTransport>>,
}

impl PrintApi {
    pub fn new(
        material_repo: Arc<MaterialRepository>,
        printer_repo: Arc<PrinterConfigRepository>,
        config_manager: Arc<ConfigManager>,
    ) -> Self {
        Self {
            material_repo,
            printer_repo,
            config_manager,
            transport: None,
        }
    }

    /// 使用指定的投递通道
    pub fn with_transport(mut self, transport: Arc<dyn PrintTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// 按当前配置构造标签生成器
    pub fn generator(&self) -> ApiResult<LabelGenerator> {
        Ok(LabelGenerator::new(
            LabelLayout::standard(),
            self.config_manager.label_title()?,
        ))
    }

    /// 按当前配置构造调度器
    pub fn dispatcher(&self) -> ApiResult<PrintDispatcher> {
        let transport = match &self.transport {
            Some(transport) => transport.clone(),
            None => build_transport(
                self.config_manager.transport()?,
                self.config_manager.request_timeout()?,
            )?,
        };
        Ok(PrintDispatcher::new(transport, self.config_manager.batch_delay()?))
    }

    fn default_printer(&self) -> ApiResult<PrinterConfig> {
        self.printer_repo
            .find_default()?
            .ok_or(ApiError::PrinterNotConfigured)
    }

    fn load_material(&self, id: &str) -> ApiResult<Material> {
        self.material_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("物料(id={})不存在", id)))
    }

    // ==========================================
    // 预览与文本下载
    // ==========================================

    /// 打印预览
    pub fn preview(&self, material_id: &str) -> ApiResult<LabelPreview> {
        let material = self.load_material(material_id)?;
        Ok(self.generator()?.preview(&material))
    }

    /// 单张 ZPL 文档
    pub fn document(&self, material_id: &str) -> ApiResult<String> {
        let material = self.load_material(material_id)?;
        Ok(self.generator()?.generate(&material))
    }

    /// 批量 ZPL 文本下载
    pub fn export_documents(&self, materials: &[Material]) -> ApiResult<ExportFile> {
        if materials.is_empty() {
            return Err(ApiError::InvalidInput("请先选择要打印的数据".to_string()));
        }
        let text = self.generator()?.render_batch(materials);
        Ok(zpl_download(text, Utc::now().date_naive()))
    }

    // ==========================================
    // 打印
    // ==========================================

    /// 打印单张标签（按 id）
    pub async fn print_one(&self, material_id: &str) -> ApiResult<()> {
        let material = self.load_material(material_id)?;
        self.print_material(&material).await
    }

    /// 打印单张标签
    #[instrument(skip(self, material), fields(material_code = %material.material_code))]
    pub async fn print_material(&self, material: &Material) -> ApiResult<()> {
        let printer = self.default_printer()?;
        let document = self.generator()?.generate(material);
        let dispatcher = self.dispatcher()?;

        dispatcher
            .send(&document, &printer.endpoint())
            .await
            .map_err(|e| {
                warn!(error = %e, printer = %printer.endpoint(), "打印失败");
                ApiError::PrintFailed(e)
            })?;

        info!(printer = %printer.endpoint(), "打印任务已发送");
        Ok(())
    }

    /// 批量打印（按 id，保持入参顺序）
    ///
    /// 任一 id 已不存在时整批不投递，返回 NotFound
    pub async fn print_batch<F>(&self, ids: &[String], on_progress: F) -> ApiResult<BatchPrintReport>
    where
        F: FnMut(usize, usize) + Send,
    {
        if ids.is_empty() {
            return Err(ApiError::InvalidInput("请先选择要打印的数据".to_string()));
        }

        let materials = self.material_repo.find_by_ids(ids)?;
        if materials.len() != ids.len() {
            let found: HashSet<&str> = materials.iter().map(|m| m.id.as_str()).collect();
            let missing: Vec<&str> = ids
                .iter()
                .map(String::as_str)
                .filter(|id| !found.contains(id))
                .collect();
            warn!(?missing, "批量打印包含已删除的物料");
            return Err(ApiError::NotFound(format!(
                "物料(id={})不存在",
                missing.join(",")
            )));
        }

        self.print_materials(&materials, on_progress).await
    }

    /// 批量打印
    ///
    /// # 说明
    /// - 未选择数据 / 未配置打印机时直接返回错误，不做任何投递
    /// - 单张失败不影响后续，最终 success + failed == 总数
    #[instrument(skip(self, materials, on_progress), fields(count = materials.len()))]
    pub async fn print_materials<F>(
        &self,
        materials: &[Material],
        on_progress: F,
    ) -> ApiResult<BatchPrintReport>
    where
        F: FnMut(usize, usize) + Send,
    {
        if materials.is_empty() {
            return Err(ApiError::InvalidInput("请先选择要打印的数据".to_string()));
        }
        let printer = self.default_printer()?;
        let generator = self.generator()?;
        let dispatcher = self.dispatcher()?;

        let jobs: Vec<PrintJob> = materials
            .iter()
            .map(|m| PrintJob {
                material_code: m.material_code.clone(),
                document: generator.generate(m),
            })
            .collect();

        Ok(dispatcher
            .send_batch(&jobs, &printer.endpoint(), on_progress)
            .await)
    }
}
