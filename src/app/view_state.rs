// ==========================================
// 物料标签打印系统 - 列表视图状态
// ==========================================
// 职责: 已加载记录、勾选集合、搜索关键字、分页
// 约束: 勾选集合始终是已加载记录的子集（重新加载时剔除失效 id）
// 约束: 导出/打印目标均由此对象推导
// ==========================================

use serde::Serialize;

use crate::api::{ApiResult, MaterialApi};
use crate::domain::material::{Material, MaterialPage};

/// 物料列表视图状态
#[derive(Debug, Clone, Serialize)]
pub struct ViewState {
    records: Vec<Material>,
    total: i64,
    /// 勾选的 id（按勾选先后）
    selected: Vec<String>,
    keyword: String,
    page: u32,
    page_size: u32,
}

impl ViewState {
    pub fn new(page_size: u32) -> Self {
        Self {
            records: Vec::new(),
            total: 0,
            selected: Vec::new(),
            keyword: String::new(),
            page: 1,
            page_size,
        }
    }

    pub fn records(&self) -> &[Material] {
        &self.records
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    // ==========================================
    // 加载
    // ==========================================

    /// 以查询结果替换已加载记录，并剔除不再存在的勾选
    pub fn apply_page(&mut self, page: MaterialPage) {
        self.records = page.items;
        self.total = page.total;
        self.page = page.page;
        self.page_size = page.page_size;

        let records = &self.records;
        self.selected
            .retain(|id| records.iter().any(|m| &m.id == id));
    }

    /// 按当前关键字与分页重新查询（空白关键字即全量列表）
    pub fn reload(&mut self, api: &MaterialApi) -> ApiResult<()> {
        let page = api.search(&self.keyword, self.page, self.page_size)?;
        self.apply_page(page);
        Ok(())
    }

    /// 设置关键字并回到第一页
    pub fn set_keyword(&mut self, keyword: &str) {
        self.keyword = keyword.trim().to_string();
        self.page = 1;
    }

    pub fn set_page(&mut self, page: u32, page_size: u32) {
        self.page = page.max(1);
        self.page_size = page_size;
    }

    // ==========================================
    // 勾选
    // ==========================================

    /// 勾选一条已加载记录；未加载的 id 返回 false
    pub fn select(&mut self, id: &str) -> bool {
        if !self.records.iter().any(|m| m.id == id) {
            return false;
        }
        if !self.is_selected(id) {
            self.selected.push(id.to_string());
        }
        true
    }

    pub fn deselect(&mut self, id: &str) {
        self.selected.retain(|s| s != id);
    }

    pub fn toggle(&mut self, id: &str) {
        if self.is_selected(id) {
            self.deselect(id);
        } else {
            self.select(id);
        }
    }

    pub fn select_all(&mut self) {
        self.selected = self.records.iter().map(|m| m.id.clone()).collect();
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    pub fn selected_ids(&self) -> &[String] {
        &self.selected
    }

    pub fn selection_count(&self) -> usize {
        self.selected.len()
    }

    /// 恰好勾选一条时返回该记录（编辑入口）
    pub fn single_selected(&self) -> Option<&Material> {
        match self.selected.as_slice() {
            [id] => self.records.iter().find(|m| &m.id == id),
            _ => None,
        }
    }

    /// 勾选的记录，按列表顺序
    pub fn selected_materials(&self) -> Vec<Material> {
        self.records
            .iter()
            .filter(|m| self.is_selected(&m.id))
            .cloned()
            .collect()
    }

    /// 导出目标：有勾选取勾选，否则取全部已加载记录
    pub fn export_targets(&self) -> Vec<Material> {
        if self.selected.is_empty() {
            self.records.clone()
        } else {
            self.selected_materials()
        }
    }

    /// 批量打印目标（只取勾选）
    pub fn print_targets(&self) -> Vec<Material> {
        self.selected_materials()
    }
}
