// ==========================================
// 物料标签打印系统 - 表单校验器
// ==========================================
// 职责: 打印机配置表单 / 物料编辑 / 分页参数 / 配置值的字段级校验
// 约束: 收集全部违规后一次性返回，不做部分保存
// ==========================================

use crate::api::error::{ApiError, ApiResult, FieldViolation};
use crate::config::{config_keys, TransportKind};
use crate::domain::material::{MaterialPatch, NewMaterial};
use crate::domain::printer::{NewPrinterConfig, PrinterConfigPatch};
use std::net::Ipv4Addr;

/// 每页条数上限
pub const MAX_PAGE_SIZE: u32 = 1000;

fn finish(violations: Vec<FieldViolation>) -> ApiResult<()> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ApiError::ValidationFailed(violations))
    }
}

/// 点分十进制 IPv4（每段 0-255）
pub fn is_valid_ipv4(value: &str) -> bool {
    value.parse::<Ipv4Addr>().is_ok()
}

fn check_name(violations: &mut Vec<FieldViolation>, value: &str) {
    if value.trim().is_empty() {
        violations.push(FieldViolation::new("printer_name", "请输入打印机名称"));
    }
}

fn check_type(violations: &mut Vec<FieldViolation>, value: &str) {
    if value.trim().is_empty() {
        violations.push(FieldViolation::new("printer_type", "请输入打印机类型"));
    }
}

fn check_ip(violations: &mut Vec<FieldViolation>, value: &str) {
    if !is_valid_ipv4(value.trim()) {
        violations.push(FieldViolation::new("printer_ip", "请输入有效的IP地址"));
    }
}

fn check_port(violations: &mut Vec<FieldViolation>, value: u16) {
    if value == 0 {
        violations.push(FieldViolation::new("printer_port", "端口号范围：1-65535"));
    }
}

/// 打印机配置表单
pub fn validate_printer_form(form: &NewPrinterConfig) -> ApiResult<()> {
    let mut violations = Vec::new();
    check_name(&mut violations, &form.printer_name);
    check_type(&mut violations, &form.printer_type);
    check_ip(&mut violations, &form.printer_ip);
    check_port(&mut violations, form.printer_port);
    finish(violations)
}

/// 打印机配置部分更新（只校验出现的字段）
pub fn validate_printer_patch(patch: &PrinterConfigPatch) -> ApiResult<()> {
    let mut violations = Vec::new();
    if let Some(name) = &patch.printer_name {
        check_name(&mut violations, name);
    }
    if let Some(kind) = &patch.printer_type {
        check_type(&mut violations, kind);
    }
    if let Some(ip) = &patch.printer_ip {
        check_ip(&mut violations, ip);
    }
    if let Some(port) = patch.printer_port {
        check_port(&mut violations, port);
    }
    finish(violations)
}

/// 表单中的端口文本（1-65535）
pub fn parse_port(value: &str) -> ApiResult<u16> {
    match value.trim().parse::<u32>() {
        Ok(port) if (1..=65535).contains(&port) => Ok(port as u16),
        _ => Err(ApiError::field("printer_port", "端口号范围：1-65535")),
    }
}

/// 物料编辑
pub fn validate_material_patch(patch: &MaterialPatch) -> ApiResult<()> {
    let mut violations = Vec::new();
    if let Some(order) = patch.print_order {
        if order < 0 {
            violations.push(FieldViolation::new("print_order", "打印顺序不能为负数"));
        }
    }
    finish(violations)
}

/// 批量新增物料（字段名带批次下标）
pub fn validate_new_materials(materials: &[NewMaterial]) -> ApiResult<()> {
    let mut violations = Vec::new();
    for (index, material) in materials.iter().enumerate() {
        if material.material_code.trim().is_empty() {
            violations.push(FieldViolation::new(
                &format!("materials[{}].material_code", index),
                "原材来料编号不能为空",
            ));
        }
        if material.print_order < 0 {
            violations.push(FieldViolation::new(
                &format!("materials[{}].print_order", index),
                "打印顺序不能为负数",
            ));
        }
    }
    finish(violations)
}

/// 物料编号不可修改
pub fn ensure_code_unchanged(current: &str, requested: Option<&str>) -> ApiResult<()> {
    match requested {
        Some(code) if code != current => Err(ApiError::field(
            "material_code",
            "原材来料编号不可修改",
        )),
        _ => Ok(()),
    }
}

/// 分页参数
pub fn validate_paging(page: u32, page_size: u32) -> ApiResult<()> {
    let mut violations = Vec::new();
    if page < 1 {
        violations.push(FieldViolation::new("page", "页码必须从1开始"));
    }
    if page_size < 1 || page_size > MAX_PAGE_SIZE {
        violations.push(FieldViolation::new(
            "page_size",
            format!("每页条数必须在1-{}之间", MAX_PAGE_SIZE),
        ));
    }
    finish(violations)
}

/// 配置值
pub fn validate_config_value(key: &str, value: &str) -> ApiResult<()> {
    let value = value.trim();
    let ok = match key {
        config_keys::PRINT_BATCH_DELAY_MS => value.parse::<u64>().is_ok(),
        config_keys::PRINT_REQUEST_TIMEOUT_MS => {
            value.parse::<u64>().map(|v| v > 0).unwrap_or(false)
        }
        config_keys::PRINT_TRANSPORT => TransportKind::parse(value).is_some(),
        config_keys::MATERIAL_PAGE_SIZE => value
            .parse::<u32>()
            .map(|v| (1..=MAX_PAGE_SIZE).contains(&v))
            .unwrap_or(false),
        config_keys::LABEL_TITLE => !value.is_empty(),
        _ => return Err(ApiError::InvalidInput(format!("未知配置项: {}", key))),
    };

    if ok {
        Ok(())
    } else {
        Err(ApiError::field(key, format!("配置值无效: {}", value)))
    }
}
