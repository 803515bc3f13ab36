// ==========================================
// 导入导出集成测试
// ==========================================
// 测试范围:
// 1. Excel / CSV 导入字段映射
// 2. 导出 → 导入往返
// 3. 模板、空文件、不支持的格式
// ==========================================

mod helpers;

use std::path::{Path, PathBuf};

use helpers::api_test_helper::ApiTestEnv;
use helpers::test_data_builder::MaterialBuilder;
use material_label::api::ApiError;
use material_label::domain::ItemStatus;
use rust_xlsxwriter::Workbook;
use tempfile::tempdir;

/// 写一个单工作表 xlsx（第一行为表头）
fn write_xlsx(dir: &Path, name: &str, rows: &[Vec<&str>]) -> PathBuf {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            worksheet
                .write_string(r as u32, c as u16, *value)
                .expect("写入单元格失败");
        }
    }
    let path = dir.join(name);
    workbook.save(&path).expect("保存 xlsx 失败");
    path
}

// ==========================================
// 导入
// ==========================================

#[test]
fn test_import_xlsx_字段映射() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let dir = tempdir().unwrap();
    let path = write_xlsx(
        dir.path(),
        "import.xlsx",
        &[vec!["料桶码", "料品批次", "料品编码"], vec!["B1", "L1", "I1"]],
    );

    let summary = env.import_api.import_file(&path).expect("导入失败");
    assert_eq!(summary.imported, 1);
    assert_eq!(summary.file_name, "import.xlsx");

    let m = &summary.materials[0];
    assert_eq!(m.bucket_code.as_deref(), Some("B1"));
    assert_eq!(m.batch_number.as_deref(), Some("L1"));
    assert_eq!(m.item_code.as_deref(), Some("I1"));
    assert_eq!(m.item_name, None);
    assert_eq!(m.item_status, ItemStatus::Normal);
    assert!(!m.is_batch_locked);
    assert!(!m.is_bucket_locked);
    assert!(m.material_code.starts_with("YCL-"));
    assert_eq!(m.print_order, 1);
}

#[test]
fn test_import_每行生成独立编号() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let dir = tempdir().unwrap();
    let path = write_xlsx(
        dir.path(),
        "many.xlsx",
        &[
            vec!["料桶码", "托盘码"],
            vec!["B1", "P1"],
            vec!["", ""],
            vec!["B2", "P2"],
            vec!["B3", ""],
        ],
    );

    let summary = env.import_api.import_file(&path).expect("导入失败");
    assert_eq!(summary.imported, 3, "空行应被跳过");

    let orders: Vec<_> = summary.materials.iter().map(|m| m.print_order).collect();
    assert_eq!(orders, vec![1, 2, 3]);

    let mut codes: Vec<_> = summary
        .materials
        .iter()
        .map(|m| m.material_code.clone())
        .collect();
    codes.sort();
    codes.dedup();
    assert_eq!(codes.len(), 3);

    assert_eq!(summary.materials[2].pallet_code, None);
}

#[test]
fn test_import_csv() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let dir = tempdir().unwrap();
    let path = dir.path().join("import.csv");
    std::fs::write(
        &path,
        "\u{feff}料桶码,料品批次,规格型号\nB9,L9,25kg/桶\n",
    )
    .unwrap();

    let summary = env.import_api.import_file(&path).expect("导入失败");
    assert_eq!(summary.imported, 1);
    assert_eq!(summary.materials[0].bucket_code.as_deref(), Some("B9"));
    assert_eq!(summary.materials[0].specification.as_deref(), Some("25kg/桶"));
}

#[test]
fn test_import_只有表头() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let dir = tempdir().unwrap();
    let path = write_xlsx(dir.path(), "empty.xlsx", &[vec!["料桶码", "料品批次"]]);

    let err = env.import_api.import_file(&path).unwrap_err();
    assert!(matches!(err, ApiError::ImportError(_)));
    assert_eq!(env.material_api.list(1, 50).unwrap().total, 0);
}

#[test]
fn test_import_不支持的格式() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.txt");
    std::fs::write(&path, "料桶码\nB1\n").unwrap();

    assert!(matches!(
        env.import_api.import_file(&path),
        Err(ApiError::ImportError(_))
    ));
}

#[test]
fn test_preview_file_不落库() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let dir = tempdir().unwrap();
    let path = write_xlsx(
        dir.path(),
        "preview.xlsx",
        &[vec!["料品编码"], vec!["I1"], vec!["I2"]],
    );

    let rows = env.import_api.preview_file(&path).expect("解析失败");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].item_code.as_deref(), Some("I2"));
    assert_eq!(env.material_api.list(1, 50).unwrap().total, 0);
}

// ==========================================
// 导出
// ==========================================

#[test]
fn test_export_import_往返() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let originals = env.insert_materials(vec![
        MaterialBuilder::new(1)
            .item("I1", "石英砂")
            .bucket("B1")
            .batch("L1")
            .pallet("P1")
            .specification("25kg")
            .batch_rule("A+001")
            .build(),
        MaterialBuilder::new(2).bucket("B2").build(),
    ]);

    let file = env.import_api.export_materials(&originals).expect("导出失败");
    assert!(file.filename.starts_with("物料数据导出_"));
    assert!(file.filename.ends_with(".xlsx"));

    let dir = tempdir().unwrap();
    let path = file.save_to_dir(dir.path()).expect("保存失败");

    let target = ApiTestEnv::new().expect("无法创建测试环境");
    let summary = target.import_api.import_file(&path).expect("导入失败");
    assert_eq!(summary.imported, originals.len());

    for (before, after) in originals.iter().zip(summary.materials.iter()) {
        assert_eq!(after.bucket_code, before.bucket_code);
        assert_eq!(after.batch_number, before.batch_number);
        assert_eq!(after.pallet_code, before.pallet_code);
        assert_eq!(after.item_code, before.item_code);
        assert_eq!(after.specification, before.specification);
        assert_eq!(after.batch_rule, before.batch_rule);
        assert_ne!(after.material_code, before.material_code, "导入应生成新编号");
    }
}

#[test]
fn test_export_空数据() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    assert!(matches!(
        env.import_api.export_materials(&[]),
        Err(ApiError::InvalidInput(ref msg)) if msg == "没有数据可导出"
    ));
    assert!(env.import_api.export_all().is_err());
}

#[test]
fn test_template_可被导入() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let template = env.import_api.template().expect("生成模板失败");
    assert_eq!(template.filename, "物料数据导入模板.xlsx");

    let dir = tempdir().unwrap();
    let path = template.save_to_dir(dir.path()).expect("保存失败");

    let rows = env.import_api.preview_file(&path).expect("解析失败");
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].batch_rule.as_deref(),
        Some("供应商字母编号+批次号+流水号")
    );
    assert_eq!(rows[0].bucket_code, None);
}
