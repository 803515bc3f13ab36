// ==========================================
// PrinterConfigApi 集成测试
// ==========================================
// 测试范围:
// 1. 表单校验
// 2. 默认打印机唯一性
// 3. 设置对话框保存语义
// 4. 连接测试
// ==========================================

mod helpers;

use helpers::api_test_helper::ApiTestEnv;
use helpers::mock_printer::{closed_port, start_http_printer};
use helpers::test_data_builder::printer_form;
use material_label::api::ApiError;
use material_label::domain::{NewPrinterConfig, PrinterConfigPatch};

#[test]
fn test_create_校验失败() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let err = env
        .printer_config_api
        .create(printer_form("", "10.0.0.300", 9100, true))
        .unwrap_err();

    let messages: Vec<_> = err.violations().iter().map(|v| v.message.clone()).collect();
    assert!(messages.contains(&"请输入打印机名称".to_string()));
    assert!(messages.contains(&"请输入有效的IP地址".to_string()));
    assert!(env.printer_config_api.list().unwrap().is_empty());
}

#[test]
fn test_create_去除首尾空白() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let config = env
        .printer_config_api
        .create(printer_form("  一号机 ", " 10.0.0.1 ", 9100, false))
        .expect("保存失败");

    assert_eq!(config.printer_name, "一号机");
    assert_eq!(config.printer_ip, "10.0.0.1");
}

#[test]
fn test_set_default_始终唯一() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let a = env
        .printer_config_api
        .create(printer_form("A", "10.0.0.1", 9100, true))
        .expect("保存失败");
    let b = env
        .printer_config_api
        .create(printer_form("B", "10.0.0.2", 9100, true))
        .expect("保存失败");
    let c = env
        .printer_config_api
        .create(printer_form("C", "10.0.0.3", 9100, false))
        .expect("保存失败");

    assert_eq!(env.printer_repo.count_defaults().unwrap(), 1);
    assert_eq!(env.printer_config_api.get_default().unwrap().unwrap().id, b.id);

    env.printer_config_api.set_default(&c.id).expect("切换失败");
    env.printer_config_api.set_default(&a.id).expect("切换失败");

    assert_eq!(env.printer_repo.count_defaults().unwrap(), 1);
    let defaults: Vec<_> = env
        .printer_config_api
        .list()
        .unwrap()
        .into_iter()
        .filter(|p| p.is_default)
        .map(|p| p.id)
        .collect();
    assert_eq!(defaults, vec![a.id]);
}

#[test]
fn test_set_default_不存在时保持原默认() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let a = env
        .printer_config_api
        .create(printer_form("A", "10.0.0.1", 9100, true))
        .expect("保存失败");

    assert!(matches!(
        env.printer_config_api.set_default("missing"),
        Err(ApiError::NotFound(_))
    ));
    assert_eq!(env.printer_config_api.get_default().unwrap().unwrap().id, a.id);
}

#[test]
fn test_save_覆盖已有默认() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let first = env
        .printer_config_api
        .save(NewPrinterConfig::default())
        .expect("保存失败");
    assert!(first.is_default);

    let second = env
        .printer_config_api
        .save(printer_form("二号机", "10.0.0.9", 6101, false))
        .expect("保存失败");

    assert_eq!(second.id, first.id);
    assert!(second.is_default);
    assert_eq!(second.printer_name, "二号机");
    assert_eq!(second.printer_port, 6101);
    assert_eq!(env.printer_config_api.list().unwrap().len(), 1);
}

#[test]
fn test_update_部分字段() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let config = env
        .printer_config_api
        .create(printer_form("A", "10.0.0.1", 9100, true))
        .expect("保存失败");

    let updated = env
        .printer_config_api
        .update(
            &config.id,
            PrinterConfigPatch {
                printer_port: Some(9101),
                ..PrinterConfigPatch::default()
            },
        )
        .expect("更新失败");
    assert_eq!(updated.printer_port, 9101);
    assert_eq!(updated.printer_ip, "10.0.0.1");
    assert!(updated.is_default);

    let err = env
        .printer_config_api
        .update(
            &config.id,
            PrinterConfigPatch {
                printer_port: Some(0),
                ..PrinterConfigPatch::default()
            },
        )
        .unwrap_err();
    assert_eq!(err.violations()[0].message, "端口号范围：1-65535");
}

#[test]
fn test_delete() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let config = env
        .printer_config_api
        .create(printer_form("A", "10.0.0.1", 9100, true))
        .expect("保存失败");

    env.printer_config_api.delete(&config.id).expect("删除失败");
    assert!(env.printer_config_api.get_default().unwrap().is_none());
    assert!(matches!(
        env.printer_config_api.delete(&config.id),
        Err(ApiError::NotFound(_))
    ));
}

// ==========================================
// 连接测试
// ==========================================

#[tokio::test]
async fn test_connection_可达() {
    let (addr, _) = start_http_printer(200).await;
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    env.printer_config_api
        .test_connection(&printer_form("A", &addr.ip().to_string(), addr.port(), true))
        .await
        .expect("连接应成功");
}

#[tokio::test]
async fn test_connection_不可达() {
    let port = closed_port().await;
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let err = env
        .printer_config_api
        .test_connection(&printer_form("A", "127.0.0.1", port, true))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::PrintFailed(_)));
}
