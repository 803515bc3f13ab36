// ==========================================
// 物料标签打印系统 - API层错误类型
// ==========================================
// 职责: 汇总各层错误，转换为用户可读的错误消息
// 分类: 校验失败 / 存储失败 / 打印连接失败 / 文件解析失败
// ==========================================

use crate::importer::error::ImportError;
use crate::printer::error::DispatchError;
use crate::repository::error::RepositoryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入校验错误
    // ==========================================
    #[error("数据验证失败: {}", summarize(.0))]
    ValidationFailed(Vec<FieldViolation>),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    // ==========================================
    // 打印错误
    // ==========================================
    #[error("打印机未配置")]
    PrinterNotConfigured,

    #[error("打印失败: {0}")]
    PrintFailed(DispatchError),

    // ==========================================
    // 导入导出错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("文件导出失败: {0}")]
    ExportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 单字段校验失败
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        ApiError::ValidationFailed(vec![FieldViolation::new(field, message)])
    }

    /// 校验失败的字段列表（非校验错误返回空）
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            ApiError::ValidationFailed(violations) => violations,
            _ => &[],
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// 存储错误原样上抛（只区分约束类别），同时记录原因
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::ValidationFailed(vec![FieldViolation::new(&field, message)])
            }
            other => {
                error!(error = %other, "存储操作失败");
                match other {
                    RepositoryError::DatabaseConnectionError(msg) => {
                        ApiError::DatabaseConnectionError(msg)
                    }
                    RepositoryError::LockError(msg) => {
                        ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
                    }
                    RepositoryError::DatabaseTransactionError(msg) => {
                        ApiError::DatabaseTransactionError(msg)
                    }
                    RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
                    RepositoryError::UniqueConstraintViolation(msg) => {
                        ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
                    }
                    RepositoryError::CheckConstraintViolation(msg) => {
                        ApiError::BusinessRuleViolation(format!("检查约束违反: {}", msg))
                    }
                    RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
                    RepositoryError::Other(err) => ApiError::Other(err),
                    RepositoryError::NotFound { .. } | RepositoryError::FieldValueError { .. } => {
                        ApiError::InternalError(other.to_string())
                    }
                }
            }
        }
    }
}

// ==========================================
// 从 ImportError / DispatchError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::ExportError(msg) => ApiError::ExportError(msg),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        ApiError::PrintFailed(err)
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

// ==========================================
// 字段级校验失败
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}
