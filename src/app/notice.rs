// ==========================================
// 物料标签打印系统 - 用户提示
// ==========================================
// 职责: 操作结果 → 本地化提示文本（成功/警告/错误）
// ==========================================

use serde::Serialize;

use crate::api::ApiError;
use crate::i18n::{t, t_with_args};

/// 提示级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// 面向用户的提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    // ===== 打印 =====
    PrintSent,
    PrintFailed,
    PrintProgress { current: usize, total: usize },
    BatchPrintFinished { success: usize, failed: usize },
    PrinterNotConfigured,
    SelectToPrint,

    // ===== 列表维护 =====
    SelectToDelete,
    Deleted { count: usize },
    SelectOneToEdit,
    BatchLockChanged { locked: bool },
    BucketLockChanged { locked: bool },
    MaterialUpdated,
    UpdateFailed,
    OperationFailed,
    LoadFailed,
    SearchFailed,

    // ===== 导入导出 =====
    NoDataToExport,
    ExportSucceeded,
    TemplateDownloaded,
    InvalidFileType,
    SelectFileToImport,
    ImportEmpty,
    Imported { count: usize },
    ImportFailed,

    // ===== 打印机设置 =====
    PrinterConfigUpdated,
    PrinterConfigSaved,
    SaveFailed,
}

impl Notice {
    pub fn level(&self) -> NoticeLevel {
        use Notice::*;
        match self {
            PrintSent | BatchPrintFinished { .. } | Deleted { .. } | BatchLockChanged { .. }
            | BucketLockChanged { .. } | MaterialUpdated | ExportSucceeded
            | TemplateDownloaded | Imported { .. } | PrinterConfigUpdated
            | PrinterConfigSaved => NoticeLevel::Success,
            PrintProgress { .. } => NoticeLevel::Info,
            PrinterNotConfigured | SelectToPrint | SelectToDelete | SelectOneToEdit
            | NoDataToExport | SelectFileToImport | ImportEmpty => NoticeLevel::Warning,
            PrintFailed | UpdateFailed | OperationFailed | LoadFailed | SearchFailed
            | InvalidFileType | ImportFailed | SaveFailed => NoticeLevel::Error,
        }
    }

    /// i18n 键
    pub fn key(&self) -> &'static str {
        use Notice::*;
        match self {
            PrintSent => "notice.print_sent",
            PrintFailed => "notice.print_failed",
            PrintProgress { .. } => "notice.print_progress",
            BatchPrintFinished { .. } => "notice.batch_print_finished",
            PrinterNotConfigured => "notice.printer_not_configured",
            SelectToPrint => "notice.select_to_print",
            SelectToDelete => "notice.select_to_delete",
            Deleted { .. } => "notice.deleted",
            SelectOneToEdit => "notice.select_one_to_edit",
            BatchLockChanged { locked: true } => "notice.batch_locked",
            BatchLockChanged { locked: false } => "notice.batch_unlocked",
            BucketLockChanged { locked: true } => "notice.bucket_locked",
            BucketLockChanged { locked: false } => "notice.bucket_unlocked",
            MaterialUpdated => "notice.material_updated",
            UpdateFailed => "notice.update_failed",
            OperationFailed => "notice.operation_failed",
            LoadFailed => "notice.load_failed",
            SearchFailed => "notice.search_failed",
            NoDataToExport => "notice.no_data_to_export",
            ExportSucceeded => "notice.export_succeeded",
            TemplateDownloaded => "notice.template_downloaded",
            InvalidFileType => "notice.invalid_file_type",
            SelectFileToImport => "notice.select_file_to_import",
            ImportEmpty => "notice.import_empty",
            Imported { .. } => "notice.imported",
            ImportFailed => "notice.import_failed",
            PrinterConfigUpdated => "notice.printer_config_updated",
            PrinterConfigSaved => "notice.printer_config_saved",
            SaveFailed => "notice.save_failed",
        }
    }

    /// 当前语言下的提示文本
    pub fn message(&self) -> String {
        match self {
            Notice::PrintProgress { current, total } => t_with_args(
                self.key(),
                &[("current", &current.to_string()), ("total", &total.to_string())],
            ),
            Notice::BatchPrintFinished { success, failed } => t_with_args(
                self.key(),
                &[("success", &success.to_string()), ("failed", &failed.to_string())],
            ),
            Notice::Deleted { count } | Notice::Imported { count } => {
                t_with_args(self.key(), &[("count", &count.to_string())])
            }
            _ => t(self.key()),
        }
    }

    /// 将接口错误归到对应的提示（fallback 为该操作的通用失败提示）
    pub fn from_error(err: &ApiError, fallback: Notice) -> Notice {
        match err {
            ApiError::PrinterNotConfigured => Notice::PrinterNotConfigured,
            ApiError::PrintFailed(_) => Notice::PrintFailed,
            ApiError::ImportError(_) => Notice::ImportFailed,
            _ => fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{set_locale, LOCALE_TEST_LOCK};
    use crate::printer::DispatchError;

    #[test]
    fn test_messages_in_chinese() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");

        assert_eq!(Notice::PrintSent.message(), "打印任务已发送");
        assert_eq!(
            Notice::BatchPrintFinished { success: 2, failed: 1 }.message(),
            "批量打印完成！成功：2，失败：1"
        );
        assert_eq!(
            Notice::PrintProgress { current: 3, total: 5 }.message(),
            "正在打印 3/5..."
        );
        assert_eq!(Notice::Imported { count: 4 }.message(), "成功导入 4 条物料数据");
        assert_eq!(Notice::BucketLockChanged { locked: false }.message(), "料桶已解锁");
    }

    #[test]
    fn test_messages_in_english() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        let msg = Notice::Deleted { count: 2 }.message();
        set_locale("zh-CN");

        assert!(msg.contains('2'));
        assert!(msg.contains("Deleted"));
    }

    #[test]
    fn test_levels() {
        assert_eq!(Notice::PrintSent.level(), NoticeLevel::Success);
        assert_eq!(Notice::SelectToPrint.level(), NoticeLevel::Warning);
        assert_eq!(Notice::ImportFailed.level(), NoticeLevel::Error);
    }

    #[test]
    fn test_from_error() {
        let err = ApiError::PrintFailed(DispatchError::Rejected { status: 500 });
        assert_eq!(Notice::from_error(&err, Notice::OperationFailed), Notice::PrintFailed);
        assert_eq!(
            Notice::from_error(&ApiError::PrinterNotConfigured, Notice::OperationFailed),
            Notice::PrinterNotConfigured
        );
        assert_eq!(
            Notice::from_error(&ApiError::InternalError("x".into()), Notice::SaveFailed),
            Notice::SaveFailed
        );
    }
}
