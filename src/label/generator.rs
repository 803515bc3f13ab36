// ==========================================
// 物料标签打印系统 - 标签生成器
// ==========================================
// 职责: Material → ZPL 文档（纯函数，无副作用）
// 约束: 对任意 Material 都能生成，缺失字段输出空串
// ==========================================

use crate::domain::material::Material;
use crate::label::layout::LabelLayout;
use crate::label::zpl::ZplBuilder;
use serde::Serialize;

/// 二维码内容分隔符
pub const QR_SEPARATOR: &str = "|";

/// 批量文档之间的分隔
const BATCH_SEPARATOR: &str = "\n\n";

/// 预览中缺失值的占位
const PREVIEW_PLACEHOLDER: &str = "-";

/// 标签上的一行字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelField {
    pub caption: &'static str,
    pub value: String,
}

/// 打印预览
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelPreview {
    pub title: String,
    pub fields: Vec<LabelField>,
    pub qr_payload: String,
    pub document: String,
}

/// 标签生成器
#[derive(Debug, Clone)]
pub struct LabelGenerator {
    layout: LabelLayout,
    title: String,
}

impl LabelGenerator {
    pub fn new(layout: LabelLayout, title: impl Into<String>) -> Self {
        Self {
            layout,
            title: title.into(),
        }
    }

    pub fn layout(&self) -> &LabelLayout {
        &self.layout
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// 生成单张标签的 ZPL 文档
    pub fn generate(&self, material: &Material) -> String {
        let layout = &self.layout;
        let mut zpl = ZplBuilder::new();

        zpl.utf8()
            .print_width(layout.width_dots)
            .label_length(layout.length_dots)
            .blank_line()
            .graphic_box(
                layout.border_x,
                layout.border_y,
                layout.border_width,
                layout.border_height,
                layout.border_thickness,
            );

        for (index, field) in label_fields(material).iter().enumerate() {
            let slot = layout.slot(index as u32);
            zpl.blank_line()
                .text(slot.caption_x, slot.caption_y, layout.caption_font, field.caption)
                .text(slot.value_x, slot.value_y, layout.value_font, &field.value);
        }

        zpl.blank_line()
            .qr_code(layout.qr_x, layout.qr_y, layout.qr_magnification, &qr_payload(material))
            .blank_line()
            .text(layout.title_x, layout.title_y, layout.title_font, &self.title);

        zpl.finish()
    }

    /// 批量生成（纯文本下载用），文档之间空一行
    pub fn render_batch(&self, materials: &[Material]) -> String {
        let mut all = String::new();
        for material in materials {
            all.push_str(&self.generate(material));
            all.push_str(BATCH_SEPARATOR);
        }
        all
    }

    /// 打印预览（缺失值显示为 "-"）
    pub fn preview(&self, material: &Material) -> LabelPreview {
        let fields = label_fields(material)
            .into_iter()
            .map(|field| LabelField {
                caption: field.caption,
                value: if field.value.is_empty() {
                    PREVIEW_PLACEHOLDER.to_string()
                } else {
                    field.value
                },
            })
            .collect();

        LabelPreview {
            title: self.title.clone(),
            fields,
            qr_payload: qr_payload(material),
            document: self.generate(material),
        }
    }
}

/// 标签字段（固定顺序）
pub fn label_fields(material: &Material) -> Vec<LabelField> {
    vec![
        LabelField { caption: "料桶码", value: text_or_empty(&material.bucket_code) },
        LabelField { caption: "料品批次", value: text_or_empty(&material.batch_number) },
        LabelField { caption: "托盘码", value: text_or_empty(&material.pallet_code) },
        LabelField { caption: "料品编码", value: text_or_empty(&material.item_code) },
        LabelField { caption: "料品名称", value: text_or_empty(&material.item_name) },
        LabelField { caption: "规格型号", value: text_or_empty(&material.specification) },
    ]
}

/// 二维码内容: 料桶码|料品批次|托盘码|料品编码
pub fn qr_payload(material: &Material) -> String {
    [
        &material.bucket_code,
        &material.batch_number,
        &material.pallet_code,
        &material.item_code,
    ]
    .iter()
    .map(|v| text_or_empty(v))
    .collect::<Vec<_>>()
    .join(QR_SEPARATOR)
}

fn text_or_empty(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}
