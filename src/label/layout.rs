// ==========================================
// 物料标签打印系统 - 标签版面常量
// ==========================================
// 标签尺寸: 80mm × 60mm (203 DPI, 8 dots/mm)
// 80mm = 640 点, 60mm = 480 点
// 坐标为绝对点位，超宽内容不做换行/截断
// ==========================================

use serde::{Deserialize, Serialize};

/// 单行字段的标题/取值坐标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSlot {
    pub caption_x: u32,
    pub caption_y: u32,
    pub value_x: u32,
    pub value_y: u32,
}

/// 标签版面
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelLayout {
    pub width_dots: u32,
    pub length_dots: u32,

    // 外框
    pub border_x: u32,
    pub border_y: u32,
    pub border_width: u32,
    pub border_height: u32,
    pub border_thickness: u32,

    // 字段行
    pub caption_x: u32,
    pub value_x: u32,
    pub first_caption_y: u32,
    pub first_value_y: u32,
    pub row_pitch: u32,
    pub caption_font: u32,
    pub value_font: u32,

    // 二维码
    pub qr_x: u32,
    pub qr_y: u32,
    pub qr_magnification: u8,

    // 标题
    pub title_x: u32,
    pub title_y: u32,
    pub title_font: u32,
}

impl LabelLayout {
    /// 80×60mm 料桶标签（ZD888 203dpi）
    pub const fn standard() -> Self {
        Self {
            width_dots: 640,
            length_dots: 480,
            border_x: 20,
            border_y: 20,
            border_width: 600,
            border_height: 440,
            border_thickness: 2,
            caption_x: 30,
            value_x: 150,
            first_caption_y: 35,
            first_value_y: 30,
            row_pitch: 45,
            caption_font: 28,
            value_font: 35,
            qr_x: 450,
            qr_y: 80,
            qr_magnification: 8,
            title_x: 200,
            title_y: 400,
            title_font: 40,
        }
    }

    /// 第 index 行（从 0 开始）的坐标
    pub fn slot(&self, index: u32) -> FieldSlot {
        FieldSlot {
            caption_x: self.caption_x,
            caption_y: self.first_caption_y + index * self.row_pitch,
            value_x: self.value_x,
            value_y: self.first_value_y + index * self.row_pitch,
        }
    }
}

impl Default for LabelLayout {
    fn default() -> Self {
        Self::standard()
    }
}
