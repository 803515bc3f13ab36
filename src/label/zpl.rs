// ==========================================
// 物料标签打印系统 - ZPL 指令构建器
// ==========================================
// 职责: 链式拼装 ZPL II 文档，每组指令独占一行
// 红线: 字段值统一经 escape_field_data 转义，不能提前结束或注入指令
// ==========================================

/// `^FH` 使用的转义前缀符
const HEX_INDICATOR: char = '_';

/// ZPL 文档构建器
pub struct ZplBuilder {
    lines: Vec<String>,
}

impl ZplBuilder {
    /// 开始新标签（`^XA`）
    pub fn new() -> Self {
        Self {
            lines: vec!["^XA".to_string()],
        }
    }

    // UTF-8 字段编码
    pub fn utf8(&mut self) -> &mut Self {
        self.lines.push("^CI28".to_string());
        self
    }

    pub fn print_width(&mut self, dots: u32) -> &mut Self {
        self.lines.push(format!("^PW{}", dots));
        self
    }

    pub fn label_length(&mut self, dots: u32) -> &mut Self {
        self.lines.push(format!("^LL{}", dots));
        self
    }

    /// 空行分隔，打印机忽略
    pub fn blank_line(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    /// 边框（`^GB`）
    pub fn graphic_box(&mut self, x: u32, y: u32, width: u32, height: u32, thickness: u32) -> &mut Self {
        self.lines.push(format!(
            "^FO{},{}^GB{},{},{}^FS",
            x, y, width, height, thickness
        ));
        self
    }

    /// 文本字段，使用可缩放字体 `^CF0`
    pub fn text(&mut self, x: u32, y: u32, font_height: u32, value: &str) -> &mut Self {
        let (hex, data) = field_data(value);
        self.lines.push(format!(
            "^FO{},{}^CF0,{}{}^FD{}^FS",
            x, y, font_height, hex, data
        ));
        self
    }

    /// 二维码（`^BQN`，model 2，纠错级别 Q）
    pub fn qr_code(&mut self, x: u32, y: u32, magnification: u8, data: &str) -> &mut Self {
        let (hex, data) = field_data(data);
        self.lines.push(format!(
            "^FO{},{}^BQN,2,{}{}^FDQA,{}^FS",
            x, y, magnification, hex, data
        ));
        self
    }

    /// 结束标签（`^XZ`）并返回文档
    pub fn finish(mut self) -> String {
        self.lines.push("^XZ".to_string());
        self.lines.join("\n")
    }
}

impl Default for ZplBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 返回 (`^FH` 前缀, 转义后数据)；无需转义时前缀为空
fn field_data(value: &str) -> (&'static str, String) {
    if needs_escape(value) {
        ("^FH_", escape_field_data(value))
    } else {
        ("", value.to_string())
    }
}

fn needs_escape(value: &str) -> bool {
    value.chars().any(|c| matches!(c, '^' | '~' | HEX_INDICATOR))
}

/// 将 `^` `~` 以及转义符 `_` 本身替换为十六进制形式
pub fn escape_field_data(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '^' => escaped.push_str("_5E"),
            '~' => escaped.push_str("_7E"),
            HEX_INDICATOR => escaped.push_str("_5F"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_wraps_document() {
        let mut zpl = ZplBuilder::new();
        zpl.print_width(640).label_length(480);
        let doc = zpl.finish();

        assert_eq!(doc, "^XA\n^PW640\n^LL480\n^XZ");
    }

    #[test]
    fn test_plain_text_has_no_hex_prefix() {
        let mut zpl = ZplBuilder::new();
        zpl.text(150, 30, 35, "B-001");
        let doc = zpl.finish();

        assert!(doc.contains("^FO150,30^CF0,35^FDB-001^FS"));
        assert!(!doc.contains("^FH"));
    }

    #[test]
    fn test_control_characters_are_escaped() {
        let mut zpl = ZplBuilder::new();
        zpl.text(0, 0, 28, "A^XZ~B_C");
        let doc = zpl.finish();

        assert!(doc.contains("^FH_^FDA_5EXZ_7EB_5FC^FS"));
        // 只有结尾一个 ^XZ
        assert_eq!(doc.matches("^XZ").count(), 1);
    }

    #[test]
    fn test_qr_code_command() {
        let mut zpl = ZplBuilder::new();
        zpl.qr_code(450, 80, 8, "B1|L1|P1|I1");
        let doc = zpl.finish();

        assert!(doc.contains("^FO450,80^BQN,2,8^FDQA,B1|L1|P1|I1^FS"));
    }
}
