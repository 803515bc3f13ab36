// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use material_label::domain::{ItemStatus, NewMaterial, NewPrinterConfig};

// ==========================================
// NewMaterial 构建器
// ==========================================

pub struct MaterialBuilder {
    material: NewMaterial,
}

impl MaterialBuilder {
    pub fn new(print_order: i32) -> Self {
        Self {
            material: NewMaterial::blank(print_order),
        }
    }

    pub fn code(mut self, code: &str) -> Self {
        self.material.material_code = code.to_string();
        self
    }

    pub fn item(mut self, item_code: &str, item_name: &str) -> Self {
        self.material.item_code = Some(item_code.to_string());
        self.material.item_name = Some(item_name.to_string());
        self
    }

    pub fn bucket(mut self, bucket_code: &str) -> Self {
        self.material.bucket_code = Some(bucket_code.to_string());
        self
    }

    pub fn batch(mut self, batch_number: &str) -> Self {
        self.material.batch_number = Some(batch_number.to_string());
        self
    }

    pub fn pallet(mut self, pallet_code: &str) -> Self {
        self.material.pallet_code = Some(pallet_code.to_string());
        self
    }

    pub fn specification(mut self, specification: &str) -> Self {
        self.material.specification = Some(specification.to_string());
        self
    }

    pub fn batch_rule(mut self, rule: &str) -> Self {
        self.material.batch_rule = Some(rule.to_string());
        self
    }

    pub fn status(mut self, status: ItemStatus) -> Self {
        self.material.item_status = status;
        self
    }

    pub fn build(self) -> NewMaterial {
        self.material
    }
}

/// 生成 n 条带料桶码的物料（打印顺序 1..=n）
pub fn sample_materials(n: usize) -> Vec<NewMaterial> {
    (1..=n)
        .map(|i| {
            MaterialBuilder::new(i as i32)
                .item(&format!("I{:03}", i), "石英砂")
                .bucket(&format!("B{:03}", i))
                .batch(&format!("L{:03}", i))
                .pallet(&format!("P{:03}", i))
                .build()
        })
        .collect()
}

// ==========================================
// 打印机表单构建器
// ==========================================

pub fn printer_form(name: &str, ip: &str, port: u16, is_default: bool) -> NewPrinterConfig {
    NewPrinterConfig {
        printer_name: name.to_string(),
        printer_type: "斑马打印机".to_string(),
        printer_ip: ip.to_string(),
        printer_port: port,
        is_default,
    }
}
