use crate::error::{AppError, AppResult};
use std::path::Path;
use tokio::fs;

/// 每次运行最多处理的地址数，多余的直接截断
pub const MAX_ADDRESSES: usize = 15;

/// 地址文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFormat {
    /// 逗号分隔，只取每行第一列
    Csv,
    /// 每个非空行一个地址
    PlainText,
}

impl AddressFormat {
    /// 按文件扩展名判断格式
    pub fn from_file_name(name: &str) -> Self {
        if name.to_lowercase().ends_with(".csv") {
            AddressFormat::Csv
        } else {
            AddressFormat::PlainText
        }
    }
}

/// 用户上传的地址文件（远程优化时原样上传）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn format(&self) -> AddressFormat {
        AddressFormat::from_file_name(&self.name)
    }

    /// 解析文件中的地址（非 UTF-8 字节按替换字符处理）
    pub fn addresses(&self) -> Vec<String> {
        ingest_addresses(&String::from_utf8_lossy(&self.content), self.format())
    }
}

/// 把文件内容解析为有序地址列表，最多 [`MAX_ADDRESSES`] 条
///
/// 这一步不会失败：空行和首列为空的行直接丢弃
pub fn ingest_addresses(content: &str, format: AddressFormat) -> Vec<String> {
    content
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let field = match format {
                AddressFormat::Csv => line.split(',').next().unwrap_or(""),
                AddressFormat::PlainText => line,
            };
            let field = field.trim();
            (!field.is_empty()).then(|| field.to_string())
        })
        .take(MAX_ADDRESSES)
        .collect()
}

/// 从磁盘读取地址文件
pub async fn load_addresses(path: &Path) -> AppResult<UploadedFile> {
    let content = fs::read(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let file = UploadedFile::new(name, content);
    tracing::info!(
        "已读取地址文件: {} ({} 个地址)",
        path.display(),
        file.addresses().len()
    );

    Ok(file)
}
