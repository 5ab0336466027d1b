//! 警告写入服务 - 业务能力层
//!
//! 只负责"记录被跳过的条目"，不关心流程

use crate::error::{AppError, AppResult};
use std::fmt::Display;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// 被跳过的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarnStage {
    /// 地址未找到或地理编码请求失败
    Geocode,
    /// 路段计算失败，单元格填入哨兵值
    Routing,
}

/// 一条被跳过的记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub stage: WarnStage,
    pub item: String,
    pub reason: String,
}

impl Warning {
    pub fn geocode(item: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            stage: WarnStage::Geocode,
            item: item.into(),
            reason: reason.into(),
        }
    }

    pub fn routing(item: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            stage: WarnStage::Routing,
            item: item.into(),
            reason: reason.into(),
        }
    }
}

impl Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stage = match self.stage {
            WarnStage::Geocode => "地理编码",
            WarnStage::Routing => "路段",
        };
        write!(f, "{} | {} | {}", stage, self.item, self.reason)
    }
}

/// 把警告追加到文件（默认 warn.txt）
pub struct WarnWriter {
    warn_file_path: String,
}

impl WarnWriter {
    pub fn new() -> Self {
        Self {
            warn_file_path: "warn.txt".to_string(),
        }
    }

    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            warn_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.warn_file_path
    }

    /// 追加一批警告，空列表不会创建文件
    pub async fn write_all(&self, tag: &str, warnings: &[Warning]) -> AppResult<()> {
        if warnings.is_empty() {
            return Ok(());
        }
        debug!("写入 {} 条警告到 {}", warnings.len(), self.warn_file_path);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.warn_file_path)
            .await
            .map_err(|e| AppError::file_write_failed(&self.warn_file_path, e))?;

        let text: String = warnings
            .iter()
            .map(|w| format!("[{}] {}\n", tag, w))
            .collect();

        file.write_all(text.as_bytes())
            .await
            .map_err(|e| AppError::file_write_failed(&self.warn_file_path, e))?;

        Ok(())
    }
}

impl Default for WarnWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_stage() {
        let w = Warning::routing("1 → 2", "timeout");
        assert_eq!(w.to_string(), "路段 | 1 → 2 | timeout");
    }

    #[tokio::test]
    async fn appends_lines() {
        let path = std::env::temp_dir().join(format!("route_planner_warn_{}.txt", std::process::id()));
        let _ = tokio::fs::remove_file(&path).await;
        let writer = WarnWriter::with_path(path.to_string_lossy().to_string());

        writer
            .write_all("smart", &[Warning::geocode("ул. Несуществующая", "未找到")])
            .await
            .unwrap();
        writer.write_all("smart", &[]).await.unwrap();
        writer
            .write_all("baseline", &[Warning::routing("1 → 2", "timeout")])
            .await
            .unwrap();

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.starts_with("[smart] 地理编码 | ул. Несуществующая"));
        let _ = tokio::fs::remove_file(&path).await;
    }
}
