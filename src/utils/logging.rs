/// 日志工具模块
///
/// 提供日志初始化和格式化输出的辅助函数
use crate::config::Config;
use crate::models::RouteTag;
use crate::services::{format_minutes, Comparison};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 默认 `info` 级别，可用 `RUST_LOG` 覆盖
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 路线规划");
    if config.use_mock {
        info!("🧪 优化模式: 模拟数据");
    } else {
        info!("🌐 优化模式: 远程服务 {}", config.api_base);
    }
    info!(
        "🚦 考虑路况: {}",
        if config.consider_traffic { "是" } else { "否" }
    );
    info!("📄 地址文件: {}", config.input_file);
    info!("{}", "=".repeat(60));
}

/// 记录对比结果
pub fn log_comparison(comparison: &Comparison) {
    info!("\n{}", "─".repeat(60));
    info!(
        "🧠 智能路线: {} 分钟, 迟到 {}",
        format_minutes(comparison.smart.total_time_min),
        comparison.smart.late
    );
    info!(
        "📏 基准路线: {} 分钟, 迟到 {}",
        format_minutes(comparison.baseline.total_time_min),
        comparison.baseline.late
    );
    info!("📈 改进: {}", comparison.improvement);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
pub fn log_run_complete(succeeded: &[RouteTag], failed: &[RouteTag], written: &[PathBuf]) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("✅ 成功: {}/{}", succeeded.len(), succeeded.len() + failed.len());
    info!("❌ 失败: {}", failed.len());
    for path in written {
        info!("💾 已写入: {}", path.display());
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_by_chars() {
        assert_eq!(truncate_text("Ростов-на-Дону", 6), "Ростов...");
        assert_eq!(truncate_text("short", 10), "short");
    }
}
