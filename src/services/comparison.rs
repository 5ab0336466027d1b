//! 路线对比 - 业务能力层

use crate::models::{RouteResult, Summary};
use serde::Serialize;

/// 两条路线的对比
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub smart: Summary,
    pub baseline: Summary,
    /// 带符号的百分比，例如 `"+31%"`
    pub improvement: String,
}

impl Comparison {
    pub fn new(smart: &RouteResult, baseline: &RouteResult) -> Self {
        Self {
            smart: smart.summary,
            baseline: baseline.summary,
            improvement: compare(&smart.summary, &baseline.summary),
        }
    }
}

/// 智能路线相对基准路线节省的时间百分比
///
/// 基准时间为 0 时固定返回 `"+0%"`；非负结果带 `+` 前缀
pub fn compare(smart: &Summary, baseline: &Summary) -> String {
    if baseline.total_time_min == 0.0 {
        return "+0%".to_string();
    }
    let ratio =
        (baseline.total_time_min - smart.total_time_min) / baseline.total_time_min * 100.0;
    // 0.5 向上取整
    let rounded = (ratio + 0.5).floor() as i64;
    if rounded >= 0 {
        format!("+{}%", rounded)
    } else {
        format!("{}%", rounded)
    }
}

/// 分钟数显示为 `"2ч 5м"` / `"45м"`
pub fn format_minutes(minutes: f64) -> String {
    let total = minutes.max(0.0).round() as u64;
    let hours = total / 60;
    let mins = total % 60;
    if hours > 0 {
        format!("{}ч {}м", hours, mins)
    } else {
        format!("{}м", mins)
    }
}
