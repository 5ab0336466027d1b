use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// 路线标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteTag {
    /// 服务端优化后的路线
    Smart,
    /// 未优化的参照路线
    Baseline,
}

impl RouteTag {
    pub fn as_str(self) -> &'static str {
        match self {
            RouteTag::Smart => "smart",
            RouteTag::Baseline => "baseline",
        }
    }

    /// CSV 导出中的类型列
    pub fn csv_label(self) -> &'static str {
        match self {
            RouteTag::Smart => "Умный",
            RouteTag::Baseline => "Базовый",
        }
    }

    /// 日志中显示的名称
    pub fn display_name(self) -> &'static str {
        match self {
            RouteTag::Smart => "智能路线",
            RouteTag::Baseline => "基准路线",
        }
    }
}

impl Display for RouteTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 路线中的一个停靠点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    pub address: String,
    pub lat: f64,
    pub lon: f64,
    /// 到达时间 (HH:MM)，后端可能不给
    pub arrival_time: Option<String>,
    /// 停留时长（分钟）
    pub duration: u32,
}

/// 路线汇总
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub total_time_min: f64,
    pub visits: u32,
    pub late: u32,
    pub late_penalty: f64,
}

/// 规范化后的路线结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub route: Vec<RouteStop>,
    pub summary: Summary,
}
