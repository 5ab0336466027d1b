//! 结果规范化 - 业务能力层
//!
//! 后端字段 → 规范字段：
//! - `eta` → `arrival_time`
//! - `service_min` → `duration`（缺省或 0 时为 30）
//! - 缺省坐标为 0
//! - `drive_min` → `total_time_min`，其余汇总字段原样传递

use crate::models::backend::round_count;
use crate::models::{BackendRoute, BackendStop, RouteResult, RouteStop, Summary};

/// 缺省的停留时长（分钟）
pub const DEFAULT_SERVICE_MIN: u32 = 30;

pub fn normalize(backend: BackendRoute) -> RouteResult {
    let route = backend.route.into_iter().map(normalize_stop).collect();

    RouteResult {
        route,
        summary: Summary {
            total_time_min: backend.summary.drive_min,
            visits: backend.summary.visits,
            late: backend.summary.late,
            late_penalty: backend.summary.late_penalty,
        },
    }
}

fn normalize_stop(stop: BackendStop) -> RouteStop {
    RouteStop {
        address: stop.address,
        lat: stop.lat.unwrap_or(0.0),
        lon: stop.lon.unwrap_or(0.0),
        arrival_time: stop.eta,
        duration: stop
            .service_min
            .map(round_count)
            .filter(|m| *m > 0)
            .unwrap_or(DEFAULT_SERVICE_MIN),
    }
}
