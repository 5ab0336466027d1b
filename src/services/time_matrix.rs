//! 时间矩阵服务 - 业务能力层
//!
//! 按行优先顺序逐格计算两点之间的行驶时间

use crate::clients::RoutingProvider;
use crate::error::AppResult;
use crate::infrastructure::{guard, Pacer};
use crate::models::matrix::seconds_to_minutes;
use crate::models::{GeocodedPoint, TimeMatrix, FAILED_CELL_MINUTES};
use crate::services::progress::{matrix_percent, ProgressReporter};
use crate::services::warn_writer::Warning;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// 时间矩阵构建器
///
/// - 对角线固定为 0，不发请求
/// - 失败的单元格填 [`FAILED_CELL_MINUTES`]，构建过程不中断
/// - 报告 50–100% 的进度
pub struct TimeMatrixBuilder {
    provider: Arc<dyn RoutingProvider>,
    interval: Duration,
    traffic_aware: bool,
}

impl TimeMatrixBuilder {
    pub fn new(provider: Arc<dyn RoutingProvider>, interval: Duration, traffic_aware: bool) -> Self {
        Self {
            provider,
            interval,
            traffic_aware,
        }
    }

    pub async fn build(
        &self,
        points: &[GeocodedPoint],
        progress: &ProgressReporter,
        warnings: &mut Vec<Warning>,
        token: &CancellationToken,
    ) -> AppResult<TimeMatrix> {
        let size = points.len();
        let total_cells = size * size;
        let mut matrix = TimeMatrix::zeros(size);
        let mut pacer = Pacer::new(self.interval);
        let mut completed = 0;

        for (i, from) in points.iter().enumerate() {
            for (j, to) in points.iter().enumerate() {
                if i == j {
                    completed += 1;
                    continue;
                }

                progress.report(
                    matrix_percent(completed, total_cells),
                    format!("路段 {} → {}", i + 1, j + 1),
                );

                guard(token, pacer.ready()).await?;
                let minutes = match guard(
                    token,
                    self.provider.travel_seconds(from, to, self.traffic_aware),
                )
                .await?
                {
                    Ok(seconds) => {
                        let minutes = seconds_to_minutes(seconds);
                        info!("🛣️ {} → {}: {} 分钟", from.address, to.address, minutes);
                        minutes
                    }
                    Err(e) => {
                        warn!("⚠️ 路段 {}→{} 计算失败: {}", i + 1, j + 1, e);
                        warnings.push(Warning::routing(format!("{} → {}", i + 1, j + 1), e.to_string()));
                        FAILED_CELL_MINUTES
                    }
                };

                matrix.set(i, j, minutes);
                completed += 1;
            }
        }

        progress.report(matrix_percent(completed, total_cells), "时间矩阵完成");
        Ok(matrix)
    }
}
