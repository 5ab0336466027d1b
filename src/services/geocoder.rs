//! 地理编码服务 - 业务能力层
//!
//! 按输入顺序逐个解析地址，单个失败不会中断整个阶段

use crate::clients::GeocodingProvider;
use crate::error::AppResult;
use crate::infrastructure::{guard, Pacer};
use crate::models::GeocodedPoint;
use crate::services::progress::{geocode_percent, ProgressReporter};
use crate::services::warn_writer::Warning;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// 地理编码服务
///
/// 职责：
/// - 严格串行调用地理编码服务，两次调用之间保持最小间隔
/// - 未找到 / 请求失败都只记一条警告并跳过
/// - 报告 0–50% 的进度
pub struct Geocoder {
    provider: Arc<dyn GeocodingProvider>,
    interval: Duration,
}

impl Geocoder {
    pub fn new(provider: Arc<dyn GeocodingProvider>, interval: Duration) -> Self {
        Self { provider, interval }
    }

    /// 解析全部地址
    ///
    /// 只有取消会返回错误
    pub async fn geocode_all(
        &self,
        addresses: &[String],
        progress: &ProgressReporter,
        warnings: &mut Vec<Warning>,
        token: &CancellationToken,
    ) -> AppResult<Vec<GeocodedPoint>> {
        let mut pacer = Pacer::new(self.interval);
        let mut points = Vec::with_capacity(addresses.len());
        let total = addresses.len();

        for (index, address) in addresses.iter().enumerate() {
            progress.report(
                geocode_percent(index, total),
                format!("地理编码: {}", address),
            );

            guard(token, pacer.ready()).await?;
            match guard(token, self.provider.geocode(address)).await? {
                Ok(Some(point)) => {
                    info!("✅ {} → {}", address, point.address);
                    points.push(point);
                }
                Ok(None) => {
                    warn!("⚠️ 未找到地址: {}", address);
                    warnings.push(Warning::geocode(address, "未找到"));
                }
                Err(e) => {
                    warn!("❌ 地理编码失败: {} ({})", address, e);
                    warnings.push(Warning::geocode(address, e.to_string()));
                }
            }
        }

        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// 记录调用顺序的假服务：名字里带 "missing" 的返回未找到，带 "boom" 的返回错误
    #[derive(Default)]
    struct ScriptedGeocoder {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl GeocodingProvider for ScriptedGeocoder {
        async fn geocode(&self, address: &str) -> anyhow::Result<Option<GeocodedPoint>> {
            self.calls.lock().unwrap().push(address.to_string());
            if address.contains("boom") {
                anyhow::bail!("connection reset");
            }
            if address.contains("missing") {
                return Ok(None);
            }
            Ok(Some(GeocodedPoint::new(
                format!("{} (canonical)", address),
                address,
                47.2,
                39.7,
            )))
        }
    }

    fn addresses(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn skips_failures_and_keeps_order() {
        let provider = Arc::new(ScriptedGeocoder::default());
        let geocoder = Geocoder::new(provider.clone(), Duration::ZERO);
        let progress = ProgressReporter::new();
        let mut warnings = Vec::new();

        let points = geocoder
            .geocode_all(
                &addresses(&["a", "missing b", "boom c", "d"]),
                &progress,
                &mut warnings,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].original_address, "a");
        assert_eq!(points[1].original_address, "d");
        assert_eq!(warnings.len(), 2);
        assert_eq!(
            *provider.calls.lock().unwrap(),
            vec!["a", "missing b", "boom c", "d"]
        );
        assert!(progress.current().percent <= 50.0);
    }

    #[tokio::test]
    async fn cancelled_token_stops_immediately() {
        let provider = Arc::new(ScriptedGeocoder::default());
        let geocoder = Geocoder::new(provider.clone(), Duration::ZERO);
        let token = CancellationToken::new();
        token.cancel();

        let result = geocoder
            .geocode_all(&addresses(&["a"]), &ProgressReporter::new(), &mut Vec::new(), &token)
            .await;

        assert!(matches!(result, Err(crate::error::AppError::Cancelled)));
        assert!(provider.calls.lock().unwrap().is_empty());
    }
}
