//! 外部服务客户端
//!
//! 地理编码和路段计算通过 trait 注入，服务层只依赖 trait，
//! 测试时可以换成内存实现

pub mod geocoder_client;
pub mod optimizer_client;
pub mod routing_client;

pub use geocoder_client::GeocoderClient;
pub use optimizer_client::{KeyValidation, OptimizeParams, OptimizerClient};
pub use routing_client::{BoundingRegion, RoutingClient};

use crate::models::GeocodedPoint;
use anyhow::Result;
use async_trait::async_trait;

/// 地理编码能力
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// 返回第一个候选结果；没有候选时返回 `None`，传输失败返回错误
    async fn geocode(&self, address: &str) -> Result<Option<GeocodedPoint>>;
}

/// 两点之间的行驶时间
#[async_trait]
pub trait RoutingProvider: Send + Sync {
    /// 返回行驶时间（秒）
    async fn travel_seconds(
        &self,
        from: &GeocodedPoint,
        to: &GeocodedPoint,
        traffic_aware: bool,
    ) -> Result<f64>;
}
