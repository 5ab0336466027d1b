/// 路段计算 HTTP 客户端
///
/// 两点之间的行驶时间，只在固定的城市范围内查询
use crate::clients::RoutingProvider;
use crate::config::Config;
use crate::models::GeocodedPoint;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// 查询范围（纬度, 经度）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingRegion {
    pub south_west: (f64, f64),
    pub north_east: (f64, f64),
}

impl BoundingRegion {
    /// 罗斯托夫市及周边
    pub const ROSTOV: BoundingRegion = BoundingRegion {
        south_west: (46.8, 39.3),
        north_east: (47.5, 40.2),
    };

    pub fn contains(&self, point: &GeocodedPoint) -> bool {
        (self.south_west.0..=self.north_east.0).contains(&point.lat)
            && (self.south_west.1..=self.north_east.1).contains(&point.lon)
    }
}

pub struct RoutingClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    region: BoundingRegion,
}

impl RoutingClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("无法创建 HTTP 客户端")?;

        Ok(Self {
            client,
            base_url: config.routing_base_url.clone(),
            api_key: config.dgis_api_key.clone(),
            region: BoundingRegion::ROSTOV,
        })
    }

    pub fn with_region(mut self, region: BoundingRegion) -> Self {
        self.region = region;
        self
    }
}

#[async_trait]
impl RoutingProvider for RoutingClient {
    async fn travel_seconds(
        &self,
        from: &GeocodedPoint,
        to: &GeocodedPoint,
        traffic_aware: bool,
    ) -> Result<f64> {
        check_region(&self.region, from, to)?;

        let body = build_request(from, to, traffic_aware);
        debug!("路段请求: {} → {}", from.address, to.address);

        let response: RoutingResponse = self
            .client
            .post(&self.base_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .context("路段请求失败")?
            .error_for_status()
            .context("路段服务返回错误状态")?
            .json()
            .await
            .context("无法解析路段响应")?;

        response
            .result
            .into_iter()
            .next()
            .map(|r| r.total_duration)
            .context("路段服务没有返回路线")
    }
}

fn check_region(region: &BoundingRegion, from: &GeocodedPoint, to: &GeocodedPoint) -> Result<()> {
    for point in [from, to] {
        if !region.contains(point) {
            anyhow::bail!(
                "坐标超出查询范围: {} ({}, {})",
                point.address,
                point.lat,
                point.lon
            );
        }
    }
    Ok(())
}

fn build_request(from: &GeocodedPoint, to: &GeocodedPoint, traffic_aware: bool) -> serde_json::Value {
    json!({
        "points": [
            { "type": "stop", "lon": from.lon, "lat": from.lat },
            { "type": "stop", "lon": to.lon, "lat": to.lat }
        ],
        "transport": "driving",
        "route_mode": "fastest",
        "traffic_mode": if traffic_aware { "jam" } else { "statistics" }
    })
}

#[derive(Debug, Deserialize)]
struct RoutingResponse {
    #[serde(default)]
    result: Vec<RouteSummary>,
}

#[derive(Debug, Deserialize)]
struct RouteSummary {
    total_duration: f64,
}
