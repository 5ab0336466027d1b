use serde::{Deserialize, Serialize};

/// 地理编码结果
///
/// `address` 是地理编码服务返回的标准地址，`original_address` 是文件里的原始输入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedPoint {
    pub address: String,
    pub original_address: String,
    pub lat: f64,
    pub lon: f64,
}

impl GeocodedPoint {
    pub fn new(
        address: impl Into<String>,
        original_address: impl Into<String>,
        lat: f64,
        lon: f64,
    ) -> Self {
        Self {
            address: address.into(),
            original_address: original_address.into(),
            lat,
            lon,
        }
    }
}
