//! 优化后端的响应格式
//!
//! 字段名与服务端一致（`eta`、`service_min`、`drive_min`），
//! 只在 `services::normalizer` 中转换成规范的 `RouteResult`
//!
//! 数值字段为 `null` 时按缺省处理，整数字段也接受浮点写法

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BackendRoute {
    #[serde(default)]
    pub route: Vec<BackendStop>,
    #[serde(default)]
    pub summary: BackendSummary,
    /// 服务端附带的文字报告
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_report: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BackendStop {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub eta: Option<String>,
    #[serde(default)]
    pub service_min: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BackendSummary {
    #[serde(default, deserialize_with = "null_as_zero")]
    pub drive_min: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub visits: u32,
    #[serde(default, deserialize_with = "lenient_count")]
    pub late: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub late_penalty: f64,
}

/// 四舍五入成非负整数，NaN 和负数为 0
pub fn round_count(value: f64) -> u32 {
    // `as` 对超界和 NaN 做饱和转换
    value.round().max(0.0) as u32
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?
        .map(round_count)
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_response() {
        let body = r#"{
            "route": [
                {"address": "ул. Пушкинская, 100", "eta": "09:40"},
                {"address": "пл. Гагарина, 1", "lat": 47.258, "lon": 39.682, "service_min": 20}
            ],
            "summary": {"drive_min": 95, "visits": 2, "late": 0, "late_penalty": 0},
            "text_report": "ok"
        }"#;

        let parsed: BackendRoute = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.route.len(), 2);
        assert_eq!(parsed.route[0].lat, None);
        assert_eq!(parsed.route[0].service_min, None);
        assert_eq!(parsed.route[1].service_min, Some(20.0));
        assert_eq!(parsed.summary.drive_min, 95.0);
        assert_eq!(parsed.text_report.as_deref(), Some("ok"));
    }

    #[test]
    fn null_and_float_numbers_do_not_fail_parsing() {
        let body = r#"{
            "route": [{"address": "ул. Пушкинская, 100", "service_min": 30.0, "lat": null}],
            "summary": {"drive_min": null, "visits": 1.0, "late": null, "late_penalty": 12.5}
        }"#;

        let parsed: BackendRoute = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.route[0].service_min, Some(30.0));
        assert_eq!(parsed.route[0].lat, None);
        assert_eq!(parsed.summary.drive_min, 0.0);
        assert_eq!(parsed.summary.visits, 1);
        assert_eq!(parsed.summary.late, 0);
        assert_eq!(parsed.summary.late_penalty, 12.5);
    }

    #[test]
    fn rounds_counts() {
        assert_eq!(round_count(29.6), 30);
        assert_eq!(round_count(-3.0), 0);
        assert_eq!(round_count(f64::NAN), 0);
    }
}
