/// 地理编码 HTTP 客户端
///
/// 请求 `GET {base}?apikey=..&format=json&geocode=<地址, 城市>`，
/// 取 `featureMember` 的第一个候选
use crate::clients::GeocodingProvider;
use crate::config::Config;
use crate::models::GeocodedPoint;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

pub struct GeocoderClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    city_suffix: String,
}

impl GeocoderClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("无法创建 HTTP 客户端")?;

        Ok(Self {
            client,
            base_url: config.geocoder_base_url.clone(),
            api_key: config.geocoder_api_key.clone(),
            city_suffix: config.city_suffix.clone(),
        })
    }

    fn query_for(&self, address: &str) -> String {
        if self.city_suffix.is_empty() {
            address.to_string()
        } else {
            format!("{}, {}", address, self.city_suffix)
        }
    }
}

#[async_trait]
impl GeocodingProvider for GeocoderClient {
    async fn geocode(&self, address: &str) -> Result<Option<GeocodedPoint>> {
        let query = self.query_for(address);
        debug!("地理编码请求: {}", query);

        let body: GeocodeResponse = self
            .client
            .get(&self.base_url)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("format", "json"),
                ("geocode", query.as_str()),
            ])
            .send()
            .await
            .context("地理编码请求失败")?
            .error_for_status()
            .context("地理编码服务返回错误状态")?
            .json()
            .await
            .context("无法解析地理编码响应")?;

        first_candidate(body, address)
    }
}

/// 取第一个候选；没有候选时返回 `None`
fn first_candidate(body: GeocodeResponse, original: &str) -> Result<Option<GeocodedPoint>> {
    let Some(member) = body
        .response
        .and_then(|r| r.geo_object_collection)
        .and_then(|c| c.feature_member.into_iter().next())
    else {
        return Ok(None);
    };

    let object = member.geo_object;
    let (lon, lat) = parse_pos(&object.point.pos)
        .with_context(|| format!("无法解析坐标: {}", object.point.pos))?;

    Ok(Some(GeocodedPoint::new(object.name, original, lat, lon)))
}

/// `pos` 的格式是 "经度 纬度"
fn parse_pos(pos: &str) -> Option<(f64, f64)> {
    let mut parts = pos.split_whitespace().map(str::parse::<f64>);
    let lon = parts.next()?.ok()?;
    let lat = parts.next()?.ok()?;
    Some((lon, lat))
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    response: Option<GeocodeBody>,
}

#[derive(Debug, Deserialize)]
struct GeocodeBody {
    #[serde(rename = "GeoObjectCollection")]
    geo_object_collection: Option<GeoObjectCollection>,
}

#[derive(Debug, Deserialize)]
struct GeoObjectCollection {
    #[serde(rename = "featureMember", default)]
    feature_member: Vec<FeatureMember>,
}

#[derive(Debug, Deserialize)]
struct FeatureMember {
    #[serde(rename = "GeoObject")]
    geo_object: GeoObject,
}

#[derive(Debug, Deserialize)]
struct GeoObject {
    name: String,
    #[serde(rename = "Point")]
    point: GeoPoint,
}

#[derive(Debug, Deserialize)]
struct GeoPoint {
    pos: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_candidate_wins() {
        let body: GeocodeResponse = serde_json::from_str(
            r#"{"response":{"GeoObjectCollection":{"featureMember":[
                {"GeoObject":{"name":"Большая Садовая улица, 1","Point":{"pos":"39.718 47.222"}}},
                {"GeoObject":{"name":"другой","Point":{"pos":"0 0"}}}
            ]}}}"#,
        )
        .unwrap();

        let point = first_candidate(body, "ул. Большая Садовая, 1")
            .unwrap()
            .unwrap();
        assert_eq!(point.address, "Большая Садовая улица, 1");
        assert_eq!(point.original_address, "ул. Большая Садовая, 1");
        assert_eq!(point.lat, 47.222);
        assert_eq!(point.lon, 39.718);
    }

    #[test]
    fn empty_collection_is_not_found() {
        let body: GeocodeResponse = serde_json::from_str(
            r#"{"response":{"GeoObjectCollection":{"featureMember":[]}}}"#,
        )
        .unwrap();
        assert!(first_candidate(body, "x").unwrap().is_none());

        let body: GeocodeResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(first_candidate(body, "x").unwrap().is_none());
    }

    #[test]
    fn bad_pos_is_error() {
        let body: GeocodeResponse = serde_json::from_str(
            r#"{"response":{"GeoObjectCollection":{"featureMember":[
                {"GeoObject":{"name":"n","Point":{"pos":"abc"}}}
            ]}}}"#,
        )
        .unwrap();
        assert!(first_candidate(body, "x").is_err());
    }

    #[test]
    fn query_appends_city() {
        let client = GeocoderClient::new(&Config::default()).unwrap();
        assert_eq!(
            client.query_for("ул. Пушкинская, 100"),
            "ул. Пушкинская, 100, Ростов-на-Дону"
        );
    }
}
