use crate::error::{AppResult, ConfigError};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- 优化后端 ---
    /// 优化服务地址
    pub api_base: String,
    /// 2GIS 服务密钥（远程优化和路段计算共用）
    pub dgis_api_key: String,
    /// 使用本地模拟结果而不是远程服务
    pub use_mock: bool,
    // --- 地理编码 ---
    pub geocoder_base_url: String,
    pub geocoder_api_key: String,
    /// 追加到每个地址后面的城市名
    pub city_suffix: String,
    // --- 路段计算 ---
    pub routing_base_url: String,
    /// 是否考虑实时路况
    pub consider_traffic: bool,
    // --- 工作参数 ---
    /// 工作开始时间 (HH:MM)
    pub work_start: String,
    /// 每个访问点的停留时长（分钟）
    pub visit_duration_min: i64,
    // --- 调用节奏 ---
    pub geocode_interval_ms: u64,
    pub routing_interval_ms: u64,
    pub request_timeout_secs: u64,
    // --- 文件 ---
    /// 地址文件（.csv 或 .txt）
    pub input_file: String,
    /// 导出目录
    pub output_dir: String,
    /// 跳过记录文件
    pub warn_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: "https://hackatoon-production.up.railway.app".to_string(),
            dgis_api_key: String::new(),
            use_mock: true,
            geocoder_base_url: "https://geocode-maps.yandex.ru/1.x/".to_string(),
            geocoder_api_key: String::new(),
            city_suffix: "Ростов-на-Дону".to_string(),
            routing_base_url: "https://routing.api.2gis.com/routing/7.0.0/global".to_string(),
            consider_traffic: true,
            work_start: "09:00".to_string(),
            visit_duration_min: 30,
            geocode_interval_ms: 300,
            routing_interval_ms: 500,
            request_timeout_secs: 30,
            input_file: "addresses.txt".to_string(),
            output_dir: ".".to_string(),
            warn_file: "warn.txt".to_string(),
        }
    }
}

impl Config {
    /// 读取配置：先读 `ROUTE_PLANNER_CONFIG` 指向的 TOML 文件（如有），再应用环境变量
    pub fn load() -> AppResult<Self> {
        let base = match std::env::var("ROUTE_PLANNER_CONFIG") {
            Ok(path) => Self::from_toml_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载，缺失的字段取默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })?;
        Ok(config)
    }

    fn with_env_overrides(self) -> Self {
        Self {
            api_base: env_string("API_BASE").unwrap_or(self.api_base),
            dgis_api_key: env_string("DGIS_API_KEY").unwrap_or(self.dgis_api_key),
            use_mock: env_parse("USE_MOCK").unwrap_or(self.use_mock),
            geocoder_base_url: env_string("GEOCODER_BASE_URL").unwrap_or(self.geocoder_base_url),
            geocoder_api_key: env_string("GEOCODER_API_KEY").unwrap_or(self.geocoder_api_key),
            city_suffix: env_string("CITY_SUFFIX").unwrap_or(self.city_suffix),
            routing_base_url: env_string("ROUTING_BASE_URL").unwrap_or(self.routing_base_url),
            consider_traffic: env_parse("CONSIDER_TRAFFIC").unwrap_or(self.consider_traffic),
            work_start: env_string("WORK_START").unwrap_or(self.work_start),
            visit_duration_min: env_parse("VISIT_DURATION_MIN").unwrap_or(self.visit_duration_min),
            geocode_interval_ms: env_parse("GEOCODE_INTERVAL_MS").unwrap_or(self.geocode_interval_ms),
            routing_interval_ms: env_parse("ROUTING_INTERVAL_MS").unwrap_or(self.routing_interval_ms),
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS")
                .unwrap_or(self.request_timeout_secs),
            input_file: env_string("INPUT_FILE").unwrap_or(self.input_file),
            output_dir: env_string("OUTPUT_DIR").unwrap_or(self.output_dir),
            warn_file: env_string("WARN_FILE").unwrap_or(self.warn_file),
        }
    }

    /// 每次访问的停留时长，无效值回退到 30 分钟
    pub fn meeting_minutes(&self) -> u32 {
        u32::try_from(self.visit_duration_min)
            .ok()
            .filter(|m| *m > 0)
            .unwrap_or(30)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().map(|v| v.trim().to_string())
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
