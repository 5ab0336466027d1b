/// 优化服务 API 客户端
///
/// 封装两个接口：
/// - `POST {base}/api/optimize_2gis`：上传地址文件，返回后端格式的路线
/// - `POST {base}/api/validate_dgis_key`：校验 2GIS 密钥
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::models::{BackendRoute, UploadedFile};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

/// 优化请求参数（全部放在查询串里）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizeParams {
    pub dgis_api_key: String,
    pub work_start: String,
    pub work_end: String,
    pub meeting_minutes: u32,
}

impl OptimizeParams {
    fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("dgis_api_key", self.dgis_api_key.clone()),
            ("work_start", self.work_start.clone()),
            ("work_end", self.work_end.clone()),
            ("meeting_minutes", self.meeting_minutes.to_string()),
        ]
    }
}

/// 密钥校验响应
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeyValidation {
    pub valid: bool,
    #[serde(default)]
    pub error: Option<String>,
}

pub struct OptimizerClient {
    client: reqwest::Client,
    base_url: String,
}

impl OptimizerClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AppError::api_request_failed("client", e))?;

        Ok(Self {
            client,
            base_url: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    /// 上传文件并获取优化结果
    ///
    /// 非 2xx 响应的响应体作为诊断信息返回
    pub async fn optimize(
        &self,
        file: &UploadedFile,
        params: &OptimizeParams,
    ) -> AppResult<BackendRoute> {
        let endpoint = self.endpoint("optimize_2gis");
        debug!(
            "上传文件 {} ({} 字节) 到 {}",
            file.name,
            file.content.len(),
            endpoint
        );

        let form = Form::new().part(
            "file",
            Part::bytes(file.content.clone()).file_name(file.name.clone()),
        );

        let response = self
            .client
            .post(&endpoint)
            .query(&params.query())
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;

        if !status.is_success() {
            return Err(ApiError::BadStatus {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        serde_json::from_str(&body).map_err(|e| AppError::json_parse_failed(&endpoint, e))
    }

    /// 远程校验密钥
    pub async fn validate_key(&self, credential: &str) -> AppResult<KeyValidation> {
        let endpoint = self.endpoint("validate_dgis_key");

        let body = self
            .client
            .post(&endpoint)
            .query(&[("dgis_api_key", credential)])
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?
            .text()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;

        serde_json::from_str(&body).map_err(|e| AppError::json_parse_failed(&endpoint, e))
    }
}
