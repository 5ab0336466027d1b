//! 密钥校验服务 - 业务能力层
//!
//! 先在本地检查 UUID 格式，格式正确才请求服务端

use crate::clients::OptimizerClient;
use regex::Regex;
use std::fmt::Display;
use tracing::{debug, warn};

const UUID_PATTERN: &str =
    r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$";

/// 校验结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialStatus {
    /// 未填写
    Empty,
    /// 不是 UUID 格式，未请求服务端
    MalformedFormat,
    Valid,
    /// 服务端拒绝，附带服务端的说明
    Rejected(String),
    /// 校验请求本身失败
    CheckFailed(String),
}

impl CredentialStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, CredentialStatus::Valid)
    }
}

impl Display for CredentialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialStatus::Empty => Ok(()),
            CredentialStatus::MalformedFormat => write!(f, "❌ 密钥格式不正确"),
            CredentialStatus::Valid => write!(f, "✅ 密钥有效"),
            CredentialStatus::Rejected(reason) => write!(f, "❌ {}", reason),
            CredentialStatus::CheckFailed(_) => write!(f, "❌ 密钥校验失败"),
        }
    }
}

/// 本地格式检查
pub fn is_uuid_shaped(credential: &str) -> bool {
    Regex::new(UUID_PATTERN)
        .map(|re| re.is_match(credential))
        .unwrap_or(false)
}

pub struct CredentialValidator {
    client: OptimizerClient,
}

impl CredentialValidator {
    pub fn new(client: OptimizerClient) -> Self {
        Self { client }
    }

    /// 校验密钥，不会返回错误
    pub async fn validate(&self, credential: &str) -> CredentialStatus {
        let credential = credential.trim();
        if let Some(status) = precheck(credential) {
            return status;
        }

        debug!("正在校验密钥...");
        match self.client.validate_key(credential).await {
            Ok(response) if response.valid => CredentialStatus::Valid,
            Ok(response) => CredentialStatus::Rejected(response.error.unwrap_or_default()),
            Err(e) => {
                warn!("密钥校验请求失败: {}", e);
                CredentialStatus::CheckFailed(e.to_string())
            }
        }
    }
}

/// 不需要网络就能得出的结论
fn precheck(credential: &str) -> Option<CredentialStatus> {
    if credential.is_empty() {
        Some(CredentialStatus::Empty)
    } else if !is_uuid_shaped(credential) {
        Some(CredentialStatus::MalformedFormat)
    } else {
        None
    }
}
