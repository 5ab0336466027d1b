//! 错误类型
//!
//! 分层错误：
//! - 单条失败（地理编码未命中、路段计算失败）在服务层内部吸收，不出现在这里
//! - 前置条件失败、传输/后端失败、格式失败、导出失败才会上浮到编排层

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 前置条件不满足（在任何网络调用之前抛出）
    #[error("前置条件失败: {0}")]
    Precondition(#[from] PreconditionError),
    /// API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 导出错误
    #[error("导出错误: {0}")]
    Export(#[from] ExportError),
    /// 同一标签的新调用取代了本次调用
    #[error("调用已被新的调用取代")]
    Cancelled,
}

/// 前置条件错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    /// 远程策略缺少服务密钥
    #[error("必须提供 2GIS API 密钥")]
    MissingCredential,
    /// 未选择地址文件
    #[error("未选择地址文件")]
    MissingFile,
    /// 工作开始时间格式不正确
    #[error("工作开始时间格式不正确: {value}")]
    InvalidWorkStart { value: String },
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 后端返回非 2xx 响应，响应体作为诊断信息
    #[error("HTTP {status}: {body}")]
    BadStatus { status: u16, body: String },
    /// JSON 解析失败
    #[error("JSON解析失败 ({endpoint}): {source}")]
    JsonParseFailed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("无法读取配置文件 {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 导出错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// 两个路线都不存在
    #[error("没有可导出的数据")]
    NothingToExport,
    /// 日历导出需要智能路线
    #[error("没有可导出到日历的智能路线")]
    NoSmartRoute,
    /// 到达时间无法解析为 HH:MM
    #[error("无法解析到达时间: {value}")]
    InvalidTime { value: String },
}

impl ExportError {
    /// 缺少结果属于前置条件失败，时间格式错误不是
    pub fn is_precondition(&self) -> bool {
        matches!(self, ExportError::NothingToExport | ExportError::NoSmartRoute)
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建API请求失败错误
    pub fn api_request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        })
    }

    /// 创建JSON解析失败错误
    pub fn json_parse_failed(endpoint: impl Into<String>, source: serde_json::Error) -> Self {
        AppError::Api(ApiError::JsonParseFailed {
            endpoint: endpoint.into(),
            source,
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 是否为前置条件失败
    pub fn is_precondition(&self) -> bool {
        match self {
            AppError::Precondition(_) => true,
            AppError::Export(e) => e.is_precondition(),
            _ => false,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
