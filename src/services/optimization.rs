//! 优化网关 - 业务能力层
//!
//! 两种可互换的策略：
//! - `Mock`：本地确定性生成，不访问网络
//! - `Remote`：上传地址文件到优化服务
//!
//! 两者都返回后端格式的 [`BackendRoute`]，由 `normalizer` 转为规范结果

use crate::clients::{OptimizeParams, OptimizerClient};
use crate::config::Config;
use crate::error::{AppResult, PreconditionError};
use crate::models::{BackendRoute, BackendStop, BackendSummary, RouteTag, UploadedFile};
use crate::utils::time;
use tracing::{debug, info};

/// 模拟路线的固定停靠点
const MOCK_STOPS: [(&str, f64, f64); 5] = [
    ("ул. Большая Садовая, 1", 47.222, 39.718),
    ("пр. Ворошиловский, 10", 47.235, 39.702),
    ("ул. Пушкинская, 100", 47.228, 39.745),
    ("пл. Гагарина, 1", 47.258, 39.682),
    ("ул. Красноармейская, 50", 47.240, 39.728),
];

/// 本地模拟后端
#[derive(Debug, Clone, Default)]
pub struct MockBackend;

impl MockBackend {
    /// 智能路线比基准路线更短、迟到更少
    pub fn generate(&self, tag: RouteTag) -> BackendRoute {
        let route = MOCK_STOPS
            .iter()
            .enumerate()
            .map(|(index, (address, lat, lon))| BackendStop {
                address: address.to_string(),
                lat: Some(*lat),
                lon: Some(*lon),
                eta: time::add_minutes("09:00", index as i64 * 15),
                service_min: Some(30.0),
            })
            .collect();

        let (drive_min, late) = match tag {
            RouteTag::Smart => (125.0, 1),
            RouteTag::Baseline => (180.0, 3),
        };

        BackendRoute {
            route,
            summary: BackendSummary {
                drive_min,
                visits: MOCK_STOPS.len() as u32,
                late,
                late_penalty: f64::from(late) * 1000.0,
            },
            text_report: None,
        }
    }
}

/// 远程优化后端
pub struct RemoteBackend {
    client: OptimizerClient,
    credential: String,
    work_start: String,
    meeting_minutes: u32,
}

impl RemoteBackend {
    pub fn new(client: OptimizerClient, config: &Config) -> Self {
        Self {
            client,
            credential: config.dgis_api_key.trim().to_string(),
            work_start: config.work_start.trim().to_string(),
            meeting_minutes: config.meeting_minutes(),
        }
    }

    /// 在任何网络调用之前检查参数
    pub fn params(&self) -> Result<OptimizeParams, PreconditionError> {
        if self.credential.is_empty() {
            return Err(PreconditionError::MissingCredential);
        }
        let work_end =
            time::work_end(&self.work_start).ok_or_else(|| PreconditionError::InvalidWorkStart {
                value: self.work_start.clone(),
            })?;

        Ok(OptimizeParams {
            dgis_api_key: self.credential.clone(),
            work_start: self.work_start.clone(),
            work_end,
            meeting_minutes: self.meeting_minutes,
        })
    }

    pub async fn optimize(&self, file: &UploadedFile) -> AppResult<BackendRoute> {
        let params = self.params()?;
        info!("📡 上传文件到优化服务...");
        debug!(
            "工作时间 {}–{}, 停留 {} 分钟",
            params.work_start, params.work_end, params.meeting_minutes
        );
        self.client.optimize(file, &params).await
    }
}

/// 优化策略
pub enum OptimizationStrategy {
    Mock(MockBackend),
    Remote(RemoteBackend),
}

/// 优化网关
pub struct OptimizationGateway {
    strategy: OptimizationStrategy,
}

impl OptimizationGateway {
    pub fn new(strategy: OptimizationStrategy) -> Self {
        Self { strategy }
    }

    pub fn mock() -> Self {
        Self::new(OptimizationStrategy::Mock(MockBackend))
    }

    /// 按配置选择策略
    pub fn from_config(config: &Config) -> AppResult<Self> {
        if config.use_mock {
            return Ok(Self::mock());
        }
        let client = OptimizerClient::new(config)?;
        Ok(Self::new(OptimizationStrategy::Remote(RemoteBackend::new(
            client, config,
        ))))
    }

    pub fn is_mock(&self) -> bool {
        matches!(self.strategy, OptimizationStrategy::Mock(_))
    }

    /// 前置条件检查，流程开始时调用
    pub fn preflight(&self) -> Result<(), PreconditionError> {
        match &self.strategy {
            OptimizationStrategy::Mock(_) => Ok(()),
            OptimizationStrategy::Remote(remote) => remote.params().map(|_| ()),
        }
    }

    pub async fn optimize(&self, file: &UploadedFile, tag: RouteTag) -> AppResult<BackendRoute> {
        match &self.strategy {
            OptimizationStrategy::Mock(mock) => {
                info!("🧪 使用模拟结果 ({})", tag.display_name());
                Ok(mock.generate(tag))
            }
            OptimizationStrategy::Remote(remote) => remote.optimize(file).await,
        }
    }
}
