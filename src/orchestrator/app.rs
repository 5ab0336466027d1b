//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：创建 HTTP 客户端、流程、会话
//! 2. **密钥检查**：本地格式检查 + 服务端校验（只记录结果，不阻断）
//! 3. **依次运行**：先智能路线，再基准路线，同一时刻只有一个网络阶段在进行
//! 4. **对比**：两个结果都在时输出改进百分比
//! 5. **导出**：把 CSV / ICS 写入输出目录

use crate::clients::OptimizerClient;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{load_addresses, RouteTag, UploadedFile};
use crate::orchestrator::session::Session;
use crate::services::{export, CredentialStatus, CredentialValidator};
use crate::utils::logging;
use crate::workflow::RouteFlow;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    flow: RouteFlow,
    session: Session,
    validator: CredentialValidator,
}

/// 运行结果
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub succeeded: Vec<RouteTag>,
    pub failed: Vec<RouteTag>,
    pub written: Vec<PathBuf>,
}

impl RunOutcome {
    pub fn all_failed(&self) -> bool {
        self.succeeded.is_empty()
    }
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        logging::log_startup(&config);

        let flow = RouteFlow::from_config(&config)?;
        let validator = CredentialValidator::new(OptimizerClient::new(&config)?);

        Ok(Self {
            config,
            flow,
            session: Session::new(),
            validator,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<RunOutcome> {
        self.check_credential().await;

        let file = match load_addresses(Path::new(&self.config.input_file)).await {
            Ok(file) => Some(file),
            Err(e) => {
                error!("❌ {}", e);
                None
            }
        };

        let mut outcome = RunOutcome::default();
        for tag in [RouteTag::Smart, RouteTag::Baseline] {
            self.run_tag(file.as_ref(), tag, &mut outcome).await;
        }

        if let Some(comparison) = self.session.comparison() {
            logging::log_comparison(&comparison);
        }

        outcome.written = self.write_exports().await?;
        logging::log_run_complete(&outcome.succeeded, &outcome.failed, &outcome.written);

        Ok(outcome)
    }

    async fn check_credential(&self) {
        if self.flow.gateway().is_mock() {
            return;
        }
        match self.validator.validate(&self.config.dgis_api_key).await {
            CredentialStatus::Empty => warn!("⚠️ 未填写 2GIS API 密钥"),
            status @ CredentialStatus::Valid => info!("{}", status),
            status => warn!("{}", status),
        }
    }

    async fn run_tag(&self, file: Option<&UploadedFile>, tag: RouteTag, outcome: &mut RunOutcome) {
        match self.session.optimize(&self.flow, file, tag).await {
            Ok(report) => {
                info!(
                    "✓ {}: {} 个停靠点, 跳过 {} 条",
                    tag.display_name(),
                    report.result.route.len(),
                    report.warnings.len()
                );
                outcome.succeeded.push(tag);
            }
            Err(e) => {
                error!("❌ {} 失败: {}", tag.display_name(), e);
                outcome.failed.push(tag);
            }
        }
    }

    /// 写出当前持有的结果
    async fn write_exports(&self) -> AppResult<Vec<PathBuf>> {
        let mut written = Vec::new();
        if !self.session.exports_enabled() {
            warn!("⚠️ 没有可导出的数据");
            return Ok(written);
        }

        let dir = PathBuf::from(&self.config.output_dir);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::file_write_failed(dir.display().to_string(), e))?;
        let today = chrono::Utc::now().date_naive();

        let csv = self.session.export_csv()?;
        written.push(write_text(&dir.join(export::csv_file_name(today)), &csv).await?);
        info!("📊 CSV 已导出");

        match self.session.export_ics() {
            Ok(ics) => {
                written.push(write_text(&dir.join(export::ics_file_name(today)), &ics).await?);
                info!("📅 日历已导出");
            }
            Err(e) => warn!("⚠️ 跳过日历导出: {}", e),
        }

        Ok(written)
    }
}

async fn write_text(path: &Path, text: &str) -> AppResult<PathBuf> {
    tokio::fs::write(path, text)
        .await
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;
    Ok(path.to_path_buf())
}
