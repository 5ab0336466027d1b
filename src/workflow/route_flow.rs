//! 路线处理流程 - 流程层
//!
//! 核心职责：定义"一次优化调用"的完整流程
//!
//! 流程顺序：
//! 1. 前置条件检查（不发任何网络请求）
//! 2. 解析地址 → 地理编码（0–50%）
//! 3. 时间矩阵（50–100%）
//! 4. 优化网关 → 结果规范化
//! 5. 写入 warn.txt（被跳过的条目）

use crate::clients::{GeocoderClient, RoutingClient};
use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::guard;
use crate::models::{GeocodedPoint, RouteResult, RouteTag, TimeMatrix, UploadedFile};
use crate::services::{
    normalize, Geocoder, OptimizationGateway, ProgressReporter, TimeMatrixBuilder, WarnWriter,
    Warning,
};
use crate::utils::truncate_text;
use crate::workflow::run_ctx::RunCtx;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// 一次调用的完整产出
#[derive(Debug, Clone)]
pub struct RunReport {
    pub tag: RouteTag,
    pub result: RouteResult,
    pub points: Vec<GeocodedPoint>,
    pub matrix: TimeMatrix,
    pub warnings: Vec<Warning>,
    /// 后端附带的文字报告
    pub text_report: Option<String>,
}

/// 路线处理流程
///
/// - 编排一次调用的各个阶段
/// - 不持有路线结果（结果由会话持有）
/// - 只依赖业务能力（services）
pub struct RouteFlow {
    geocoder: Geocoder,
    matrix_builder: TimeMatrixBuilder,
    gateway: OptimizationGateway,
    warn_writer: Option<WarnWriter>,
}

impl RouteFlow {
    pub fn new(
        geocoder: Geocoder,
        matrix_builder: TimeMatrixBuilder,
        gateway: OptimizationGateway,
    ) -> Self {
        Self {
            geocoder,
            matrix_builder,
            gateway,
            warn_writer: None,
        }
    }

    /// 按配置创建真实的 HTTP 客户端
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let geocoder = Geocoder::new(
            Arc::new(GeocoderClient::new(config)?),
            Duration::from_millis(config.geocode_interval_ms),
        );
        let matrix_builder = TimeMatrixBuilder::new(
            Arc::new(RoutingClient::new(config)?),
            Duration::from_millis(config.routing_interval_ms),
            config.consider_traffic,
        );
        let gateway = OptimizationGateway::from_config(config)?;

        Ok(Self::new(geocoder, matrix_builder, gateway)
            .with_warn_writer(WarnWriter::with_path(&config.warn_file)))
    }

    pub fn with_warn_writer(mut self, writer: WarnWriter) -> Self {
        self.warn_writer = Some(writer);
        self
    }

    pub fn gateway(&self) -> &OptimizationGateway {
        &self.gateway
    }

    pub async fn run(
        &self,
        file: &UploadedFile,
        ctx: &RunCtx,
        progress: &ProgressReporter,
    ) -> AppResult<RunReport> {
        // ========== 前置条件 ==========
        self.gateway.preflight()?;

        progress.reset();
        let addresses = file.addresses();
        info!(
            "{} 🚀 开始优化 ({}), 地址 {} 个",
            ctx,
            ctx.tag.display_name(),
            addresses.len()
        );
        if addresses.is_empty() {
            warn!("{} ⚠️ 文件 {} 中没有可用的地址", ctx, file.name);
        }

        let mut warnings = Vec::new();

        // ========== 地理编码 ==========
        let points = self
            .geocoder
            .geocode_all(&addresses, progress, &mut warnings, &ctx.token)
            .await?;
        info!(
            "{} ✓ 地理编码完成: {}/{}",
            ctx,
            points.len(),
            addresses.len()
        );

        // ========== 时间矩阵 ==========
        let matrix = self
            .matrix_builder
            .build(&points, progress, &mut warnings, &ctx.token)
            .await?;
        if matrix.failed_cells() > 0 {
            warn!(
                "{} ⚠️ {} 个路段使用了哨兵值",
                ctx,
                matrix.failed_cells()
            );
        }

        // ========== 优化 ==========
        progress.report(100.0, "正在优化路线");
        let backend = guard(&ctx.token, self.gateway.optimize(file, ctx.tag)).await??;
        let text_report = backend.text_report.clone();
        let result = normalize(backend);

        if let Some(report) = &text_report {
            info!("{} 📝 {}", ctx, truncate_text(report, 200));
        }

        // ========== 兜底记录 ==========
        if let Some(writer) = &self.warn_writer {
            if let Err(e) = writer.write_all(ctx.tag.as_str(), &warnings).await {
                warn!("{} ⚠️ 无法写入 {}: {}", ctx, writer.path(), e);
            }
        }

        Ok(RunReport {
            tag: ctx.tag,
            result,
            points,
            matrix,
            warnings,
            text_report,
        })
    }
}
