//! 会话 - 编排层
//!
//! ## 职责
//!
//! 持有两个带标签的结果槽（smart / baseline）和状态行，
//! 是唯一会修改结果的地方。
//!
//! ## 核心规则
//!
//! 1. **整体替换**：某个标签的结果只在一次调用完整成功后被替换
//! 2. **每个标签最多一个进行中的调用**：新调用会取消旧调用，旧调用永远不会写入
//! 3. **失败不覆盖**：前置条件、传输、后端失败都保留之前的结果
//! 4. **读取不修改**：对比和导出只读当前结果

use crate::error::{AppError, AppResult, ExportError, PreconditionError};
use crate::models::{RouteResult, RouteTag, Summary, UploadedFile};
use crate::services::{export, Comparison, ProgressReporter};
use crate::workflow::{RouteFlow, RunCtx, RunReport};
use std::fmt::Display;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// 状态行
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RunStatus {
    #[default]
    Idle,
    Calculating,
    Ready,
    Failed(String),
}

impl Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Idle => write!(f, "-"),
            RunStatus::Calculating => write!(f, "计算中..."),
            RunStatus::Ready => write!(f, "完成"),
            RunStatus::Failed(_) => write!(f, "错误"),
        }
    }
}

#[derive(Debug, Default)]
struct Slots {
    smart: Option<RouteResult>,
    baseline: Option<RouteResult>,
    smart_in_flight: Option<InFlight>,
    baseline_in_flight: Option<InFlight>,
    next_invocation: u64,
    status: RunStatus,
}

#[derive(Debug)]
struct InFlight {
    invocation: u64,
    token: CancellationToken,
}

impl Slots {
    fn result_mut(&mut self, tag: RouteTag) -> &mut Option<RouteResult> {
        match tag {
            RouteTag::Smart => &mut self.smart,
            RouteTag::Baseline => &mut self.baseline,
        }
    }

    fn in_flight_mut(&mut self, tag: RouteTag) -> &mut Option<InFlight> {
        match tag {
            RouteTag::Smart => &mut self.smart_in_flight,
            RouteTag::Baseline => &mut self.baseline_in_flight,
        }
    }

    fn is_current(&mut self, ctx: &RunCtx) -> bool {
        !ctx.is_cancelled()
            && self
                .in_flight_mut(ctx.tag)
                .as_ref()
                .is_some_and(|f| f.invocation == ctx.invocation)
    }
}

/// 会话
///
/// 锁只在同步代码里持有，从不跨越 `.await`
pub struct Session {
    slots: Mutex<Slots>,
    smart_progress: ProgressReporter,
    baseline_progress: ProgressReporter,
}

impl Session {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(Slots::default()),
            smart_progress: ProgressReporter::new(),
            baseline_progress: ProgressReporter::new(),
        }
    }

    fn slots(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn progress(&self, tag: RouteTag) -> &ProgressReporter {
        match tag {
            RouteTag::Smart => &self.smart_progress,
            RouteTag::Baseline => &self.baseline_progress,
        }
    }

    /// 运行一次优化并在成功时替换该标签的结果
    pub async fn optimize(
        &self,
        flow: &RouteFlow,
        file: Option<&UploadedFile>,
        tag: RouteTag,
    ) -> AppResult<RunReport> {
        let Some(file) = file else {
            error!("❌ 请先选择地址文件");
            return Err(PreconditionError::MissingFile.into());
        };

        let ctx = self.begin(tag);
        let outcome = flow.run(file, &ctx, self.progress(tag)).await;

        match outcome {
            Ok(report) => {
                if self.commit(&ctx, report.result.clone()) {
                    info!("{} ✅ 路线构建成功", ctx);
                    Ok(report)
                } else {
                    warn!("{} 调用已被取代，结果被丢弃", ctx);
                    Err(AppError::Cancelled)
                }
            }
            Err(e) => {
                self.fail(&ctx, &e);
                Err(e)
            }
        }
    }

    /// 登记新调用，取消同标签的旧调用
    pub fn begin(&self, tag: RouteTag) -> RunCtx {
        let mut slots = self.slots();
        slots.next_invocation += 1;
        let invocation = slots.next_invocation;
        let token = CancellationToken::new();

        if let Some(previous) = slots.in_flight_mut(tag).replace(InFlight {
            invocation,
            token: token.clone(),
        }) {
            info!("[{} #{}] 被新的调用取消", tag, previous.invocation);
            previous.token.cancel();
        }
        slots.status = RunStatus::Calculating;

        RunCtx::new(tag, invocation, token)
    }

    /// 写入结果；调用已被取代时返回 false
    pub fn commit(&self, ctx: &RunCtx, result: RouteResult) -> bool {
        let mut slots = self.slots();
        if !slots.is_current(ctx) {
            return false;
        }
        *slots.in_flight_mut(ctx.tag) = None;
        *slots.result_mut(ctx.tag) = Some(result);
        slots.status = RunStatus::Ready;
        true
    }

    /// 记录失败，保留之前的结果
    fn fail(&self, ctx: &RunCtx, err: &AppError) {
        let mut slots = self.slots();
        if !slots.is_current(ctx) {
            return;
        }
        *slots.in_flight_mut(ctx.tag) = None;
        if matches!(err, AppError::Cancelled) {
            return;
        }
        error!("{} ❌ 错误: {}", ctx, err);
        slots.status = RunStatus::Failed(err.to_string());
    }

    /// 取消某个标签正在进行的调用
    pub fn cancel(&self, tag: RouteTag) {
        if let Some(in_flight) = self.slots().in_flight_mut(tag).take() {
            in_flight.token.cancel();
        }
    }

    /// 清空两个结果，取消进行中的调用
    pub fn clear(&self) {
        let mut slots = self.slots();
        for tag in [RouteTag::Smart, RouteTag::Baseline] {
            if let Some(in_flight) = slots.in_flight_mut(tag).take() {
                in_flight.token.cancel();
            }
            *slots.result_mut(tag) = None;
        }
        slots.status = RunStatus::Idle;
        info!("🗑️ 所有数据已清空");
    }

    pub fn result(&self, tag: RouteTag) -> Option<RouteResult> {
        self.slots().result_mut(tag).clone()
    }

    /// 没有结果时汇总全为 0
    pub fn summary(&self, tag: RouteTag) -> Summary {
        self.result(tag).map(|r| r.summary).unwrap_or_default()
    }

    pub fn status(&self) -> RunStatus {
        self.slots().status.clone()
    }

    pub fn exports_enabled(&self) -> bool {
        let slots = self.slots();
        slots.smart.is_some() || slots.baseline.is_some()
    }

    /// 两个结果都存在时才有对比
    pub fn comparison(&self) -> Option<Comparison> {
        let slots = self.slots();
        match (&slots.smart, &slots.baseline) {
            (Some(smart), Some(baseline)) => Some(Comparison::new(smart, baseline)),
            _ => None,
        }
    }

    pub fn export_csv(&self) -> Result<String, ExportError> {
        let slots = self.slots();
        export::to_csv(slots.smart.as_ref(), slots.baseline.as_ref())
    }

    pub fn export_ics(&self) -> Result<String, ExportError> {
        export::to_ics(self.slots().smart.as_ref())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{normalize, MockBackend};

    fn mock_result(tag: RouteTag) -> RouteResult {
        normalize(MockBackend.generate(tag))
    }

    #[test]
    fn newer_invocation_wins() {
        let session = Session::new();
        let first = session.begin(RouteTag::Smart);
        let second = session.begin(RouteTag::Smart);

        assert!(first.is_cancelled());
        assert!(!session.commit(&first, mock_result(RouteTag::Baseline)));
        assert!(session.result(RouteTag::Smart).is_none());

        assert!(session.commit(&second, mock_result(RouteTag::Smart)));
        assert_eq!(session.summary(RouteTag::Smart).total_time_min, 125.0);
        assert_eq!(session.status(), RunStatus::Ready);
    }

    #[test]
    fn tags_do_not_cancel_each_other() {
        let session = Session::new();
        let smart = session.begin(RouteTag::Smart);
        let baseline = session.begin(RouteTag::Baseline);

        assert!(!smart.is_cancelled());
        assert!(session.commit(&baseline, mock_result(RouteTag::Baseline)));
        assert!(session.commit(&smart, mock_result(RouteTag::Smart)));
        assert_eq!(session.comparison().unwrap().improvement, "+31%");
    }

    #[test]
    fn clear_resets_everything() {
        let session = Session::new();
        let ctx = session.begin(RouteTag::Smart);
        session.commit(&ctx, mock_result(RouteTag::Smart));
        assert!(session.exports_enabled());

        session.clear();
        assert_eq!(session.summary(RouteTag::Smart), Summary::default());
        assert_eq!(session.status(), RunStatus::Idle);
        assert!(!session.exports_enabled());
        assert_eq!(session.export_csv(), Err(ExportError::NothingToExport));
        assert_eq!(session.export_ics(), Err(ExportError::NoSmartRoute));
        assert!(AppError::from(ExportError::NoSmartRoute).is_precondition());
    }

    #[test]
    fn failure_keeps_previous_result() {
        let session = Session::new();
        let ctx = session.begin(RouteTag::Baseline);
        session.commit(&ctx, mock_result(RouteTag::Baseline));

        let retry = session.begin(RouteTag::Baseline);
        session.fail(
            &retry,
            &AppError::Api(crate::error::ApiError::BadStatus {
                status: 500,
                body: "boom".to_string(),
            }),
        );

        assert_eq!(session.summary(RouteTag::Baseline).total_time_min, 180.0);
        assert!(matches!(session.status(), RunStatus::Failed(msg) if msg.contains("boom")));
    }

    #[test]
    fn cancel_drops_in_flight() {
        let session = Session::new();
        let ctx = session.begin(RouteTag::Smart);
        session.cancel(RouteTag::Smart);
        assert!(ctx.is_cancelled());
        assert!(!session.commit(&ctx, mock_result(RouteTag::Smart)));
    }

    #[test]
    fn status_line_text() {
        assert_eq!(RunStatus::Idle.to_string(), "-");
        assert_eq!(RunStatus::Failed("x".into()).to_string(), "错误");
    }
}
