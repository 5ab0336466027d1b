//! 进度服务 - 业务能力层
//!
//! 把多阶段的异步工作映射到一个 0–100 的百分比：
//! 地理编码占 0–50，矩阵计算占 50–100

use tokio::sync::watch;
use tracing::debug;

/// 地理编码阶段结束时的百分比
pub const GEOCODE_SHARE: f64 = 50.0;

/// 某一时刻的进度
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressSnapshot {
    pub percent: f64,
    pub detail: String,
}

impl ProgressSnapshot {
    /// 显示用的整数百分比
    pub fn display_percent(&self) -> u8 {
        self.percent.round().clamp(0.0, 100.0) as u8
    }

    /// 状态行，例如 `"37% 路段 2 → 3"`
    pub fn status_line(&self) -> String {
        if self.detail.is_empty() {
            format!("{}%", self.display_percent())
        } else {
            format!("{}% {}", self.display_percent(), self.detail)
        }
    }
}

/// 进度报告器
///
/// 百分比在一次调用内单调不减，并且总在 [0, 100] 之内；
/// 观察者通过 [`ProgressReporter::subscribe`] 获取更新
pub struct ProgressReporter {
    sender: watch::Sender<ProgressSnapshot>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(ProgressSnapshot::default());
        Self { sender }
    }

    pub fn subscribe(&self) -> watch::Receiver<ProgressSnapshot> {
        self.sender.subscribe()
    }

    pub fn current(&self) -> ProgressSnapshot {
        self.sender.borrow().clone()
    }

    /// 每次优化调用开始时归零
    pub fn reset(&self) {
        self.sender.send_modify(|snapshot| *snapshot = ProgressSnapshot::default());
    }

    pub fn report(&self, percent: f64, detail: impl Into<String>) {
        let detail = detail.into();
        self.sender.send_modify(|snapshot| {
            if percent.is_finite() {
                snapshot.percent = snapshot.percent.max(percent.clamp(0.0, 100.0));
            }
            snapshot.detail = detail;
        });
        debug!("进度: {}", self.current().status_line());
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// 地理编码阶段：已处理 `done` / `total` 个地址
pub fn geocode_percent(done: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    done as f64 / total as f64 * GEOCODE_SHARE
}

/// 矩阵阶段：已完成 `done` / `total` 个单元格（含对角线）
pub fn matrix_percent(done: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    GEOCODE_SHARE + done as f64 / total as f64 * (100.0 - GEOCODE_SHARE)
}
