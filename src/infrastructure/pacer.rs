//! 调用节奏 - 基础设施层
//!
//! 外部地理编码和路段服务都有频率限制，同一阶段的调用严格串行，
//! 并保证两次调用的开始时间至少间隔 `min_interval`

use crate::error::{AppError, AppResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

/// 最小调用间隔策略
#[derive(Debug, Clone)]
pub struct Pacer {
    min_interval: Duration,
    last_call: Option<Instant>,
}

impl Pacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: None,
        }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    /// 不限速（测试和离线模式使用）
    pub fn unpaced() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// 等到允许发起下一次调用，并记录本次调用的开始时间
    pub async fn ready(&mut self) {
        if let Some(last) = self.last_call {
            let next = last + self.min_interval;
            if next > Instant::now() {
                sleep_until(next).await;
            }
        }
        self.last_call = Some(Instant::now());
    }

    /// 新的一轮调用（每次优化调用开始时）
    pub fn reset(&mut self) {
        self.last_call = None;
    }
}

/// 在取消令牌下等待 future；令牌被取消时返回 [`AppError::Cancelled`]
pub async fn guard<F: Future>(token: &CancellationToken, fut: F) -> AppResult<F::Output> {
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(AppError::Cancelled),
        out = fut => Ok(out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn spaces_consecutive_calls() {
        let mut pacer = Pacer::from_millis(500);
        let start = Instant::now();

        pacer.ready().await;
        assert_eq!(Instant::now() - start, Duration::ZERO);

        pacer.ready().await;
        assert!(Instant::now() - start >= Duration::from_millis(500));

        pacer.ready().await;
        assert!(Instant::now() - start >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn reset_allows_immediate_call() {
        let mut pacer = Pacer::from_millis(300);
        pacer.ready().await;
        pacer.reset();

        let before = Instant::now();
        pacer.ready().await;
        assert_eq!(Instant::now() - before, Duration::ZERO);
    }

    #[tokio::test]
    async fn guard_returns_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        let result = guard(&token, std::future::pending::<()>()).await;
        assert!(matches!(result, Err(AppError::Cancelled)));

        let live = CancellationToken::new();
        assert_eq!(guard(&live, async { 7 }).await.unwrap(), 7);
    }
}
