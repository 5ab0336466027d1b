//! 运行上下文
//!
//! 封装"这是哪个标签的第几次调用"这一信息

use crate::models::RouteTag;
use std::fmt::Display;
use tokio_util::sync::CancellationToken;

/// 一次优化调用的上下文
#[derive(Debug, Clone)]
pub struct RunCtx {
    /// 路线标签
    pub tag: RouteTag,

    /// 调用序号（会话内递增，只有最新的调用可以写入结果）
    pub invocation: u64,

    /// 被同标签的新调用取代时触发
    pub token: CancellationToken,
}

impl RunCtx {
    pub fn new(tag: RouteTag, invocation: u64, token: CancellationToken) -> Self {
        Self {
            tag,
            invocation,
            token,
        }
    }

    /// 不受会话管理的独立调用
    pub fn detached(tag: RouteTag) -> Self {
        Self::new(tag, 0, CancellationToken::new())
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Display for RunCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} #{}]", self.tag, self.invocation)
    }
}
