//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `session` - 会话
//! - 持有 smart / baseline 两个结果槽和状态行
//! - 每个标签最多一个进行中的调用（CancellationToken）
//! - 对比和导出只读当前结果
//!
//! ### `app` - 应用入口
//! - 创建客户端和流程
//! - 依次运行两个标签
//! - 输出对比并写出导出文件
//!
//! ## 层次关系
//!
//! ```text
//! app (读取文件、导出)
//!     ↓
//! session (结果槽、取消)
//!     ↓
//! workflow::RouteFlow (一次优化调用)
//!     ↓
//! services (能力层：geocode / matrix / optimize / export)
//!     ↓
//! clients + infrastructure (HTTP、调用节奏)
//! ```

pub mod app;
pub mod session;

pub use app::{App, RunOutcome};
pub use session::{RunStatus, Session};
