//! 基础设施层
//!
//! 只暴露能力，不认识地址和路线：
//! - `Pacer` 控制同一阶段两次外部调用之间的最小间隔
//! - `guard` 把任意 future 包在取消令牌下

pub mod pacer;

pub use pacer::{guard, Pacer};
