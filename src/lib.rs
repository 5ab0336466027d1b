//! # Route Planner
//!
//! 为一组地址规划拜访路线，并对比“智能”与“基准”两条路线
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 调用节奏（`Pacer`）与取消守卫（`guard`）
//! - `clients/` - 地理编码、路线、优化后端的 HTTP 客户端
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `Geocoder` / `TimeMatrixBuilder` - 地址 → 坐标 → 时间矩阵
//! - `OptimizationGateway` - 模拟或远程优化
//! - `normalize` / `Comparison` / `export` - 结果规范化、对比、导出
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次优化调用"的完整流程
//! - `RunCtx` - 上下文封装（tag + invocation + 取消令牌）
//! - `RouteFlow` - 流程编排（geocode → matrix → optimize → normalize）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/session` - 结果槽与取消
//! - `orchestrator/app` - 应用入口，读取文件并导出
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{RouteResult, RouteTag, Summary, UploadedFile};
pub use orchestrator::{App, RunStatus, Session};
pub use workflow::{RouteFlow, RunCtx, RunReport};
