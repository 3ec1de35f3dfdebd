//! # HDU Remote Judge
//!
//! 把源代码提交到 HDU OJ，并通过轮询状态页跟踪到最终判题结果
//!
//! ## 架构设计
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 持有 HTTP 会话（Cookie + 固定请求头），只暴露请求能力
//! - `JudgeSession` - 每次跟踪独占一个，不跨调用共享
//!
//! ### ② 业务能力层（Services）
//! - `row_extractor` - 从状态页提取属于本次提交的行
//! - `verdict` - 把评测机状态文本归类为判题结果
//! - `compile_info` - 按顺序尝试多个页面获取编译信息
//!
//! ### ③ 流程层（Workflow）
//! - `SubmissionTracker` - 提交 → 轮询退避 → 判定 → 编译信息
//! - `Backoff` - 轮询间隔策略
//!
//! ### ④ 展示层（Presentation）
//! - `ResultView` - 最终结果的可渲染形式
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod presentation;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::JudgeSession;
pub use config::Config;
pub use error::{AppError, Result};
pub use models::{FailureReason, Language, Outcome, StatusRow, SubmissionRequest, TrackingResult, Verdict};
pub use presentation::{ResultView, SubmissionForm};
pub use utils::logging;
pub use workflow::{Backoff, CancelFlag, SubmissionTracker};
