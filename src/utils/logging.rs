//! 日志工具模块
//!
//! 提供日志初始化和输出的辅助函数

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::models::{Outcome, SubmissionRequest, TrackingResult};

/// 初始化日志
///
/// 默认 `info` 级别，可用 `RUST_LOG` 覆盖；重复调用无副作用
pub fn init() {
    init_with_verbose(false);
}

pub fn init_with_verbose(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// 记录跟踪开始信息
///
/// # 参数
/// - `request`: 提交请求
/// - `judge`: 评测机地址
pub fn log_tracking_start(request: &SubmissionRequest, judge: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 开始远程评测 - {}", judge);
    info!("📄 {}", request);
    info!("{}", "=".repeat(60));
}

/// 记录最终结果
pub fn log_tracking_result(result: &TrackingResult) {
    let elapsed = result.finished_at - result.started_at;
    info!("{}", "─".repeat(60));
    match &result.outcome {
        Outcome::Judged {
            row,
            verdict,
            compile_info,
        } => {
            info!("✅ RunID {} 判定: {} ({})", row.run_id, verdict, row.raw_status);
            info!("用时: {}  内存: {}  语言: {}", row.time_used, row.memory_used, row.language);
            if let Some(text) = compile_info {
                info!("编译信息: {}", truncate_text(text, 80));
            }
        }
        Outcome::Failed(reason) => warn!("❌ {}", reason),
    }
    info!(
        "轮询 {} 次，累计等待 {:.2} 秒，总耗时 {} 毫秒",
        result.polls,
        result.waited.as_secs_f64(),
        elapsed.num_milliseconds()
    );
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
