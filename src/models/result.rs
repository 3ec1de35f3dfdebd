use std::fmt::{self, Display};
use std::time::Duration;

use chrono::{DateTime, Local};

use super::status::{StatusRow, Verdict};

/// 跟踪失败的原因
#[derive(Debug, Clone, PartialEq)]
pub enum FailureReason {
    /// 匹配到了状态行，但在等待上限内始终未出最终结果
    Timeout { last_status: Option<String> },
    /// 所有轮询都没有匹配到本次提交的状态行
    RowNotFound,
    /// 连续网络错误过多
    Transport { faults: usize, last_error: String },
    /// 提交请求未能发出
    SubmitFailed(String),
    /// 被调用方取消
    Cancelled,
}

impl Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Timeout { last_status: Some(status) } => {
                write!(f, "等待评测超时，最后状态: {}", status)
            }
            FailureReason::Timeout { last_status: None } => write!(f, "等待评测超时"),
            FailureReason::RowNotFound => write!(f, "无法解析状态，请稍后重试"),
            FailureReason::Transport { faults, last_error } => {
                write!(f, "连续 {} 次请求状态页失败: {}", faults, last_error)
            }
            FailureReason::SubmitFailed(msg) => write!(f, "提交失败: {}", msg),
            FailureReason::Cancelled => write!(f, "跟踪已取消"),
        }
    }
}

/// 跟踪结局
///
/// 要么是带状态行的最终判定，要么是失败原因，二者不会混合
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Judged {
        row: StatusRow,
        verdict: Verdict,
        compile_info: Option<String>,
    },
    Failed(FailureReason),
}

/// 一次提交的最终跟踪结果
#[derive(Debug, Clone)]
pub struct TrackingResult {
    pub outcome: Outcome,
    /// 状态页请求次数
    pub polls: usize,
    /// 累计等待时长
    pub waited: Duration,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

impl TrackingResult {
    pub fn row(&self) -> Option<&StatusRow> {
        match &self.outcome {
            Outcome::Judged { row, .. } => Some(row),
            Outcome::Failed(_) => None,
        }
    }

    pub fn verdict(&self) -> Option<Verdict> {
        match &self.outcome {
            Outcome::Judged { verdict, .. } => Some(*verdict),
            Outcome::Failed(_) => None,
        }
    }

    pub fn compile_info(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Judged { compile_info, .. } => compile_info.as_deref(),
            Outcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match &self.outcome {
            Outcome::Failed(reason) => Some(reason),
            Outcome::Judged { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Judged { .. })
    }
}
