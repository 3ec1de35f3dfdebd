//! 提交跟踪流程 - 流程层
//!
//! 流程顺序：
//! 1. 打开会话，发出提交
//! 2. 轮询状态页 → 提取状态行 → 判题分类，未出结果则退避等待
//! 3. 出结果后获取编译信息
//! 4. 生成最终结果交给展示层

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, info, warn};

use crate::clients::JudgeSession;
use crate::config::Config;
use crate::models::{FailureReason, Outcome, StatusRow, SubmissionRequest, TrackingResult, Verdict};
use crate::services::{classify, extract, CompileInfoRetriever};
use crate::utils::logging;

/// 可注入的等待函数
pub type SleepFn = Arc<dyn Fn(Duration) -> BoxFuture<'static, ()> + Send + Sync>;

/// 取消标记
///
/// 只在两次轮询之间检查，不会打断正在进行的请求
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// 轮询阶段的结果
struct PollReport {
    outcome: Result<(StatusRow, Verdict), FailureReason>,
    polls: usize,
    waited: Duration,
}

/// 提交跟踪器
///
/// 每次 `track` 都打开自己的会话，不与其他调用共享 Cookie 或请求头
pub struct SubmissionTracker {
    config: Config,
    retriever: CompileInfoRetriever,
    sleeper: SleepFn,
    cancel: Option<CancelFlag>,
}

impl SubmissionTracker {
    pub fn new(config: Config) -> Self {
        let retriever = CompileInfoRetriever::new(
            config.compile_info_placeholder.clone(),
            config.compile_info_timeout(),
        );
        Self {
            config,
            retriever,
            sleeper: Arc::new(|delay: Duration| tokio::time::sleep(delay).boxed()),
            cancel: None,
        }
    }

    /// 替换等待函数
    pub fn with_sleeper<F, Fut>(mut self, sleeper: F) -> Self
    where
        F: Fn(Duration) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.sleeper = Arc::new(move |delay: Duration| sleeper(delay).boxed());
        self
    }

    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().map_or(false, CancelFlag::is_cancelled)
    }

    /// 提交并跟踪到最终结果
    ///
    /// 任何失败都体现在返回值的 [`Outcome::Failed`] 中，不会返回错误
    pub async fn track(&self, request: &SubmissionRequest) -> TrackingResult {
        let started_at = Local::now();
        logging::log_tracking_start(request, &self.config.judge_base_url);

        let session = match JudgeSession::open(&self.config, &request.session_credential) {
            Ok(session) => session,
            Err(e) => {
                warn!("{} 无法打开评测机会话: {}", request, e);
                let reason = FailureReason::SubmitFailed(e.to_string());
                return conclude(Outcome::Failed(reason), 0, Duration::ZERO, started_at);
            }
        };

        self.track_with_session(&session, request, started_at).await
    }

    /// 使用调用方提供的会话跟踪
    pub async fn track_with_session(
        &self,
        session: &JudgeSession,
        request: &SubmissionRequest,
        started_at: DateTime<Local>,
    ) -> TrackingResult {
        info!("{} 📤 正在提交代码 ({} 字节)...", request, request.source_code.len());
        if let Err(e) = session.submit(request).await {
            warn!("{} ⚠️ 提交请求失败: {}", request, e);
            let reason = FailureReason::SubmitFailed(e.to_string());
            return conclude(Outcome::Failed(reason), 0, Duration::ZERO, started_at);
        }

        let report = self.poll_until_terminal(session, request).await;

        let outcome = match report.outcome {
            Ok((row, verdict)) => {
                info!("{} ✓ 判题结果: {} (RunID {})", request, verdict, row.run_id);
                let compile_info = if row.run_id.is_empty() {
                    None
                } else {
                    let text = self.retriever.fetch(session, &row.run_id).await;
                    if text.is_empty() {
                        None
                    } else {
                        Some(text)
                    }
                };
                Outcome::Judged {
                    row,
                    verdict,
                    compile_info,
                }
            }
            Err(reason) => {
                warn!("{} ❌ 跟踪失败: {}", request, reason);
                Outcome::Failed(reason)
            }
        };

        conclude(outcome, report.polls, report.waited, started_at)
    }

    /// 轮询状态页直到出现最终判定、累计等待超限或被取消
    async fn poll_until_terminal(
        &self,
        session: &JudgeSession,
        request: &SubmissionRequest,
    ) -> PollReport {
        let mut timer = self.config.backoff().start();
        let mut polls = 0;
        let mut faults = 0;
        let mut last_status: Option<String> = None;

        let outcome = loop {
            if timer.exhausted() {
                break Err(match last_status.take() {
                    Some(status) => FailureReason::Timeout {
                        last_status: Some(status),
                    },
                    None => FailureReason::RowNotFound,
                });
            }
            if self.is_cancelled() {
                break Err(FailureReason::Cancelled);
            }

            polls += 1;
            match session
                .fetch_status_page(&request.username, &request.problem_id)
                .await
            {
                Ok(html) => {
                    faults = 0;
                    match extract(&html, &request.username, &request.problem_id) {
                        Some(row) => {
                            let verdict = classify(&row.raw_status);
                            debug!(
                                "{} 第 {} 次轮询: {} → {}",
                                request, polls, row.raw_status, verdict
                            );
                            if verdict.is_terminal() {
                                break Ok((row, verdict));
                            }
                            last_status = Some(row.raw_status);
                        }
                        None => debug!("{} 第 {} 次轮询: 未找到状态行", request, polls),
                    }
                }
                Err(e) => {
                    faults += 1;
                    warn!(
                        "{} 第 {} 次轮询失败 (连续 {} 次): {}",
                        request, polls, faults, e
                    );
                    if self.config.max_transport_faults > 0
                        && faults >= self.config.max_transport_faults
                    {
                        break Err(FailureReason::Transport {
                            faults,
                            last_error: e.to_string(),
                        });
                    }
                }
            }

            if self.is_cancelled() {
                break Err(FailureReason::Cancelled);
            }
            let delay = timer.next_delay();
            debug!("{} 等待 {:.2} 秒后重试", request, delay.as_secs_f64());
            (self.sleeper)(delay).await;
        };

        PollReport {
            outcome,
            polls,
            waited: timer.waited(),
        }
    }
}

/// 生成最终结果并记录日志，所有出口都经过这里
fn conclude(
    outcome: Outcome,
    polls: usize,
    waited: Duration,
    started_at: DateTime<Local>,
) -> TrackingResult {
    let result = TrackingResult {
        outcome,
        polls,
        waited,
        started_at,
        finished_at: Local::now(),
    };
    logging::log_tracking_result(&result);
    result
}
