//! 展示层边界
//!
//! 只做两件事：把用户输入变成 [`SubmissionRequest`]，把 [`TrackingResult`]
//! 变成可渲染的 [`ResultView`]

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Language, Outcome, SubmissionRequest, TrackingResult};

/// 提交表单字段
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionForm {
    pub phpsessid: String,
    pub username: String,
    pub problem_id: String,
    /// 缺省为 G++
    #[serde(default)]
    pub language: Option<String>,
    pub source: String,
}

impl SubmissionForm {
    pub fn into_request(self) -> Result<SubmissionRequest> {
        let language = match self.language.as_deref().map(str::trim) {
            None | Some("") => Language::default(),
            Some(code) => code.parse()?,
        };
        Ok(SubmissionRequest::new(
            self.phpsessid.trim(),
            self.username.trim(),
            self.problem_id.trim(),
            language,
            self.source,
        ))
    }
}

/// 结果页所需的全部字段
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResultView {
    pub success: bool,
    pub problem: String,
    pub run_id: String,
    pub verdict: String,
    pub time: String,
    pub memory: String,
    /// 数值形式的用时与内存，评测机显示无法解析时为空
    pub time_ms: Option<u64>,
    pub memory_kb: Option<u64>,
    pub language: String,
    pub compile_info: Option<String>,
    pub raw_row: String,
    /// 失败时的说明
    pub message: Option<String>,
    pub polls: usize,
    pub waited_secs: f64,
}

impl From<&TrackingResult> for ResultView {
    fn from(result: &TrackingResult) -> Self {
        let base = ResultView {
            polls: result.polls,
            waited_secs: result.waited.as_secs_f64(),
            ..Default::default()
        };

        match &result.outcome {
            Outcome::Judged {
                row,
                verdict,
                compile_info,
            } => ResultView {
                success: true,
                problem: row.problem.clone(),
                run_id: row.run_id.clone(),
                verdict: verdict.code().to_string(),
                time: row.time_used.clone(),
                memory: row.memory_used.clone(),
                time_ms: row.time_ms(),
                memory_kb: row.memory_kb(),
                language: row.language.clone(),
                compile_info: compile_info.clone(),
                raw_row: row.raw_markup.clone(),
                ..base
            },
            Outcome::Failed(reason) => ResultView {
                message: Some(reason.to_string()),
                ..base
            },
        }
    }
}

impl ResultView {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 终端输出格式
    pub fn render_text(&self) -> String {
        if !self.success {
            return format!(
                "提交结果: 失败\n{}\n",
                self.message.as_deref().unwrap_or("未知错误")
            );
        }

        let mut out = String::new();
        out.push_str(&format!("题目: {}\n", self.problem));
        out.push_str(&format!("RunID: {}\n", self.run_id));
        out.push_str(&format!("判定结果: {}\n", self.verdict));
        out.push_str(&format!("用时: {}  内存: {}\n", self.time, self.memory));
        out.push_str(&format!("语言: {}\n", self.language));
        if let Some(info) = &self.compile_info {
            out.push_str("\n编译信息:\n");
            out.push_str(info);
            out.push('\n');
        }
        out
    }
}
