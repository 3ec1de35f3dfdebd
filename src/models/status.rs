use std::fmt::{self, Display};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// 判题结果代码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Ac,
    Wa,
    Ce,
    Tle,
    Mle,
    Re,
    /// 尚未匹配到状态行
    Pending,
    /// 评测机内部状态（排队、编译、运行中等）
    Unknown,
}

impl Verdict {
    /// 是否为最终判定
    pub fn is_terminal(self) -> bool {
        !matches!(self, Verdict::Pending | Verdict::Unknown)
    }

    pub fn code(self) -> &'static str {
        match self {
            Verdict::Ac => "AC",
            Verdict::Wa => "WA",
            Verdict::Ce => "CE",
            Verdict::Tle => "TLE",
            Verdict::Mle => "MLE",
            Verdict::Re => "RE",
            Verdict::Pending => "PENDING",
            Verdict::Unknown => "UNKNOWN",
        }
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// 状态表中属于本次提交的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRow {
    pub run_id: String,
    pub problem: String,
    /// 评测机原始状态文本，如 "Accepted"
    pub raw_status: String,
    pub time_used: String,
    pub memory_used: String,
    pub language: String,
    /// 整行 `<tr>` 的原始 HTML
    pub raw_markup: String,
}

fn measure_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\s*(\d+)\s*(ms|k|kb)?\s*$").ok())
        .as_ref()
}

fn parse_measure(text: &str) -> Option<u64> {
    measure_regex()?
        .captures(text)
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

impl StatusRow {
    /// 用时（毫秒），如 "15MS"
    pub fn time_ms(&self) -> Option<u64> {
        parse_measure(&self.time_used)
    }

    /// 内存（KB），如 "1740K"
    pub fn memory_kb(&self) -> Option<u64> {
        parse_measure(&self.memory_used)
    }
}
