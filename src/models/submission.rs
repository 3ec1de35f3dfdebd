use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// 评测机支持的提交语言
///
/// 数值即提交表单中 `language` 字段的取值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    Gpp = 0,
    Gcc = 1,
    Java = 2,
    Pascal = 3,
}

impl Language {
    /// 表单代码
    pub fn form_code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::Gpp => "G++",
            Language::Gcc => "GCC",
            Language::Java => "Java",
            Language::Pascal => "Pascal",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::Gpp
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Language {
    type Err = AppError;

    /// 同时接受表单代码（`0`-`3`）和语言名
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "g++" | "gpp" | "c++" | "cpp" => Ok(Language::Gpp),
            "1" | "gcc" | "c" => Ok(Language::Gcc),
            "2" | "java" => Ok(Language::Java),
            "3" | "pascal" => Ok(Language::Pascal),
            _ => Err(AppError::InvalidLanguage(s.to_string())),
        }
    }
}

/// 一次提交请求
///
/// 由调用方构造，之后不再修改
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    /// 预先取得的会话凭据（PHPSESSID）
    pub session_credential: String,
    pub username: String,
    pub problem_id: String,
    pub language: Language,
    pub source_code: String,
}

impl SubmissionRequest {
    pub fn new(
        session_credential: impl Into<String>,
        username: impl Into<String>,
        problem_id: impl Into<String>,
        language: Language,
        source_code: impl Into<String>,
    ) -> Self {
        Self {
            session_credential: session_credential.into(),
            username: username.into(),
            problem_id: problem_id.into(),
            language,
            source_code: source_code.into(),
        }
    }
}

impl Display for SubmissionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[用户 {} 题目#{} 语言 {}]",
            self.username, self.problem_id, self.language
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_form_code() {
        assert_eq!("0".parse::<Language>().unwrap(), Language::Gpp);
        assert_eq!("1".parse::<Language>().unwrap(), Language::Gcc);
        assert_eq!("2".parse::<Language>().unwrap(), Language::Java);
        assert_eq!("3".parse::<Language>().unwrap(), Language::Pascal);
    }

    #[test]
    fn test_language_from_name() {
        assert_eq!("G++".parse::<Language>().unwrap(), Language::Gpp);
        assert_eq!(" java ".parse::<Language>().unwrap(), Language::Java);
        assert!(matches!(
            "rust".parse::<Language>(),
            Err(AppError::InvalidLanguage(_))
        ));
    }

    #[test]
    fn test_form_code_roundtrip() {
        for lang in [Language::Gpp, Language::Gcc, Language::Java, Language::Pascal] {
            let parsed: Language = lang.form_code().to_string().parse().unwrap();
            assert_eq!(parsed, lang);
        }
    }
}
