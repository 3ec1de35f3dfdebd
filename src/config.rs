use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::workflow::backoff::Backoff;

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 评测机根地址
    pub judge_base_url: String,
    /// 会话 Cookie 名称
    pub session_cookie_name: String,
    /// 请求使用的 User-Agent
    pub user_agent: String,
    /// 评测机页面声明的编码
    pub page_encoding: String,
    /// 提交与状态页请求超时（秒）
    pub request_timeout_secs: u64,
    /// 编译信息请求超时（秒）
    pub compile_info_timeout_secs: u64,
    // --- 轮询退避 ---
    pub poll_initial_interval_secs: f64,
    pub poll_backoff_factor: f64,
    pub poll_max_interval_secs: f64,
    pub poll_max_wait_secs: f64,
    /// 连续网络错误达到该次数后提前放弃
    pub max_transport_faults: usize,
    /// 评测机"无编译信息"的占位文本
    pub compile_info_placeholder: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            judge_base_url: "http://acm.hdu.edu.cn".to_string(),
            session_cookie_name: "PHPSESSID".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            page_encoding: "gb2312".to_string(),
            request_timeout_secs: 15,
            compile_info_timeout_secs: 8,
            poll_initial_interval_secs: 1.0,
            poll_backoff_factor: 1.8,
            poll_max_interval_secs: 8.0,
            poll_max_wait_secs: 60.0,
            max_transport_faults: 5,
            compile_info_placeholder: "No such error message".to_string(),
            verbose_logging: false,
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置，未设置的字段使用默认值
    ///
    /// # 返回
    /// 退避参数不合理时返回 [`AppError::Config`]
    pub fn from_env() -> Result<Self> {
        let default = Self::default();
        let config = Self {
            judge_base_url: std::env::var("JUDGE_BASE_URL").unwrap_or(default.judge_base_url),
            session_cookie_name: std::env::var("SESSION_COOKIE_NAME").unwrap_or(default.session_cookie_name),
            user_agent: std::env::var("USER_AGENT").unwrap_or(default.user_agent),
            page_encoding: std::env::var("PAGE_ENCODING").unwrap_or(default.page_encoding),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", default.request_timeout_secs),
            compile_info_timeout_secs: env_or("COMPILE_INFO_TIMEOUT_SECS", default.compile_info_timeout_secs),
            poll_initial_interval_secs: env_or("POLL_INITIAL_INTERVAL_SECS", default.poll_initial_interval_secs),
            poll_backoff_factor: env_or("POLL_BACKOFF_FACTOR", default.poll_backoff_factor),
            poll_max_interval_secs: env_or("POLL_MAX_INTERVAL_SECS", default.poll_max_interval_secs),
            poll_max_wait_secs: env_or("POLL_MAX_WAIT_SECS", default.poll_max_wait_secs),
            max_transport_faults: env_or("MAX_TRANSPORT_FAULTS", default.max_transport_faults),
            compile_info_placeholder: std::env::var("COMPILE_INFO_PLACEHOLDER").unwrap_or(default.compile_info_placeholder),
            verbose_logging: env_or("VERBOSE_LOGGING", default.verbose_logging),
        };
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件加载配置，缺失字段使用默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// 检查退避参数是否合理
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("poll_initial_interval_secs", self.poll_initial_interval_secs),
            ("poll_max_interval_secs", self.poll_max_interval_secs),
            ("poll_max_wait_secs", self.poll_max_wait_secs),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(AppError::Config(format!("{} 必须为正数: {}", name, value)));
            }
        }
        if !self.poll_backoff_factor.is_finite() || self.poll_backoff_factor < 1.0 {
            return Err(AppError::Config(format!(
                "poll_backoff_factor 不能小于 1: {}",
                self.poll_backoff_factor
            )));
        }
        if self.poll_max_interval_secs < self.poll_initial_interval_secs {
            return Err(AppError::Config(
                "poll_max_interval_secs 不能小于 poll_initial_interval_secs".to_string(),
            ));
        }
        Ok(())
    }

    pub fn backoff(&self) -> Backoff {
        Backoff::new(
            self.poll_initial_interval_secs,
            self.poll_backoff_factor,
            self.poll_max_interval_secs,
            self.poll_max_wait_secs,
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn compile_info_timeout(&self) -> Duration {
        Duration::from_secs(self.compile_info_timeout_secs)
    }
}
