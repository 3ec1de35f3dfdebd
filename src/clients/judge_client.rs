//! 评测机会话
//!
//! 一次跟踪独占一个会话：Cookie、固定请求头和超时都在这里配置好，
//! 上层只拿到"提交""取状态页""取任意页面"三种能力

use std::sync::Arc;
use std::time::Duration;

use encoding_rs::Encoding;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderValue, ORIGIN, REFERER, USER_AGENT};
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::SubmissionRequest;

/// 评测机 HTTP 会话
pub struct JudgeSession {
    client: Client,
    base_url: String,
    encoding: &'static Encoding,
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| AppError::InvalidHeader {
        name,
        value: value.to_string(),
    })
}

impl JudgeSession {
    /// 打开新会话
    ///
    /// # 参数
    /// - `config`: 配置（评测机地址、编码、超时等）
    /// - `credential`: 会话凭据，以 Cookie 形式挂在评测机域名下
    pub fn open(config: &Config, credential: &str) -> Result<Self> {
        let base_url = config.judge_base_url.trim_end_matches('/').to_string();
        let url = Url::parse(&base_url)
            .map_err(|e| AppError::InvalidBaseUrl(format!("{} ({})", base_url, e)))?;

        let encoding = Encoding::for_label(config.page_encoding.as_bytes())
            .ok_or_else(|| AppError::UnknownEncoding(config.page_encoding.clone()))?;

        let jar = Arc::new(Jar::default());
        jar.add_cookie_str(
            &format!("{}={}; Path=/", config.session_cookie_name, credential),
            &url,
        );

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value("User-Agent", &config.user_agent)?);
        headers.insert(
            REFERER,
            header_value("Referer", &format!("{}/submit.php", base_url))?,
        );
        headers.insert(ORIGIN, header_value("Origin", &base_url)?);

        let client = Client::builder()
            .default_headers(headers)
            .cookie_provider(jar)
            .timeout(config.request_timeout())
            .build()?;

        debug!("已打开评测机会话: {}", base_url);

        Ok(Self {
            client,
            base_url,
            encoding,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 按评测机声明的编码解码页面
    pub fn decode(&self, bytes: &[u8]) -> String {
        let (text, _, had_errors) = self.encoding.decode(bytes);
        if had_errors {
            debug!("页面包含无法用 {} 解码的字节", self.encoding.name());
        }
        text.into_owned()
    }

    /// 发出提交请求
    ///
    /// 只保证请求已发出，不检查响应内容；评测机是否接受由状态页观察
    pub async fn submit(&self, request: &SubmissionRequest) -> Result<StatusCode> {
        let endpoint = format!("{}/submit.php?action=submit", self.base_url);
        let language = request.language.form_code().to_string();
        let form = [
            ("problemid", request.problem_id.as_str()),
            ("language", language.as_str()),
            ("usercode", request.source_code.as_str()),
        ];

        let response = self
            .client
            .post(&endpoint)
            .form(&form[..])
            .send()
            .await
            .map_err(|e| AppError::request_failed(&endpoint, e))?;

        debug!("提交请求已发出，HTTP {}", response.status());
        Ok(response.status())
    }

    /// 获取按用户与题号过滤的状态页
    pub async fn fetch_status_page(&self, username: &str, problem_id: &str) -> Result<String> {
        let endpoint = format!("{}/status.php", self.base_url);
        let response = self
            .client
            .get(&endpoint)
            .query(&[("user", username), ("pid", problem_id)])
            .send()
            .await
            .map_err(|e| AppError::request_failed(&endpoint, e))?;

        if !response.status().is_success() {
            return Err(AppError::bad_status(&endpoint, response.status()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::request_failed(&endpoint, e))?;
        Ok(self.decode(&bytes))
    }

    /// 获取任意页面，只接受 HTTP 200
    ///
    /// # 参数
    /// - `url`: 完整地址
    /// - `timeout`: 覆盖会话默认超时
    pub async fn fetch_page(&self, url: &str, timeout: Option<Duration>) -> Result<String> {
        let mut builder = self.client.get(url);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AppError::request_failed(url, e))?;

        if response.status() != StatusCode::OK {
            return Err(AppError::bad_status(url, response.status()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::request_failed(url, e))?;
        Ok(self.decode(&bytes))
    }
}
