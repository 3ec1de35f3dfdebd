use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 网络请求失败（超时、连接失败等）
    #[error("请求失败 ({endpoint}): {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// 评测机返回非 200 响应
    #[error("评测机返回异常状态 ({endpoint}): HTTP {status}")]
    BadStatus { endpoint: String, status: u16 },

    /// 不认识的页面编码
    #[error("不支持的页面编码: {0}")]
    UnknownEncoding(String),

    /// 评测机地址无效
    #[error("评测机地址无效: {0}")]
    InvalidBaseUrl(String),

    /// 请求头无法构造
    #[error("请求头 {name} 的值无效: {value}")]
    InvalidHeader { name: &'static str, value: String },

    /// 语言代码无法识别
    #[error("无法识别的语言: {0}")]
    InvalidLanguage(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 构建 HTTP 客户端失败
    #[error("网络错误: {0}")]
    Http(#[from] reqwest::Error),

    #[error("文件错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML解析失败: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON序列化失败: {0}")]
    Json(#[from] serde_json::Error),
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建请求失败错误
    pub fn request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Request {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// 创建非 200 响应错误
    pub fn bad_status(endpoint: impl Into<String>, status: reqwest::StatusCode) -> Self {
        AppError::BadStatus {
            endpoint: endpoint.into(),
            status: status.as_u16(),
        }
    }
}

/// 应用程序结果类型
pub type Result<T> = std::result::Result<T, AppError>;
