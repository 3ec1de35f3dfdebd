//! 编译信息获取
//!
//! 评测机把"状态"和"编译错误"放在不同页面，且页面地址不止一种写法，
//! 这里按固定顺序逐个尝试，拿到第一个有效结果即停止

use std::time::Duration;

use select::document::Document;
use select::predicate::Name;
use tracing::{debug, info};

use crate::clients::JudgeSession;

/// 候选页面路径模板，`{rid}` 为提交编号
pub const COMPILE_INFO_ENDPOINTS: [&str; 3] = [
    "/showerror.php?solution_id={rid}",
    "/showcompileinfo.php?rid={rid}",
    "/viewerror.php?rid={rid}",
];

/// 提取页面中所有 `<pre>` 块，换行拼接后去除首尾空白
pub fn extract_pre_blocks(html: &str) -> String {
    let document = Document::from(html);
    let blocks: Vec<String> = document.find(Name("pre")).map(|pre| pre.text()).collect();
    blocks.join("\n").trim().to_string()
}

/// 编译信息获取服务
pub struct CompileInfoRetriever {
    placeholder: String,
    timeout: Duration,
}

impl CompileInfoRetriever {
    pub fn new(placeholder: impl Into<String>, timeout: Duration) -> Self {
        Self {
            placeholder: placeholder.into(),
            timeout,
        }
    }

    /// 非空且不含占位文本时才算有效
    pub fn accepts(&self, text: &str) -> bool {
        !text.is_empty() && !text.contains(&self.placeholder)
    }

    /// 获取编译信息
    ///
    /// 网络错误、非 200 响应都只跳过当前页面，不会返回错误
    ///
    /// # 返回
    /// 第一个有效的编译信息；全部无效时返回空字符串
    pub async fn fetch(&self, session: &JudgeSession, run_id: &str) -> String {
        for template in COMPILE_INFO_ENDPOINTS.iter() {
            let url = format!("{}{}", session.base_url(), template.replace("{rid}", run_id));

            let html = match session.fetch_page(&url, Some(self.timeout)).await {
                Ok(html) => html,
                Err(e) => {
                    debug!("编译信息页面不可用，跳过: {}", e);
                    continue;
                }
            };

            let text = extract_pre_blocks(&html);
            if self.accepts(&text) {
                info!("✓ 从 {} 获取到编译信息 ({} 字符)", url, text.chars().count());
                return text;
            }
            debug!("{} 没有有效的编译信息", url);
        }

        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn retriever() -> CompileInfoRetriever {
        CompileInfoRetriever::new("No such error message", Duration::from_secs(8))
    }

    #[test]
    fn test_extract_pre_blocks_joins_and_trims() {
        let html = "<html><body><pre>\n a.cpp:1: error: x\n</pre><p>ignored</p><pre>a.cpp:2: note</pre></body></html>";
        assert_eq!(
            extract_pre_blocks(html),
            "a.cpp:1: error: x\n\na.cpp:2: note"
        );
    }

    #[test]
    fn test_extract_pre_blocks_without_pre() {
        assert_eq!(extract_pre_blocks("<html><body>nothing</body></html>"), "");
    }

    #[test]
    fn test_placeholder_and_empty_are_rejected() {
        let r = retriever();
        assert!(!r.accepts(""));
        assert!(!r.accepts("No such error message"));
        assert!(!r.accepts("Error: No such error message!"));
        assert!(r.accepts("a.cpp:3: error: expected ';'"));
    }

    #[test]
    fn test_endpoint_order() {
        assert!(COMPILE_INFO_ENDPOINTS[0].starts_with("/showerror.php"));
        assert!(COMPILE_INFO_ENDPOINTS[1].starts_with("/showcompileinfo.php"));
        assert!(COMPILE_INFO_ENDPOINTS[2].starts_with("/viewerror.php"));
    }
}
