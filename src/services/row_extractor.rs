//! 状态表行提取
//!
//! 从状态页 HTML 中找出属于（用户, 题号）的那一行。评测机按提交时间倒序输出，
//! 所以文档顺序中第一个匹配行就是最近一次提交

use select::document::Document;
use select::node::Node;
use select::predicate::Name;

use crate::models::StatusRow;

/// 状态表至少需要的列数
pub const MIN_COLUMNS: usize = 9;

const COL_RUN_ID: usize = 0;
const COL_STATUS: usize = 2;
const COL_PROBLEM: usize = 3;
const COL_TIME: usize = 4;
const COL_MEMORY: usize = 5;
const COL_LANGUAGE: usize = 7;
const COL_AUTHOR: usize = 8;

/// 逐段去除空白后拼接的文本
fn stripped_text(node: &Node) -> String {
    node.descendants()
        .filter_map(|n| n.as_text())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// 单元格里有链接时取链接文本，否则取单元格文本
fn link_or_cell_text(cell: &Node) -> String {
    match cell.find(Name("a")).next() {
        Some(link) => stripped_text(&link),
        None => stripped_text(cell),
    }
}

/// 提取匹配的状态行
///
/// # 参数
/// - `html`: 已解码的状态页
/// - `username`: 作者列需要完全相等的用户名
/// - `problem_id`: 题号列需要按字符串相等的题号
///
/// # 返回
/// 第一个匹配行；表头之外没有匹配行时返回 `None`
pub fn extract(html: &str, username: &str, problem_id: &str) -> Option<StatusRow> {
    let document = Document::from(html);

    document.find(Name("tr")).skip(1).find_map(|tr| {
        let cols: Vec<Node> = tr.find(Name("td")).collect();
        if cols.len() < MIN_COLUMNS {
            return None;
        }

        let problem = link_or_cell_text(&cols[COL_PROBLEM]);
        let author = link_or_cell_text(&cols[COL_AUTHOR]);
        if author != username || problem != problem_id {
            return None;
        }

        Some(StatusRow {
            run_id: stripped_text(&cols[COL_RUN_ID]),
            problem,
            raw_status: stripped_text(&cols[COL_STATUS]),
            time_used: stripped_text(&cols[COL_TIME]),
            memory_used: stripped_text(&cols[COL_MEMORY]),
            language: stripped_text(&cols[COL_LANGUAGE]),
            raw_markup: tr.html(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "<tr><td>Run ID</td><td>Submit Time</td><td>Judge Status</td><td>Pro.ID</td><td>Exe.Time</td><td>Exe.Memory</td><td>Code Len.</td><td>Language</td><td>Author</td></tr>";

    fn status_row(run_id: &str, status: &str, pid: &str, author: &str) -> String {
        format!(
            "<tr align=center><td height=22px>{}</td><td>2024-03-01 10:00:00</td>\
             <td><font color=red>{}</font></td><td><a href=\"/showproblem.php?pid={}\">{}</a></td>\
             <td>15MS</td><td>1740K</td><td>230B</td><td>G++</td>\
             <td class=fixedsize><a href=\"/userstatus.php?user={}\">{}</a></td></tr>",
            run_id, status, pid, pid, author, author
        )
    }

    fn page(rows: &[String]) -> String {
        format!(
            "<html><body><table class=table_text>{}{}</table></body></html>",
            HEADER,
            rows.concat()
        )
    }

    #[test]
    fn test_empty_and_header_only_documents() {
        assert_eq!(extract("", "alice", "1000"), None);
        assert_eq!(extract("<html><body>维护中</body></html>", "alice", "1000"), None);
        assert_eq!(extract(&page(&[]), "alice", "1000"), None);
    }

    #[test]
    fn test_extracts_all_fields() {
        let html = page(&[status_row("38291", "Accepted", "1000", "alice")]);
        let row = extract(&html, "alice", "1000").unwrap();

        assert_eq!(row.run_id, "38291");
        assert_eq!(row.problem, "1000");
        assert_eq!(row.raw_status, "Accepted");
        assert_eq!(row.time_used, "15MS");
        assert_eq!(row.memory_used, "1740K");
        assert_eq!(row.language, "G++");
        assert!(row.raw_markup.starts_with("<tr"));
        assert!(row.raw_markup.contains("38291"));
    }

    #[test]
    fn test_first_match_wins() {
        let html = page(&[
            status_row("2", "Wrong Answer", "1000", "alice"),
            status_row("1", "Accepted", "1000", "alice"),
        ]);
        let row = extract(&html, "alice", "1000").unwrap();
        assert_eq!(row.run_id, "2");
        assert_eq!(row.raw_status, "Wrong Answer");
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let short = "<tr><td>99</td><td>x</td><td>Accepted</td><td>1000</td><td>alice</td></tr>".to_string();
        let html = page(&[short, status_row("7", "Accepted", "1000", "alice")]);
        assert_eq!(extract(&html, "alice", "1000").unwrap().run_id, "7");
    }

    #[test]
    fn test_author_and_problem_must_both_match() {
        let html = page(&[
            status_row("3", "Accepted", "1001", "alice"),
            status_row("2", "Accepted", "1000", "bob"),
            status_row("1", "Accepted", "1000", "alicex"),
        ]);
        assert_eq!(extract(&html, "alice", "1000"), None);
    }

    #[test]
    fn test_plain_cells_without_links() {
        let row = "<tr><td>5</td><td>t</td><td>Judging</td><td> 1002 </td><td></td><td></td><td></td><td>Java</td><td> carol </td></tr>";
        let html = format!("<table>{}{}</table>", HEADER, row);
        let found = extract(&html, "carol", "1002").unwrap();
        assert_eq!(found.run_id, "5");
        assert_eq!(found.raw_status, "Judging");
        assert_eq!(found.time_used, "");
    }

    #[test]
    fn test_status_fragments_are_joined() {
        let html = page(&[status_row(
            "4",
            "Runtime Error<br>\n  (ACCESS_VIOLATION)",
            "1000",
            "alice",
        )]);
        let row = extract(&html, "alice", "1000").unwrap();
        assert_eq!(row.raw_status, "Runtime Error(ACCESS_VIOLATION)");
    }

    #[test]
    fn test_header_row_is_never_matched() {
        // 第一行即使形似数据行也视为表头
        let html = format!(
            "<table>{}</table>",
            status_row("1", "Accepted", "1000", "alice")
        );
        assert_eq!(extract(&html, "alice", "1000"), None);
    }
}
