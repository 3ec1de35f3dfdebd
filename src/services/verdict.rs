//! 判题结果分类
//!
//! 评测机的状态文本是不受控的外部词汇，这里用有序的子串规则表归类，
//! 先匹配的规则优先

use crate::models::Verdict;

/// 分类规则表，按优先级排列
pub const VERDICT_RULES: &[(&[&str], Verdict)] = &[
    (&["accept", "ac"], Verdict::Ac),
    (&["wrong answer", "wa"], Verdict::Wa),
    (&["compile error", "compilation error"], Verdict::Ce),
    (&["tle", "time limit"], Verdict::Tle),
    (&["mle", "memory", "memory limit"], Verdict::Mle),
    (&["runtime", "re"], Verdict::Re),
];

/// 把状态文本归类为判题结果
///
/// 大小写不敏感；没有规则命中时返回 [`Verdict::Unknown`]
pub fn classify(status_text: &str) -> Verdict {
    let lower = status_text.to_lowercase();
    VERDICT_RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| lower.contains(needle)))
        .map(|(_, verdict)| *verdict)
        .unwrap_or(Verdict::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_judge_labels() {
        assert_eq!(classify("Accepted"), Verdict::Ac);
        assert_eq!(classify("Wrong Answer"), Verdict::Wa);
        assert_eq!(classify("Compilation Error"), Verdict::Ce);
        assert_eq!(classify("Compile Error"), Verdict::Ce);
        assert_eq!(classify("Time Limit Exceeded"), Verdict::Tle);
        assert_eq!(classify("Memory Limit Exceeded"), Verdict::Mle);
        assert_eq!(classify("Runtime Error"), Verdict::Re);
    }

    #[test]
    fn test_in_progress_labels_are_unknown() {
        for label in ["Judging", "Queuing", "Compiling", "Running", "Pending", ""] {
            assert_eq!(classify(label), Verdict::Unknown, "label: {:?}", label);
        }
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("ACCEPTED"), Verdict::Ac);
        assert_eq!(classify("wrong answer"), Verdict::Wa);
        assert_eq!(classify("TIME LIMIT EXCEEDED"), Verdict::Tle);
    }

    #[test]
    fn test_wrong_answer_beats_later_rules() {
        // 同时含 "wrong answer" 与后面规则的子串时，WA 先判
        assert_eq!(classify("Wrong Answer (runtime check)"), Verdict::Wa);
        assert_eq!(classify("wrong answer, memory ok"), Verdict::Wa);
    }

    #[test]
    fn test_rule_order_is_fixed() {
        let order: Vec<Verdict> = VERDICT_RULES.iter().map(|(_, v)| *v).collect();
        assert_eq!(
            order,
            vec![
                Verdict::Ac,
                Verdict::Wa,
                Verdict::Ce,
                Verdict::Tle,
                Verdict::Mle,
                Verdict::Re
            ]
        );
        // 分类结果永远不会是 Pending
        assert!(VERDICT_RULES.iter().all(|(_, v)| *v != Verdict::Pending));
    }

    #[test]
    fn test_every_needle_hits_its_own_rule_or_an_earlier_one() {
        for (idx, (needles, verdict)) in VERDICT_RULES.iter().enumerate() {
            for needle in needles.iter() {
                let got = classify(needle);
                let pos = VERDICT_RULES.iter().position(|(_, v)| *v == got).unwrap();
                assert!(pos <= idx, "needle {:?} 归为 {}", needle, got);
                if pos == idx {
                    assert_eq!(got, *verdict);
                }
            }
        }
    }

    /// 裸子串 "re" / "ac" 的已知误判，保持现状
    #[test]
    fn test_short_needle_false_positives() {
        assert_eq!(classify("Presentation Error"), Verdict::Re);
        assert_eq!(classify("Runtime Error(ACCESS_VIOLATION)"), Verdict::Ac);
        assert_eq!(classify("Runtime Error(STACK_OVERFLOW)"), Verdict::Ac);
        assert_eq!(classify("Runtime Error(INTEGER_DIVIDE_BY_ZERO)"), Verdict::Re);
        assert_eq!(classify("Output Limit Exceeded"), Verdict::Unknown);
    }
}
