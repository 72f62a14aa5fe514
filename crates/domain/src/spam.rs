//! 启发式垃圾评分：对提交内容做一次确定性打分，范围 [0, 100]。
//! 只在评论创建时调用一次，编辑不会重算。

use crate::models::CommentStatus;

/// 达到该分数的评论在创建时直接标记为 spam
pub const SPAM_THRESHOLD: u8 = 70;

const LINK_PATTERNS: [&str; 2] = ["http://", "https://"];

const DENYLIST: [&str; 6] = ["viagra", "casino", "lottery", "prize", "winner", "free money"];

/// 加分规则按固定顺序求和，最后夹到 100。
/// 纯函数：相同内容永远得到相同分数。
pub fn score(content: &str) -> u8 {
    let mut total: u32 = 0;

    // 1. 链接数量。两个阈值可以同时命中：>5 条链接共加 80 分。
    let links: usize = LINK_PATTERNS
        .iter()
        .map(|p| content.matches(p).count())
        .sum();
    if links > 2 {
        total += 30;
    }
    if links > 5 {
        total += 50;
    }

    // 2. 大写字母占全部字符的比例
    let total_chars = content.chars().count();
    let upper_chars = content.chars().filter(|c| c.is_uppercase()).count();
    if total_chars > 0 && upper_chars as f64 / total_chars as f64 > 0.3 {
        total += 20;
    }

    // 3. 同一字符连续重复 5 次以上
    if has_repeated_run(content, 5) {
        total += 15;
    }

    // 4. 词表命中可叠加
    let lowered = content.to_lowercase();
    for term in DENYLIST {
        if lowered.contains(term) {
            total += 25;
        }
    }

    total.min(100) as u8
}

/// 严格阈值：69 分仍是 pending，70 分即 spam。
pub fn initial_status(score: u8) -> CommentStatus {
    if score >= SPAM_THRESHOLD {
        CommentStatus::Spam
    } else {
        CommentStatus::Pending
    }
}

fn has_repeated_run(content: &str, min_run: usize) -> bool {
    let mut run = 0;
    let mut prev: Option<char> = None;
    for c in content.chars() {
        if Some(c) == prev {
            run += 1;
        } else {
            run = 1;
            prev = Some(c);
        }
        if run >= min_run {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_scores_zero() {
        assert_eq!(score("what a lovely garden, thanks for sharing"), 0);
    }

    #[test]
    fn three_links_add_thirty() {
        let content = "Check this out https://a.com https://b.com https://c.com";
        assert_eq!(score(content), 30);
        assert_eq!(initial_status(score(content)), CommentStatus::Pending);
    }

    #[test]
    fn six_links_fire_both_thresholds() {
        let content = "see http://a.io http://b.io http://c.io http://d.io http://e.io http://f.io";
        assert_eq!(score(content), 80);
        assert_eq!(initial_status(score(content)), CommentStatus::Spam);
    }

    #[test]
    fn caps_and_denylist_stack() {
        let content = "WIN A FREE PRIZE NOW CASINO WINNER";
        // 大写比例 20 + 三个词条 75
        assert_eq!(score(content), 95);
        assert_eq!(initial_status(score(content)), CommentStatus::Spam);
    }

    #[test]
    fn repeated_run_adds_fifteen() {
        assert_eq!(score("wooooow nice"), 15);
        assert_eq!(score("wooow nice"), 0);
    }

    #[test]
    fn denylist_is_case_insensitive_and_stacks() {
        assert_eq!(score("free money from the lottery"), 50);
        assert_eq!(score("ViAgRa"), 25);
    }

    #[test]
    fn score_is_clamped_to_one_hundred() {
        // 6 条链接 + 全大写 + 重复字符 + 多个词条，原始和远超 100
        let content = "VIAGRA CASINO LOTTERY PRIZE WINNER FREE MONEY AAAAA \
                       http://1.co http://2.co http://3.co http://4.co http://5.co http://6.co";
        assert_eq!(score(content), 100);
    }

    #[test]
    fn threshold_is_strict() {
        assert_eq!(initial_status(69), CommentStatus::Pending);
        assert_eq!(initial_status(70), CommentStatus::Spam);
    }
}
