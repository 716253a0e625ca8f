/// 论文数据模型
use chrono::{DateTime, Utc};

/// 一篇候选论文
///
/// 由搜索适配层产生，只在一个周期迭代内存活；持久化的只有它的
/// ID（进入 SeenState）。
#[derive(Debug, Clone)]
pub struct CandidatePaper {
    /// 稳定的外部标识符，如 `2301.12345v1`
    pub id: String,
    /// 标题
    pub title: String,
    /// 作者列表（保持 API 返回顺序）
    pub authors: Vec<String>,
    /// 首次提交时间（UTC）
    pub published_at: DateTime<Utc>,
    /// 最近更新时间（UTC）
    pub updated_at: DateTime<Utc>,
    /// 摘要
    pub abstract_text: String,
    /// 论文链接（arXiv abs 页面）
    pub link: String,
}

impl std::fmt::Display for CandidatePaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 截断标题以便日志显示（最多80个字符）
        let title_preview = if self.title.chars().count() > 80 {
            self.title.chars().take(80).collect::<String>() + "..."
        } else {
            self.title.clone()
        };
        write!(f, "{} ({})", title_preview, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_display_truncates_long_title() {
        let paper = CandidatePaper {
            id: "2301.00001v1".to_string(),
            title: "甲".repeat(100),
            authors: vec![],
            published_at: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
            abstract_text: String::new(),
            link: String::new(),
        };

        let shown = paper.to_string();
        assert!(shown.contains("..."));
        assert!(shown.contains("2301.00001v1"));
    }
}
