/// 论文搜索服务
///
/// 把关键词组 + 时间窗口翻译成 arXiv 查询，并按"时间窗口内 + 未
/// 通知过"过滤结果。任何传输或解析错误都在这里被消化为空结果，
/// 不会中断其他组或整个周期。
use crate::clients::arxiv_client::{build_query, ArxivClient};
use crate::config::Config;
use crate::error::Result;
use crate::models::CandidatePaper;
use crate::services::PaperSource;
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeSet;
use tracing::{debug, error, info};

/// 搜索服务
pub struct SearchService {
    client: ArxivClient,
    max_results: usize,
}

impl SearchService {
    /// 创建新的搜索服务
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: ArxivClient::new(config)?,
            max_results: config.max_search_results,
        })
    }
}

impl PaperSource for SearchService {
    async fn search(
        &self,
        keywords: &[String],
        seen: &BTreeSet<String>,
        window: Duration,
    ) -> Vec<CandidatePaper> {
        let query = build_query(keywords);
        let cutoff = Utc::now() - window;
        info!("正在搜索 arXiv, 查询: {}", query);
        info!(
            "只保留 {} 之后发布或更新的论文",
            cutoff.format("%Y-%m-%d %H:%M:%S %Z")
        );

        let papers = match self.client.search(&query, self.max_results).await {
            Ok(papers) => papers,
            Err(e) => {
                // 单组的搜索失败按零结果处理
                error!("arXiv 搜索失败: {}", e);
                return Vec::new();
            }
        };

        filter_candidates(papers, seen, cutoff)
    }
}

/// 按时间窗口和已通知集合过滤候选论文
///
/// 保留条件：(发布时间 ≥ cutoff 或 更新时间 ≥ cutoff) 且 ID 未通知
/// 过。注意这里是"或"：窗口外发布、窗口内修订的旧论文同样入选，
/// 在被标记为已通知之前每个周期都会再次出现。
pub fn filter_candidates(
    papers: Vec<CandidatePaper>,
    seen: &BTreeSet<String>,
    cutoff: DateTime<Utc>,
) -> Vec<CandidatePaper> {
    papers
        .into_iter()
        .filter(|paper| {
            if seen.contains(&paper.id) {
                debug!("跳过已通知论文: {}", paper.id);
                return false;
            }
            let recent = paper.published_at >= cutoff || paper.updated_at >= cutoff;
            if recent {
                info!("✓ 发现新论文: {}", paper);
            } else {
                debug!("跳过窗口外论文: {} (更新于 {})", paper.id, paper.updated_at);
            }
            recent
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn paper(id: &str, published: DateTime<Utc>, updated: DateTime<Utc>) -> CandidatePaper {
        CandidatePaper {
            id: id.to_string(),
            title: format!("论文 {}", id),
            authors: vec!["Some Author".to_string()],
            published_at: published,
            updated_at: updated,
            abstract_text: String::new(),
            link: format!("http://arxiv.org/abs/{}", id),
        }
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_filter_keeps_recently_published() {
        let cutoff = at(2024, 3, 1);
        let papers = vec![
            paper("new", at(2024, 3, 2), at(2024, 3, 2)),
            paper("old", at(2024, 1, 1), at(2024, 1, 2)),
        ];

        let kept = filter_candidates(papers, &BTreeSet::new(), cutoff);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "new");
    }

    #[test]
    fn test_filter_or_semantics_keeps_revised_old_paper() {
        // 窗口外发布、窗口内修订的论文同样入选
        let cutoff = at(2024, 3, 1);
        let papers = vec![paper("revised", at(2023, 6, 1), at(2024, 3, 2))];

        let kept = filter_candidates(papers, &BTreeSet::new(), cutoff);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "revised");
    }

    #[test]
    fn test_filter_drops_seen_even_if_recent() {
        let cutoff = at(2024, 3, 1);
        let papers = vec![
            paper("A", at(2024, 3, 2), at(2024, 3, 2)),
            paper("C", at(2024, 3, 2), at(2024, 3, 2)),
        ];
        let seen: BTreeSet<String> = ["A".to_string()].into_iter().collect();

        let kept = filter_candidates(papers, &seen, cutoff);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "C");
    }

    #[test]
    fn test_filter_cutoff_is_inclusive() {
        let cutoff = at(2024, 3, 1);
        let papers = vec![paper("edge", at(2024, 3, 1), at(2024, 3, 1))];

        let kept = filter_candidates(papers, &BTreeSet::new(), cutoff);
        assert_eq!(kept.len(), 1);
    }
}
