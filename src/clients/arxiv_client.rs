/// arXiv API 客户端
///
/// 封装对 arXiv 公开 Atom API（export.arxiv.org/api/query）的查询
/// 和响应解析。只负责"查询 → 候选论文列表"，时间窗口和去重由
/// 搜索服务处理。
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::CandidatePaper;
use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::time::Duration;

/// arXiv API 客户端
pub struct ArxivClient {
    client: reqwest::Client,
    base_url: String,
}

impl ArxivClient {
    /// 创建新的 arXiv 客户端
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("paper_finder/0.1")
            .build()
            .map_err(|e| AppError::Http {
                endpoint: config.arxiv_api_base_url.clone(),
                source: e,
            })?;

        Ok(Self {
            client,
            base_url: config.arxiv_api_base_url.clone(),
        })
    }

    /// 执行一次查询
    ///
    /// # 参数
    /// - `query`: arXiv 查询串（见 `build_query`）
    /// - `max_results`: 最大结果数
    ///
    /// # 返回
    /// 按提交日期降序的候选论文列表
    pub async fn search(&self, query: &str, max_results: usize) -> Result<Vec<CandidatePaper>> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("search_query", query),
                ("start", "0"),
                ("max_results", &max_results.to_string()),
                ("sortBy", "submittedDate"),
                ("sortOrder", "descending"),
            ])
            .send()
            .await
            .map_err(|e| AppError::Http {
                endpoint: self.base_url.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::BadStatus {
                endpoint: self.base_url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| AppError::Http {
            endpoint: self.base_url.clone(),
            source: e,
        })?;

        parse_feed(&body)
    }
}

/// 构建合取查询串
///
/// 每个关键词作为精确短语在全部可检索字段上匹配，关键词之间取 AND：
/// `all:"kw1" AND all:"kw2"`。
pub fn build_query(keywords: &[String]) -> String {
    keywords
        .iter()
        .map(|k| format!("all:\"{}\"", k))
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// 解析 Atom 响应为候选论文列表
///
/// Atom 带命名空间，正则解析不可靠，这里用 quick-xml 做流式解析。
/// feed 级别的 title / updated 等标签通过 in-entry 状态位跳过。
pub fn parse_feed(xml: &str) -> Result<Vec<CandidatePaper>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    #[derive(Default)]
    struct EntryFields {
        id_url: String,
        title: String,
        summary: String,
        published: String,
        updated: String,
        authors: Vec<String>,
    }

    fn build_paper(fields: EntryFields) -> Option<CandidatePaper> {
        if fields.id_url.is_empty() {
            return None;
        }
        Some(CandidatePaper {
            id: paper_id_from_entry_url(&fields.id_url),
            title: fields.title,
            authors: fields.authors,
            published_at: parse_timestamp(&fields.published),
            updated_at: parse_timestamp(&fields.updated),
            abstract_text: fields.summary,
            link: fields.id_url,
        })
    }

    let mut papers = Vec::new();
    let mut entry: Option<EntryFields> = None;
    let mut in_author = false;
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                match e.local_name().as_ref() {
                    b"entry" => {
                        entry = Some(EntryFields::default());
                        in_author = false;
                    }
                    b"author" if entry.is_some() => in_author = true,
                    _ => {}
                }
                text.clear();
            }
            Ok(Event::Text(t)) => {
                if entry.is_some() {
                    let piece = t.unescape().map_err(|e| AppError::FeedParse(e.to_string()))?;
                    text.push_str(&piece);
                }
            }
            Ok(Event::End(e)) => {
                let tag = e.local_name().as_ref().to_vec();
                if tag == b"entry" {
                    if let Some(fields) = entry.take() {
                        if let Some(paper) = build_paper(fields) {
                            papers.push(paper);
                        }
                    }
                } else if let Some(fields) = entry.as_mut() {
                    let value = normalize_whitespace(&text);
                    match tag.as_slice() {
                        b"id" => fields.id_url = value,
                        b"title" => fields.title = value,
                        b"summary" => fields.summary = value,
                        b"published" => fields.published = value,
                        b"updated" => fields.updated = value,
                        b"name" if in_author => {
                            if !value.is_empty() {
                                fields.authors.push(value);
                            }
                        }
                        b"author" => in_author = false,
                        _ => {}
                    }
                }
                text.clear();
            }
            Err(e) => return Err(AppError::FeedParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(papers)
}

/// 从 Atom entry 的 id URL 中提取论文ID
///
/// 例如 `http://arxiv.org/abs/2301.12345v1` → `2301.12345v1`。
pub fn paper_id_from_entry_url(url: &str) -> String {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(url)
        .to_string()
}

/// 解析 RFC 3339 时间戳
///
/// 解析失败时退化为 Unix 纪元：这样的论文落在任何时间窗口之外，
/// 不会被误判为新论文。
fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// 压缩空白：换行和连续空格合并为单个空格
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
