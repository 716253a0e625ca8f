/// 摘要通知服务
///
/// 为一批新论文拼装一封摘要邮件并发送。发送失败（配置不完整、
/// 认证失败、连接失败）在这里被记录并转换为 `false`，编排层据此
/// 保持该组状态不变。
use crate::clients::MailClient;
use crate::config::{KeywordGroup, MailConfig};
use crate::models::CandidatePaper;
use crate::services::DigestNotifier;
use chrono::{NaiveDate, Utc};
use tracing::{error, info};

/// 论文条目之间的分隔行
const ENTRY_DELIMITER: &str = "\n\n---\n\n";

/// 通知服务
pub struct NotifyService {
    mail: MailClient,
}

impl NotifyService {
    /// 创建新的通知服务
    pub fn new(config: &MailConfig) -> Self {
        Self {
            mail: MailClient::new(config),
        }
    }
}

impl DigestNotifier for NotifyService {
    async fn notify(&self, group: &KeywordGroup, papers: &[CandidatePaper]) -> bool {
        let subject = compose_subject(group, papers.len(), Utc::now().date_naive());
        let body = compose_body(group, papers);

        match self.mail.send(&subject, &body).await {
            Ok(()) => true,
            Err(e) => {
                error!("[{}] 邮件发送失败: {}", group.display_name, e);
                false
            }
        }
    }
}

/// 拼装邮件主题：组名、论文数量、当前日期
pub fn compose_subject(group: &KeywordGroup, count: usize, date: NaiveDate) -> String {
    format!(
        "New arXiv Papers: {} ({}) - {}",
        group.display_name,
        count,
        date.format("%Y-%m-%d")
    )
}

/// 拼装邮件正文
///
/// 开头是一行摘要，之后每篇论文一段：标题、作者（逗号连接）、
/// 发布/更新时间、链接、摘要，段与段之间用固定分隔行隔开。
pub fn compose_body(group: &KeywordGroup, papers: &[CandidatePaper]) -> String {
    let mut body = format!(
        "Found {} new paper(s) for keyword group '{}' ({}):",
        papers.len(),
        group.display_name,
        group.keywords_display
    );

    for paper in papers {
        body.push_str(ENTRY_DELIMITER);
        body.push_str(&format!(
            "Title: {}\nAuthors: {}\nPublished: {}\nUpdated: {}\nLink: {}\nAbstract: {}",
            paper.title,
            paper.authors.join(", "),
            paper.published_at.format("%Y-%m-%d %H:%M:%S %Z"),
            paper.updated_at.format("%Y-%m-%d %H:%M:%S %Z"),
            paper.link,
            paper.abstract_text
        ));
    }
    body.push_str(ENTRY_DELIMITER);

    info!(
        "[{}] 已拼装 {} 篇论文的摘要邮件",
        group.display_name,
        papers.len()
    );
    body
}
