/// 程序配置
///
/// 在启动时从环境变量构建一次，之后只读。关键词组通过
/// `KEYWORD_GROUP_<ID>` 形式的环境变量声明，值为逗号分隔的关键词
/// 列表，例如 `KEYWORD_GROUP_ML="diffusion, sampling"`。
use crate::error::{AppError, Result};
use regex::Regex;

/// 一个关键词组：一条独立的"搜索 + 通知"流
#[derive(Clone, Debug)]
pub struct KeywordGroup {
    /// 稳定的内部ID（由环境变量名派生，如 `group_ML`），用作状态文件的键
    pub id: String,
    /// 显示名称（原始环境变量名）
    pub display_name: String,
    /// 关键词列表（非空）
    pub keywords: Vec<String>,
    /// 原始关键词字符串，用于日志和邮件正文显示
    pub keywords_display: String,
}

/// 邮件传输配置
///
/// sender / password / recipient 任一缺失时，通知服务会拒绝发送
/// 并记录错误，但不会导致进程退出。
#[derive(Clone, Debug, Default)]
pub struct MailConfig {
    /// SMTP 服务器地址
    pub smtp_server: String,
    /// SMTP 端口（465 使用 SSL，其余使用 STARTTLS）
    pub smtp_port: u16,
    /// 发件人地址
    pub sender: Option<String>,
    /// 发件人凭证
    pub password: Option<String>,
    /// 收件人地址
    pub recipient: Option<String>,
}

impl MailConfig {
    /// 检查发送所需的配置是否完整
    pub fn is_complete(&self) -> bool {
        self.sender.is_some() && self.password.is_some() && self.recipient.is_some()
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 关键词组，按环境变量名排序，保证每个周期的处理顺序稳定
    pub groups: Vec<KeywordGroup>,
    /// 邮件传输配置
    pub mail: MailConfig,
    /// 状态文件路径
    pub state_file: String,
    /// 检查周期（小时）
    pub check_interval_hours: i64,
    /// 首次运行时的回溯窗口（天）
    pub first_run_lookback_days: i64,
    /// 每次查询的最大结果数，限制单次调用的 API 负载
    pub max_search_results: usize,
    /// arXiv API 地址
    pub arxiv_api_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            mail: MailConfig {
                smtp_server: "smtp.gmail.com".to_string(),
                smtp_port: 587,
                sender: None,
                password: None,
                recipient: None,
            },
            state_file: "paper_finder_state.json".to_string(),
            check_interval_hours: 24,
            first_run_lookback_days: 7,
            max_search_results: 100,
            arxiv_api_base_url: "https://export.arxiv.org/api/query".to_string(),
        }
    }
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 关键词组在此处一次性解析完成，之后不再触碰环境变量。
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            groups: parse_keyword_groups(std::env::vars()),
            mail: MailConfig {
                smtp_server: std::env::var("SMTP_SERVER").unwrap_or(default.mail.smtp_server),
                smtp_port: std::env::var("SMTP_PORT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(default.mail.smtp_port),
                sender: std::env::var("SENDER_EMAIL").ok(),
                password: std::env::var("SENDER_PASSWORD").ok(),
                recipient: std::env::var("RECEIVER_EMAIL").ok(),
            },
            state_file: std::env::var("STATE_FILE").unwrap_or(default.state_file),
            check_interval_hours: std::env::var("CHECK_INTERVAL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.check_interval_hours),
            first_run_lookback_days: default.first_run_lookback_days,
            max_search_results: std::env::var("MAX_SEARCH_RESULTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_search_results),
            arxiv_api_base_url: std::env::var("ARXIV_API_BASE_URL")
                .unwrap_or(default.arxiv_api_base_url),
        }
    }

    /// 校验配置，问题只降级功能、不中断启动
    ///
    /// # 返回
    /// 组列表为空时返回 Err，调用方记录警告后照常进入周期循环
    pub fn validate(&self) -> Result<()> {
        if self.groups.is_empty() {
            return Err(AppError::Config(
                "未找到任何 KEYWORD_GROUP_X 环境变量，本进程将不会执行搜索".to_string(),
            ));
        }
        Ok(())
    }
}

/// 从环境变量键值对解析关键词组
///
/// 匹配 `KEYWORD_GROUP_<ID>`（忽略大小写），跳过空值和只含分隔符的值。
/// 结果按环境变量名排序，保证配置顺序稳定。
pub fn parse_keyword_groups(vars: impl Iterator<Item = (String, String)>) -> Vec<KeywordGroup> {
    // \w+ 与原始约定一致：ID 只允许字母数字和下划线
    let pattern = Regex::new(r"(?i)^KEYWORD_GROUP_(\w+)$").expect("内置正则必定合法");

    let mut groups: Vec<KeywordGroup> = vars
        .filter_map(|(key, value)| {
            let captures = pattern.captures(&key)?;
            let suffix = captures.get(1)?.as_str();

            let keywords: Vec<String> = value
                .split(',')
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect();
            if keywords.is_empty() {
                return None;
            }

            Some(KeywordGroup {
                id: format!("group_{}", suffix),
                display_name: key.clone(),
                keywords,
                keywords_display: value.trim().to_string(),
            })
        })
        .collect();

    groups.sort_by(|a, b| a.display_name.cmp(&b.display_name));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Iterator<Item = (String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn test_parse_keyword_groups_basic() {
        let groups = parse_keyword_groups(vars(&[
            ("KEYWORD_GROUP_ML", "diffusion, sampling"),
            ("PATH", "/usr/bin"),
        ]));

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, "group_ML");
        assert_eq!(groups[0].display_name, "KEYWORD_GROUP_ML");
        assert_eq!(groups[0].keywords, vec!["diffusion", "sampling"]);
        assert_eq!(groups[0].keywords_display, "diffusion, sampling");
    }

    #[test]
    fn test_parse_keyword_groups_ordering_is_stable() {
        let groups = parse_keyword_groups(vars(&[
            ("KEYWORD_GROUP_Z", "zeta"),
            ("KEYWORD_GROUP_A", "alpha"),
            ("KEYWORD_GROUP_M", "mu"),
        ]));

        let names: Vec<&str> = groups.iter().map(|g| g.display_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["KEYWORD_GROUP_A", "KEYWORD_GROUP_M", "KEYWORD_GROUP_Z"]
        );
    }

    #[test]
    fn test_parse_keyword_groups_skips_empty_values() {
        let groups = parse_keyword_groups(vars(&[
            ("KEYWORD_GROUP_1", "  "),
            ("KEYWORD_GROUP_2", ", ,"),
            ("KEYWORD_GROUP_3", "bandits"),
        ]));

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, "group_3");
    }

    #[test]
    fn test_parse_keyword_groups_case_insensitive_key() {
        let groups = parse_keyword_groups(vars(&[("keyword_group_nlp", "attention")]));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, "group_nlp");
    }

    #[test]
    fn test_parse_keyword_groups_rejects_invalid_suffix() {
        let groups = parse_keyword_groups(vars(&[("KEYWORD_GROUP_A-B", "x")]));
        assert!(groups.is_empty());
    }

    #[test]
    fn test_mail_config_completeness() {
        let mut mail = MailConfig {
            smtp_server: "smtp.example.com".to_string(),
            smtp_port: 587,
            sender: Some("a@example.com".to_string()),
            password: Some("secret".to_string()),
            recipient: Some("b@example.com".to_string()),
        };
        assert!(mail.is_complete());

        mail.password = None;
        assert!(!mail.is_complete());
    }
}
