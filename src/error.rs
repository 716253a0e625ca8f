/// 应用程序错误类型
///
/// 错误分类：配置错误、状态文件错误、搜索传输错误、邮件传输错误。
/// 所有错误都在各自的边界被记录并消化，进程不会因单个周期内的
/// 错误而退出。
use thiserror::Error;

/// 应用程序错误
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 状态文件内容无法解析
    #[error("状态文件解析失败 ({path}): {source}")]
    StateParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// 写入状态文件失败
    #[error("写入状态文件失败 ({path}): {source}")]
    StateWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// arXiv API 请求失败
    #[error("arXiv API请求失败 ({endpoint}): {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// arXiv API 返回了非成功状态码
    #[error("arXiv API返回错误状态 ({endpoint}): HTTP {status}")]
    BadStatus { endpoint: String, status: u16 },

    /// Atom 响应解析失败
    #[error("Atom响应解析失败: {0}")]
    FeedParse(String),

    /// 邮件配置不完整，无法发送
    #[error("邮件配置不完整 (需要 SENDER_EMAIL / SENDER_PASSWORD / RECEIVER_EMAIL)")]
    MailIncomplete,

    /// 邮件地址无效
    #[error("邮件地址无效 ({field}): {source}")]
    MailAddress {
        field: &'static str,
        #[source]
        source: lettre::address::AddressError,
    },

    /// 构造邮件失败
    #[error("构造邮件失败: {0}")]
    MailBuild(#[from] lettre::error::Error),

    /// SMTP 发送失败（认证失败、连接失败等）
    #[error("SMTP发送失败: {0}")]
    MailSend(#[from] lettre::transport::smtp::Error),
}

/// 应用程序结果类型
pub type Result<T> = std::result::Result<T, AppError>;
