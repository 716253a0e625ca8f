/// SMTP 邮件客户端
///
/// 封装 lettre 的异步 SMTP 传输。发送是同步阻塞语义：调用方等待
/// 发送完成或失败，没有队列、没有重试。
use crate::config::MailConfig;
use crate::error::{AppError, Result};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

/// SMTP 客户端
pub struct MailClient {
    config: MailConfig,
}

impl MailClient {
    /// 创建新的邮件客户端
    pub fn new(config: &MailConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// 发送一封纯文本邮件
    ///
    /// # 参数
    /// - `subject`: 主题
    /// - `body`: 正文（UTF-8 纯文本）
    ///
    /// # 返回
    /// 配置不完整、地址无效、认证失败或连接失败都返回 Err，由
    /// 通知服务统一记录并转换为 `false`。
    pub async fn send(&self, subject: &str, body: &str) -> Result<()> {
        let (sender, password, recipient) = match (
            &self.config.sender,
            &self.config.password,
            &self.config.recipient,
        ) {
            (Some(s), Some(p), Some(r)) => (s, p, r),
            _ => return Err(AppError::MailIncomplete),
        };

        let message = Message::builder()
            .from(sender.parse().map_err(|e| AppError::MailAddress {
                field: "SENDER_EMAIL",
                source: e,
            })?)
            .to(recipient.parse().map_err(|e| AppError::MailAddress {
                field: "RECEIVER_EMAIL",
                source: e,
            })?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        // 465 端口走 SMTPS，其余端口（一般为 587）走 STARTTLS
        let builder = if self.config.smtp_port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_server)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_server)?
        };
        let mailer = builder
            .port(self.config.smtp_port)
            .credentials(Credentials::new(sender.clone(), password.clone()))
            .build();

        info!(
            "正在连接 SMTP 服务器 {}:{} ...",
            self.config.smtp_server, self.config.smtp_port
        );
        mailer.send(message).await?;
        info!("✓ 邮件已发送至 {}", recipient);

        Ok(())
    }
}
