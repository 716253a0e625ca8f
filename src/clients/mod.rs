pub mod arxiv_client;
pub mod mail_client;

pub use arxiv_client::ArxivClient;
pub use mail_client::MailClient;
