//! # Paper Finder
//!
//! 一个长驻的 arXiv 论文订阅通知服务：按用户配置的关键词组周期性
//! 搜索新发表/新修订的论文，对照已通知记录去重，并通过邮件发送
//! 摘要。
//!
//! ## 架构设计
//!
//! 本系统采用严格的分层架构：
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 只封装外部系统的协议细节
//! - `ArxivClient` - arXiv Atom API 查询与解析
//! - `MailClient` - SMTP 发送能力
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，定义两个能力接口
//! - `SearchService` - 时间窗口 + 去重过滤的论文搜索（PaperSource）
//! - `NotifyService` - 摘要邮件的拼装与发送（DigestNotifier）
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/` - 周期循环与逐组状态机
//! - `App` - 搜索 → 通知 → 确认后推进状态 → 写回
//!
//! ### 支撑模块
//! - `config` - 启动时从环境变量构建一次的只读配置
//! - `state` - 已通知状态的加载与持久化
//! - `error` - 错误分类
//! - `logger` - tracing 日志初始化
//!
//! ## 可靠性约定
//!
//! 周期内的一切失败（搜索、邮件、状态文件）都被就地记录并消化，
//! 进程设计为在部分失败下无限期运行。状态只在邮件发送确认成功后
//! 推进，语义是"至少一次通知，成功后至多一次"。

pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod state;

// 重新导出常用类型
pub use config::{Config, KeywordGroup, MailConfig};
pub use error::{AppError, Result};
pub use models::CandidatePaper;
pub use orchestrator::{App, CycleStats};
pub use services::{DigestNotifier, NotifyService, PaperSource, SearchService};
pub use state::{SeenState, StateStore};
