//! 业务能力层
//!
//! 描述"我能做什么"：搜索新论文、发送摘要通知。编排层只依赖这里
//! 的两个能力接口，测试可以用脚本化的假实现驱动整个周期。

pub mod notify_service;
pub mod search_service;

pub use notify_service::NotifyService;
pub use search_service::SearchService;

use crate::config::KeywordGroup;
use crate::models::CandidatePaper;
use chrono::Duration;
use std::collections::BTreeSet;

/// 论文来源能力：按关键词 + 时间窗口搜索未见过的论文
///
/// 实现方必须自行消化传输/解析错误并返回空列表，错误不跨越该边界。
#[allow(async_fn_in_trait)]
pub trait PaperSource {
    /// 搜索窗口内、且不在 `seen` 中的候选论文
    async fn search(
        &self,
        keywords: &[String],
        seen: &BTreeSet<String>,
        window: Duration,
    ) -> Vec<CandidatePaper>;
}

/// 摘要通知能力：为一批新论文发送一条通知
///
/// 返回 false 表示发送失败，编排层据此保持该组状态不变。
#[allow(async_fn_in_trait)]
pub trait DigestNotifier {
    /// 发送通知，papers 非空
    async fn notify(&self, group: &KeywordGroup, papers: &[CandidatePaper]) -> bool;
}
