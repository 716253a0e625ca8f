//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层驱动"一个检查周期"的完整状态机，是整个系统的"指挥中心"：
//!
//! 1. 读取持久化状态（StateStore）
//! 2. 依配置顺序逐组搜索（PaperSource）
//! 3. 有新论文时发送摘要通知（DigestNotifier）
//! 4. 仅在发送确认成功后推进该组状态
//! 5. 有变更时写回状态文件，然后休眠到下一周期
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (周期循环 + 逐组状态机)
//!     ↓
//! services (能力层：PaperSource / DigestNotifier)
//!     ↓
//! clients (arXiv API / SMTP)
//! ```
//!
//! ## 设计原则
//!
//! 1. **组间独立**：一个组的搜索或邮件失败不影响其他组
//! 2. **确认后推进**：状态只在发送成功后更新，语义是
//!    "至少一次通知，成功后至多一次"
//! 3. **周期必然完成**：所有可失败步骤都在原地处理，
//!    `run_cycle` 按构造即不可失败

pub mod cycle;

pub use cycle::{App, CycleStats};
