/// 周期编排器
///
/// 驱动主循环：每个周期逐组执行"搜索 → 通知 → 推进状态"，周期
/// 之间休眠固定间隔。休眠可被 ctrl-c 打断，支持优雅退出。
use crate::config::Config;
use crate::error::Result;
use crate::services::{DigestNotifier, NotifyService, PaperSource, SearchService};
use crate::state::StateStore;
use chrono::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// 单个周期的统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleStats {
    /// 检查过的组数
    pub groups_checked: usize,
    /// 本周期通知出去的论文数
    pub papers_notified: usize,
    /// 状态文件是否被写回
    pub state_saved: bool,
}

/// 应用主结构
///
/// 对论文来源和通知器做了泛型化：生产代码用真实的
/// SearchService / NotifyService，测试用脚本化的假实现驱动周期。
pub struct App<S, N> {
    config: Config,
    state_store: StateStore,
    source: S,
    notifier: N,
}

impl App<SearchService, NotifyService> {
    /// 用真实的搜索与通知服务初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        let source = SearchService::new(&config)?;
        let notifier = NotifyService::new(&config.mail);
        let state_store = StateStore::new(&config.state_file);
        Ok(Self::with_collaborators(config, state_store, source, notifier))
    }
}

impl<S: PaperSource, N: DigestNotifier> App<S, N> {
    /// 用显式给定的协作者组装应用（测试入口）
    pub fn with_collaborators(
        config: Config,
        state_store: StateStore,
        source: S,
        notifier: N,
    ) -> Self {
        Self {
            config,
            state_store,
            source,
            notifier,
        }
    }

    /// 运行主循环，直到收到退出信号
    pub async fn run(&self) {
        log_startup(&self.config);

        loop {
            let stats = self.run_cycle().await;
            log_cycle_complete(&stats);

            let interval_secs = self.config.check_interval_hours.max(0) as u64 * 3600;
            info!(
                "等待 {} 小时 ({} 秒) 后开始下一周期...",
                self.config.check_interval_hours, interval_secs
            );

            tokio::select! {
                _ = sleep(std::time::Duration::from_secs(interval_secs)) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("收到退出信号，停止轮询");
                    break;
                }
            }
        }
    }

    /// 执行一个完整的检查周期
    ///
    /// 周期内的所有失败（搜索、邮件、状态写入）都在原地记录并
    /// 消化，因此本方法总能正常返回，进程可以无限期运行。
    pub async fn run_cycle(&self) -> CycleStats {
        info!("{}", "=".repeat(60));
        info!("🔍 开始论文检查周期");
        info!("{}", "=".repeat(60));

        let mut stats = CycleStats::default();

        if self.config.groups.is_empty() {
            warn!("未配置任何关键词组 (检查 KEYWORD_GROUP_X 环境变量)，跳过本周期");
            return stats;
        }

        let (mut state, existed) = self.state_store.load();

        // 首次运行（含状态文件损坏的情况）回溯 7 天，之后每个周期
        // 只回溯一个检查间隔
        let window = if existed {
            Duration::hours(self.config.check_interval_hours)
        } else {
            info!(
                "首次运行: 搜索窗口回溯 {} 天",
                self.config.first_run_lookback_days
            );
            Duration::days(self.config.first_run_lookback_days)
        };

        let mut dirty = false;

        for group in &self.config.groups {
            info!(
                "-- 检查组: {} ({}) --",
                group.display_name, group.keywords_display
            );
            stats.groups_checked += 1;

            let seen = state.seen_for(&group.id);
            let candidates = self.source.search(&group.keywords, &seen, window).await;

            if candidates.is_empty() {
                info!("[{}] 本组没有新论文", group.display_name);
                continue;
            }

            info!(
                "[{}] 发现 {} 篇新论文，准备发送邮件",
                group.display_name,
                candidates.len()
            );

            if self.notifier.notify(group, &candidates).await {
                let ids: Vec<String> = candidates.iter().map(|p| p.id.clone()).collect();
                let count = ids.len();
                state.record(&group.id, ids);
                dirty = true;
                stats.papers_notified += count;
                info!("[{}] ✓ 状态已更新，新增 {} 个论文ID", group.display_name, count);
            } else {
                // 发送失败时不推进该组状态，这些论文下个周期会重试
                error!(
                    "[{}] ❌ 邮件发送失败，本组状态保持不变",
                    group.display_name
                );
            }
        }

        if dirty {
            match self.state_store.save(&state) {
                Ok(()) => stats.state_saved = true,
                Err(e) => {
                    // 写入失败不致命：内存状态随周期结束丢弃，
                    // 未落盘的论文会被重新通知
                    error!("{}", e);
                }
            }
        } else {
            info!("本周期没有状态变更");
        }

        stats
    }
}

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - arXiv 论文订阅通知");
    info!("📋 关键词组: {} 个", config.groups.len());
    for group in &config.groups {
        info!("   {} ({})", group.display_name, group.keywords_display);
    }
    info!("📄 状态文件: {}", config.state_file);
    info!("⏱️ 检查间隔: {} 小时", config.check_interval_hours);
    info!("{}", "=".repeat(60));
}

fn log_cycle_complete(stats: &CycleStats) {
    info!("{}", "─".repeat(60));
    info!(
        "✓ 周期完成: 检查 {} 个组, 通知 {} 篇论文{}",
        stats.groups_checked,
        stats.papers_notified,
        if stats.state_saved {
            ", 状态已保存"
        } else {
            ""
        }
    );
    info!("{}", "─".repeat(60));
}
