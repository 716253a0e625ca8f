/// 状态存储
///
/// 持久化"每个关键词组已通知过哪些论文"这一映射。这是全程序唯一
/// 的可变共享资源：每个周期开始时读取一次，周期内在内存中演进，
/// 有变更时在周期结束前写回一次。
///
/// 容错约定：
/// - 文件不存在 → 返回空状态 + `existed = false`（首次运行）
/// - 文件存在但无法读取或解析 → 记录警告，同样返回空状态 +
///   `existed = false`。注意这里刻意将"损坏"与"不存在"合并处理
///   （与原有行为保持一致）：损坏的状态文件会把回溯窗口悄悄重置为
///   7 天，可能导致重复通知。
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 已通知状态：组ID → 已通知论文ID集合
///
/// 使用 BTreeMap / BTreeSet，序列化结果天然有序，保证状态文件
/// 内容可复现。不变式：论文ID一旦进入某组的集合就不再移除。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeenState {
    groups: BTreeMap<String, BTreeSet<String>>,
}

impl SeenState {
    /// 取某组的已通知集合，不存在时返回空集合
    pub fn seen_for(&self, group_id: &str) -> BTreeSet<String> {
        self.groups.get(group_id).cloned().unwrap_or_default()
    }

    /// 将一批论文ID并入某组的已通知集合
    pub fn record(&mut self, group_id: &str, ids: impl IntoIterator<Item = String>) {
        self.groups.entry(group_id.to_string()).or_default().extend(ids);
    }

    /// 状态中包含的组数量（含当前配置之外的历史组）
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

/// 状态文件存储
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// 创建指向给定路径的状态存储
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 加载持久化状态
    ///
    /// # 返回
    /// 返回 (状态, 文件此前是否存在且有效)。任何读取/解析失败都被
    /// 消化为"首次运行"，不向上层传播。
    pub fn load(&self) -> (SeenState, bool) {
        let path_display = self.path.display();

        if !self.path.exists() {
            info!("状态文件 {} 不存在，按首次运行处理", path_display);
            return (SeenState::default(), false);
        }

        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                warn!("状态文件 {} 无法读取 ({})，按首次运行处理", path_display, e);
                return (SeenState::default(), false);
            }
        };

        match serde_json::from_str::<SeenState>(&contents) {
            Ok(state) => {
                info!("✓ 已加载 {} 个组的状态: {}", state.group_count(), path_display);
                (state, true)
            }
            Err(e) => {
                // 损坏与不存在走同一条恢复路径：回溯窗口会重置为 7 天，
                // 已通知但未进入新状态的论文可能被重复通知
                warn!(
                    "状态文件 {} 存在但解析失败 ({})，按首次运行处理，可能产生重复通知",
                    path_display, e
                );
                (SeenState::default(), false)
            }
        }
    }

    /// 保存状态，替换旧文件
    ///
    /// 先写临时文件再原子重命名，写入中途崩溃不会留下损坏的状态
    /// 文件。写入失败由调用方记录，不中断进程。
    pub fn save(&self, state: &SeenState) -> Result<()> {
        let path_str = self.path.display().to_string();

        let serialized = serde_json::to_string_pretty(state).map_err(|e| AppError::StateParse {
            path: path_str.clone(),
            source: e,
        })?;

        let tmp_path = tmp_sibling(&self.path);
        fs::write(&tmp_path, serialized).map_err(|e| AppError::StateWrite {
            path: path_str.clone(),
            source: e,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|e| AppError::StateWrite {
            path: path_str.clone(),
            source: e,
        })?;

        info!("✓ 已保存 {} 个组的状态: {}", state.group_count(), path_str);
        Ok(())
    }
}

/// 同目录下的临时文件路径，保证 rename 不跨文件系统
fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_state_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "paper_finder_state_test_{}_{}.json",
            tag,
            std::process::id()
        ))
    }

    fn sample_state() -> SeenState {
        let mut state = SeenState::default();
        state.record("group_ml", ["2301.00001v1".to_string(), "2301.00002v1".to_string()]);
        state.record("group_nlp", ["2302.11111v2".to_string()]);
        state
    }

    #[test]
    fn test_load_missing_file_is_first_run() {
        let path = temp_state_path("missing");
        let _ = fs::remove_file(&path);

        let store = StateStore::new(&path);
        let (state, existed) = store.load();

        assert!(!existed);
        assert_eq!(state, SeenState::default());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let path = temp_state_path("roundtrip");
        let store = StateStore::new(&path);

        let state = sample_state();
        store.save(&state).expect("保存状态应该成功");

        let (loaded, existed) = store.load();
        assert!(existed);
        assert_eq!(loaded, state);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_serialized_form_is_sorted_object() {
        let state = sample_state();
        let json = serde_json::to_string(&state).unwrap();

        // 组ID → 有序论文ID数组的 JSON 对象
        assert_eq!(
            json,
            r#"{"group_ml":["2301.00001v1","2301.00002v1"],"group_nlp":["2302.11111v2"]}"#
        );
    }

    #[test]
    fn test_corrupt_file_treated_as_first_run() {
        let path = temp_state_path("corrupt");
        fs::write(&path, "{ not valid json").unwrap();

        let store = StateStore::new(&path);
        let (state, existed) = store.load();

        assert!(!existed);
        assert_eq!(state, SeenState::default());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_unknown_groups_preserved_on_save() {
        let path = temp_state_path("preserve");
        let store = StateStore::new(&path);

        // 历史状态里有一个当前配置中不存在的组
        let mut state = sample_state();
        store.save(&state).unwrap();

        let (mut loaded, _) = store.load();
        loaded.record("group_ml", ["2301.00003v1".to_string()]);
        store.save(&loaded).unwrap();

        let (reloaded, _) = store.load();
        assert_eq!(reloaded.seen_for("group_nlp").len(), 1);

        state.record("group_ml", ["2301.00003v1".to_string()]);
        assert_eq!(reloaded, state);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_record_is_monotone() {
        let mut state = SeenState::default();
        state.record("group_ml", ["A".to_string(), "B".to_string()]);
        state.record("group_ml", ["B".to_string(), "C".to_string()]);

        let seen = state.seen_for("group_ml");
        assert!(seen.contains("A"));
        assert!(seen.contains("B"));
        assert!(seen.contains("C"));
        assert_eq!(seen.len(), 3);
    }
}
