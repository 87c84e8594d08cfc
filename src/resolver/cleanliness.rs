//! 清洁度判定
//! 纯函数：仅依据合并后 dirty / clean 记录是否存在以及 do-not-clean 标记给出结论，
//! 来源冲突时一律返回 unknown

use std::fmt;

use serde::{Deserialize, Serialize};

use super::messages::default_text;
use crate::rule::{CleaningData, PluginEntries};

/// dirty 记录说明文本中的"不要清理"标记（区分大小写的子串）
const DO_NOT_CLEAN_MARKER: &str = "Do not clean";

/// 清洁度结论
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginCleanliness {
    Unknown,
    Clean,
    Dirty,
    DoNotClean,
}

impl fmt::Display for PluginCleanliness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginCleanliness::Unknown => f.write_str("unknown"),
            PluginCleanliness::Clean => f.write_str("clean"),
            PluginCleanliness::Dirty => f.write_str("dirty"),
            PluginCleanliness::DoNotClean => f.write_str("do_not_clean"),
        }
    }
}

/// 判定表
///
/// | dirty | clean | do-not-clean | 结论 |
/// |---|---|---|---|
/// | 否 | 否 | - | unknown |
/// | 是 | 是 | - | unknown |
/// | 是 | 否 | 是 | do_not_clean |
/// | 是 | 否 | 否 | dirty |
/// | 否 | 是 | - | clean |
pub fn classify(dirty_present: bool, clean_present: bool, do_not_clean: bool) -> PluginCleanliness {
    match (dirty_present, clean_present) {
        (false, false) | (true, true) => PluginCleanliness::Unknown,
        (false, true) => PluginCleanliness::Clean,
        (true, false) if do_not_clean => PluginCleanliness::DoNotClean,
        (true, false) => PluginCleanliness::Dirty,
    }
}

/// dirty 记录是否带有 do-not-clean 标记（以默认语言说明文本为准）
///
/// 与上游 masterlist 的写法一致，只认 `Do not clean` 原样子串：
/// `DO NOT CLEAN` 不算标记，`Do not cleanse ...` 算。
pub fn is_do_not_clean(record: &CleaningData) -> bool {
    default_text(&record.detail).is_some_and(|text| text.contains(DO_NOT_CLEAN_MARKER))
}

/// 清洁度判定器
pub struct CleanlinessClassifier;

impl CleanlinessClassifier {
    /// 合并两个来源后判定，与加载顺序无关
    pub fn classify_entries(entries: &PluginEntries<'_>) -> PluginCleanliness {
        let mut dirty_present = false;
        let mut clean_present = false;
        let mut do_not_clean = false;

        for entry in entries.iter() {
            dirty_present |= entry.has_dirty_info();
            clean_present |= entry.has_clean_info();
            do_not_clean |= entry.dirty_info.iter().any(is_do_not_clean);
        }

        classify(dirty_present, clean_present, do_not_clean)
    }
}
