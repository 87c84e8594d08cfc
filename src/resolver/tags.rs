//! 标签解析：合并各来源条目的添加/移除标签集合

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::rule::PluginEntries;

/// 某插件的标签建议
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginTags {
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
    /// 用户列表中是否存在该插件的条目
    ///
    /// 只看用户列表槽位是否非空，不看条目内容：仅含消息、不含标签的用户条目同样置为 true。
    /// 上游实现以用户条目的标签集合是否非空为准，两者在这一情形下结果不同。
    pub userlist_modified: bool,
}

impl PluginTags {
    /// 同时出现在添加与移除集合中的标签
    pub fn conflicts(&self) -> impl Iterator<Item = &str> {
        self.added.intersection(&self.removed).map(String::as_str)
    }

    /// 最终应用的标签：移除优先
    pub fn effective(&self) -> BTreeSet<String> {
        self.added.difference(&self.removed).cloned().collect()
    }
}

/// 标签解析器
pub struct TagResolver;

impl TagResolver {
    /// 按主列表、用户列表顺序并集添加与移除标签，两个集合各自独立，不做互斥处理
    pub fn resolve(entries: &PluginEntries<'_>) -> PluginTags {
        let mut tags = PluginTags {
            userlist_modified: entries.has_userlist_entries(),
            ..PluginTags::default()
        };

        for entry in entries.iter() {
            tags.added.extend(entry.tags_added().map(str::to_string));
            tags.removed.extend(entry.tags_removed().map(str::to_string));
        }

        tags
    }
}
