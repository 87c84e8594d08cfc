//! 规则存储：按来源分层保存 masterlist 与 userlist 条目
//! 每层以大小写不敏感的插件名为键，保留文件内顺序；加载后不可变，重载时整体替换

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::model::{ListSource, Message, RuleEntry, RuleList};
use crate::utils::NameKey;

/// 单个来源列表的索引
#[derive(Debug, Clone)]
pub struct RuleLayer {
    source: ListSource,
    path: Option<PathBuf>,
    // 是否提供了该列表（文件或内存中的列表）
    loaded: bool,
    bash_tags: Vec<String>,
    globals: Vec<Message>,
    plugins: HashMap<NameKey, Vec<RuleEntry>>,
    // 插件首次出现的顺序
    plugin_order: Vec<NameKey>,
}

impl RuleLayer {
    /// 空层（未提供该列表）
    pub fn empty(source: ListSource) -> Self {
        Self {
            source,
            path: None,
            loaded: false,
            bash_tags: Vec::new(),
            globals: Vec::new(),
            plugins: HashMap::new(),
            plugin_order: Vec::new(),
        }
    }

    pub fn from_list(source: ListSource, path: Option<PathBuf>, list: RuleList) -> Self {
        let mut layer = Self::empty(source);
        layer.path = path;
        layer.loaded = true;
        layer.bash_tags = list.bash_tags;
        layer.globals = list.globals;

        for mut entry in list.plugins {
            entry.source = source;
            let key = NameKey::new(&entry.name);
            match layer.plugins.get_mut(&key) {
                Some(slot) => slot.push(entry),
                None => {
                    layer.plugin_order.push(key.clone());
                    layer.plugins.insert(key, vec![entry]);
                }
            }
        }

        layer
    }

    pub fn source(&self) -> ListSource {
        self.source
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// 是否提供了该列表；内存中构建的列表没有路径但同样算已加载
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn bash_tags(&self) -> &[String] {
        &self.bash_tags
    }

    pub fn globals(&self) -> &[Message] {
        &self.globals
    }

    /// 某插件在本层的全部条目（文件内顺序），未提及时为空
    pub fn entries_for(&self, plugin_name: &str) -> &[RuleEntry] {
        self.plugins
            .get(&NameKey::new(plugin_name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 按首次出现顺序遍历每个插件的条目槽
    pub fn plugin_slots(&self) -> impl Iterator<Item = &[RuleEntry]> {
        self.plugin_order
            .iter()
            .filter_map(|key| self.plugins.get(key).map(Vec::as_slice))
    }

    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    pub fn entry_count(&self) -> usize {
        self.plugins.values().map(Vec::len).sum()
    }
}

/// 某插件在两个来源中的条目，按固定顺序（主列表、用户列表）
#[derive(Debug, Clone, Copy)]
pub struct PluginEntries<'a> {
    pub masterlist: &'a [RuleEntry],
    pub userlist: &'a [RuleEntry],
}

impl<'a> PluginEntries<'a> {
    pub fn slot(self, source: ListSource) -> &'a [RuleEntry] {
        match source {
            ListSource::Masterlist => self.masterlist,
            ListSource::Userlist => self.userlist,
        }
    }

    /// 主列表条目在前、用户列表条目在后
    pub fn iter(self) -> impl Iterator<Item = &'a RuleEntry> {
        self.masterlist.iter().chain(self.userlist.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.masterlist.is_empty() && self.userlist.is_empty()
    }

    pub fn has_userlist_entries(&self) -> bool {
        !self.userlist.is_empty()
    }
}

/// 完整规则存储
#[derive(Debug, Clone)]
pub struct RuleStore {
    masterlist: RuleLayer,
    userlist: RuleLayer,
}

impl Default for RuleStore {
    fn default() -> Self {
        Self {
            masterlist: RuleLayer::empty(ListSource::Masterlist),
            userlist: RuleLayer::empty(ListSource::Userlist),
        }
    }
}

impl RuleStore {
    pub fn new(masterlist: RuleLayer, userlist: RuleLayer) -> Self {
        Self {
            masterlist,
            userlist,
        }
    }

    /// 直接由已解析的列表构建（未提供路径）
    pub fn from_lists(masterlist: RuleList, userlist: Option<RuleList>) -> Self {
        Self {
            masterlist: RuleLayer::from_list(ListSource::Masterlist, None, masterlist),
            userlist: userlist
                .map(|list| RuleLayer::from_list(ListSource::Userlist, None, list))
                .unwrap_or_else(|| RuleLayer::empty(ListSource::Userlist)),
        }
    }

    pub fn layer(&self, source: ListSource) -> &RuleLayer {
        match source {
            ListSource::Masterlist => &self.masterlist,
            ListSource::Userlist => &self.userlist,
        }
    }

    /// 按合并优先级排列的各层
    pub fn layers(&self) -> [&RuleLayer; 2] {
        [&self.masterlist, &self.userlist]
    }

    pub fn masterlist(&self) -> &RuleLayer {
        &self.masterlist
    }

    pub fn userlist(&self) -> &RuleLayer {
        &self.userlist
    }

    /// 大小写不敏感的精确文件名匹配，不做模糊或前缀匹配
    pub fn entries_for(&self, plugin_name: &str) -> PluginEntries<'_> {
        PluginEntries {
            masterlist: self.masterlist.entries_for(plugin_name),
            userlist: self.userlist.entries_for(plugin_name),
        }
    }

    /// 两个列表的已知标签并集（主列表顺序优先，去重）
    pub fn known_bash_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for tag in self.layers().into_iter().flat_map(|layer| layer.bash_tags()) {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
        tags
    }

    /// 全局消息（主列表在前）
    pub fn general_messages(&self) -> impl Iterator<Item = &Message> {
        self.layers().into_iter().flat_map(|layer| layer.globals().iter())
    }
}
