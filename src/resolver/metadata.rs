//! 合并后的插件元数据视图
//! 标签 / 文件 / 位置 / 清洁记录取并集（保留首次出现顺序），消息直接拼接

use serde::{Deserialize, Serialize};

use super::messages::{SimpleMessage, localize_all};
use crate::error::RslResult;
use crate::rule::{CleaningData, File, Location, Message, RuleEntry, Tag};
use crate::utils::names_equal;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginMetadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub load_after: Vec<File>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<File>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub incompatibilities: Vec<File>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dirty_info: Vec<CleaningData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clean_info: Vec<CleaningData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,
}

impl PluginMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: None,
            load_after: Vec::new(),
            requirements: Vec::new(),
            incompatibilities: Vec::new(),
            messages: Vec::new(),
            tags: Vec::new(),
            dirty_info: Vec::new(),
            clean_info: Vec::new(),
            locations: Vec::new(),
        }
    }

    /// 依次合并条目；无条目时返回 None
    pub fn from_entries<'a, I>(name: &str, entries: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a RuleEntry>,
    {
        let mut entries = entries.into_iter().peekable();
        entries.peek()?;

        let mut metadata = Self::new(name);
        for entry in entries {
            metadata.merge_entry(entry);
        }
        Some(metadata)
    }

    pub fn merge_entry(&mut self, entry: &RuleEntry) {
        if self.group.is_none() {
            self.group = entry.group.clone();
        }

        merge_unique(&mut self.tags, &entry.tags, |a, b| a == b);
        merge_unique(&mut self.load_after, &entry.load_after, same_file);
        merge_unique(&mut self.requirements, &entry.requirements, same_file);
        merge_unique(&mut self.incompatibilities, &entry.incompatibilities, same_file);
        merge_unique(&mut self.dirty_info, &entry.dirty_info, |a, b| a.crc == b.crc);
        merge_unique(&mut self.clean_info, &entry.clean_info, |a, b| a.crc == b.crc);
        merge_unique(&mut self.locations, &entry.locations, |a, b| a.link == b.link);

        self.messages.extend(entry.messages.iter().cloned());
    }

    /// 除名称外是否没有任何元数据
    pub fn has_name_only(&self) -> bool {
        self.group.is_none()
            && self.load_after.is_empty()
            && self.requirements.is_empty()
            && self.incompatibilities.is_empty()
            && self.messages.is_empty()
            && self.tags.is_empty()
            && self.dirty_info.is_empty()
            && self.clean_info.is_empty()
            && self.locations.is_empty()
    }

    /// 本地化全部消息
    pub fn simple_messages(&self, language: &str) -> RslResult<Vec<SimpleMessage>> {
        localize_all(&self.messages, language)
    }
}

fn same_file(a: &File, b: &File) -> bool {
    names_equal(&a.name, &b.name) && a.condition == b.condition
}

fn merge_unique<T: Clone>(target: &mut Vec<T>, incoming: &[T], same: impl Fn(&T, &T) -> bool) {
    for item in incoming {
        if !target.iter().any(|existing| same(existing, item)) {
            target.push(item.clone());
        }
    }
}
