//! 规则数据模型定义
//! 仅存储单个规则列表中某插件的元数据条目，无任何合并逻辑

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_LANGUAGE;

/// 条目来源列表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListSource {
    Masterlist,
    Userlist,
}

impl ListSource {
    /// 固定合并顺序：主列表在前，用户列表在后
    pub const MERGE_ORDER: [ListSource; 2] = [ListSource::Masterlist, ListSource::Userlist];
}

impl fmt::Display for ListSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListSource::Masterlist => f.write_str("masterlist"),
            ListSource::Userlist => f.write_str("userlist"),
        }
    }
}

/// 消息严重级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Say,
    Warn,
    Error,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageType::Say => f.write_str("say"),
            MessageType::Warn => f.write_str("warn"),
            MessageType::Error => f.write_str("error"),
        }
    }
}

/// 单一语言的消息文本
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageContent {
    pub text: String,
    pub language: String,
}

impl MessageContent {
    pub fn new(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: language.into(),
        }
    }

    /// 默认语言（英语）文本
    pub fn english(text: impl Into<String>) -> Self {
        Self::new(text, DEFAULT_LANGUAGE)
    }

    /// 按语言选择文本：精确匹配 > 语言前缀匹配 > 默认语言
    pub fn choose<'a>(contents: &'a [MessageContent], language: &str) -> Option<&'a MessageContent> {
        let prefix = language_prefix(language);
        let mut prefix_match = None;
        let mut default_match = None;

        for content in contents {
            if content.language.eq_ignore_ascii_case(language) {
                return Some(content);
            }
            if prefix_match.is_none() && content.language.eq_ignore_ascii_case(prefix) {
                prefix_match = Some(content);
            }
            if default_match.is_none() && content.language.eq_ignore_ascii_case(DEFAULT_LANGUAGE) {
                default_match = Some(content);
            }
        }

        prefix_match.or(default_match)
    }
}

/// 去除地区后缀：pt_BR / pt-BR -> pt
fn language_prefix(language: &str) -> &str {
    language
        .split(['_', '-'])
        .next()
        .unwrap_or(language)
}

/// 插件诊断消息
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    pub message_type: MessageType,
    pub content: Vec<MessageContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl Message {
    pub fn new(message_type: MessageType, content: Vec<MessageContent>) -> Self {
        Self {
            message_type,
            content,
            condition: None,
        }
    }
}

/// 标签建议（添加或移除）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub addition: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl Tag {
    pub fn added(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            addition: true,
            condition: None,
        }
    }

    pub fn removed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            addition: false,
            condition: None,
        }
    }

    pub fn is_addition(&self) -> bool {
        self.addition
    }
}

/// 清洁度检查记录（dirty / clean 共用）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CleaningData {
    pub crc: u32,
    pub utility: String,
    #[serde(default)]
    pub itm_count: u32,
    #[serde(default)]
    pub deleted_reference_count: u32,
    #[serde(default)]
    pub deleted_navmesh_count: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub detail: Vec<MessageContent>,
}

impl CleaningData {
    pub fn new(crc: u32, utility: impl Into<String>) -> Self {
        Self {
            crc,
            utility: utility.into(),
            itm_count: 0,
            deleted_reference_count: 0,
            deleted_navmesh_count: 0,
            detail: Vec::new(),
        }
    }
}

/// 关联文件（after / req / inc）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct File {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl File {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display: None,
            condition: None,
        }
    }

    /// 展示名称，缺省时使用文件名
    pub fn display_name(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.name)
    }
}

/// 插件下载位置
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// 单个来源列表中某插件的一条规则条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    pub name: String,
    pub source: ListSource,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub dirty_info: Vec<CleaningData>,
    #[serde(default)]
    pub clean_info: Vec<CleaningData>,
    #[serde(default)]
    pub load_after: Vec<File>,
    #[serde(default)]
    pub requirements: Vec<File>,
    #[serde(default)]
    pub incompatibilities: Vec<File>,
    #[serde(default)]
    pub locations: Vec<Location>,
}

impl RuleEntry {
    pub fn new(name: impl Into<String>, source: ListSource) -> Self {
        Self {
            name: name.into(),
            source,
            group: None,
            tags: Vec::new(),
            messages: Vec::new(),
            dirty_info: Vec::new(),
            clean_info: Vec::new(),
            load_after: Vec::new(),
            requirements: Vec::new(),
            incompatibilities: Vec::new(),
            locations: Vec::new(),
        }
    }

    pub fn tags_added(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().filter(|t| t.addition).map(|t| t.name.as_str())
    }

    pub fn tags_removed(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().filter(|t| !t.addition).map(|t| t.name.as_str())
    }

    pub fn has_dirty_info(&self) -> bool {
        !self.dirty_info.is_empty()
    }

    pub fn has_clean_info(&self) -> bool {
        !self.clean_info.is_empty()
    }
}

/// 解析后的完整规则列表文档
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleList {
    pub bash_tags: Vec<String>,
    pub globals: Vec<Message>,
    pub plugins: Vec<RuleEntry>,
}
