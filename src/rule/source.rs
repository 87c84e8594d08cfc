//! 规则列表文档的原始 YAML 结构
//! 负责原始结构与数据模型之间的双向转换（读取 masterlist/userlist，写出精简列表）

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use super::model::{
    CleaningData, File, ListSource, Location, Message, MessageContent, MessageType, RuleEntry,
    RuleList, Tag,
};
use crate::config::DEFAULT_LANGUAGE;

/// 消息替换占位符：{0} {1} ...
static SUBSTITUTION_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{(\d+)\}").expect("substitution placeholder pattern is valid")
});

/// 规则列表文档根节点
#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct RawRuleList {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bash_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub globals: Vec<RawMessage>,
    #[serde(default)]
    pub plugins: Vec<RawPluginEntry>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct RawPluginEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub after: Vec<RawFile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub req: Vec<RawFile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inc: Vec<RawFile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub msg: Vec<RawMessage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag: Vec<RawTag>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub url: Vec<RawLocation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dirty: Vec<RawCleaning>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clean: Vec<RawCleaning>,
}

/// 标签：字符串（前缀 `-` 表示移除）或 {name, condition}
#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub(crate) enum RawTag {
    Plain(String),
    Detailed {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        condition: Option<String>,
    },
}

/// 文件：字符串或 {name, display, condition}
#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub(crate) enum RawFile {
    Plain(String),
    Detailed {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        display: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        condition: Option<String>,
    },
}

/// 位置：字符串或 {link, name}
#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub(crate) enum RawLocation {
    Plain(String),
    Detailed {
        link: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct RawMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub content: RawContent,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

/// 文本内容：单一英语字符串或多语言列表
#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub(crate) enum RawContent {
    Text(String),
    Localized(Vec<RawLocalizedText>),
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct RawLocalizedText {
    pub lang: String,
    pub text: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct RawCleaning {
    pub crc: RawCrc,
    pub util: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub itm: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udr: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nav: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<RawContent>,
}

/// CRC：YAML 整数或十六进制字符串
#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub(crate) enum RawCrc {
    Number(u64),
    Hex(String),
}

// ======== 原始结构 -> 数据模型 ========

impl RawRuleList {
    pub fn into_rule_list(self, source: ListSource) -> Result<RuleList, String> {
        let globals = self
            .globals
            .into_iter()
            .enumerate()
            .map(|(idx, msg)| msg.into_message().map_err(|e| format!("global message #{}: {}", idx + 1, e)))
            .collect::<Result<Vec<_>, _>>()?;

        let plugins = self
            .plugins
            .into_iter()
            .enumerate()
            .map(|(idx, entry)| entry.into_entry(source).map_err(|e| format!("plugin entry #{}: {}", idx + 1, e)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RuleList {
            bash_tags: self.bash_tags,
            globals,
            plugins,
        })
    }
}

impl RawPluginEntry {
    fn into_entry(self, source: ListSource) -> Result<RuleEntry, String> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err("plugin entry has an empty name".to_string());
        }

        let context = |field: &str, e: String| format!("`{}` {}: {}", name, field, e);

        let tags = self
            .tag
            .into_iter()
            .map(RawTag::into_tag)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| context("tag", e))?;
        let messages = self
            .msg
            .into_iter()
            .map(RawMessage::into_message)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| context("msg", e))?;
        let dirty_info = self
            .dirty
            .into_iter()
            .map(RawCleaning::into_cleaning_data)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| context("dirty", e))?;
        let clean_info = self
            .clean
            .into_iter()
            .map(RawCleaning::into_cleaning_data)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| context("clean", e))?;

        Ok(RuleEntry {
            group: self.group.filter(|g| !g.trim().is_empty()),
            tags,
            messages,
            dirty_info,
            clean_info,
            load_after: self.after.into_iter().map(RawFile::into_file).collect(),
            requirements: self.req.into_iter().map(RawFile::into_file).collect(),
            incompatibilities: self.inc.into_iter().map(RawFile::into_file).collect(),
            locations: self.url.into_iter().map(RawLocation::into_location).collect(),
            source,
            name,
        })
    }
}

impl RawTag {
    fn into_tag(self) -> Result<Tag, String> {
        let (raw_name, condition) = match self {
            RawTag::Plain(name) => (name, None),
            RawTag::Detailed { name, condition } => (name, condition),
        };

        let trimmed = raw_name.trim();
        let (name, addition) = match trimmed.strip_prefix('-') {
            Some(removed) => (removed.trim(), false),
            None => (trimmed, true),
        };
        if name.is_empty() {
            return Err(format!("tag `{}` has an empty name", raw_name));
        }

        Ok(Tag {
            name: name.to_string(),
            addition,
            condition,
        })
    }
}

impl RawFile {
    fn into_file(self) -> File {
        match self {
            RawFile::Plain(name) => File::new(name),
            RawFile::Detailed {
                name,
                display,
                condition,
            } => File {
                name,
                display,
                condition,
            },
        }
    }
}

impl RawLocation {
    fn into_location(self) -> Location {
        match self {
            RawLocation::Plain(link) => Location { link, name: None },
            RawLocation::Detailed { link, name } => Location { link, name },
        }
    }
}

impl RawMessage {
    fn into_message(self) -> Result<Message, String> {
        let content = self.content.into_contents(&self.subs)?;
        Ok(Message {
            message_type: self.message_type,
            content,
            condition: self.condition,
        })
    }
}

impl RawContent {
    fn into_contents(self, subs: &[String]) -> Result<Vec<MessageContent>, String> {
        let contents = match self {
            RawContent::Text(text) => vec![MessageContent::english(text)],
            RawContent::Localized(items) => items
                .into_iter()
                .map(|item| MessageContent::new(item.text, item.lang))
                .collect(),
        };

        if contents.is_empty() {
            return Err("content is empty".to_string());
        }
        // 多语言内容必须包含默认语言文本
        if contents.len() > 1
            && !contents
                .iter()
                .any(|c| c.language.eq_ignore_ascii_case(DEFAULT_LANGUAGE))
        {
            return Err(format!(
                "multilingual content has no `{}` text",
                DEFAULT_LANGUAGE
            ));
        }

        contents
            .into_iter()
            .map(|c| {
                Ok(MessageContent {
                    text: substitute(&c.text, subs)?,
                    language: c.language,
                })
            })
            .collect()
    }

    fn from_contents(contents: &[MessageContent]) -> Self {
        match contents {
            [only] if only.language.eq_ignore_ascii_case(DEFAULT_LANGUAGE) => {
                RawContent::Text(only.text.clone())
            }
            _ => RawContent::Localized(
                contents
                    .iter()
                    .map(|c| RawLocalizedText {
                        lang: c.language.clone(),
                        text: c.text.clone(),
                    })
                    .collect(),
            ),
        }
    }
}

/// 应用位置替换；未提供 subs 时保留原文
fn substitute(text: &str, subs: &[String]) -> Result<String, String> {
    if subs.is_empty() {
        return Ok(text.to_string());
    }

    let mut missing = None;
    let replaced = SUBSTITUTION_PLACEHOLDER.replace_all(text, |caps: &Captures| {
        let idx = caps[1].parse::<usize>().ok();
        match idx.and_then(|i| subs.get(i)) {
            Some(sub) => sub.clone(),
            None => {
                missing.get_or_insert_with(|| caps[0].to_string());
                caps[0].to_string()
            }
        }
    });

    match missing {
        Some(placeholder) => Err(format!(
            "placeholder {} has no substitution ({} given)",
            placeholder,
            subs.len()
        )),
        None => Ok(replaced.into_owned()),
    }
}

impl RawCleaning {
    fn into_cleaning_data(self) -> Result<CleaningData, String> {
        let crc = self.crc.to_u32()?;
        if self.util.trim().is_empty() {
            return Err(format!("record 0x{:08X} has an empty `util`", crc));
        }
        let detail = match self.detail {
            Some(content) => content.into_contents(&[])?,
            None => Vec::new(),
        };

        Ok(CleaningData {
            crc,
            utility: self.util,
            itm_count: self.itm.unwrap_or(0),
            deleted_reference_count: self.udr.unwrap_or(0),
            deleted_navmesh_count: self.nav.unwrap_or(0),
            detail,
        })
    }
}

impl RawCrc {
    fn to_u32(&self) -> Result<u32, String> {
        match self {
            RawCrc::Number(value) => {
                u32::try_from(*value).map_err(|_| format!("crc {} does not fit in 32 bits", value))
            }
            RawCrc::Hex(text) => {
                let trimmed = text.trim();
                let digits = trimmed
                    .strip_prefix("0x")
                    .or_else(|| trimmed.strip_prefix("0X"))
                    .unwrap_or(trimmed);
                u32::from_str_radix(digits, 16).map_err(|_| format!("crc `{}` is not a 32-bit hex value", text))
            }
        }
    }
}

// ======== 数据模型 -> 原始结构（精简列表输出） ========

impl RawPluginEntry {
    /// 仅保留标签与 dirty 记录
    pub fn minimal(name: &str, tags: &[Tag], dirty_info: &[CleaningData]) -> Self {
        Self {
            name: name.to_string(),
            tag: tags.iter().map(RawTag::from_tag).collect(),
            dirty: dirty_info.iter().map(RawCleaning::from_cleaning_data).collect(),
            ..Self::default()
        }
    }
}

impl RawTag {
    fn from_tag(tag: &Tag) -> Self {
        let name = if tag.addition {
            tag.name.clone()
        } else {
            format!("-{}", tag.name)
        };
        match &tag.condition {
            Some(condition) => RawTag::Detailed {
                name,
                condition: Some(condition.clone()),
            },
            None => RawTag::Plain(name),
        }
    }
}

impl RawCleaning {
    fn from_cleaning_data(data: &CleaningData) -> Self {
        let nonzero = |count: u32| (count > 0).then_some(count);
        Self {
            crc: RawCrc::Hex(format!("0x{:08X}", data.crc)),
            util: data.utility.clone(),
            itm: nonzero(data.itm_count),
            udr: nonzero(data.deleted_reference_count),
            nav: nonzero(data.deleted_navmesh_count),
            detail: (!data.detail.is_empty()).then(|| RawContent::from_contents(&data.detail)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Result<RuleList, String> {
        let raw: RawRuleList = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;
        raw.into_rule_list(ListSource::Masterlist)
    }

    #[test]
    fn test_tag_forms() {
        let list = parse(
            r#"
plugins:
  - name: Test.esp
    tag:
      - Relev
      - -C.Water
      - name: Delev
        condition: 'file("Foo.esp")'
      - name: -Names
"#,
        )
        .unwrap();

        let tags = &list.plugins[0].tags;
        assert_eq!(tags[0], Tag::added("Relev"));
        assert_eq!(tags[1], Tag::removed("C.Water"));
        assert_eq!(tags[2].name, "Delev");
        assert!(tags[2].addition);
        assert_eq!(tags[2].condition.as_deref(), Some("file(\"Foo.esp\")"));
        assert_eq!(tags[3], Tag::removed("Names"));
    }

    #[test]
    fn test_message_content_forms_and_subs() {
        let list = parse(
            r#"
globals:
  - type: say
    content: 'Global note'
plugins:
  - name: Test.esp
    msg:
      - type: warn
        content:
          - lang: en
            text: 'Requires {0} and {1}.'
          - lang: de
            text: 'Benötigt {0} und {1}.'
        subs: [ 'A.esp', 'B.esp' ]
"#,
        )
        .unwrap();

        assert_eq!(list.globals[0].content, vec![MessageContent::english("Global note")]);
        let msg = &list.plugins[0].messages[0];
        assert_eq!(msg.message_type, MessageType::Warn);
        assert_eq!(msg.content[0].text, "Requires A.esp and B.esp.");
        assert_eq!(msg.content[1].text, "Benötigt A.esp und B.esp.");
        assert_eq!(msg.content[1].language, "de");
    }

    #[test]
    fn test_text_without_subs_keeps_braces() {
        assert_eq!(substitute("keep {0} as is", &[]).unwrap(), "keep {0} as is");
        assert!(substitute("needs {1}", &["only one".to_string()]).is_err());
    }

    #[test]
    fn test_multilingual_content_requires_english() {
        let err = parse(
            r#"
plugins:
  - name: Test.esp
    msg:
      - type: say
        content:
          - lang: de
            text: 'Hallo'
          - lang: fr
            text: 'Bonjour'
"#,
        )
        .unwrap_err();
        assert!(err.contains("Test.esp"), "{}", err);
    }

    #[test]
    fn test_unknown_message_type_is_rejected() {
        assert!(parse("plugins:\n  - name: A.esp\n    msg:\n      - type: shout\n        content: hi\n").is_err());
    }

    #[test]
    fn test_crc_forms() {
        let list = parse(
            r#"
plugins:
  - name: Test.esp
    dirty:
      - crc: 0x3C7E6A24
        util: TES4Edit v3.1.1
        itm: 4
        udr: 2
      - crc: '1A2B3C4D'
        util: TES4Edit v3.1.1
    clean:
      - crc: 305419896
        util: TES4Edit v3.1.1
"#,
        )
        .unwrap();

        let entry = &list.plugins[0];
        assert_eq!(entry.dirty_info[0].crc, 0x3C7E6A24);
        assert_eq!(entry.dirty_info[0].itm_count, 4);
        assert_eq!(entry.dirty_info[0].deleted_reference_count, 2);
        assert_eq!(entry.dirty_info[1].crc, 0x1A2B3C4D);
        assert_eq!(entry.clean_info[0].crc, 0x12345678);
    }

    #[test]
    fn test_cleaning_record_requires_crc_and_util() {
        assert!(parse("plugins:\n  - name: A.esp\n    dirty:\n      - util: xEdit\n").is_err());
        assert!(parse("plugins:\n  - name: A.esp\n    dirty:\n      - crc: 0x1\n        util: ''\n").is_err());
        assert!(parse("plugins:\n  - name: A.esp\n    dirty:\n      - crc: 'zz'\n        util: xEdit\n").is_err());
    }

    #[test]
    fn test_files_locations_and_group() {
        let list = parse(
            r#"
plugins:
  - name: Test.esp
    group: late
    after: [ 'A.esp', { name: 'B.esp', display: '[B](http://b)' } ]
    req: [ 'Base.esm' ]
    inc: [ { name: 'Bad.esp', condition: 'file("Bad.esp")' } ]
    url: [ 'https://example.com/a', { link: 'https://example.com/b', name: 'Mirror' } ]
"#,
        )
        .unwrap();

        let entry = &list.plugins[0];
        assert_eq!(entry.group.as_deref(), Some("late"));
        assert_eq!(entry.load_after[0], File::new("A.esp"));
        assert_eq!(entry.load_after[1].display_name(), "[B](http://b)");
        assert_eq!(entry.requirements[0].name, "Base.esm");
        assert!(entry.incompatibilities[0].condition.is_some());
        assert_eq!(entry.locations[1].name.as_deref(), Some("Mirror"));
    }

    #[test]
    fn test_minimal_entry_serialization() {
        let mut dirty = CleaningData::new(0xDEADBEEF, "xEdit");
        dirty.itm_count = 3;
        let raw = RawPluginEntry::minimal("A.esp", &[Tag::added("Relev"), Tag::removed("Delev")], &[dirty]);
        let yaml = serde_yaml::to_string(&raw).unwrap();

        assert!(yaml.contains("name: A.esp"));
        assert!(yaml.contains("- Relev"));
        assert!(yaml.contains("-Delev"));
        assert!(yaml.contains("0xDEADBEEF"));
        assert!(yaml.contains("itm: 3"));
        assert!(!yaml.contains("udr"));
        assert!(!yaml.contains("msg"));
    }
}
