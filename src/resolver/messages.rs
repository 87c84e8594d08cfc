//! 消息解析：按来源顺序拼接消息并本地化

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_LANGUAGE;
use crate::error::{RslResult, RslootError};
use crate::rule::{Message, MessageContent, MessageType, PluginEntries};

/// 已本地化的单语言消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub language: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

/// 消息解析器
pub struct MessageResolver;

impl MessageResolver {
    /// 主列表条目在前（文件内顺序），用户列表条目在后；不去重
    pub fn resolve<'a>(entries: &PluginEntries<'a>) -> Vec<&'a Message> {
        entries.iter().flat_map(|entry| entry.messages.iter()).collect()
    }

    /// 解析并本地化
    pub fn resolve_localized(entries: &PluginEntries<'_>, language: &str) -> RslResult<Vec<SimpleMessage>> {
        localize_all(Self::resolve(entries), language)
    }
}

/// 选择指定语言文本，缺失时回退默认语言；两者皆无时报本地化错误
pub fn localize(message: &Message, language: &str) -> RslResult<SimpleMessage> {
    let content = MessageContent::choose(&message.content, language).ok_or_else(|| {
        RslootError::Localization {
            language: language.to_string(),
        }
    })?;

    Ok(SimpleMessage {
        message_type: message.message_type,
        language: content.language.clone(),
        text: content.text.clone(),
        condition: message.condition.clone(),
    })
}

pub fn localize_all<'a, I>(messages: I, language: &str) -> RslResult<Vec<SimpleMessage>>
where
    I: IntoIterator<Item = &'a Message>,
{
    messages.into_iter().map(|m| localize(m, language)).collect()
}

/// 默认语言的文本（用于标记检测等内部判断）
pub(crate) fn default_text(contents: &[MessageContent]) -> Option<&str> {
    MessageContent::choose(contents, DEFAULT_LANGUAGE).map(|c| c.text.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{ListSource, RuleEntry, RuleList, RuleStore};

    fn say(text: &str) -> Message {
        Message::new(MessageType::Say, vec![MessageContent::english(text)])
    }

    fn entry(name: &str, messages: Vec<Message>) -> RuleEntry {
        let mut entry = RuleEntry::new(name, ListSource::Masterlist);
        entry.messages = messages;
        entry
    }

    #[test]
    fn test_concatenates_in_source_order_without_dedup() {
        let masterlist = RuleList {
            plugins: vec![
                entry("A.esp", vec![say("first"), say("same")]),
                entry("A.esp", vec![say("second")]),
            ],
            ..RuleList::default()
        };
        let userlist = RuleList {
            plugins: vec![entry("A.esp", vec![say("same")])],
            ..RuleList::default()
        };
        let store = RuleStore::from_lists(masterlist, Some(userlist));
        let messages = MessageResolver::resolve_localized(&store.entries_for("A.esp"), "en").unwrap();

        let texts: Vec<_> = messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "same", "second", "same"]);
    }

    #[test]
    fn test_unknown_plugin_has_no_messages() {
        let store = RuleStore::default();
        assert!(MessageResolver::resolve_localized(&store.entries_for("x.esp"), "en").unwrap().is_empty());
    }

    #[test]
    fn test_localize_prefers_requested_language() {
        let mut message = Message::new(
            MessageType::Warn,
            vec![MessageContent::english("Hello"), MessageContent::new("Hallo", "de")],
        );
        message.condition = Some("file(\"A.esp\")".to_string());

        let german = localize(&message, "de").unwrap();
        assert_eq!(german.text, "Hallo");
        assert_eq!(german.language, "de");
        assert_eq!(german.message_type, MessageType::Warn);
        assert_eq!(german.condition.as_deref(), Some("file(\"A.esp\")"));

        let french = localize(&message, "fr").unwrap();
        assert_eq!(french.text, "Hello");
        assert_eq!(french.language, "en");
    }

    #[test]
    fn test_localize_without_default_text_fails() {
        let message = Message::new(MessageType::Say, vec![MessageContent::new("Hallo", "de")]);
        let err = localize(&message, "ja").unwrap_err();
        assert!(matches!(err, RslootError::Localization { ref language } if language == "ja"));
    }
}
