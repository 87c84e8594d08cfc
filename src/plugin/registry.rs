//! 插件注册表：保存外部提供的插件事实（文件名、主插件标记、轻量主插件标记及其有效性）
//! 注册表不解析插件二进制格式，所有标记原样透传

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{RslResult, RslootError};
use crate::utils::NameKey;

/// 外部解析得到的插件事实
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginFacts {
    pub name: String,
    #[serde(default)]
    pub is_master: bool,
    #[serde(default)]
    pub is_light_master: bool,
    #[serde(default)]
    pub is_valid_as_light_master: bool,
}

impl PluginFacts {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_master: false,
            is_light_master: false,
            is_valid_as_light_master: false,
        }
    }

    pub fn master(mut self, is_master: bool) -> Self {
        self.is_master = is_master;
        self
    }

    pub fn light_master(mut self, is_light_master: bool) -> Self {
        self.is_light_master = is_light_master;
        self
    }

    pub fn valid_as_light_master(mut self, valid: bool) -> Self {
        self.is_valid_as_light_master = valid;
        self
    }
}

/// 已注册的插件记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plugin {
    facts: PluginFacts,
}

impl Plugin {
    pub fn name(&self) -> &str {
        &self.facts.name
    }

    pub fn is_master(&self) -> bool {
        self.facts.is_master
    }

    pub fn is_light_master(&self) -> bool {
        self.facts.is_light_master
    }

    pub fn is_valid_as_light_master(&self) -> bool {
        self.facts.is_valid_as_light_master
    }

    pub fn facts(&self) -> &PluginFacts {
        &self.facts
    }
}

/// 插件注册表（会话内有效）
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    plugins: HashMap<NameKey, Plugin>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册插件；同名（大小写不敏感）记录以最后一次为准，返回被替换的旧记录
    pub fn register(&mut self, facts: PluginFacts) -> RslResult<Option<Plugin>> {
        if facts.name.trim().is_empty() {
            return Err(RslootError::InvalidInput("plugin name is empty".to_string()));
        }
        let key = NameKey::new(&facts.name);
        Ok(self.plugins.insert(key, Plugin { facts }))
    }

    /// 大小写不敏感查找；未注册时返回 None
    pub fn get(&self, plugin_name: &str) -> Option<&Plugin> {
        self.plugins.get(&NameKey::new(plugin_name))
    }

    pub fn is_light_master_valid(&self, plugin_name: &str) -> Option<bool> {
        self.get(plugin_name).map(Plugin::is_valid_as_light_master)
    }

    /// 按名称排序的全部插件
    pub fn plugins(&self) -> Vec<&Plugin> {
        let mut plugins: Vec<&Plugin> = self.plugins.values().collect();
        plugins.sort_by(|a, b| a.name().to_lowercase().cmp(&b.name().to_lowercase()));
        plugins
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn clear(&mut self) {
        self.plugins.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get_case_insensitive() {
        let mut registry = PluginRegistry::new();
        registry
            .register(PluginFacts::new("Blank.esm").master(true).valid_as_light_master(true))
            .unwrap();

        let plugin = registry.get("BLANK.ESM").unwrap();
        assert_eq!(plugin.name(), "Blank.esm");
        assert!(plugin.is_master());
        assert!(!plugin.is_light_master());
        assert!(plugin.is_valid_as_light_master());
        assert!(registry.get("Blank.esl").is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let mut registry = PluginRegistry::new();
        assert!(registry.register(PluginFacts::new("Blank.esl").light_master(true)).unwrap().is_none());
        let previous = registry
            .register(PluginFacts::new("blank.esl").light_master(false))
            .unwrap()
            .unwrap();

        assert!(previous.is_light_master());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("Blank.esl").unwrap().name(), "blank.esl");
        assert!(!registry.get("Blank.esl").unwrap().is_light_master());
    }

    #[test]
    fn test_light_master_validity_is_pass_through() {
        let mut registry = PluginRegistry::new();
        registry.register(PluginFacts::new("A.esp").valid_as_light_master(false)).unwrap();
        registry.register(PluginFacts::new("B.esp").valid_as_light_master(true)).unwrap();

        assert_eq!(registry.is_light_master_valid("a.esp"), Some(false));
        assert_eq!(registry.is_light_master_valid("b.esp"), Some(true));
        assert_eq!(registry.is_light_master_valid("c.esp"), None);
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let mut registry = PluginRegistry::new();
        assert!(matches!(
            registry.register(PluginFacts::new("  ")),
            Err(RslootError::InvalidInput(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_plugins_sorted_and_clear() {
        let mut registry = PluginRegistry::new();
        for name in ["c.esp", "A.esm", "b.esl"] {
            registry.register(PluginFacts::new(name)).unwrap();
        }
        let names: Vec<_> = registry.plugins().into_iter().map(Plugin::name).collect();
        assert_eq!(names, vec!["A.esm", "b.esl", "c.esp"]);

        registry.clear();
        assert!(registry.is_empty());
    }
}
