//! 数据库门面：整合规则存储、各解析器与插件注册表，按游戏实例提供统一查询接口
//!
//! `load_lists` 是唯一的写操作：先在无锁状态下完整解析出新的规则存储，
//! 再在短暂的写锁内整体替换；查询持有的是不可变快照，因此不会看到半加载状态。

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::{GameSettings, GameType};
use crate::error::RslResult;
use crate::plugin::{Plugin, PluginFacts, PluginRegistry};
use crate::resolver::{
    CleanlinessClassifier, MessageResolver, PluginCleanliness, PluginMetadata, PluginTags,
    SimpleMessage, TagResolver, localize_all,
};
use crate::rule::{ListSource, MinimalListWriter, RuleLoader, RuleStore};
use crate::utils::{Diagnostics, LogSink};

/// 插件元数据数据库
#[derive(Debug)]
pub struct Database {
    settings: GameSettings,
    store: RwLock<Arc<RuleStore>>,
    registry: RwLock<PluginRegistry>,
    diagnostics: Diagnostics,
}

impl Database {
    /// 创建数据库（未加载任何规则列表）
    pub fn new(settings: GameSettings) -> Self {
        Self {
            settings,
            store: RwLock::new(Arc::new(RuleStore::default())),
            registry: RwLock::new(PluginRegistry::new()),
            diagnostics: Diagnostics::new(),
        }
    }

    /// 注入诊断回调
    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.diagnostics = Diagnostics::with_sink(sink);
        self
    }

    /// 替换或移除诊断回调
    pub fn set_log_sink(&mut self, sink: Option<Arc<dyn LogSink>>) {
        self.diagnostics = match sink {
            Some(sink) => Diagnostics::with_sink(sink),
            None => Diagnostics::new(),
        };
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn game_type(&self) -> GameType {
        self.settings.game_type
    }

    // ======== 规则列表 ========

    /// 加载 masterlist 与 userlist（空路径表示不提供），全部成功才替换现有存储
    ///
    /// 在多线程环境中，替换通过读写锁完成；同一实例上的并发 `load_lists` 调用以最后完成者为准。
    pub fn load_lists(&self, masterlist_path: impl AsRef<Path>, userlist_path: impl AsRef<Path>) -> RslResult<()> {
        let masterlist_path = masterlist_path.as_ref();
        let userlist_path = userlist_path.as_ref();

        match RuleLoader::load(masterlist_path, userlist_path, &self.diagnostics) {
            Ok(store) => {
                self.swap_store(store);
                Ok(())
            }
            Err(e) => {
                self.diagnostics.error(format_args!("failed to load rule lists, keeping previous state: {}", e));
                Err(e)
            }
        }
    }

    /// 异步加载版本
    #[cfg(feature = "async-io")]
    pub async fn load_lists_async(
        &self,
        masterlist_path: impl AsRef<Path>,
        userlist_path: impl AsRef<Path>,
    ) -> RslResult<()> {
        let store =
            RuleLoader::load_async(masterlist_path.as_ref(), userlist_path.as_ref(), &self.diagnostics)
                .await
                .inspect_err(|e| {
                    self.diagnostics.error(format_args!("failed to load rule lists, keeping previous state: {}", e))
                })?;
        self.swap_store(store);
        Ok(())
    }

    fn swap_store(&self, store: RuleStore) {
        let store = Arc::new(store);
        *self.store.write().unwrap_or_else(PoisonError::into_inner) = store;
        self.diagnostics.info(format_args!("rule lists loaded for {}", self.settings.game_type));
    }

    /// 当前规则存储快照
    pub fn rule_store(&self) -> Arc<RuleStore> {
        Arc::clone(&self.store.read().unwrap_or_else(PoisonError::into_inner))
    }

    // ======== 查询 ========

    pub fn get_plugin_tags(&self, plugin_name: &str) -> PluginTags {
        let store = self.rule_store();
        TagResolver::resolve(&store.entries_for(plugin_name))
    }

    pub fn get_plugin_messages(&self, plugin_name: &str, language: &str) -> RslResult<Vec<SimpleMessage>> {
        let store = self.rule_store();
        MessageResolver::resolve_localized(&store.entries_for(plugin_name), language)
    }

    /// 使用配置中的默认语言
    pub fn get_plugin_messages_default(&self, plugin_name: &str) -> RslResult<Vec<SimpleMessage>> {
        self.get_plugin_messages(plugin_name, &self.settings.default_language)
    }

    pub fn get_plugin_cleanliness(&self, plugin_name: &str) -> PluginCleanliness {
        let store = self.rule_store();
        CleanlinessClassifier::classify_entries(&store.entries_for(plugin_name))
    }

    /// 合并后的完整元数据；两个列表都未提及时返回 None
    pub fn get_plugin_metadata(&self, plugin_name: &str, include_user_metadata: bool) -> Option<PluginMetadata> {
        let store = self.rule_store();
        let entries = store.entries_for(plugin_name);
        let name = entries.iter().next()?.name.clone();

        if include_user_metadata {
            PluginMetadata::from_entries(&name, entries.iter())
        } else {
            PluginMetadata::from_entries(&name, entries.slot(ListSource::Masterlist))
        }
    }

    /// 仅用户列表中的元数据
    pub fn get_plugin_user_metadata(&self, plugin_name: &str) -> Option<PluginMetadata> {
        let store = self.rule_store();
        let slot = store.entries_for(plugin_name).slot(ListSource::Userlist);
        let name = slot.first()?.name.clone();
        PluginMetadata::from_entries(&name, slot)
    }

    pub fn get_general_messages(&self, language: &str) -> RslResult<Vec<SimpleMessage>> {
        let store = self.rule_store();
        localize_all(store.general_messages(), language)
    }

    pub fn get_known_bash_tags(&self) -> Vec<String> {
        self.rule_store().known_bash_tags()
    }

    /// 写出仅含标签与 dirty 记录的精简列表
    pub fn write_minimal_list(&self, output_path: impl AsRef<Path>, overwrite: bool) -> RslResult<()> {
        let store = self.rule_store();
        MinimalListWriter::write(&store, output_path.as_ref(), overwrite, &self.diagnostics)
    }

    // ======== 插件注册表 ========

    pub fn register_plugin(&self, facts: PluginFacts) -> RslResult<()> {
        if facts.is_light_master && !self.settings.game_type.supports_light_plugins() {
            self.diagnostics.warn(format_args!(
                "`{}` is flagged as a light master but {} does not support light plugins",
                facts.name, self.settings.game_type
            ));
        }

        let mut registry = self.registry.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = registry.register(facts)? {
            self.diagnostics.debug(format_args!("replaced plugin record `{}`", previous.name()));
        }
        Ok(())
    }

    /// 批量注册（最后一次写入为准）
    pub fn load_plugins<I>(&self, plugins: I) -> RslResult<()>
    where
        I: IntoIterator<Item = PluginFacts>,
    {
        plugins.into_iter().try_for_each(|facts| self.register_plugin(facts))
    }

    pub fn get_plugin(&self, plugin_name: &str) -> Option<Plugin> {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(plugin_name)
            .cloned()
    }

    pub fn get_loaded_plugins(&self) -> Vec<Plugin> {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .plugins()
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn is_light_master_valid(&self, plugin_name: &str) -> Option<bool> {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_light_master_valid(plugin_name)
    }

    pub fn clear_plugins(&self) {
        self.registry.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

/// 以游戏类型与两个根目录创建数据库（根目录原样保存，不做检查）
pub fn create_database(
    game_type: GameType,
    install_root: impl AsRef<Path>,
    local_root: impl AsRef<Path>,
) -> Database {
    let settings = crate::config::ConfigManager::custom(game_type)
        .install_root(install_root.as_ref())
        .local_root(local_root.as_ref())
        .build();
    Database::new(settings)
}
