//! rsloot - 游戏插件元数据库
//!
//! 读取 masterlist / userlist 规则列表，合并后回答单个插件的标签建议、本地化消息与清洁度等查询。

// 导出全局错误类型
pub use self::error::{RslResult, RslootError};

// 导出配置模块
pub use self::config::{ConfigManager, GameSettings, GameSettingsBuilder, GameType};

// 导出规则模块核心接口
pub use self::rule::{
    CleaningData, File, ListSource, Location, Message, MessageContent, MessageType, RuleEntry,
    RuleList, RuleLoader, RuleStore, Tag, MinimalListWriter,
};

// 导出解析模块核心接口
pub use self::resolver::{
    PluginCleanliness, PluginMetadata, PluginTags, SimpleMessage, localize,
};

// 导出插件注册表
pub use self::plugin::{Plugin, PluginFacts};

// 导出工具模块核心接口
pub use self::utils::{LogLevel, LogSink, Version, WrapperVersion, is_compatible};

// 导出数据库门面
pub use self::database::{Database, create_database};

// 声明所有子模块
pub mod config;
pub mod error;
pub mod rule;
pub mod resolver;
pub mod plugin;
pub mod utils;
pub mod database;
