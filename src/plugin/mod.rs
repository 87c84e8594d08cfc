//! 插件模块：会话内插件事实的注册与查询
pub mod registry;

pub use self::registry::{Plugin, PluginFacts, PluginRegistry};
