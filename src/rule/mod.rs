//! 规则模块：负责规则列表的解析、分层存储与精简输出
pub mod model;
pub(crate) mod source;
pub mod store;
pub mod loader;
pub mod writer;

// 导出核心接口
pub use self::model::{
    CleaningData, File, ListSource, Location, Message, MessageContent, MessageType, RuleEntry,
    RuleList, Tag,
};
pub use self::loader::RuleLoader;
pub use self::store::{PluginEntries, RuleLayer, RuleStore};
pub use self::writer::MinimalListWriter;
