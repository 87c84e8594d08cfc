//! 解析模块：基于规则存储中的合并条目计算标签、消息、清洁度与完整元数据
pub mod tags;
pub mod messages;
pub mod cleanliness;
pub mod metadata;

// 导出核心接口
pub use self::cleanliness::{CleanlinessClassifier, PluginCleanliness, classify, is_do_not_clean};
pub use self::messages::{MessageResolver, SimpleMessage, localize, localize_all};
pub use self::metadata::PluginMetadata;
pub use self::tags::{PluginTags, TagResolver};
