//! 通用工具：诊断输出、插件名键、版本信息
pub mod log_sink;
pub mod name_key;
pub mod version;

pub use self::log_sink::{Diagnostics, LogLevel, LogSink};
pub use self::name_key::{NameKey, names_equal, normalize_name};
pub use self::version::{Version, WrapperVersion, is_compatible};
