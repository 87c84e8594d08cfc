//! 全局错误类型定义

use std::io::Error as IoError;
use std::path::PathBuf;

use serde_yaml::Error as SerdeYamlError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RslootError {
    // 规则列表相关错误
    #[error("rule list `{path}` could not be read: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: IoError,
    },
    #[error("rule list `{path}` is malformed: {message}")]
    Parse { path: PathBuf, message: String },

    // 消息本地化错误（请求语言与默认语言文本均缺失）
    #[error("message has no text for language `{language}` or the default language")]
    Localization { language: String },

    // 序列化错误
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] SerdeYamlError),

    // 基础错误
    #[error("I/O failed: {0}")]
    Io(#[from] IoError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl RslootError {
    /// 构造解析错误
    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// 构造文件访问错误
    pub(crate) fn file_access(path: impl Into<PathBuf>, source: IoError) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// 是否为规则列表解析失败
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

// 全局Result类型
pub type RslResult<T> = Result<T, RslootError>;
