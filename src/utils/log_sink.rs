//! 诊断输出能力
//! 日志回调在构造时注入，而非全局可变状态；未注册回调时所有输出均为空操作

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Fatal => "fatal",
        };
        f.write_str(name)
    }
}

/// 诊断接收端
pub trait LogSink: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);
}

impl<F> LogSink for F
where
    F: Fn(LogLevel, &str) + Send + Sync,
{
    fn log(&self, level: LogLevel, message: &str) {
        self(level, message)
    }
}

/// 诊断分发器：同时转发到注入的接收端与 tracing
#[derive(Clone, Default)]
pub struct Diagnostics {
    sink: Option<Arc<dyn LogSink>>,
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("sink", &self.sink.as_ref().map(|_| "<sink>"))
            .finish()
    }
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(sink: Arc<dyn LogSink>) -> Self {
        Self { sink: Some(sink) }
    }

    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    pub fn log(&self, level: LogLevel, message: impl fmt::Display) {
        if self.sink.is_none() && !cfg!(feature = "logging") {
            return;
        }
        let message = message.to_string();

        #[cfg(feature = "logging")]
        match level {
            LogLevel::Trace => tracing::trace!("{}", message),
            LogLevel::Debug => tracing::debug!("{}", message),
            LogLevel::Info => tracing::info!("{}", message),
            LogLevel::Warning => tracing::warn!("{}", message),
            LogLevel::Error | LogLevel::Fatal => tracing::error!("{}", message),
        }

        if let Some(sink) = &self.sink {
            sink.log(level, &message);
        }
    }

    pub fn trace(&self, message: impl fmt::Display) {
        self.log(LogLevel::Trace, message)
    }

    pub fn debug(&self, message: impl fmt::Display) {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: impl fmt::Display) {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: impl fmt::Display) {
        self.log(LogLevel::Warning, message)
    }

    pub fn error(&self, message: impl fmt::Display) {
        self.log(LogLevel::Error, message)
    }
}
