//! 游戏实例配置：游戏类型与两个文件系统根目录
//! 根目录仅作为不透明路径保存，核心从不打开或遍历它们

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RslootError;

/// 默认消息语言
pub const DEFAULT_LANGUAGE: &str = "en";

/// 支持的游戏类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Tes4,
    Tes5,
    Tes5se,
    Tes5vr,
    Fo3,
    Fonv,
    Fo4,
    Fo4vr,
}

impl GameType {
    pub const ALL: [GameType; 8] = [
        GameType::Tes4,
        GameType::Tes5,
        GameType::Tes5se,
        GameType::Tes5vr,
        GameType::Fo3,
        GameType::Fonv,
        GameType::Fo4,
        GameType::Fo4vr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Tes4 => "tes4",
            GameType::Tes5 => "tes5",
            GameType::Tes5se => "tes5se",
            GameType::Tes5vr => "tes5vr",
            GameType::Fo3 => "fo3",
            GameType::Fonv => "fonv",
            GameType::Fo4 => "fo4",
            GameType::Fo4vr => "fo4vr",
        }
    }

    /// 该游戏是否支持轻量主插件（light master）
    pub fn supports_light_plugins(&self) -> bool {
        matches!(
            self,
            GameType::Tes5se | GameType::Tes5vr | GameType::Fo4 | GameType::Fo4vr
        )
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameType {
    type Err = RslootError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        GameType::ALL
            .into_iter()
            .find(|game| game.as_str() == lowered)
            .ok_or_else(|| RslootError::InvalidInput(format!("unknown game type `{}`", s)))
    }
}

/// 单个游戏安装实例的配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    pub game_type: GameType,
    // 安装数据根目录
    pub install_root: PathBuf,
    // 用户可写的本地数据根目录
    pub local_root: PathBuf,
    // 无显式语言参数时使用的消息语言
    pub default_language: String,
}

impl GameSettings {
    pub fn new(game_type: GameType) -> Self {
        Self {
            game_type,
            install_root: PathBuf::new(),
            local_root: PathBuf::new(),
            default_language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    pub fn local_root(&self) -> &Path {
        &self.local_root
    }
}

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 获取指定游戏的默认配置
    pub fn get_default(game_type: GameType) -> GameSettings {
        GameSettings::new(game_type)
    }

    /// 自定义配置
    pub fn custom(game_type: GameType) -> GameSettingsBuilder {
        GameSettingsBuilder::new(game_type)
    }
}

/// 配置构建器
#[derive(Debug, Clone)]
pub struct GameSettingsBuilder {
    settings: GameSettings,
}

impl GameSettingsBuilder {
    pub fn new(game_type: GameType) -> Self {
        Self {
            settings: GameSettings::new(game_type),
        }
    }

    pub fn install_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings.install_root = path.into();
        self
    }

    pub fn local_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings.local_root = path.into();
        self
    }

    pub fn default_language(mut self, language: impl Into<String>) -> Self {
        self.settings.default_language = language.into();
        self
    }

    pub fn build(self) -> GameSettings {
        self.settings
    }
}
