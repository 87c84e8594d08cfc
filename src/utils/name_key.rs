//! 插件文件名键：大小写不敏感的精确匹配

use std::fmt;

/// 规范化后的插件名键
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NameKey(String);

impl NameKey {
    pub fn new(name: &str) -> Self {
        Self(normalize_name(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NameKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 文件名转小写（完整 Unicode 规则，插件名可能包含非 ASCII 字符）
#[inline]
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
}

/// 两个插件名是否指向同一文件
#[inline]
pub fn names_equal(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || normalize_name(a) == normalize_name(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_exact_match() {
        assert_eq!(NameKey::new("Oblivion.esm"), NameKey::new("OBLIVION.ESM"));
        assert_ne!(NameKey::new("Oblivion.esm"), NameKey::new("Oblivion.es"));
        assert_ne!(NameKey::new("Oblivion.esm"), NameKey::new("Oblivion.esm "));
    }

    #[test]
    fn test_non_ascii_names() {
        assert!(names_equal("Ärger.esp", "ärger.ESP"));
        assert!(!names_equal("Ärger.esp", "Arger.esp"));
    }
}
