//! 版本信息与兼容性检查

/// 元数据接口版本
pub struct Version;

impl Version {
    pub const MAJOR: u32 = 0;
    pub const MINOR: u32 = 15;
    pub const PATCH: u32 = 0;

    pub fn major() -> u32 {
        Self::MAJOR
    }

    pub fn minor() -> u32 {
        Self::MINOR
    }

    pub fn patch() -> u32 {
        Self::PATCH
    }

    /// 构建修订标识（构建时可通过 RSLOOT_REVISION 覆盖）
    pub fn revision() -> &'static str {
        option_env!("RSLOOT_REVISION").unwrap_or("rsloot")
    }

    pub fn string() -> String {
        format!("{}.{}.{}", Self::MAJOR, Self::MINOR, Self::PATCH)
    }
}

/// 本 crate 自身版本
pub struct WrapperVersion;

impl WrapperVersion {
    pub fn major() -> u32 {
        env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or(0)
    }

    pub fn minor() -> u32 {
        env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or(0)
    }

    pub fn patch() -> u32 {
        env!("CARGO_PKG_VERSION_PATCH").parse().unwrap_or(0)
    }

    pub fn revision() -> &'static str {
        concat!("rsloot-", env!("CARGO_PKG_VERSION"))
    }

    pub fn string() -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }
}

/// 请求版本是否与当前元数据接口兼容
///
/// 主版本号大于 0 时要求主版本一致，否则要求次版本一致；
/// 同时请求版本不得高于当前版本（按语义化版本优先级比较）。
///
/// 上游接口只比较主版本（主版本为 0 时比较次版本），因而认为 0.15.1 兼容；
/// 这里额外拒绝比当前更新的补丁版本，0.15.1 返回 false。
pub fn is_compatible(major: u32, minor: u32, patch: u32) -> bool {
    let same_series = if Version::MAJOR > 0 {
        major == Version::MAJOR
    } else {
        major == 0 && minor == Version::MINOR
    };

    same_series && (major, minor, patch) <= (Version::MAJOR, Version::MINOR, Version::PATCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_string() {
        assert_eq!(Version::string(), "0.15.0");
        assert!(!Version::revision().is_empty());
        assert_eq!(WrapperVersion::string(), env!("CARGO_PKG_VERSION"));
        assert_ne!(WrapperVersion::revision(), Version::revision());
    }

    #[test]
    fn test_is_compatible() {
        assert!(!is_compatible(0, 9, 0));
        assert!(is_compatible(0, 15, 0));
        assert!(!is_compatible(1, 15, 0));
        assert!(!is_compatible(0, 16, 0));
        assert!(!is_compatible(0, 15, 1));
    }

    #[test]
    fn test_greater_major_is_never_compatible() {
        for major in (Version::MAJOR + 1)..(Version::MAJOR + 4) {
            for minor in 0..20 {
                assert!(!is_compatible(major, minor, 0));
            }
        }
    }
}
