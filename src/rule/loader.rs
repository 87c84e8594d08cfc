//! 规则加载管理器
//! 负责读取并解析 masterlist / userlist 文件，全部成功后才产出新的规则存储

use std::path::{Path, PathBuf};

use serde_yaml::Value;

use super::model::{ListSource, RuleList};
use super::source::RawRuleList;
use super::store::{RuleLayer, RuleStore};
use crate::error::{RslResult, RslootError};
use crate::utils::Diagnostics;

/// 规则加载管理器
pub struct RuleLoader;

impl RuleLoader {
    /// 同步加载两个列表；空路径表示未提供该列表
    pub fn load(
        masterlist_path: &Path,
        userlist_path: &Path,
        diagnostics: &Diagnostics,
    ) -> RslResult<RuleStore> {
        let masterlist = Self::load_layer(ListSource::Masterlist, masterlist_path, diagnostics)?;
        let userlist = Self::load_layer(ListSource::Userlist, userlist_path, diagnostics)?;
        Ok(RuleStore::new(masterlist, userlist))
    }

    /// 异步加载（tokio 文件读取），解析逻辑与同步版本一致
    #[cfg(feature = "async-io")]
    pub async fn load_async(
        masterlist_path: &Path,
        userlist_path: &Path,
        diagnostics: &Diagnostics,
    ) -> RslResult<RuleStore> {
        let masterlist_text = Self::read_async(masterlist_path).await?;
        let userlist_text = Self::read_async(userlist_path).await?;

        let masterlist =
            Self::build_layer(ListSource::Masterlist, masterlist_path, masterlist_text, diagnostics)?;
        let userlist =
            Self::build_layer(ListSource::Userlist, userlist_path, userlist_text, diagnostics)?;
        Ok(RuleStore::new(masterlist, userlist))
    }

    fn load_layer(source: ListSource, path: &Path, diagnostics: &Diagnostics) -> RslResult<RuleLayer> {
        let text = if is_unset(path) {
            None
        } else {
            Some(std::fs::read_to_string(path).map_err(|e| RslootError::file_access(path, e))?)
        };
        Self::build_layer(source, path, text, diagnostics)
    }

    #[cfg(feature = "async-io")]
    async fn read_async(path: &Path) -> RslResult<Option<String>> {
        if is_unset(path) {
            return Ok(None);
        }
        tokio::fs::read_to_string(path)
            .await
            .map(Some)
            .map_err(|e| RslootError::file_access(path, e))
    }

    fn build_layer(
        source: ListSource,
        path: &Path,
        text: Option<String>,
        diagnostics: &Diagnostics,
    ) -> RslResult<RuleLayer> {
        let Some(text) = text else {
            diagnostics.debug(format_args!("no {} given, leaving it empty", source));
            return Ok(RuleLayer::empty(source));
        };

        diagnostics.debug(format_args!("parsing {} `{}`", source, path.display()));
        let list = Self::parse_document(&text, path, source)?;
        let layer = RuleLayer::from_list(source, Some(PathBuf::from(path)), list);

        diagnostics.debug(format_args!(
            "{} loaded: {} plugins, {} entries, {} global messages",
            source,
            layer.plugin_count(),
            layer.entry_count(),
            layer.globals().len()
        ));
        Ok(layer)
    }

    /// 解析规则列表文档（相同字节总是得到相同条目）
    pub fn parse_document(text: &str, path: &Path, source: ListSource) -> RslResult<RuleList> {
        let mut value: Value =
            serde_yaml::from_str(text).map_err(|e| RslootError::parse(path, e.to_string()))?;

        // 空文档视为空列表
        if value.is_null() {
            return Ok(RuleList::default());
        }
        if !value.is_mapping() {
            return Err(RslootError::parse(path, "document root is not a mapping"));
        }

        // 解析锚点合并键（<<）
        value
            .apply_merge()
            .map_err(|e| RslootError::parse(path, e.to_string()))?;

        let raw: RawRuleList =
            serde_yaml::from_value(value).map_err(|e| RslootError::parse(path, e.to_string()))?;
        raw.into_rule_list(source)
            .map_err(|message| RslootError::parse(path, message))
    }
}

fn is_unset(path: &Path) -> bool {
    path.as_os_str().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const MASTERLIST: &str = r#"
bash_tags: [ Relev, Delev ]
common:
  - &dirtyInfo
    util: 'TES4Edit v3.1.1'
    itm: 2
plugins:
  - name: 'A.esp'
    tag: [ Relev ]
    dirty:
      - <<: *dirtyInfo
        crc: 0x11111111
  - name: 'B.esp'
    msg:
      - type: say
        content: 'Hello'
"#;

    #[test]
    fn test_parse_resolves_merge_keys() {
        let list = RuleLoader::parse_document(MASTERLIST, Path::new("masterlist.yaml"), ListSource::Masterlist).unwrap();

        assert_eq!(list.bash_tags, vec!["Relev", "Delev"]);
        assert_eq!(list.plugins.len(), 2);
        let dirty = &list.plugins[0].dirty_info[0];
        assert_eq!(dirty.crc, 0x11111111);
        assert_eq!(dirty.utility, "TES4Edit v3.1.1");
        assert_eq!(dirty.itm_count, 2);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let path = Path::new("masterlist.yaml");
        let first = RuleLoader::parse_document(MASTERLIST, path, ListSource::Masterlist).unwrap();
        let second = RuleLoader::parse_document(MASTERLIST, path, ListSource::Masterlist).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_document_is_empty_list() {
        let list = RuleLoader::parse_document("", Path::new("userlist.yaml"), ListSource::Userlist).unwrap();
        assert_eq!(list, RuleList::default());
    }

    #[test]
    fn test_malformed_documents_are_parse_errors() {
        let path = Path::new("bad.yaml");
        for text in [
            "plugins: [ { name: 'A.esp'",
            "- just\n- a\n- list\n",
            "plugins:\n  - tag: [ Relev ]\n",
            "plugins:\n  - name: ''\n",
        ] {
            let err = RuleLoader::parse_document(text, path, ListSource::Masterlist).unwrap_err();
            assert!(err.is_parse_error(), "{:?} -> {}", text, err);
        }
    }

    #[test]
    fn test_load_with_empty_userlist_path() {
        let dir = TempDir::new().unwrap();
        let masterlist = dir.path().join("masterlist.yaml");
        fs::write(&masterlist, MASTERLIST).unwrap();

        let store = RuleLoader::load(&masterlist, Path::new(""), &Diagnostics::new()).unwrap();
        assert!(store.masterlist().is_loaded());
        assert!(!store.userlist().is_loaded());
        assert_eq!(store.entries_for("a.esp").masterlist.len(), 1);
    }

    #[test]
    fn test_missing_file_is_file_access_error() {
        let dir = TempDir::new().unwrap();
        let err = RuleLoader::load(&dir.path().join("nope.yaml"), Path::new(""), &Diagnostics::new()).unwrap_err();
        assert!(matches!(err, RslootError::FileAccess { .. }));
    }

    #[cfg(feature = "async-io")]
    #[tokio::test]
    async fn test_async_load_matches_sync_load() {
        let dir = TempDir::new().unwrap();
        let masterlist = dir.path().join("masterlist.yaml");
        fs::write(&masterlist, MASTERLIST).unwrap();

        let diagnostics = Diagnostics::new();
        let sync_store = RuleLoader::load(&masterlist, Path::new(""), &diagnostics).unwrap();
        let async_store = RuleLoader::load_async(&masterlist, Path::new(""), &diagnostics).await.unwrap();

        assert_eq!(
            sync_store.entries_for("B.esp").masterlist,
            async_store.entries_for("B.esp").masterlist
        );
    }
}
