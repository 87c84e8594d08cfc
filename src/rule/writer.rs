//! 精简列表输出
//! 仅写出主列表中带标签建议或 dirty 记录的插件，输出本身是合法的规则列表

use std::io::{Error as IoError, ErrorKind};
use std::path::Path;

use super::source::{RawPluginEntry, RawRuleList};
use super::store::RuleStore;
use crate::error::{RslResult, RslootError};
use crate::resolver::PluginMetadata;
use crate::utils::Diagnostics;

/// 精简列表写出器
pub struct MinimalListWriter;

impl MinimalListWriter {
    /// 生成精简列表文档文本
    pub fn render(store: &RuleStore) -> RslResult<String> {
        let plugins: Vec<RawPluginEntry> = store
            .masterlist()
            .plugin_slots()
            .filter_map(|slot| {
                let name = slot.first()?.name.clone();
                PluginMetadata::from_entries(&name, slot.iter())
            })
            .filter(|metadata| !metadata.tags.is_empty() || !metadata.dirty_info.is_empty())
            .map(|metadata| RawPluginEntry::minimal(&metadata.name, &metadata.tags, &metadata.dirty_info))
            .collect();

        let document = RawRuleList {
            plugins,
            ..RawRuleList::default()
        };
        Ok(serde_yaml::to_string(&document)?)
    }

    /// 写出到文件；目标已存在且未允许覆盖时失败
    pub fn write(store: &RuleStore, path: &Path, overwrite: bool, diagnostics: &Diagnostics) -> RslResult<()> {
        if path.exists() && !overwrite {
            return Err(RslootError::file_access(
                path,
                IoError::new(ErrorKind::AlreadyExists, "output file exists and overwrite was not requested"),
            ));
        }

        let text = Self::render(store)?;
        std::fs::write(path, text).map_err(|e| RslootError::file_access(path, e))?;
        diagnostics.info(format_args!("minimal list written to `{}`", path.display()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::loader::RuleLoader;
    use crate::rule::model::ListSource;
    use tempfile::TempDir;

    const MASTERLIST: &str = r#"
plugins:
  - name: 'Tagged.esp'
    tag: [ Relev, -Delev ]
    msg:
      - type: say
        content: 'dropped from the minimal list'
  - name: 'Dirty.esp'
    dirty:
      - crc: 0x0000ABCD
        util: 'TES4Edit v3.1.1'
        udr: 7
  - name: 'MessageOnly.esp'
    msg:
      - type: warn
        content: 'not written'
  - name: 'tagged.ESP'
    tag: [ Names ]
"#;

    fn store() -> RuleStore {
        let list = RuleLoader::parse_document(MASTERLIST, Path::new("masterlist.yaml"), ListSource::Masterlist).unwrap();
        RuleStore::from_lists(list, None)
    }

    #[test]
    fn test_render_keeps_only_tags_and_dirty_info() {
        let text = MinimalListWriter::render(&store()).unwrap();
        let reparsed = RuleLoader::parse_document(&text, Path::new("minimal.yaml"), ListSource::Masterlist).unwrap();

        let names: Vec<_> = reparsed.plugins.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Tagged.esp", "Dirty.esp"]);

        let tagged = &reparsed.plugins[0];
        assert!(tagged.messages.is_empty());
        let tag_names: Vec<_> = tagged.tags.iter().map(|t| (t.name.as_str(), t.addition)).collect();
        assert_eq!(tag_names, vec![("Relev", true), ("Delev", false), ("Names", true)]);

        let dirty = &reparsed.plugins[1].dirty_info[0];
        assert_eq!(dirty.crc, 0xABCD);
        assert_eq!(dirty.deleted_reference_count, 7);
    }

    #[test]
    fn test_write_respects_overwrite_flag() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("minimal.yaml");
        let store = store();
        let diagnostics = Diagnostics::new();

        MinimalListWriter::write(&store, &path, false, &diagnostics).unwrap();
        let err = MinimalListWriter::write(&store, &path, false, &diagnostics).unwrap_err();
        assert!(matches!(err, RslootError::FileAccess { .. }));
        MinimalListWriter::write(&store, &path, true, &diagnostics).unwrap();
    }
}
