use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use bincode::Options;
use serde::{Deserialize, Serialize};

use super::fm::Matcher;
use crate::error::{FmError, Result};

/// 索引构建信息，仅用于追溯，不影响搜索。
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct IndexMeta {
    pub reference_file: Option<String>,
    pub build_args: Option<String>,
    pub build_timestamp: Option<String>,
    pub terminator: u8,
}

/// 参考序列中的一条记录及其索引
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NamedMatcher {
    pub name: String,
    pub matcher: Matcher,
}

impl NamedMatcher {
    /// 记录长度（不含终止符）
    pub fn seq_len(&self) -> usize {
        self.matcher.len() - 1
    }
}

/// 磁盘上的 `.fm` 文件：多条记录的索引 + 元信息。
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct IndexFile {
    pub meta: IndexMeta,
    pub entries: Vec<NamedMatcher>,
}

fn codec() -> impl Options {
    bincode::DefaultOptions::new().with_fixint_encoding()
}

impl IndexFile {
    pub fn new(meta: IndexMeta) -> Self {
        Self { meta, entries: Vec::new() }
    }

    pub fn push(&mut self, name: String, matcher: Matcher) {
        self.entries.push(NamedMatcher { name, matcher });
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut w = BufWriter::new(std::fs::File::create(path)?);
        codec().serialize_into(&mut w, self).map_err(FmError::Encode)?;
        w.flush()?;
        Ok(())
    }

    /// 读取并逐条校验索引。
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let f = std::fs::File::open(path)?;
        let idx: Self = codec()
            .deserialize_from(BufReader::new(f))
            .map_err(|e| FmError::CorruptIndex(e.to_string()))?;
        for entry in &idx.entries {
            entry.matcher.validate().map_err(|e| match e {
                FmError::CorruptIndex(msg) => {
                    FmError::CorruptIndex(format!("record '{}': {}", entry.name, msg))
                }
                other => other,
            })?;
            if entry.matcher.alphabet().terminator() != idx.meta.terminator {
                return Err(FmError::CorruptIndex(format!(
                    "record '{}' uses a different terminator than the index",
                    entry.name
                )));
            }
        }
        Ok(idx)
    }
}
