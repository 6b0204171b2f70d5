use serde::{Deserialize, Serialize};

use crate::error::{FmError, Result};

/// 默认终止符。
pub const DEFAULT_TERMINATOR: u8 = b'$';

/// 字母表：把文本中出现的每个字节映射到稠密的列号 [0, sigma)。
///
/// 列号按字符在文本中首次出现的顺序分配，与比较顺序无关；
/// 比较顺序单独记录在 `order` 中：终止符最小，其余按字节值排序。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alphabet {
    terminator: u8,
    /// 列号 -> 字符
    symbols: Vec<u8>,
    /// 字节值 -> 列号，长度固定为 256
    lookup: Vec<Option<u8>>,
    /// 按比较顺序排列的列号（终止符在最前）
    order: Vec<u8>,
}

impl Alphabet {
    /// 校验终止符并为文本建立字母表。
    ///
    /// 终止符必须恰好出现一次且位于文本末尾。
    pub fn from_text(text: &[u8], terminator: u8) -> Result<Self> {
        let n = text.len();
        if n > u32::MAX as usize {
            return Err(FmError::InvalidText(format!(
                "text length {} exceeds the supported maximum {}",
                n,
                u32::MAX
            )));
        }
        match text.iter().position(|&b| b == terminator) {
            None => {
                return Err(FmError::InvalidText(format!(
                    "terminator '{}' not found",
                    terminator.escape_ascii()
                )))
            }
            Some(p) if p + 1 != n => {
                let dup = text[p + 1..].contains(&terminator);
                let what = if dup {
                    "appears more than once"
                } else {
                    "is not the last symbol"
                };
                return Err(FmError::InvalidText(format!(
                    "terminator '{}' {} (first seen at {})",
                    terminator.escape_ascii(),
                    what,
                    p
                )));
            }
            Some(_) => {}
        }

        let mut lookup: Vec<Option<u8>> = vec![None; 256];
        let mut symbols = Vec::new();
        for &b in text {
            if lookup[b as usize].is_none() {
                lookup[b as usize] = Some(symbols.len() as u8);
                symbols.push(b);
            }
        }
        Ok(Self::assemble(terminator, symbols, lookup))
    }

    fn assemble(terminator: u8, symbols: Vec<u8>, lookup: Vec<Option<u8>>) -> Self {
        let mut order: Vec<u8> = (0..symbols.len()).map(|c| c as u8).collect();
        order.sort_by_key(|&c| {
            let s = symbols[c as usize];
            (s != terminator, s)
        });
        Self { terminator, symbols, lookup, order }
    }

    #[inline]
    pub fn terminator(&self) -> u8 {
        self.terminator
    }

    /// 字母表大小 sigma（含终止符）
    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// 字符对应的列号；不在字母表中时返回 None
    #[inline]
    pub fn column(&self, symbol: u8) -> Option<usize> {
        self.lookup[symbol as usize].map(usize::from)
    }

    #[inline]
    pub fn symbol(&self, column: usize) -> u8 {
        self.symbols[column]
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// 终止符所在列
    pub fn terminator_column(&self) -> usize {
        self.order[0] as usize
    }

    /// 按比较顺序排列的列号
    pub fn sorted_columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.order.iter().map(|&c| c as usize)
    }

    /// 把已校验的文本转换为列号序列。
    /// 文本中的每个字节都必须属于本字母表。
    pub fn encode(&self, text: &[u8]) -> Vec<u8> {
        text.iter()
            .map(|&b| self.lookup[b as usize].unwrap_or(u8::MAX))
            .collect()
    }

    /// 反序列化后的结构检查。
    pub(crate) fn validate(&self) -> Result<()> {
        let corrupt = |msg: String| Err(FmError::CorruptIndex(msg));
        if self.lookup.len() != 256 {
            return corrupt(format!(
                "alphabet lookup has {} entries, expected 256",
                self.lookup.len()
            ));
        }
        if self.symbols.is_empty() || self.symbols.len() > 256 {
            return corrupt(format!("alphabet size {} out of range", self.symbols.len()));
        }
        for (c, &s) in self.symbols.iter().enumerate() {
            if self.lookup[s as usize] != Some(c as u8) {
                return corrupt(format!(
                    "symbol '{}' does not map back to column {}",
                    s.escape_ascii(),
                    c
                ));
            }
        }
        let mapped = self.lookup.iter().filter(|e| e.is_some()).count();
        if mapped != self.symbols.len() {
            return corrupt(format!(
                "alphabet lookup maps {} bytes for {} symbols",
                mapped,
                self.symbols.len()
            ));
        }
        if self.lookup[self.terminator as usize].is_none() {
            return corrupt("terminator missing from alphabet".to_string());
        }
        let expected = Self::assemble(self.terminator, self.symbols.clone(), self.lookup.clone());
        if expected.order != self.order {
            return corrupt("alphabet comparison order is inconsistent".to_string());
        }
        Ok(())
    }
}
