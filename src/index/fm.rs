use std::time::Instant;

use bincode::Options;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::alphabet::{Alphabet, DEFAULT_TERMINATOR};
use super::bwt::build_bwt;
use super::first::{cumulative_counts, first_occurrence};
use super::occ::OccTable;
use super::sa::build_sa;
use crate::error::{FmError, Result};

/// 构建参数。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// 文本末尾的终止符，必须唯一
    pub terminator: u8,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self { terminator: DEFAULT_TERMINATOR }
    }
}

/// 不可变的 FM 索引：{后缀数组, Occ 表, C 表, 字母表}。
///
/// 构建后不再修改；只读，可在多个线程间共享并发搜索。
/// 不保存原文本，位置直接取自完整 SA。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matcher {
    alphabet: Alphabet,
    sa: Vec<u32>,
    occ: OccTable,
    /// C[c] = 比较顺序下小于 c 的字符总数
    c: Vec<u32>,
}

/// 搜索结果：SA 区间 [lo, hi) 上的惰性迭代器，按后缀数组顺序给出 0-based 位置。
/// 可 `clone()` 后重新遍历。
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    inner: std::slice::Iter<'a, u32>,
}

impl<'a> Occurrences<'a> {
    fn new(positions: &'a [u32]) -> Self {
        Self { inner: positions.iter() }
    }

    fn empty() -> Self {
        Self::new(&[])
    }
}

impl Iterator for Occurrences<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        self.inner.next().map(|&p| p as usize)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Occurrences<'_> {}

fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

impl Matcher {
    /// 以默认终止符 `$` 构建索引。
    pub fn build(text: &[u8]) -> Result<Self> {
        Self::build_with(text, &BuildOptions::default())
    }

    /// 构建流程：校验并建立字母表 -> 后缀数组 -> BWT -> Occ 表 / C 表。
    pub fn build_with(text: &[u8], opts: &BuildOptions) -> Result<Self> {
        let t0 = Instant::now();
        let alphabet = Alphabet::from_text(text, opts.terminator)?;
        let sigma = alphabet.len();
        let columns = alphabet.encode(text);

        let sa = build_sa(&columns, &alphabet);
        debug!("suffix array: n={} in {:.3?}", sa.len(), t0.elapsed());

        let bwt = build_bwt(&columns, &sa);
        let occ = OccTable::build(&bwt, sigma);
        let c = first_occurrence(&columns, &sa, sigma);
        debug_assert_eq!(c, cumulative_counts(occ.totals(), &alphabet));

        info!("index built: n={} sigma={} in {:.3?}", text.len(), sigma, t0.elapsed());
        Ok(Self { alphabet, sa, occ, c })
    }

    /// 文本长度 n（含终止符）
    #[inline]
    pub fn len(&self) -> usize {
        self.sa.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sa.is_empty()
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn suffix_array(&self) -> &[u32] {
        &self.sa
    }

    pub fn occ(&self) -> &OccTable {
        &self.occ
    }

    pub fn c_table(&self) -> &[u32] {
        &self.c
    }

    /// 反向搜索：从模式末尾开始逐字符用 LF 映射收缩 SA 区间。
    ///
    /// 空模式、含未知字符或终止符的模式、以及区间收缩为空时均返回 None。
    pub fn backward_search(&self, pattern: &[u8]) -> Option<(usize, usize)> {
        if pattern.is_empty() {
            return None;
        }
        let terminator = self.alphabet.terminator();
        let mut lo = 0usize;
        let mut hi = self.sa.len();
        for &s in pattern.iter().rev() {
            if s == terminator {
                return None;
            }
            let col = self.alphabet.column(s)?;
            let base = self.c[col] as usize;
            let nlo = base + self.occ.rank(lo, col) as usize;
            let nhi = base + self.occ.rank(hi, col) as usize;
            if nlo >= nhi {
                return None;
            }
            lo = nlo;
            hi = nhi;
        }
        Some((lo, hi))
    }

    /// 精确匹配的全部起始位置（0-based，SA 顺序）。
    pub fn search(&self, pattern: &[u8]) -> Occurrences<'_> {
        match self.backward_search(pattern) {
            Some((lo, hi)) => Occurrences::new(&self.sa[lo..hi]),
            None => Occurrences::empty(),
        }
    }

    /// 出现次数，无需取出位置
    pub fn count(&self, pattern: &[u8]) -> usize {
        self.backward_search(pattern).map_or(0, |(lo, hi)| hi - lo)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        codec().serialize(self).map_err(FmError::Encode)
    }

    /// 解码并校验；任何结构不一致都返回 [`FmError::CorruptIndex`]。
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let m: Self = codec()
            .deserialize(bytes)
            .map_err(|e| FmError::CorruptIndex(e.to_string()))?;
        m.validate()?;
        Ok(m)
    }

    /// 检查反序列化得到的索引是否满足全部不变式：
    /// SA 为 [0, n) 的排列、Occ 表逐行单列递增、C 表与字符总数一致，
    /// 以及每一行的 LF 映射都指向前一个文本位置。
    pub(crate) fn validate(&self) -> Result<()> {
        let n = self.sa.len();
        if n == 0 {
            return Err(FmError::CorruptIndex("empty suffix array".to_string()));
        }
        if n > u32::MAX as usize {
            return Err(FmError::CorruptIndex(format!("suffix array length {} too large", n)));
        }
        self.alphabet.validate()?;
        let sigma = self.alphabet.len();

        let mut seen = vec![false; n];
        for &p in &self.sa {
            let p = p as usize;
            if p >= n || seen[p] {
                return Err(FmError::CorruptIndex(format!(
                    "suffix array is not a permutation of [0, {})",
                    n
                )));
            }
            seen[p] = true;
        }

        self.occ.validate(n, sigma)?;

        if self.c != cumulative_counts(self.occ.totals(), &self.alphabet) {
            return Err(FmError::CorruptIndex("C table disagrees with symbol totals".to_string()));
        }
        let term = self.alphabet.terminator_column();
        if self.occ.totals()[term] != 1 || self.sa[0] as usize != n - 1 {
            return Err(FmError::CorruptIndex("terminator is not unique and last".to_string()));
        }

        for i in 0..n {
            let col = self
                .occ
                .bumped_column(i)
                .ok_or_else(|| {
                    FmError::CorruptIndex(format!("occ row {} has no increment", i + 1))
                })?;
            let lf = self.c[col] as usize + self.occ.rank(i, col) as usize;
            let prev = (self.sa[i] as usize + n - 1) % n;
            if lf >= n || self.sa[lf] as usize != prev {
                return Err(FmError::CorruptIndex(format!("LF mapping broken at row {}", i)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(m: &Matcher, pat: &[u8]) -> Vec<usize> {
        let mut v: Vec<usize> = m.search(pat).collect();
        v.sort_unstable();
        v
    }

    #[test]
    fn search_mississippi() {
        let m = Matcher::build(b"mississippi$").unwrap();
        assert_eq!(positions(&m, b"i"), vec![1, 4, 7, 10]);
        assert_eq!(positions(&m, b"ss"), vec![2, 5]);
        assert_eq!(positions(&m, b"issi"), vec![1, 4]);
        assert_eq!(positions(&m, b"mississippi"), vec![0]);
        assert!(positions(&m, b"z").is_empty());
        assert!(positions(&m, b"").is_empty());
        assert!(positions(&m, b"ssm").is_empty());
    }

    #[test]
    fn terminator_is_not_searchable() {
        let m = Matcher::build(b"mississippi$").unwrap();
        assert!(m.backward_search(b"$").is_none());
        assert!(m.backward_search(b"i$").is_none());
        assert_eq!(m.count(b"pi"), 1);
    }

    #[test]
    fn search_is_restartable() {
        let m = Matcher::build(b"abaaba$").unwrap();
        let it = m.search(b"ab");
        assert_eq!(it.len(), 2);
        let first: Vec<usize> = it.clone().collect();
        let second: Vec<usize> = it.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn custom_terminator() {
        let opts = BuildOptions { terminator: 0 };
        let m = Matcher::build_with(b"ACGTACGT\0", &opts).unwrap();
        assert_eq!(positions(&m, b"ACG"), vec![0, 4]);
        assert!(Matcher::build_with(b"ACGT$", &opts).is_err());
    }

    #[test]
    fn build_rejects_text_without_terminator() {
        assert!(matches!(Matcher::build(b"mississippi"), Err(FmError::InvalidText(_))));
    }

    #[test]
    fn bytes_round_trip() {
        let m = Matcher::build(b"GATTACAGATTACA$").unwrap();
        let back = Matcher::from_bytes(&m.to_bytes().unwrap()).unwrap();
        assert_eq!(back, m);
        assert_eq!(back.count(b"ATTA"), 2);
    }

    #[test]
    fn from_bytes_rejects_truncated_blob() {
        let m = Matcher::build(b"GATTACA$").unwrap();
        let bytes = m.to_bytes().unwrap();
        let err = Matcher::from_bytes(&bytes[..bytes.len() - 3]).unwrap_err();
        assert!(matches!(err, FmError::CorruptIndex(_)));
    }

    #[test]
    fn from_bytes_rejects_trailing_bytes() {
        let m = Matcher::build(b"GATTACA$").unwrap();
        let mut bytes = m.to_bytes().unwrap();
        bytes.push(0);
        assert!(Matcher::from_bytes(&bytes).is_err());
    }

    #[test]
    fn validate_rejects_non_permutation_sa() {
        let mut m = Matcher::build(b"GATTACA$").unwrap();
        m.sa[3] = m.sa[4];
        let bytes = m.to_bytes().unwrap();
        assert!(matches!(Matcher::from_bytes(&bytes), Err(FmError::CorruptIndex(_))));
    }

    #[test]
    fn validate_rejects_swapped_sa_entries() {
        // 仍是排列，但与 Occ/C 表不一致
        let mut m = Matcher::build(b"GATTACA$").unwrap();
        m.sa.swap(2, 5);
        assert!(m.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_c_table() {
        let mut m = Matcher::build(b"GATTACA$").unwrap();
        let last = m.c.len() - 1;
        m.c[last] += 1;
        assert!(m.validate().is_err());
    }
}
