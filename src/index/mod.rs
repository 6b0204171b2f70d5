//! FM 索引构建与反向搜索。
//!
//! 构建顺序：[`alphabet`] -> [`sa`] -> [`bwt`] -> [`occ`] / [`first`]，
//! 结果打包为不可变的 [`fm::Matcher`]。

pub mod alphabet;
pub mod bwt;
pub mod file;
pub mod first;
pub mod fm;
pub mod occ;
pub mod sa;

pub use alphabet::{Alphabet, DEFAULT_TERMINATOR};
pub use file::{IndexFile, IndexMeta, NamedMatcher};
pub use fm::{BuildOptions, Matcher, Occurrences};
pub use occ::OccTable;
