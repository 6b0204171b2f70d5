//! # fm-index
//!
//! 基于 FM 索引的精确模式匹配：对参考序列构建一次索引，之后每次查询只与模式长度相关，
//! 不需要扫描原文本。
//!
//! - **索引构建**：基数排序后缀数组 -> BWT -> 稠密 Occ 表 + C 表
//! - **反向搜索**：LF 映射逐字符收缩 SA 区间
//! - **持久化**：bincode 序列化，加载时做完整一致性校验
//!
//! ## 快速示例
//!
//! ```rust
//! use fm_index::Matcher;
//!
//! let m = Matcher::build(b"mississippi$").unwrap();
//! let mut hits: Vec<usize> = m.search(b"ssi").collect();
//! hits.sort_unstable();
//! assert_eq!(hits, vec![2, 5]);
//! assert_eq!(m.search(b"z").count(), 0);
//! ```
//!
//! ## 模块说明
//!
//! - [`index`] — 字母表、后缀数组、BWT、Occ / C 表、Matcher 与索引文件
//! - [`io`] — FASTA / FASTQ 读取
//! - [`report`] — SAM 风格结果输出
//! - [`error`] — 库错误类型

pub mod error;
pub mod index;
pub mod io;
pub mod report;

pub use error::{FmError, Result};
pub use index::{BuildOptions, Matcher, Occurrences};
