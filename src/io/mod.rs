//! 简单 FASTA / FASTQ 读取，只负责提供序列名和原始序列。

pub mod fasta;
pub mod fastq;
