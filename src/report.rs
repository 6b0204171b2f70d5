//! simple-sam 输出：每个精确命中一行 `read\tchr\tpos\t<len>M\tpattern`，
//! 位置为 1-based；没有命中的 read 不输出。

use anyhow::Result;
use std::io::Write;

use crate::index::NamedMatcher;
use crate::io::fastq::FastqRecord;

/// 一次精确命中：参考记录下标 + 0-based 起始位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Hit {
    pub record: usize,
    pub pos: usize,
}

/// 在所有参考记录中搜索 read，结果按 (记录, 位置) 排序
pub fn collect_hits(entries: &[NamedMatcher], seq: &[u8]) -> Vec<Hit> {
    let mut hits: Vec<Hit> = entries
        .iter()
        .enumerate()
        .flat_map(|(record, e)| e.matcher.search(seq).map(move |pos| Hit { record, pos }))
        .collect();
    hits.sort_unstable();
    hits
}

pub fn write_read<W: Write>(
    out: &mut W,
    read: &FastqRecord,
    hits: &[Hit],
    entries: &[NamedMatcher],
) -> Result<()> {
    let seq = String::from_utf8_lossy(&read.seq);
    for h in hits {
        writeln!(
            out,
            "{}\t{}\t{}\t{}M\t{}",
            read.name,
            entries[h.record].name,
            h.pos + 1, // 1-based
            read.seq.len(),
            seq,
        )?;
    }
    Ok(())
}
