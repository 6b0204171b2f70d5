//! 演示如何在 library 模式下构建索引并做精确匹配。
//!
//! 运行方式：
//! ```bash
//! cargo run --example exact_search
//! ```

use fm_index::Matcher;

fn main() -> fm_index::Result<()> {
    let reference = b"ACGTACGTAGCTGATCGTAGCTAGCTAGCTGATCGTAGCTAGCTAGCTGAT$";
    println!("参考长度: {} bp", reference.len() - 1);

    let m = Matcher::build(reference)?;
    println!("字母表大小: {}", m.alphabet().len());

    for pattern in [&b"GCTGATC"[..], &b"TAGC"[..], &b"AAAA"[..], &b"ACGN"[..]] {
        let mut hits: Vec<usize> = m.search(pattern).collect();
        hits.sort_unstable();
        println!("'{}': {} 处 {:?}", String::from_utf8_lossy(pattern), hits.len(), hits);
    }

    // 序列化后再恢复，搜索结果不变
    let restored = Matcher::from_bytes(&m.to_bytes()?)?;
    assert_eq!(restored.count(b"TAGC"), m.count(b"TAGC"));
    Ok(())
}
