use super::alphabet::Alphabet;

/// 首次出现表（C 表）：沿后缀数组顺扫，记录每一列第一次作为后缀首字符出现的位置。
///
/// 所有 sigma 个字符都找到后提前结束。
pub fn first_occurrence(columns: &[u8], sa: &[u32], sigma: usize) -> Vec<u32> {
    let mut c = vec![u32::MAX; sigma];
    let mut found = 0usize;
    for (i, &p) in sa.iter().enumerate() {
        let col = columns[p as usize] as usize;
        if c[col] == u32::MAX {
            c[col] = i as u32;
            found += 1;
            if found == sigma {
                break;
            }
        }
    }
    c
}

/// 按比较顺序累计"比该字符小的字符总数"得到的 C 表，与 [`first_occurrence`] 等价。
/// `totals[c]` 为列 c 在全文中的出现次数。
pub fn cumulative_counts(totals: &[u32], alphabet: &Alphabet) -> Vec<u32> {
    let mut c = vec![0u32; alphabet.len()];
    let mut acc = 0u32;
    for col in alphabet.sorted_columns() {
        c[col] = acc;
        acc += totals[col];
    }
    c
}

/// 统计每一列在编码文本中的出现次数
pub fn symbol_totals(columns: &[u8], sigma: usize) -> Vec<u32> {
    let mut freq = vec![0u32; sigma];
    for &col in columns {
        freq[col as usize] += 1;
    }
    freq
}
