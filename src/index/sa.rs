use super::alphabet::Alphabet;

/// 构建后缀数组（多轮稳定计数排序，LSD 基数排序）。
///
/// `columns` 为经 [`Alphabet::encode`] 编码的文本（已校验终止符）。
/// 从最深的比较位置 k = n-1 开始逐轮向 0 排序：每一轮按后缀第 k 个字符分桶，
/// 长度不足 k+1 的后缀进入最前面的"短桶"，其余按字母表的比较顺序依次输出，
/// 桶内保持上一轮的相对顺序。第 0 轮结束后即得到完整的字典序。
///
/// 时间 O(n^2)，仅适用于 reads / 小基因组规模的输入。
pub fn build_sa(columns: &[u8], alphabet: &Alphabet) -> Vec<u32> {
    let n = columns.len();
    if n == 0 {
        return Vec::new();
    }
    let order: Vec<usize> = alphabet.sorted_columns().collect();

    let mut suffixes: Vec<u32> = (0..n as u32).collect();
    let mut short: Vec<u32> = Vec::new();
    let mut buckets: Vec<Vec<u32>> = vec![Vec::new(); alphabet.len()];

    for k in (0..n).rev() {
        for &p in &suffixes {
            let i = p as usize + k;
            if i >= n {
                short.push(p);
            } else {
                buckets[columns[i] as usize].push(p);
            }
        }
        suffixes.clear();
        suffixes.append(&mut short);
        for &c in &order {
            suffixes.append(&mut buckets[c]);
        }
    }

    suffixes
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sa_of(text: &[u8]) -> Vec<u32> {
        let alphabet = Alphabet::from_text(text, b'$').unwrap();
        build_sa(&alphabet.encode(text), &alphabet)
    }

    /// 朴素实现：按"终止符最小、其余按字节值"的比较顺序直接排序全部后缀
    fn naive_sa(text: &[u8]) -> Vec<u32> {
        let rank = |b: u8| if b == b'$' { 0u16 } else { b as u16 + 1 };
        let mut suffixes: Vec<(u32, Vec<u16>)> = (0..text.len())
            .map(|i| (i as u32, text[i..].iter().map(|&b| rank(b)).collect()))
            .collect();
        suffixes.sort_by(|a, b| a.1.cmp(&b.1));
        suffixes.into_iter().map(|(i, _)| i).collect()
    }

    fn make_text(len: usize, seed: u32) -> Vec<u8> {
        let bases = [b'A', b'C', b'G', b'T', b'N'];
        let mut x = seed;
        let mut v = Vec::with_capacity(len + 1);
        for _ in 0..len {
            x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            v.push(bases[(x >> 16) as usize % bases.len()]);
        }
        v.push(b'$');
        v
    }

    #[test]
    fn sa_terminator_only() {
        assert_eq!(sa_of(b"$"), vec![0]);
    }

    #[test]
    fn sa_mississippi() {
        assert_eq!(sa_of(b"mississippi$"), vec![11, 10, 7, 4, 1, 0, 9, 8, 6, 3, 5, 2]);
    }

    #[test]
    fn sa_abaaba() {
        assert_eq!(sa_of(b"abaaba$"), vec![6, 5, 2, 3, 0, 4, 1]);
    }

    #[test]
    fn sa_terminator_above_other_bytes() {
        // '!' 的字节值小于 '$'，但终止符仍然最小
        let text = b"a!b!a$";
        assert_eq!(sa_of(text), naive_sa(text));
        assert_eq!(sa_of(text)[0], 5);
    }

    #[test]
    fn sa_matches_naive_on_small_random_texts() {
        for len in 0..=40 {
            let text = make_text(len, 1_234_567 + len as u32);
            assert_eq!(sa_of(&text), naive_sa(&text), "mismatch on len={}", len);
        }
    }

    #[test]
    fn sa_homopolymer() {
        let text = b"AAAAAAAA$";
        assert_eq!(sa_of(text), vec![8, 7, 6, 5, 4, 3, 2, 1, 0]);
    }

    proptest! {
        #[test]
        fn sa_is_sorted_permutation(body in proptest::collection::vec(b'a'..=b'e', 0..80)) {
            let mut text = body;
            text.push(b'$');
            let sa = sa_of(&text);

            let mut seen = vec![false; text.len()];
            for &p in &sa {
                prop_assert!(!seen[p as usize]);
                seen[p as usize] = true;
            }
            prop_assert_eq!(sa.len(), text.len());
            for w in sa.windows(2) {
                prop_assert!(text[w[0] as usize..] <= text[w[1] as usize..]);
            }
        }
    }
}
