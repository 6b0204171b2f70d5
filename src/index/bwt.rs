/// 根据后缀数组推导 BWT：bwt[i] = text[(sa[i] - 1) mod n]。
/// text 可以是原始字节，也可以是编码后的列号序列，两者一一对应。
pub fn build_bwt(text: &[u8], sa: &[u32]) -> Vec<u8> {
    let n = text.len();
    sa.iter()
        .map(|&p| {
            let i = p as usize;
            if i == 0 { text[n - 1] } else { text[i - 1] }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bwt_banana() {
        // banana$ 的后缀数组
        let sa = [6u32, 5, 3, 1, 0, 4, 2];
        assert_eq!(build_bwt(b"banana$", &sa), b"annb$aa");
    }

    #[test]
    fn bwt_mississippi() {
        let sa = [11u32, 10, 7, 4, 1, 0, 9, 8, 6, 3, 5, 2];
        assert_eq!(build_bwt(b"mississippi$", &sa), b"ipssm$pissii");
    }

    #[test]
    fn bwt_empty() {
        assert!(build_bwt(b"", &[]).is_empty());
    }
}
