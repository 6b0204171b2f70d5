use serde::{Deserialize, Serialize};

use crate::error::{FmError, Result};

/// 稠密 Occ 表：(n+1) x sigma，行优先展平存储。
///
/// `rank(i, c)` = BWT[0..i) 中列号 c 的出现次数，O(1) 查询。
/// 以 O(n·sigma) 内存换取精确的常数时间查询，不做采样。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccTable {
    sigma: u32,
    counts: Vec<u32>,
}

impl OccTable {
    /// 单遍构建：每行复制上一行，再把当前 BWT 字符所在列加一。
    pub fn build(bwt_columns: &[u8], sigma: usize) -> Self {
        let n = bwt_columns.len();
        let mut counts = vec![0u32; (n + 1) * sigma];
        for (i, &c) in bwt_columns.iter().enumerate() {
            let (prev, next) = counts.split_at_mut((i + 1) * sigma);
            let row = &mut next[..sigma];
            row.copy_from_slice(&prev[i * sigma..]);
            row[c as usize] += 1;
        }
        Self { sigma: sigma as u32, counts }
    }

    #[inline]
    pub fn sigma(&self) -> usize {
        self.sigma as usize
    }

    /// 行数 n+1
    #[inline]
    pub fn rows(&self) -> usize {
        if self.sigma == 0 {
            0
        } else {
            self.counts.len() / self.sigma()
        }
    }

    #[inline]
    pub fn rank(&self, row: usize, column: usize) -> u32 {
        self.counts[row * self.sigma() + column]
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[u32] {
        let s = self.sigma();
        &self.counts[row * s..(row + 1) * s]
    }

    /// 第 i+1 行相对第 i 行增加的列，即 BWT[i] 的列号
    pub fn bumped_column(&self, i: usize) -> Option<usize> {
        self.row(i)
            .iter()
            .zip(self.row(i + 1))
            .position(|(&a, &b)| b != a)
    }

    /// 末行：每个字符在全文中的总数
    pub fn totals(&self) -> &[u32] {
        self.row(self.rows() - 1)
    }

    /// 检查维度、首行全零以及"每行恰好一列加一"的不变式。
    pub(crate) fn validate(&self, n: usize, sigma: usize) -> Result<()> {
        if self.sigma() != sigma {
            return Err(FmError::CorruptIndex(format!(
                "occ table has {} columns, alphabet has {}",
                self.sigma, sigma
            )));
        }
        if self.counts.len() != (n + 1) * sigma {
            return Err(FmError::CorruptIndex(format!(
                "occ table has {} cells, expected {}",
                self.counts.len(),
                (n + 1) * sigma
            )));
        }
        if self.row(0).iter().any(|&v| v != 0) {
            return Err(FmError::CorruptIndex("occ row 0 is not all zeros".to_string()));
        }
        for i in 0..n {
            let mut bumped = 0usize;
            for (&a, &b) in self.row(i).iter().zip(self.row(i + 1)) {
                if b == a + 1 {
                    bumped += 1;
                } else if b != a {
                    bumped = usize::MAX;
                    break;
                }
            }
            if bumped != 1 {
                return Err(FmError::CorruptIndex(format!(
                    "occ row {} is not a single-column increment of row {}",
                    i + 1,
                    i
                )));
            }
        }
        Ok(())
    }
}
