//! 库内统一错误类型。

use thiserror::Error;

/// 索引构建、序列化与加载过程中可能出现的错误。
///
/// 搜索本身永不失败：未知字符、终止符和空模式都只返回空结果。
#[derive(Debug, Error)]
pub enum FmError {
    /// 输入文本不满足前置条件（终止符缺失、重复或不在末尾，或文本过长）
    #[error("invalid text: {0}")]
    InvalidText(String),

    /// 序列化数据无法解码，或解码后未通过一致性检查
    #[error("corrupt index: {0}")]
    CorruptIndex(String),

    /// 序列化失败
    #[error("cannot encode index: {0}")]
    Encode(#[source] bincode::Error),

    /// 索引文件读写失败
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FmError>;
