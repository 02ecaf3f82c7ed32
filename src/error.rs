//! 生成代码在运行期返回的错误。
use std::{error::Error as StdError, fmt};

use crate::ui::FieldPath;

#[derive(Debug, Clone, PartialEq)]
pub enum PrototypeError {
    ReadOnly(FieldPath),     // 只读成员被写入
    UnknownField(FieldPath), // 路径不指向任何可见成员
    NotALeaf(FieldPath),     // 路径停在组合成员上
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    Storage {
        key: String,
        message: String,
    },
}

impl PrototypeError {
    /// Prefixes the carried path with `segment`, used when a nested form reports upward.
    pub fn scoped(self, segment: &str) -> Self {
        match self {
            PrototypeError::ReadOnly(path) => PrototypeError::ReadOnly(path.prefixed(segment)),
            PrototypeError::UnknownField(path) => {
                PrototypeError::UnknownField(path.prefixed(segment))
            }
            PrototypeError::NotALeaf(path) => PrototypeError::NotALeaf(path.prefixed(segment)),
            other => other,
        }
    }
}

impl fmt::Display for PrototypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrototypeError::ReadOnly(path) => write!(f, "field `{path}` is read-only"),
            PrototypeError::UnknownField(path) => write!(f, "unknown field `{path}`"),
            PrototypeError::NotALeaf(path) => write!(f, "path `{path}` does not address a value"),
            PrototypeError::TypeMismatch { expected, found } => {
                write!(f, "expected {expected} value, found {found}")
            }
            PrototypeError::Storage { key, message } => {
                write!(f, "settings storage failed for `{key}`: {message}")
            }
        }
    }
}
impl StdError for PrototypeError {}

pub type Result<T = ()> = std::result::Result<T, PrototypeError>;
