//! 组件基础接口定义
//!
//! 由容器管理的类型必须实现此处的 trait

use crate::metadata::{NamedType, TypeDescriptor};

/// 受管类型 trait
///
/// 通常由 `component-macros` 中的构造型宏生成，也可以手工实现
pub trait ManagedType: NamedType + Send + Sync + 'static {
    /// 类型描述符
    fn descriptor() -> TypeDescriptor;
}
