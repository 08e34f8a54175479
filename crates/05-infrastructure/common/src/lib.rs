//! # Infrastructure Common
//!
//! 这个 crate 提供了 IoC 容器各层共享的类型、元数据和工具。
//!
//! ## 核心组件
//!
//! - [`TypeDescriptor`] - 代替运行时反射的类型描述符
//! - [`BeanWrapper`] - 已创建 Bean 的共享包装
//! - [`TypeCatalog`] - 按命名空间组织的类型目录
//! - [`ManagedType`] - 受管类型 trait
//! - 命名约定与错误类型
//!
//! ## 设计原则
//!
//! - 显式元数据代替反射
//! - 约定优于配置
//! - 编译期生成、启动期自动登记

pub mod catalog;
pub mod component;
pub mod conventions;
pub mod errors;
pub mod metadata;
pub mod wrapper;

pub use catalog::*;
pub use component::*;
pub use conventions::*;
pub use errors::*;
pub use metadata::*;
pub use wrapper::*;

/// 描述符工厂函数
pub type DescriptorFactory = fn() -> TypeDescriptor;

/// 全局类型登记表，由组件宏生成的启动代码写入
static TYPE_INTAKE: once_cell::sync::Lazy<parking_lot::RwLock<Vec<DescriptorFactory>>> =
    once_cell::sync::Lazy::new(|| parking_lot::RwLock::new(Vec::new()));

/// 登记类型描述符工厂
///
/// 通常在程序启动时由宏生成的 `ctor` 函数调用
pub fn submit_type_descriptor(factory: DescriptorFactory) {
    TYPE_INTAKE.write().push(factory);
}

/// 获取所有已登记的类型描述符
pub fn registered_type_descriptors() -> Vec<TypeDescriptor> {
    TYPE_INTAKE.read().iter().map(|factory| factory()).collect()
}
