//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义类型扫描、Bean 定义注册和 Bean 解析的核心接口。
//!
//! ## 核心接口
//!
//! - [`TypeScanner`] - 类型扫描器接口
//! - [`BeanDefinitionRegistry`] - Bean 定义注册表接口
//! - [`BeanDefinitionReader`] - Bean 定义读取器接口
//! - [`BeanFactory`] - Bean 工厂接口
//! - [`ApplicationContext`] - 应用上下文接口

pub mod container;
pub mod discovery;
pub mod factory;
pub mod registry;
pub mod resolver;
pub mod scanner;

pub use container::*;
pub use discovery::*;
pub use factory::*;
pub use registry::*;
pub use resolver::*;
pub use scanner::*;
