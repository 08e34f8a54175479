//! # 依赖注入具体实现
//!
//! 提供类型扫描器、Bean 定义读取器、定义注册表和应用上下文的具体实现

pub mod context;
pub mod reader;
pub mod registry;
pub mod scanner;

pub use context::DefaultApplicationContext;
pub use reader::AnnotatedBeanDefinitionReader;
pub use registry::DefaultBeanDefinitionRegistry;
pub use scanner::CatalogTypeScanner;

#[cfg(test)]
pub(crate) mod fixtures;
