//! # Configuration Implementation
//!
//! 配置源的具体实现。
//!
//! ## 主要组件
//!
//! - [`PropertiesConfigProvider`] - `.properties` 文件配置提供者
//! - [`TomlConfigProvider`] - TOML 配置提供者
//! - [`EnvironmentConfigProviderImpl`] - 环境变量配置提供者
//! - [`MemoryConfigProvider`] - 内存配置提供者
//! - [`CompositeConfigProvider`] - 按优先级组合多个提供者

pub mod composite;
pub mod providers;

pub use composite::*;
pub use providers::*;
