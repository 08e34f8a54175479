//! # 基础设施组合层
//!
//! 负责把配置源、类型目录和依赖注入容器组合成一个可用的应用上下文。
//!
//! ## 主要功能
//!
//! - **上下文构建器**: 使用构建者模式从配置启动应用上下文
//! - **配置源管理**: 组合 properties、TOML、环境变量等配置源
//! - **日志初始化**: 按需初始化 `tracing` 日志
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use infrastructure_composition::ApplicationContextBuilder;
//! use di_abstractions::BeanFactory;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let context = ApplicationContextBuilder::new()
//!         .add_config_properties("application.properties")?
//!         .build()
//!         .await?;
//!
//!     let controller = context.get_bean("greetingController")?;
//!     println!("已创建: {}", controller.wrapped_type());
//!     Ok(())
//! }
//! ```

pub mod builder;

// 重新导出主要类型
pub use builder::{ApplicationContextBuilder, LoggingConfig};

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;
