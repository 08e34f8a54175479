//! # Component Macros
//!
//! 这个 crate 提供了用于声明组件和能力的过程宏，生成的代码在程序启动时把类型描述符
//! 登记到全局类型目录中。
//!
//! ## 核心宏
//!
//! - [`component`] / [`service`] / [`controller`] / [`repository`] - 构造型组件
//! - [`capability`] - 能力（接口）声明
//!
//! 使用这些宏的 crate 需要依赖 `infrastructure-common` 和 `ctor`。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use component_macros::{capability, controller, service};
//! use std::sync::Arc;
//!
//! #[capability(namespace = "com.demo")]
//! pub trait GreetingService {
//!     fn greet(&self, name: &str) -> String;
//! }
//!
//! #[service(namespace = "com.demo", implements(GreetingService))]
//! #[derive(Default)]
//! pub struct EnglishGreetingServiceImpl;
//!
//! impl GreetingService for EnglishGreetingServiceImpl {
//!     fn greet(&self, name: &str) -> String {
//!         format!("Hello, {}!", name)
//!     }
//! }
//!
//! #[controller(namespace = "com.demo")]
//! #[derive(Default)]
//! pub struct GreetingController {
//!     #[autowired]
//!     greeting_service: Option<Arc<dyn GreetingService>>,
//! }
//! ```

use proc_macro::TokenStream;

mod capability;
mod component;
mod utils;

use component::Stereotype;

// Re-exports are not allowed in proc-macro crates

/// 通用组件宏
///
/// 只记录 `component` 元标记本身：类型会进入类型目录，但不会注册为 Bean。
/// 需要注册为 Bean 时使用 [`service`]、[`controller`] 或 [`repository`]。
///
/// # 参数
///
/// - `name = "beanName"` - 显式 Bean 名称（默认为首字母小写的类型名）
/// - `namespace = "com.demo"` - 命名空间（默认为模块路径）
/// - `lazy` - 懒加载，不参与启动时预实例化
/// - `implements(Trait, ...)` - 实现的能力，每个能力登记一个别名
/// - `constructor = path` - 构造函数 `fn() -> Result<Self, E>`（默认为 `Default::default`）
///
/// 字段上的 `#[autowired]` 或 `#[autowired("beanName")]` 声明依赖，字段类型必须为
/// `Option<Arc<T>>`。
#[proc_macro_attribute]
pub fn component(args: TokenStream, input: TokenStream) -> TokenStream {
    component::stereotype_impl(Stereotype::Component, args, input)
}

/// 服务组件宏，参数同 [`component`]
#[proc_macro_attribute]
pub fn service(args: TokenStream, input: TokenStream) -> TokenStream {
    component::stereotype_impl(Stereotype::Service, args, input)
}

/// 控制器组件宏，参数同 [`component`]
#[proc_macro_attribute]
pub fn controller(args: TokenStream, input: TokenStream) -> TokenStream {
    component::stereotype_impl(Stereotype::Controller, args, input)
}

/// 仓储组件宏，参数同 [`component`]
#[proc_macro_attribute]
pub fn repository(args: TokenStream, input: TokenStream) -> TokenStream {
    component::stereotype_impl(Stereotype::Repository, args, input)
}

/// 能力声明宏
///
/// 为 trait 补齐 `Send + Sync` 约束，为 `dyn Trait` 实现 `NamedType` 并在启动时登记。
///
/// # 参数
///
/// - `namespace = "com.demo"` - 命名空间（默认为模块路径）
#[proc_macro_attribute]
pub fn capability(args: TokenStream, input: TokenStream) -> TokenStream {
    capability::capability_impl(args, input)
}
