//! 应用上下文抽象接口
//!
//! 提供容器配置、启动策略和上下文查询接口

use crate::factory::BeanFactory;
use crate::registry::BeanDefinition;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 扫描根命名空间配置键
pub const SCAN_PACKAGE_KEY: &str = "scan.package";
/// 启动策略配置键
pub const STARTUP_POLICY_KEY: &str = "context.startup-policy";
/// 全局懒加载配置键
pub const LAZY_INIT_KEY: &str = "context.lazy-init";

/// 应用上下文 trait
pub trait ApplicationContext: BeanFactory {
    /// 上下文唯一标识
    fn id(&self) -> &str;

    /// 启动完成时间
    fn startup_date(&self) -> DateTime<Utc>;

    /// 按注册顺序返回全部 Bean 定义名称
    fn bean_definition_names(&self) -> Vec<String>;

    /// 按名称获取 Bean 定义
    fn get_bean_definition(&self, name: &str) -> Option<BeanDefinition>;

    /// 获取容器统计信息
    fn stats(&self) -> ContainerStats;
}

/// 启动策略
///
/// 决定预实例化或注入失败时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartupPolicy {
    /// 任何失败都中止启动
    #[default]
    Strict,
    /// 记录警告并继续，依赖字段保持未设置
    Tolerant,
}

impl StartupPolicy {
    /// 是否为严格策略
    pub fn is_strict(self) -> bool {
        self == Self::Strict
    }
}

impl FromStr for StartupPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "tolerant" => Ok(Self::Tolerant),
            other => Err(format!("未知的启动策略: {}", other)),
        }
    }
}

impl fmt::Display for StartupPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Tolerant => write!(f, "tolerant"),
        }
    }
}

/// 容器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerConfig {
    /// 扫描根命名空间
    pub scan_package: String,
    /// 启动策略
    pub startup_policy: StartupPolicy,
    /// 是否把所有定义视为懒加载
    pub lazy_init: bool,
}

impl ContainerConfig {
    /// 创建扫描指定命名空间的默认配置
    pub fn new(scan_package: impl Into<String>) -> Self {
        Self {
            scan_package: scan_package.into(),
            startup_policy: StartupPolicy::default(),
            lazy_init: false,
        }
    }

    /// 设置启动策略
    pub fn with_startup_policy(mut self, policy: StartupPolicy) -> Self {
        self.startup_policy = policy;
        self
    }

    /// 设置全局懒加载
    pub fn with_lazy_init(mut self, lazy_init: bool) -> Self {
        self.lazy_init = lazy_init;
        self
    }
}

/// 容器统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContainerStats {
    /// 已注册的定义数量
    pub registered_definitions: usize,
    /// 缓存条目数量（同一实例可对应多个名称）
    pub cached_entries: usize,
    /// 已创建的实例数量
    pub instantiated_beans: usize,
}
