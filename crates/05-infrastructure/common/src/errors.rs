//! 错误类型定义

use thiserror::Error;

/// 通用的装箱错误类型，用于承载构造函数等用户代码返回的错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置解析失败: {source}")]
    ParseError { source: BoxError },

    #[error("配置键不存在: {key}")]
    KeyNotFound { key: String },

    #[error("配置类型转换失败: {message}")]
    TypeConversionError { message: String },
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("Bean 不存在: {name}")]
    NotFound { name: String },

    #[error("Bean 创建失败: {bean_name} ({type_name}), 原因: {source}")]
    ConstructionFailed {
        bean_name: String,
        type_name: String,
        source: BoxError,
    },

    #[error("检测到循环依赖: {chain}")]
    CyclicDependency { chain: String },

    #[error("依赖未注册: Bean {bean_name} 的字段 {field} 需要 {target}")]
    UnresolvedDependency {
        bean_name: String,
        field: String,
        target: String,
    },

    #[error("依赖注入失败: Bean {bean_name} 的字段 {field}, 原因: {message}")]
    InjectionFailed {
        bean_name: String,
        field: String,
        message: String,
    },

    #[error("Bean 类型不匹配: {name}, 期望 {expected}")]
    TypeMismatch { name: String, expected: String },
}

impl DependencyError {
    /// 创建 Bean 不存在错误
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// 是否为循环依赖错误
    pub fn is_cyclic(&self) -> bool {
        matches!(self, Self::CyclicDependency { .. })
    }
}

/// 组件错误类型
#[derive(Error, Debug)]
pub enum ComponentError {
    #[error("扫描路径无法解析: {package}")]
    ScanResolutionFailure { package: String },

    #[error("Bean 名称 \"{name}\" 已经注册")]
    DuplicateRegistration { name: String },

    #[error("组件发现失败: {message}")]
    DiscoveryError { message: String },

    #[error("组件注册失败: {type_name}, 原因: {message}")]
    RegistrationError { type_name: String, message: String },

    #[error("组件元数据无效: {message}")]
    InvalidMetadata { message: String },
}

impl ComponentError {
    /// 创建扫描路径解析错误
    pub fn scan_resolution_failure(package: impl Into<String>) -> Self {
        Self::ScanResolutionFailure {
            package: package.into(),
        }
    }

    /// 创建发现错误
    pub fn discovery_error(message: impl Into<String>) -> Self {
        Self::DiscoveryError {
            message: message.into(),
        }
    }
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("组件错误: {source}")]
    ComponentError {
        #[from]
        source: ComponentError,
    },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type ComponentResult<T> = Result<T, ComponentError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
