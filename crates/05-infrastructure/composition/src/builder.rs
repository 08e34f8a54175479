//! 应用上下文构建器

use config_abstractions::{get_bool, get_string, ConfigProvider};
use config_impl::{
    CompositeConfigProvider, EnvironmentConfigProviderImpl, PropertiesConfigProvider,
    TomlConfigProvider,
};
use di_abstractions::{
    ContainerConfig, StartupPolicy, LAZY_INIT_KEY, SCAN_PACKAGE_KEY, STARTUP_POLICY_KEY,
};
use di_impl::DefaultApplicationContext;
use infrastructure_common::{ConfigError, InfrastructureError, InfrastructureResult, TypeCatalog};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// 应用上下文构建器
///
/// 使用建造者模式组合配置源和类型目录，构建并刷新应用上下文
pub struct ApplicationContextBuilder {
    /// 配置源
    config_sources: CompositeConfigProvider,
    /// 类型目录，未设置时使用启动时自动登记的类型
    catalog: Option<TypeCatalog>,
    /// 显式指定的扫描根命名空间
    scan_package: Option<String>,
    /// 显式指定的启动策略
    startup_policy: Option<StartupPolicy>,
    /// 显式指定的全局懒加载
    lazy_init: Option<bool>,
    /// 是否启用日志初始化
    logging_enabled: bool,
    /// 日志配置
    logging_config: LoggingConfig,
}

impl ApplicationContextBuilder {
    /// 创建新的上下文构建器
    pub fn new() -> Self {
        Self {
            config_sources: CompositeConfigProvider::new(),
            catalog: None,
            scan_package: None,
            startup_policy: None,
            lazy_init: None,
            logging_enabled: false, // 默认不启用日志初始化
            logging_config: LoggingConfig::default(),
        }
    }

    /// 添加 properties 配置文件
    pub fn add_config_properties<P: AsRef<Path>>(mut self, path: P) -> InfrastructureResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InfrastructureError::BootstrapFailed {
                message: format!("配置文件不存在: {}", path.display()),
            });
        }

        info!("添加 properties 配置文件: {}", path.display());
        let provider = PropertiesConfigProvider::new(path)?;
        self.config_sources.add_provider(Box::new(provider));
        Ok(self)
    }

    /// 添加 TOML 配置文件
    pub fn add_config_toml<P: AsRef<Path>>(mut self, path: P) -> InfrastructureResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InfrastructureError::BootstrapFailed {
                message: format!("配置文件不存在: {}", path.display()),
            });
        }

        info!("添加 TOML 配置文件: {}", path.display());
        let provider = TomlConfigProvider::new(path)?;
        self.config_sources.add_provider(Box::new(provider));
        Ok(self)
    }

    /// 添加环境变量配置源
    pub fn add_config_env_vars<S: Into<String>>(mut self, prefix: S) -> Self {
        let prefix = prefix.into();
        info!("添加环境变量配置源，前缀: {}", prefix);
        self.config_sources
            .add_provider(Box::new(EnvironmentConfigProviderImpl::new(prefix)));
        self
    }

    /// 添加自定义配置提供者
    pub fn add_config_provider<T: ConfigProvider + 'static>(mut self, provider: T) -> Self {
        info!("添加自定义配置提供者: {}", provider.name());
        self.config_sources.add_provider(Box::new(provider));
        self
    }

    /// 使用指定的类型目录
    pub fn with_catalog(mut self, catalog: TypeCatalog) -> Self {
        debug!("使用显式类型目录, 共 {} 个类型", catalog.len());
        self.catalog = Some(catalog);
        self
    }

    /// 指定扫描根命名空间，优先于配置
    pub fn scan_package<S: Into<String>>(mut self, package: S) -> Self {
        self.scan_package = Some(package.into());
        self
    }

    /// 指定启动策略，优先于配置
    pub fn startup_policy(mut self, policy: StartupPolicy) -> Self {
        self.startup_policy = Some(policy);
        self
    }

    /// 指定全局懒加载，优先于配置
    pub fn lazy_init(mut self, lazy_init: bool) -> Self {
        self.lazy_init = Some(lazy_init);
        self
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = config;
        self.logging_enabled = true; // 启用日志初始化
        self
    }

    /// 解析容器配置
    ///
    /// `scan.package` 必须由构建器或配置源提供
    pub async fn resolve_container_config(&self) -> InfrastructureResult<ContainerConfig> {
        let scan_package = match &self.scan_package {
            Some(package) => package.clone(),
            None => get_string(&self.config_sources, SCAN_PACKAGE_KEY)
                .await?
                .ok_or_else(|| ConfigError::KeyNotFound {
                    key: SCAN_PACKAGE_KEY.to_string(),
                })?,
        };

        let startup_policy = match self.startup_policy {
            Some(policy) => policy,
            None => match get_string(&self.config_sources, STARTUP_POLICY_KEY).await? {
                Some(text) => text
                    .parse::<StartupPolicy>()
                    .map_err(|message| ConfigError::TypeConversionError { message })?,
                None => StartupPolicy::default(),
            },
        };

        let lazy_init = match self.lazy_init {
            Some(lazy_init) => lazy_init,
            None => get_bool(&self.config_sources, LAZY_INIT_KEY)
                .await?
                .unwrap_or(false),
        };

        Ok(ContainerConfig::new(scan_package.trim())
            .with_startup_policy(startup_policy)
            .with_lazy_init(lazy_init))
    }

    /// 构建并刷新应用上下文
    pub async fn build(self) -> InfrastructureResult<DefaultApplicationContext> {
        info!("开始构建应用上下文");

        // 只有在明确配置了日志时才初始化日志
        // 避免在测试环境中重复初始化
        if self.logging_enabled {
            self.logging_config.init()?;
        }

        let config = self.resolve_container_config().await?;
        debug!("容器配置: {:?}", config);

        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => TypeCatalog::from_registered()?,
        };

        let context = DefaultApplicationContext::refresh(Arc::new(catalog), config)?;
        info!("应用上下文构建完成");
        Ok(context)
    }
}

impl Default for ApplicationContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别，`RUST_LOG` 存在时以其为准
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }

    /// 初始化全局日志订阅者
    pub fn init(&self) -> InfrastructureResult<()> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.to_string().to_lowercase()));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(self.show_target)
            .with_thread_ids(self.show_thread_ids)
            .with_file(self.show_file)
            .with_line_number(self.show_line_number);

        let result = if self.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        };
        result.map_err(|e| InfrastructureError::BootstrapFailed {
            message: format!("日志初始化失败: {}", e),
        })?;

        info!("日志系统初始化完成");
        Ok(())
    }
}
