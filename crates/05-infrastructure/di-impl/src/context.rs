//! 默认应用上下文
//!
//! 持有 Bean 定义注册表和实例缓存，负责启动时的预实例化以及按需创建、注入 Bean。
//!
//! 同一实现类型只创建一个实例：能力别名和规范名称最终指向同一个 [`BeanWrapper`]。
//! 实例在全部字段注入完成后才写入缓存，任何调用方都看不到未完成注入的 Bean。

use crate::reader::AnnotatedBeanDefinitionReader;
use crate::registry::DefaultBeanDefinitionRegistry;
use crate::scanner::CatalogTypeScanner;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use di_abstractions::{
    ApplicationContext, BeanDefinition, BeanDefinitionReader, BeanDefinitionRegistry, BeanFactory,
    ContainerConfig, ContainerStats, ResolveContext, TypeScanner,
};
use infrastructure_common::{
    BeanWrapper, DependencyError, DependencyResult, InfrastructureResult, InjectionPoint,
    TypeCatalog, TypeDescriptor,
};
use parking_lot::ReentrantMutex;
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// 解析链中的一项，离开作用域时（包括 panic 展开）自动弹出
struct ChainEntry<'a> {
    chain: &'a RefCell<ResolveContext>,
}

impl<'a> ChainEntry<'a> {
    fn enter(chain: &'a RefCell<ResolveContext>, type_name: &str) -> DependencyResult<Self> {
        chain.borrow_mut().push_type(type_name)?;
        Ok(Self { chain })
    }
}

impl Drop for ChainEntry<'_> {
    fn drop(&mut self) {
        self.chain.borrow_mut().pop_type();
    }
}

/// 默认应用上下文
pub struct DefaultApplicationContext {
    id: String,
    startup_date: DateTime<Utc>,
    config: ContainerConfig,
    catalog: Arc<TypeCatalog>,
    registry: DefaultBeanDefinitionRegistry,
    cache: DashMap<String, BeanWrapper>,
    /// 构建锁，同时保存当前线程的解析链
    construction: ReentrantMutex<RefCell<ResolveContext>>,
}

impl DefaultApplicationContext {
    /// 扫描类型目录并启动上下文
    pub fn refresh(catalog: Arc<TypeCatalog>, config: ContainerConfig) -> InfrastructureResult<Self> {
        let scanner = CatalogTypeScanner::new(catalog.clone());
        Self::refresh_with_scanner(&scanner, catalog, config)
    }

    /// 使用指定扫描器启动上下文
    pub fn refresh_with_scanner(
        scanner: &dyn TypeScanner,
        catalog: Arc<TypeCatalog>,
        config: ContainerConfig,
    ) -> InfrastructureResult<Self> {
        info!(
            "开始刷新应用上下文, 扫描根命名空间: {}, 启动策略: {}",
            config.scan_package, config.startup_policy
        );

        let type_names = scanner.scan(&config.scan_package).map_err(|e| {
            error!("类型扫描失败: {}", e);
            e
        })?;
        info!("{} 扫描到 {} 个候选类型", scanner.name(), type_names.len());

        let reader = AnnotatedBeanDefinitionReader::new(catalog.clone());
        let mut registry = DefaultBeanDefinitionRegistry::new();
        let loaded = reader
            .load_bean_definitions(&type_names, &mut registry)
            .map_err(|e| {
                error!("加载 Bean 定义失败: {}", e);
                e
            })?;
        info!("{} 注册了 {} 个 Bean 定义", reader.name(), loaded);

        let context = Self::with_registry(catalog, registry, config);
        context.preinstantiate_singletons()?;

        info!(
            "应用上下文 {} 刷新完成, 已创建 {} 个 Bean",
            context.id,
            context.stats().instantiated_beans
        );
        Ok(context)
    }

    /// 使用已填充的注册表创建上下文，不做预实例化
    pub fn with_registry(
        catalog: Arc<TypeCatalog>,
        registry: DefaultBeanDefinitionRegistry,
        config: ContainerConfig,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            startup_date: Utc::now(),
            config,
            catalog,
            registry,
            cache: DashMap::new(),
            construction: ReentrantMutex::new(RefCell::new(ResolveContext::new())),
        }
    }

    /// 上下文配置
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// 按注册顺序创建所有非懒加载的 Bean
    pub fn preinstantiate_singletons(&self) -> DependencyResult<()> {
        let names: Vec<String> = self
            .registry
            .bean_definitions()
            .into_iter()
            .filter(|definition| !(self.config.lazy_init || definition.lazy))
            .map(|definition| definition.registered_name.clone())
            .collect();
        debug!("预实例化 {} 个 Bean", names.len());

        for name in names {
            if let Err(e) = self.get_bean(&name) {
                if self.config.startup_policy.is_strict() {
                    error!("Bean {} 创建失败, 启动中止: {}", name, e);
                    return Err(e);
                }
                warn!("Bean {} 创建失败, 继续启动: {}", name, e);
            }
        }
        Ok(())
    }

    fn cached(&self, name: &str) -> Option<BeanWrapper> {
        self.cache.get(name).map(|entry| entry.value().clone())
    }

    fn create_bean(&self, name: &str, definition: &BeanDefinition) -> DependencyResult<BeanWrapper> {
        let guard = self.construction.lock();

        // 其他线程可能已在我们等待锁时完成创建
        if let Some(wrapper) = self.cached(name) {
            return Ok(wrapper);
        }

        // 同一实现已在其他名称下创建
        if let Some(wrapper) = self.cached(&definition.implementation_type) {
            debug!("Bean {} 复用实现 {} 的实例", name, definition.implementation_type);
            self.cache.insert(name.to_string(), wrapper.clone());
            return Ok(wrapper);
        }

        let descriptor = self.catalog.find(&definition.implementation_type).ok_or_else(|| {
            DependencyError::ConstructionFailed {
                bean_name: name.to_string(),
                type_name: definition.implementation_type.clone(),
                source: "实现类型不在类型目录中".into(),
            }
        })?;

        let entry = ChainEntry::enter(&guard, &definition.implementation_type)?;
        debug!(
            "开始构建 Bean: {} (解析深度 {})",
            name,
            guard.borrow().depth()
        );
        let result = self.build_instance(name, &descriptor);
        drop(entry);
        let wrapper = result?;

        for key in [
            name,
            definition.source_factory_name.as_str(),
            definition.implementation_type.as_str(),
        ] {
            self.cache.insert(key.to_string(), wrapper.clone());
        }
        debug!("创建 Bean: {} ({})", name, definition.implementation_type);
        Ok(wrapper)
    }

    fn build_instance(&self, name: &str, descriptor: &TypeDescriptor) -> DependencyResult<BeanWrapper> {
        let mut instance = descriptor
            .instantiate()
            .map_err(|source| DependencyError::ConstructionFailed {
                bean_name: name.to_string(),
                type_name: descriptor.fully_qualified_name(),
                source,
            })?;

        for point in descriptor.injection_points() {
            self.populate_field(name, point, instance.as_mut())?;
        }

        descriptor.seal(instance)
    }

    fn populate_field(
        &self,
        bean_name: &str,
        point: &InjectionPoint,
        instance: &mut (dyn Any + Send),
    ) -> DependencyResult<()> {
        let outcome = self
            .resolve_dependency(bean_name, point)
            .and_then(|dependency| point.inject(bean_name, instance, &dependency));

        match outcome {
            Ok(()) => {
                debug!(
                    "注入 {}.{} <- {}",
                    bean_name,
                    point.field_name(),
                    point.target_name()
                );
                Ok(())
            }
            Err(e) if self.config.startup_policy.is_strict() || e.is_cyclic() => Err(e),
            Err(e) => {
                warn!(
                    "{}.{} 未注入, 保持为空: {}",
                    bean_name,
                    point.field_name(),
                    e
                );
                Ok(())
            }
        }
    }

    fn resolve_dependency(&self, bean_name: &str, point: &InjectionPoint) -> DependencyResult<BeanWrapper> {
        let target = point.target_name();
        let by_type = target == point.declared_type();
        let result = if by_type {
            self.get_bean_by_type(target)
        } else {
            self.get_bean(target)
        };

        match result {
            Err(DependencyError::NotFound { name }) if name == target => {
                Err(DependencyError::UnresolvedDependency {
                    bean_name: bean_name.to_string(),
                    field: point.field_name().to_string(),
                    target: target.to_string(),
                })
            }
            other => other,
        }
    }
}

impl BeanFactory for DefaultApplicationContext {
    fn get_bean(&self, name: &str) -> DependencyResult<BeanWrapper> {
        if let Some(wrapper) = self.cached(name) {
            return Ok(wrapper);
        }

        let definition = self
            .registry
            .get_bean_definition(name)
            .cloned()
            .ok_or_else(|| DependencyError::not_found(name))?;
        self.create_bean(name, &definition)
    }

    fn get_bean_by_type(&self, type_name: &str) -> DependencyResult<BeanWrapper> {
        if let Some(wrapper) = self.cached(type_name) {
            return Ok(wrapper);
        }
        if self.registry.contains_bean_definition(type_name) {
            return self.get_bean(type_name);
        }

        let canonical = self
            .registry
            .find_by_implementation(type_name)
            .map(|definition| definition.registered_name.clone())
            .ok_or_else(|| DependencyError::not_found(type_name))?;
        self.get_bean(&canonical)
    }

    fn contains_bean(&self, name: &str) -> bool {
        self.cache.contains_key(name) || self.registry.contains_bean_definition(name)
    }
}

impl ApplicationContext for DefaultApplicationContext {
    fn id(&self) -> &str {
        &self.id
    }

    fn startup_date(&self) -> DateTime<Utc> {
        self.startup_date
    }

    fn bean_definition_names(&self) -> Vec<String> {
        self.registry.bean_definition_names()
    }

    fn get_bean_definition(&self, name: &str) -> Option<BeanDefinition> {
        self.registry.get_bean_definition(name).cloned()
    }

    fn stats(&self) -> ContainerStats {
        let instantiated: HashSet<String> = self
            .cache
            .iter()
            .map(|entry| entry.value().wrapped_type().to_string())
            .collect();

        ContainerStats {
            registered_definitions: self.registry.bean_definition_count(),
            cached_entries: self.cache.len(),
            instantiated_beans: instantiated.len(),
        }
    }
}

impl std::fmt::Debug for DefaultApplicationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultApplicationContext")
            .field("id", &self.id)
            .field("startup_date", &self.startup_date)
            .field("config", &self.config)
            .field("definitions", &self.registry.bean_definition_count())
            .field("cached_entries", &self.cache.len())
            .finish()
    }
}
