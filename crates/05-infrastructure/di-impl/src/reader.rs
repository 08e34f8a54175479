//! 基于构造型标记的 Bean 定义读取器

use di_abstractions::{BeanDefinition, BeanDefinitionReader, BeanDefinitionRegistry};
use infrastructure_common::{conventions, ComponentError, ComponentResult, TypeCatalog, TypeDescriptor};
use std::sync::Arc;
use tracing::debug;

/// 构造型标记读取器
///
/// 对带有组件构造型的具体类型生成一个规范定义，并为其实现的每个能力生成别名定义
#[derive(Debug, Clone)]
pub struct AnnotatedBeanDefinitionReader {
    catalog: Arc<TypeCatalog>,
}

impl AnnotatedBeanDefinitionReader {
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        Self { catalog }
    }

    /// 由类型描述符推导 Bean 定义，不合格的类型返回空列表
    pub fn definitions_for(descriptor: &TypeDescriptor) -> Vec<BeanDefinition> {
        if descriptor.is_capability() || descriptor.markers().is_empty() {
            return Vec::new();
        }
        let Some(stereotype) = descriptor.stereotype() else {
            return Vec::new();
        };

        let name = stereotype
            .explicit_value()
            .map(str::to_string)
            .unwrap_or_else(|| conventions::lower_first_case(descriptor.simple_name()));
        let canonical =
            BeanDefinition::new(name, descriptor.fully_qualified_name()).with_lazy(descriptor.is_lazy());

        let mut definitions = Vec::with_capacity(descriptor.capabilities().len() + 1);
        for capability in descriptor.capabilities() {
            definitions.push(BeanDefinition::alias_of(&canonical, capability.name()));
        }
        definitions.insert(0, canonical);
        definitions
    }
}

impl BeanDefinitionReader for AnnotatedBeanDefinitionReader {
    fn load_bean_definitions(
        &self,
        type_names: &[String],
        registry: &mut dyn BeanDefinitionRegistry,
    ) -> ComponentResult<usize> {
        let mut loaded = 0;
        for type_name in type_names {
            let descriptor = self.catalog.find(type_name).ok_or_else(|| {
                ComponentError::discovery_error(format!("类型 {} 不在类型目录中", type_name))
            })?;

            let definitions = Self::definitions_for(&descriptor);
            if definitions.is_empty() {
                debug!("跳过非组件类型: {}", type_name);
                continue;
            }
            for definition in definitions {
                registry.register_bean_definition(definition)?;
                loaded += 1;
            }
        }
        Ok(loaded)
    }

    fn name(&self) -> &str {
        "AnnotatedBeanDefinitionReader"
    }
}
