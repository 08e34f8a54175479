//! 默认 Bean 定义注册表

use di_abstractions::{BeanDefinition, BeanDefinitionRegistry};
use infrastructure_common::{ComponentError, ComponentResult};
use std::collections::HashMap;
use tracing::debug;

/// 默认 Bean 定义注册表
///
/// 按注册顺序保存定义，名称只能注册一次
#[derive(Debug, Clone, Default)]
pub struct DefaultBeanDefinitionRegistry {
    definitions: Vec<BeanDefinition>,
    index: HashMap<String, usize>,
}

impl DefaultBeanDefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 查找实现类型的规范定义
    pub fn find_by_implementation(&self, implementation_type: &str) -> Option<&BeanDefinition> {
        self.definitions.iter().find(|definition| {
            definition.implementation_type == implementation_type && !definition.is_alias()
        })
    }
}

impl BeanDefinitionRegistry for DefaultBeanDefinitionRegistry {
    fn register_bean_definition(&mut self, definition: BeanDefinition) -> ComponentResult<()> {
        if self.index.contains_key(&definition.registered_name) {
            return Err(ComponentError::DuplicateRegistration {
                name: definition.registered_name,
            });
        }

        debug!(
            "注册 Bean 定义: {} -> {}",
            definition.registered_name, definition.implementation_type
        );
        self.index
            .insert(definition.registered_name.clone(), self.definitions.len());
        self.definitions.push(definition);
        Ok(())
    }

    fn get_bean_definition(&self, name: &str) -> Option<&BeanDefinition> {
        self.index.get(name).map(|&position| &self.definitions[position])
    }

    fn bean_definitions(&self) -> Vec<&BeanDefinition> {
        self.definitions.iter().collect()
    }

    fn bean_definition_count(&self) -> usize {
        self.definitions.len()
    }
}
