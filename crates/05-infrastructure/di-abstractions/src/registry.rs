//! Bean 定义注册表抽象接口

use infrastructure_common::ComponentResult;
use serde::{Deserialize, Serialize};

/// Bean 定义
///
/// 描述如何命名和创建一个 Bean，注册后不再修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeanDefinition {
    /// 注册名称，在注册表中唯一
    pub registered_name: String,
    /// 需要实例化的实现类型全限定名
    pub implementation_type: String,
    /// 是否懒加载
    pub lazy: bool,
    /// 实现类型首次注册时使用的规范名称，别名定义中与注册名称不同
    pub source_factory_name: String,
}

impl BeanDefinition {
    /// 创建规范定义
    pub fn new(registered_name: impl Into<String>, implementation_type: impl Into<String>) -> Self {
        let registered_name = registered_name.into();
        Self {
            source_factory_name: registered_name.clone(),
            registered_name,
            implementation_type: implementation_type.into(),
            lazy: false,
        }
    }

    /// 为规范定义创建能力别名
    pub fn alias_of(canonical: &BeanDefinition, alias: impl Into<String>) -> Self {
        Self {
            registered_name: alias.into(),
            implementation_type: canonical.implementation_type.clone(),
            lazy: canonical.lazy,
            source_factory_name: canonical.source_factory_name.clone(),
        }
    }

    /// 设置是否懒加载
    pub fn with_lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    /// 是否为别名定义
    pub fn is_alias(&self) -> bool {
        self.registered_name != self.source_factory_name
    }
}

/// Bean 定义注册表 trait
///
/// 名称到定义的映射，保持注册顺序，拒绝重复名称
pub trait BeanDefinitionRegistry: Send + Sync {
    /// 注册定义，名称已存在时返回 `DuplicateRegistration`
    fn register_bean_definition(&mut self, definition: BeanDefinition) -> ComponentResult<()>;

    /// 按名称获取定义
    fn get_bean_definition(&self, name: &str) -> Option<&BeanDefinition>;

    /// 检查名称是否已注册
    fn contains_bean_definition(&self, name: &str) -> bool {
        self.get_bean_definition(name).is_some()
    }

    /// 按注册顺序返回全部定义
    fn bean_definitions(&self) -> Vec<&BeanDefinition>;

    /// 按注册顺序返回全部名称
    fn bean_definition_names(&self) -> Vec<String> {
        self.bean_definitions()
            .into_iter()
            .map(|definition| definition.registered_name.clone())
            .collect()
    }

    /// 已注册的定义数量
    fn bean_definition_count(&self) -> usize {
        self.bean_definitions().len()
    }
}
