//! Bean 工厂抽象接口
//!
//! 按名称或类型获取 Bean

use infrastructure_common::{BeanWrapper, DependencyError, DependencyResult, NamedType};
use std::sync::Arc;

/// Bean 工厂 trait
pub trait BeanFactory: Send + Sync {
    /// 按名称获取 Bean，首次访问时创建（连同其依赖）
    fn get_bean(&self, name: &str) -> DependencyResult<BeanWrapper>;

    /// 按类型全限定名获取 Bean
    ///
    /// 名称未注册时，按实现类型查找对应的规范定义
    fn get_bean_by_type(&self, type_name: &str) -> DependencyResult<BeanWrapper>;

    /// 是否存在指定名称的 Bean 定义或实例
    fn contains_bean(&self, name: &str) -> bool;
}

/// Bean 工厂的类型化扩展
pub trait BeanFactoryExt: BeanFactory {
    /// 按名称获取指定句柄类型（`Arc<T>` 或 `Arc<dyn Capability>`）的 Bean
    fn get_bean_as<H>(&self, name: &str) -> DependencyResult<H>
    where
        H: Clone + 'static,
    {
        let wrapper = self.get_bean(name)?;
        wrapper
            .handle::<H>()
            .ok_or_else(|| DependencyError::TypeMismatch {
                name: name.to_string(),
                expected: std::any::type_name::<H>().to_string(),
            })
    }

    /// 按类型获取 Bean，`T` 可以是具体类型或 `dyn Capability`
    fn get_bean_of<T>(&self) -> DependencyResult<Arc<T>>
    where
        T: ?Sized + NamedType + Send + Sync + 'static,
    {
        let type_name = T::fully_qualified_name();
        let wrapper = self.get_bean_by_type(&type_name)?;
        wrapper
            .handle::<Arc<T>>()
            .ok_or_else(|| DependencyError::TypeMismatch {
                name: type_name,
                expected: std::any::type_name::<T>().to_string(),
            })
    }
}

impl<F: BeanFactory + ?Sized> BeanFactoryExt for F {}
