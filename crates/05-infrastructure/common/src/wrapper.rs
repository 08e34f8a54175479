//! Bean 实例包装

use crate::metadata::CapabilityBinding;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Bean 包装器
///
/// 持有已创建的 Bean 实例及其具体类型。除具体类型句柄 `Arc<T>` 外，
/// 还为每个实现的能力保存一个 `Arc<dyn Capability>` 视图，按句柄类型取出。
/// 克隆包装器只复制引用，底层实例始终只有一个。
#[derive(Clone)]
pub struct BeanWrapper {
    instance: Arc<dyn Any + Send + Sync>,
    concrete_type: Arc<str>,
    views: Arc<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl BeanWrapper {
    /// 包装实例，并为每个能力绑定生成视图
    pub fn new<T>(
        instance: Arc<T>,
        concrete_type: &str,
        capabilities: &[CapabilityBinding],
    ) -> Self
    where
        T: Send + Sync + 'static,
    {
        let erased: Arc<dyn Any + Send + Sync> = instance.clone();

        let mut views: HashMap<TypeId, Arc<dyn Any + Send + Sync>> = HashMap::new();
        views.insert(TypeId::of::<Arc<T>>(), Arc::new(instance));
        for binding in capabilities {
            if let Some((handle_type, view)) = binding.upcast(&erased) {
                views.insert(handle_type, view);
            }
        }

        Self {
            instance: erased,
            concrete_type: Arc::from(concrete_type),
            views: Arc::new(views),
        }
    }

    /// 获取实例具体类型的全限定名
    pub fn wrapped_type(&self) -> &str {
        &self.concrete_type
    }

    /// 按具体类型取出实例
    pub fn downcast<T>(&self) -> Option<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        self.instance.clone().downcast::<T>().ok()
    }

    /// 按句柄类型取出实例，`H` 为 `Arc<T>` 或 `Arc<dyn Capability>`
    pub fn handle<H>(&self) -> Option<H>
    where
        H: Clone + 'static,
    {
        self.views
            .get(&TypeId::of::<H>())
            .and_then(|view| view.downcast_ref::<H>())
            .cloned()
    }

    /// 两个包装器是否指向同一个实例
    pub fn same_instance(&self, other: &BeanWrapper) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.instance) as *const (),
            Arc::as_ptr(&other.instance) as *const (),
        )
    }
}

impl fmt::Debug for BeanWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanWrapper")
            .field("concrete_type", &self.concrete_type)
            .field("views", &self.views.len())
            .finish()
    }
}
