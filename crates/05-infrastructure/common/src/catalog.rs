//! 类型目录
//!
//! 按命名空间组织的类型描述符树，是类型扫描器遍历的"类路径"

use crate::component::ManagedType;
use crate::conventions;
use crate::errors::{ComponentError, ComponentResult};
use crate::metadata::{NamedType, TypeDescriptor};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

/// 命名空间节点
#[derive(Debug, Clone, Default)]
pub struct NamespaceNode {
    types: BTreeMap<String, Arc<TypeDescriptor>>,
    resources: BTreeSet<String>,
    children: BTreeMap<String, NamespaceNode>,
}

impl NamespaceNode {
    /// 本命名空间下的类型，按简单类型名排序
    pub fn types(&self) -> impl Iterator<Item = &Arc<TypeDescriptor>> {
        self.types.values()
    }

    /// 本命名空间下的非类型资源
    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.resources.iter().map(String::as_str)
    }

    /// 子命名空间，按名称排序
    pub fn children(&self) -> impl Iterator<Item = (&str, &NamespaceNode)> {
        self.children.iter().map(|(name, node)| (name.as_str(), node))
    }

    fn child_mut(&mut self, segments: &[&str]) -> &mut NamespaceNode {
        segments.iter().fold(self, |node, segment| {
            node.children.entry((*segment).to_string()).or_default()
        })
    }
}

/// 类型目录
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    root: NamespaceNode,
    index: HashMap<String, Arc<TypeDescriptor>>,
}

impl TypeCatalog {
    /// 创建空的类型目录
    pub fn new() -> Self {
        Self::default()
    }

    /// 从程序启动时自动登记的类型描述符创建目录
    pub fn from_registered() -> ComponentResult<Self> {
        let mut catalog = Self::new();
        for descriptor in crate::registered_type_descriptors() {
            catalog.register_descriptor(descriptor)?;
        }
        Ok(catalog)
    }

    /// 登记受管类型
    pub fn register<T: ManagedType>(&mut self) -> ComponentResult<()> {
        self.register_descriptor(T::descriptor())
    }

    /// 登记能力声明
    pub fn register_capability<C: ?Sized + NamedType>(&mut self) -> ComponentResult<()> {
        self.register_descriptor(TypeDescriptor::capability::<C>())
    }

    /// 登记类型描述符，同一全限定名只能登记一次
    pub fn register_descriptor(&mut self, descriptor: TypeDescriptor) -> ComponentResult<()> {
        let qualified_name = descriptor.fully_qualified_name();
        if self.index.contains_key(&qualified_name) {
            return Err(ComponentError::RegistrationError {
                type_name: qualified_name,
                message: "类型已存在于目录中".to_string(),
            });
        }

        let kind = descriptor.kind();
        let namespace = descriptor.namespace().to_string();
        let segments = Self::segments(&namespace, &qualified_name)?;
        let descriptor = Arc::new(descriptor);
        self.root
            .child_mut(&segments)
            .types
            .insert(descriptor.simple_name().to_string(), descriptor.clone());
        self.index.insert(qualified_name.clone(), descriptor);

        debug!("登记类型: {} ({:?})", qualified_name, kind);
        Ok(())
    }

    /// 登记非类型资源（扫描时会被跳过）
    pub fn register_resource(
        &mut self,
        namespace: &str,
        name: impl Into<String>,
    ) -> ComponentResult<()> {
        let segments = Self::segments(namespace, namespace)?;
        self.root.child_mut(&segments).resources.insert(name.into());
        Ok(())
    }

    /// 按点分隔路径解析命名空间，空路径为根命名空间
    pub fn resolve(&self, namespace: &str) -> Option<&NamespaceNode> {
        let segments = conventions::namespace_segments(namespace)?;
        segments
            .iter()
            .try_fold(&self.root, |node, segment| node.children.get(*segment))
    }

    /// 按全限定名查找类型描述符
    pub fn find(&self, qualified_name: &str) -> Option<Arc<TypeDescriptor>> {
        self.index.get(qualified_name).cloned()
    }

    /// 已登记的类型数量
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn segments<'a>(namespace: &'a str, subject: &str) -> ComponentResult<Vec<&'a str>> {
        conventions::namespace_segments(namespace).ok_or_else(|| ComponentError::InvalidMetadata {
            message: format!("{} 的命名空间 \"{}\" 无效", subject, namespace),
        })
    }
}
