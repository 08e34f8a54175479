//! 基于类型目录的扫描器

use di_abstractions::TypeScanner;
use infrastructure_common::{conventions, ComponentError, ComponentResult, NamespaceNode, TypeCatalog};
use std::sync::Arc;
use tracing::debug;

/// 类型目录扫描器
///
/// 先列出命名空间自身的类型，再按名称顺序递归子命名空间
#[derive(Debug, Clone)]
pub struct CatalogTypeScanner {
    catalog: Arc<TypeCatalog>,
}

impl CatalogTypeScanner {
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        Self { catalog }
    }

    fn collect(node: &NamespaceNode, namespace: &str, found: &mut Vec<String>) {
        for descriptor in node.types() {
            found.push(descriptor.fully_qualified_name());
        }
        for resource in node.resources() {
            debug!("跳过非类型资源: {}", conventions::qualify(namespace, resource));
        }
        for (name, child) in node.children() {
            Self::collect(child, &conventions::qualify(namespace, name), found);
        }
    }
}

impl TypeScanner for CatalogTypeScanner {
    fn scan(&self, base_package: &str) -> ComponentResult<Vec<String>> {
        let root = self
            .catalog
            .resolve(base_package)
            .ok_or_else(|| ComponentError::scan_resolution_failure(base_package))?;

        let mut found = Vec::new();
        Self::collect(root, base_package, &mut found);
        debug!("扫描 {} 得到 {} 个候选类型", base_package, found.len());
        Ok(found)
    }

    fn name(&self) -> &str {
        "CatalogTypeScanner"
    }
}
