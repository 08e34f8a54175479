//! 解析上下文
//!
//! 记录当前正在构建的实现类型，用于检测循环依赖

use infrastructure_common::{DependencyError, DependencyResult};

/// 解析上下文
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    /// 当前解析链，按进入顺序保存实现类型全限定名
    pub resolution_chain: Vec<String>,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加类型到解析链，类型已在链中时返回循环依赖错误
    pub fn push_type(&mut self, type_name: &str) -> DependencyResult<()> {
        if self.contains(type_name) {
            let mut chain = self.resolution_chain.clone();
            chain.push(type_name.to_string());
            return Err(DependencyError::CyclicDependency {
                chain: chain.join(" -> "),
            });
        }
        self.resolution_chain.push(type_name.to_string());
        Ok(())
    }

    /// 从解析链中移除最后进入的类型
    pub fn pop_type(&mut self) {
        self.resolution_chain.pop();
    }

    /// 类型是否正在构建
    pub fn contains(&self, type_name: &str) -> bool {
        self.resolution_chain.iter().any(|name| name == type_name)
    }

    /// 当前解析深度
    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }
}
