//! 类型扫描器抽象接口
//!
//! 在命名空间树中查找候选类型

use infrastructure_common::ComponentResult;

/// 类型扫描器 trait
///
/// 返回给定根命名空间下（含所有子命名空间）全部类型的全限定名
pub trait TypeScanner: Send + Sync {
    /// 扫描根命名空间，根命名空间无法解析时返回 `ScanResolutionFailure`
    fn scan(&self, base_package: &str) -> ComponentResult<Vec<String>>;

    /// 获取扫描器名称
    fn name(&self) -> &str;
}
