//! Bean 定义读取器抽象接口
//!
//! 把扫描得到的类型转换为 Bean 定义

use crate::registry::BeanDefinitionRegistry;
use infrastructure_common::ComponentResult;

/// Bean 定义读取器 trait
pub trait BeanDefinitionReader: Send + Sync {
    /// 读取候选类型并把得到的定义写入注册表，返回写入的定义数量
    ///
    /// 任一定义注册失败时立即返回错误
    fn load_bean_definitions(
        &self,
        type_names: &[String],
        registry: &mut dyn BeanDefinitionRegistry,
    ) -> ComponentResult<usize>;

    /// 获取读取器名称
    fn name(&self) -> &str;
}
