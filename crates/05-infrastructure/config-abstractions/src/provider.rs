//! 配置提供者抽象接口

use async_trait::async_trait;
use infrastructure_common::{ConfigError, ConfigResult};
use serde_json::Value;
use std::collections::HashMap;

/// 配置提供者 trait
///
/// 定义从不同数据源获取配置的统一接口，键为点分隔路径
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    /// 获取配置值，键不存在时返回 `KeyNotFound`
    async fn get_configuration(&self, key: &str) -> ConfigResult<Value>;

    /// 重新加载配置
    async fn reload(&mut self) -> ConfigResult<()>;

    /// 检查配置键是否存在
    async fn contains_key(&self, key: &str) -> ConfigResult<bool>;

    /// 获取所有配置键
    async fn get_all_keys(&self) -> ConfigResult<Vec<String>>;

    /// 获取提供者名称
    fn name(&self) -> &str;

    /// 获取提供者优先级，数值越大越先查询
    fn priority(&self) -> i32 {
        0
    }
}

/// 文件配置提供者 trait
#[async_trait]
pub trait FileConfigProvider: ConfigProvider {
    /// 获取文件路径
    fn file_path(&self) -> &str;

    /// 检查文件是否存在
    async fn file_exists(&self) -> bool;
}

/// 环境变量配置提供者 trait
#[async_trait]
pub trait EnvironmentConfigProvider: ConfigProvider {
    /// 获取环境变量前缀
    fn prefix(&self) -> &str;

    /// 获取分隔符
    fn separator(&self) -> &str;

    /// 获取所有匹配的环境变量（已转换为配置键）
    async fn get_matching_env_vars(&self) -> ConfigResult<HashMap<String, String>>;
}

/// 读取字符串配置，键不存在时返回 `None`
///
/// 布尔值和数值按文本形式返回
pub async fn get_string(provider: &dyn ConfigProvider, key: &str) -> ConfigResult<Option<String>> {
    match provider.get_configuration(key).await {
        Ok(value) => value_to_string(key, value).map(Some),
        Err(ConfigError::KeyNotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// 读取布尔配置，键不存在时返回 `None`
pub async fn get_bool(provider: &dyn ConfigProvider, key: &str) -> ConfigResult<Option<bool>> {
    match get_string(provider, key).await? {
        None => Ok(None),
        Some(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(Some(true)),
            "false" | "no" | "off" | "0" => Ok(Some(false)),
            other => Err(ConfigError::TypeConversionError {
                message: format!("配置 {} 的值 \"{}\" 不是布尔值", key, other),
            }),
        },
    }
}

fn value_to_string(key: &str, value: Value) -> ConfigResult<String> {
    match value {
        Value::String(text) => Ok(text),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(ConfigError::TypeConversionError {
            message: format!("配置 {} 不是标量值: {}", key, other),
        }),
    }
}
