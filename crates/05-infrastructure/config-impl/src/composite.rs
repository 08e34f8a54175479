//! 组合配置提供者

use async_trait::async_trait;
use config_abstractions::ConfigProvider;
use infrastructure_common::{ConfigError, ConfigResult};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::debug;

/// 组合配置提供者
///
/// 按优先级从高到低依次查询，第一个命中的值生效
#[derive(Default)]
pub struct CompositeConfigProvider {
    providers: Vec<Box<dyn ConfigProvider>>,
}

impl CompositeConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加提供者
    pub fn add_provider(&mut self, provider: Box<dyn ConfigProvider>) {
        debug!("添加配置提供者: {} (优先级 {})", provider.name(), provider.priority());
        self.providers.push(provider);
        // 稳定排序，同优先级保持添加顺序
        self.providers.sort_by_key(|provider| std::cmp::Reverse(provider.priority()));
    }

    /// 添加提供者（构建器形式）
    pub fn with_provider(mut self, provider: impl ConfigProvider + 'static) -> Self {
        self.add_provider(Box::new(provider));
        self
    }

    /// 按查询顺序返回提供者名称
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|provider| provider.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[async_trait]
impl ConfigProvider for CompositeConfigProvider {
    async fn get_configuration(&self, key: &str) -> ConfigResult<Value> {
        for provider in &self.providers {
            match provider.get_configuration(key).await {
                Ok(value) => {
                    debug!("配置 {} 来自 {}", key, provider.name());
                    return Ok(value);
                }
                Err(ConfigError::KeyNotFound { .. }) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(ConfigError::KeyNotFound { key: key.to_string() })
    }

    async fn reload(&mut self) -> ConfigResult<()> {
        for provider in &mut self.providers {
            provider.reload().await?;
        }
        Ok(())
    }

    async fn contains_key(&self, key: &str) -> ConfigResult<bool> {
        for provider in &self.providers {
            if provider.contains_key(key).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn get_all_keys(&self) -> ConfigResult<Vec<String>> {
        let mut keys = BTreeSet::new();
        for provider in &self.providers {
            keys.extend(provider.get_all_keys().await?);
        }
        Ok(keys.into_iter().collect())
    }

    fn name(&self) -> &str {
        "CompositeConfigProvider"
    }

    fn priority(&self) -> i32 {
        self.providers
            .iter()
            .map(|provider| provider.priority())
            .max()
            .unwrap_or(0)
    }
}
