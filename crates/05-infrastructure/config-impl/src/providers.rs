//! 配置提供者实现

use async_trait::async_trait;
use config_abstractions::{
    ConfigProvider, EnvironmentConfigProvider as EnvironmentConfigProviderTrait, FileConfigProvider,
};
use infrastructure_common::{ConfigError, ConfigResult};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::debug;

fn read_config_file(path: &Path) -> ConfigResult<String> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(std::fs::read_to_string(path)?)
}

/// `.properties` 配置提供者
///
/// 支持 `key=value`、`key: value` 和空白分隔三种写法，`#` 与 `!` 开头的行为注释，
/// 行尾奇数个反斜杠续行。键和值都会解码 `\=`、`\:`、`\t`、`\uXXXX` 等转义，
/// 未转义的首尾空白被去除，重复的键以最后一次为准。
#[derive(Debug)]
pub struct PropertiesConfigProvider {
    file_path: PathBuf,
    entries: BTreeMap<String, String>,
    priority: i32,
}

impl PropertiesConfigProvider {
    /// 创建新的 properties 配置提供者并立即加载
    pub fn new<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let mut provider = Self {
            file_path: path.as_ref().to_path_buf(),
            entries: BTreeMap::new(),
            priority: 100,
        };
        provider.load_config()?;
        Ok(provider)
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    fn load_config(&mut self) -> ConfigResult<()> {
        debug!("加载 properties 配置文件: {}", self.file_path.display());
        let content = read_config_file(&self.file_path)?;
        self.entries = parse_properties(&content);
        debug!("properties 配置文件加载完成, 共 {} 项", self.entries.len());
        Ok(())
    }
}

/// 解析 properties 文本
pub fn parse_properties(content: &str) -> BTreeMap<String, String> {
    let mut entries = BTreeMap::new();
    let mut logical = String::new();

    for raw in content.lines() {
        let line = raw.trim_start();
        if logical.is_empty() && (line.is_empty() || line.starts_with('#') || line.starts_with('!')) {
            continue;
        }

        let trailing = line.chars().rev().take_while(|c| *c == '\\').count();
        if trailing % 2 == 1 {
            logical.push_str(&line[..line.len() - 1]);
            continue;
        }

        logical.push_str(line);
        if let Some((key, value)) = split_entry(&logical) {
            entries.insert(key, value);
        }
        logical.clear();
    }

    if let Some((key, value)) = split_entry(&logical) {
        entries.insert(key, value);
    }
    entries
}

fn split_entry(line: &str) -> Option<(String, String)> {
    let line = line.trim_start();
    if line.is_empty() {
        return None;
    }

    let (key, value) = match find_separator(line) {
        None => (line, ""),
        Some(index) => {
            let rest = &line[index..];
            let value = if rest.starts_with('=') || rest.starts_with(':') {
                &rest[1..]
            } else {
                let rest = rest.trim_start();
                rest.strip_prefix(['=', ':']).unwrap_or(rest)
            };
            (&line[..index], value)
        }
    };

    let key = unescape(key);
    if key.is_empty() {
        None
    } else {
        Some((key, unescape(value)))
    }
}

/// 查找第一个未转义的分隔符（`=`、`:` 或空白）
fn find_separator(line: &str) -> Option<usize> {
    let mut escaped = false;
    for (index, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || c.is_whitespace() {
            return Some(index);
        }
    }
    None
}

/// 解码转义序列并去除未转义的首尾空白
fn unescape(raw: &str) -> String {
    let mut decoded: Vec<(char, bool)> = Vec::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            decoded.push((c, false));
            continue;
        }
        let Some(next) = chars.next() else {
            break;
        };
        match next {
            't' => decoded.push(('\t', true)),
            'n' => decoded.push(('\n', true)),
            'r' => decoded.push(('\r', true)),
            'f' => decoded.push(('\u{0C}', true)),
            'u' => {
                let hex: String = chars.by_ref().take(4).collect();
                let code = (hex.len() == 4)
                    .then(|| u32::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .and_then(char::from_u32);
                match code {
                    Some(ch) => decoded.push((ch, true)),
                    // 非法的 \u 序列按字面保留
                    None => {
                        decoded.push(('u', true));
                        decoded.extend(hex.chars().map(|ch| (ch, false)));
                    }
                }
            }
            other => decoded.push((other, true)),
        }
    }

    let is_padding = |(c, escaped): &(char, bool)| !escaped && c.is_whitespace();
    let start = decoded.iter().position(|e| !is_padding(e)).unwrap_or(decoded.len());
    let end = decoded
        .iter()
        .rposition(|e| !is_padding(e))
        .map_or(start, |index| index + 1);
    decoded[start..end].iter().map(|(c, _)| *c).collect()
}

#[async_trait]
impl ConfigProvider for PropertiesConfigProvider {
    async fn get_configuration(&self, key: &str) -> ConfigResult<Value> {
        self.entries
            .get(key)
            .map(|value| Value::String(value.clone()))
            .ok_or_else(|| ConfigError::KeyNotFound { key: key.to_string() })
    }

    async fn reload(&mut self) -> ConfigResult<()> {
        self.load_config()
    }

    async fn contains_key(&self, key: &str) -> ConfigResult<bool> {
        Ok(self.entries.contains_key(key))
    }

    async fn get_all_keys(&self) -> ConfigResult<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }

    fn name(&self) -> &str {
        "PropertiesConfigProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

#[async_trait]
impl FileConfigProvider for PropertiesConfigProvider {
    fn file_path(&self) -> &str {
        self.file_path.to_str().unwrap_or("unknown")
    }

    async fn file_exists(&self) -> bool {
        self.file_path.exists()
    }
}

/// TOML 配置提供者
#[derive(Debug)]
pub struct TomlConfigProvider {
    file_path: PathBuf,
    config: Option<toml::Value>,
    priority: i32,
}

impl TomlConfigProvider {
    /// 创建新的 TOML 配置提供者
    pub fn new<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let mut provider = Self {
            file_path: path.as_ref().to_path_buf(),
            config: None,
            priority: 100, // TOML 文件默认高优先级
        };

        provider.load_config()?;
        Ok(provider)
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    fn load_config(&mut self) -> ConfigResult<()> {
        debug!("加载 TOML 配置文件: {}", self.file_path.display());

        let content = read_config_file(&self.file_path)?;
        self.config = Some(toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            source: Box::new(e),
        })?);

        debug!("TOML 配置文件加载完成");
        Ok(())
    }

    fn toml_to_json(value: &toml::Value) -> Value {
        match value {
            toml::Value::String(s) => Value::String(s.clone()),
            toml::Value::Integer(i) => Value::Number(serde_json::Number::from(*i)),
            toml::Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            toml::Value::Boolean(b) => Value::Bool(*b),
            toml::Value::Array(arr) => Value::Array(arr.iter().map(Self::toml_to_json).collect()),
            toml::Value::Table(table) => Value::Object(
                table
                    .iter()
                    .map(|(k, v)| (k.clone(), Self::toml_to_json(v)))
                    .collect(),
            ),
            toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        }
    }

    /// 从嵌套路径获取值
    fn get_nested_value(&self, path: &str) -> Option<&toml::Value> {
        let mut current = self.config.as_ref()?;
        for part in path.split('.') {
            match current {
                toml::Value::Table(table) => current = table.get(part)?,
                _ => return None,
            }
        }
        Some(current)
    }

    fn collect_keys(table: &toml::Table, prefix: &str, keys: &mut Vec<String>) {
        for (key, value) in table {
            let full_key = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };

            if let toml::Value::Table(nested) = value {
                Self::collect_keys(nested, &full_key, keys);
            }
            keys.push(full_key);
        }
    }
}

#[async_trait]
impl ConfigProvider for TomlConfigProvider {
    async fn get_configuration(&self, key: &str) -> ConfigResult<Value> {
        self.get_nested_value(key)
            .map(Self::toml_to_json)
            .ok_or_else(|| ConfigError::KeyNotFound { key: key.to_string() })
    }

    async fn reload(&mut self) -> ConfigResult<()> {
        self.load_config()
    }

    async fn contains_key(&self, key: &str) -> ConfigResult<bool> {
        Ok(self.get_nested_value(key).is_some())
    }

    async fn get_all_keys(&self) -> ConfigResult<Vec<String>> {
        let mut keys = Vec::new();
        if let Some(toml::Value::Table(table)) = &self.config {
            Self::collect_keys(table, "", &mut keys);
        }
        Ok(keys)
    }

    fn name(&self) -> &str {
        "TomlConfigProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

#[async_trait]
impl FileConfigProvider for TomlConfigProvider {
    fn file_path(&self) -> &str {
        self.file_path.to_str().unwrap_or("unknown")
    }

    async fn file_exists(&self) -> bool {
        self.file_path.exists()
    }
}

/// 环境变量配置提供者
///
/// `PREFIX_SCAN_PACKAGE` 映射为 `scan.package`，`PREFIX_CONTEXT_LAZY_INIT` 可以用
/// `context.lazy-init` 或 `context.lazy.init` 查到
#[derive(Debug)]
pub struct EnvironmentConfigProviderImpl {
    prefix: String,
    separator: String,
    priority: i32,
    env_vars: HashMap<String, String>,
}

impl EnvironmentConfigProviderImpl {
    /// 创建新的环境变量配置提供者
    pub fn new(prefix: impl Into<String>) -> Self {
        let mut provider = Self::empty(prefix.into());
        provider.load_vars(std::env::vars());
        provider
    }

    /// 使用给定变量集合创建提供者，不读取进程环境
    pub fn from_vars(
        prefix: impl Into<String>,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        let mut provider = Self::empty(prefix.into());
        provider.load_vars(vars);
        provider
    }

    fn empty(prefix: String) -> Self {
        Self {
            prefix,
            separator: "_".to_string(),
            priority: 200, // 环境变量最高优先级
            env_vars: HashMap::new(),
        }
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    fn load_vars(&mut self, vars: impl IntoIterator<Item = (String, String)>) {
        debug!("加载环境变量，前缀: {}", self.prefix);

        self.env_vars = vars
            .into_iter()
            .filter_map(|(key, value)| self.env_key_to_config_key(&key).map(|key| (key, value)))
            .collect();

        debug!("加载了 {} 个环境变量", self.env_vars.len());
    }

    /// 将环境变量键转换为配置键，前缀不匹配时返回 `None`
    fn env_key_to_config_key(&self, env_key: &str) -> Option<String> {
        let key = env_key
            .strip_prefix(&self.prefix)?
            .strip_prefix(&self.separator)?;
        if key.is_empty() {
            return None;
        }
        Some(key.replace(&self.separator, ".").to_lowercase())
    }

    /// 环境变量名中不能出现 `-`，查找时将其视作 `.`
    fn lookup(&self, key: &str) -> Option<&String> {
        self.env_vars
            .get(key)
            .or_else(|| self.env_vars.get(&key.replace('-', ".")))
    }

    fn parse_value(value: &str) -> Value {
        if let Ok(flag) = value.parse::<bool>() {
            Value::Bool(flag)
        } else if let Ok(int_val) = value.parse::<i64>() {
            Value::Number(serde_json::Number::from(int_val))
        } else if let Some(number) = value
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
        {
            Value::Number(number)
        } else {
            Value::String(value.to_string())
        }
    }
}

#[async_trait]
impl ConfigProvider for EnvironmentConfigProviderImpl {
    async fn get_configuration(&self, key: &str) -> ConfigResult<Value> {
        self.lookup(key)
            .map(|value| Self::parse_value(value))
            .ok_or_else(|| ConfigError::KeyNotFound { key: key.to_string() })
    }

    async fn reload(&mut self) -> ConfigResult<()> {
        self.load_vars(std::env::vars());
        Ok(())
    }

    async fn contains_key(&self, key: &str) -> ConfigResult<bool> {
        Ok(self.lookup(key).is_some())
    }

    async fn get_all_keys(&self) -> ConfigResult<Vec<String>> {
        Ok(self.env_vars.keys().cloned().collect())
    }

    fn name(&self) -> &str {
        "EnvironmentConfigProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

#[async_trait]
impl EnvironmentConfigProviderTrait for EnvironmentConfigProviderImpl {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn separator(&self) -> &str {
        &self.separator
    }

    async fn get_matching_env_vars(&self) -> ConfigResult<HashMap<String, String>> {
        Ok(self.env_vars.clone())
    }
}

/// 内存配置提供者
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigProvider {
    values: BTreeMap<String, Value>,
    priority: i32,
}

impl MemoryConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加配置项
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// 设置配置项
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

#[async_trait]
impl ConfigProvider for MemoryConfigProvider {
    async fn get_configuration(&self, key: &str) -> ConfigResult<Value> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| ConfigError::KeyNotFound { key: key.to_string() })
    }

    async fn reload(&mut self) -> ConfigResult<()> {
        Ok(())
    }

    async fn contains_key(&self, key: &str) -> ConfigResult<bool> {
        Ok(self.values.contains_key(key))
    }

    async fn get_all_keys(&self) -> ConfigResult<Vec<String>> {
        Ok(self.values.keys().cloned().collect())
    }

    fn name(&self) -> &str {
        "MemoryConfigProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}
