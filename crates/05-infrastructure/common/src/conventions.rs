//! 约定规范定义
//!
//! Bean 命名与类型全限定名的约定

/// 命名空间分隔符
pub const NAMESPACE_SEPARATOR: char = '.';

/// 首字母变为小写，作为 Bean 的默认名称
pub fn lower_first_case(simple_name: &str) -> String {
    let mut chars = simple_name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// 拼接命名空间与简单类型名
pub fn qualify(namespace: &str, simple_name: &str) -> String {
    if namespace.is_empty() {
        simple_name.to_string()
    } else {
        format!("{}{}{}", namespace, NAMESPACE_SEPARATOR, simple_name)
    }
}

/// 将 Rust 模块路径转换为点分隔的命名空间
pub fn module_path_to_namespace(module_path: &str) -> String {
    module_path.replace("::", ".")
}

/// 拆分点分隔的命名空间路径，空路径表示根命名空间
///
/// 路径中出现空段（如 `com..demo`）时返回 `None`
pub fn namespace_segments(namespace: &str) -> Option<Vec<&str>> {
    if namespace.is_empty() {
        return Some(Vec::new());
    }

    let segments: Vec<&str> = namespace.split(NAMESPACE_SEPARATOR).collect();
    if segments.iter().any(|segment| segment.trim().is_empty()) {
        None
    } else {
        Some(segments)
    }
}
