//! 元数据定义
//!
//! 用显式的类型描述符代替运行时反射：构造方式、构造型标记、实现的能力以及
//! 需要注入的字段都在描述符中登记，由过程宏生成或手工构建。

use crate::conventions;
use crate::errors::{BoxError, DependencyError, DependencyResult};
use crate::wrapper::BeanWrapper;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// 组件元标记名称
///
/// 被此元标记修饰的标记（如 `service`、`controller`）都视为组件构造型
pub const COMPONENT: &str = "component";

/// 具名类型
///
/// 为具体类型和能力（`dyn Trait`）提供命名空间与全限定名
pub trait NamedType {
    /// 简单类型名
    fn simple_name() -> &'static str;

    /// 点分隔的命名空间
    fn namespace() -> String;

    /// 全限定名
    fn fully_qualified_name() -> String {
        conventions::qualify(&Self::namespace(), Self::simple_name())
    }
}

/// 类型种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// 可实例化的具体类型
    Concrete,
    /// 能力声明（接口），不能直接实例化
    Capability,
}

/// 标记属性
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerAttribute {
    /// 标记名称
    pub name: &'static str,
    /// 修饰此标记的元标记
    pub meta_markers: &'static [&'static str],
    /// 标记携带的值（构造型上为自定义 Bean 名称）
    pub value: Option<String>,
}

impl MarkerAttribute {
    /// 创建新的标记属性
    pub const fn new(name: &'static str, meta_markers: &'static [&'static str]) -> Self {
        Self {
            name,
            meta_markers,
            value: None,
        }
    }

    /// `component` 元标记本身
    ///
    /// 元标记没有被自身修饰，单独使用时不会让类型成为 Bean
    pub const fn component() -> Self {
        Self::new(COMPONENT, &[])
    }

    /// `service` 构造型
    pub const fn service() -> Self {
        Self::new("service", &[COMPONENT])
    }

    /// `controller` 构造型
    pub const fn controller() -> Self {
        Self::new("controller", &[COMPONENT])
    }

    /// `repository` 构造型
    pub const fn repository() -> Self {
        Self::new("repository", &[COMPONENT])
    }

    /// 设置标记值
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// 是否为组件构造型（被组件元标记修饰）
    pub fn is_component(&self) -> bool {
        self.meta_markers.contains(&COMPONENT)
    }

    /// 去除空白后的非空标记值
    pub fn explicit_value(&self) -> Option<&str> {
        self.value
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

type UpcastFn =
    Arc<dyn Fn(&Arc<dyn Any + Send + Sync>) -> Option<(TypeId, Arc<dyn Any + Send + Sync>)> + Send + Sync>;

/// 能力绑定：具体类型实现的一个能力，以及把实例转换为该能力视图的函数
#[derive(Clone)]
pub struct CapabilityBinding {
    name: String,
    upcast: UpcastFn,
}

impl CapabilityBinding {
    /// 创建能力绑定，`cast` 负责把 `Arc<T>` 转换为 `Arc<C>`
    pub fn new<T, C, F>(cast: F) -> Self
    where
        T: Send + Sync + 'static,
        C: ?Sized + NamedType + Send + Sync + 'static,
        F: Fn(Arc<T>) -> Arc<C> + Send + Sync + 'static,
    {
        Self {
            name: C::fully_qualified_name(),
            upcast: Arc::new(move |instance: &Arc<dyn Any + Send + Sync>| {
                let concrete = instance.clone().downcast::<T>().ok()?;
                let view: Arc<C> = cast(concrete);
                Some((
                    TypeId::of::<Arc<C>>(),
                    Arc::new(view) as Arc<dyn Any + Send + Sync>,
                ))
            }),
        }
    }

    /// 能力的全限定名
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn upcast(
        &self,
        instance: &Arc<dyn Any + Send + Sync>,
    ) -> Option<(TypeId, Arc<dyn Any + Send + Sync>)> {
        (self.upcast)(instance)
    }
}

impl fmt::Debug for CapabilityBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityBinding")
            .field("name", &self.name)
            .finish()
    }
}

type AssignFn = Arc<dyn Fn(&mut (dyn Any + Send), &BeanWrapper) -> Result<(), String> + Send + Sync>;

/// 注入点：一个需要由容器注入依赖的字段
#[derive(Clone)]
pub struct InjectionPoint {
    field_name: &'static str,
    qualifier: Option<String>,
    declared_type: String,
    assign: AssignFn,
}

impl InjectionPoint {
    /// 创建注入点，`setter` 负责把依赖写入目标字段
    pub fn new<T, D, F>(field_name: &'static str, setter: F) -> Self
    where
        T: 'static,
        D: ?Sized + NamedType + Send + Sync + 'static,
        F: Fn(&mut T, Arc<D>) + Send + Sync + 'static,
    {
        Self {
            field_name,
            qualifier: None,
            declared_type: D::fully_qualified_name(),
            assign: Arc::new(
                move |target: &mut (dyn Any + Send), dependency: &BeanWrapper| -> Result<(), String> {
                    let target = target.downcast_mut::<T>().ok_or_else(|| {
                        format!("注入目标不是 {}", std::any::type_name::<T>())
                    })?;
                    let handle = dependency.handle::<Arc<D>>().ok_or_else(|| {
                        format!(
                            "Bean {} 无法提供 {}",
                            dependency.wrapped_type(),
                            std::any::type_name::<D>()
                        )
                    })?;
                    setter(target, handle);
                    Ok(())
                },
            ),
        }
    }

    /// 设置显式依赖名称
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    /// 字段名称
    pub fn field_name(&self) -> &'static str {
        self.field_name
    }

    /// 显式依赖名称
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// 字段声明类型的全限定名
    pub fn declared_type(&self) -> &str {
        &self.declared_type
    }

    /// 目标 Bean 名称：去除空白后的显式名称，否则为声明类型的全限定名
    pub fn target_name(&self) -> &str {
        self.qualifier
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.declared_type)
    }

    /// 把依赖注入到目标实例
    pub fn inject(
        &self,
        bean_name: &str,
        target: &mut (dyn Any + Send),
        dependency: &BeanWrapper,
    ) -> DependencyResult<()> {
        (self.assign)(target, dependency).map_err(|message| DependencyError::InjectionFailed {
            bean_name: bean_name.to_string(),
            field: self.field_name.to_string(),
            message,
        })
    }
}

impl fmt::Debug for InjectionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectionPoint")
            .field("field_name", &self.field_name)
            .field("qualifier", &self.qualifier)
            .field("declared_type", &self.declared_type)
            .finish()
    }
}

type ConstructorFn = Arc<dyn Fn() -> Result<Box<dyn Any + Send>, BoxError> + Send + Sync>;
type SealFn = fn(Box<dyn Any + Send>, &str, &[CapabilityBinding]) -> DependencyResult<BeanWrapper>;

/// 类型描述符
#[derive(Clone)]
pub struct TypeDescriptor {
    simple_name: &'static str,
    namespace: String,
    kind: TypeKind,
    markers: Vec<MarkerAttribute>,
    capabilities: Vec<CapabilityBinding>,
    injection_points: Vec<InjectionPoint>,
    lazy: bool,
    constructor: Option<ConstructorFn>,
    seal: Option<SealFn>,
}

impl TypeDescriptor {
    /// 创建具体类型的描述符（尚未登记构造函数）
    pub fn concrete<T>() -> Self
    where
        T: NamedType + Send + Sync + 'static,
    {
        Self {
            simple_name: T::simple_name(),
            namespace: T::namespace(),
            kind: TypeKind::Concrete,
            markers: Vec::new(),
            capabilities: Vec::new(),
            injection_points: Vec::new(),
            lazy: false,
            constructor: None,
            seal: Some(seal_instance::<T>),
        }
    }

    /// 创建可通过 `Default` 无参构造的具体类型描述符
    pub fn default_constructible<T>() -> Self
    where
        T: NamedType + Default + Send + Sync + 'static,
    {
        Self::concrete::<T>().with_constructor(|| Ok::<T, BoxError>(T::default()))
    }

    /// 创建能力声明的描述符
    pub fn capability<C>() -> Self
    where
        C: ?Sized + NamedType,
    {
        Self {
            simple_name: C::simple_name(),
            namespace: C::namespace(),
            kind: TypeKind::Capability,
            markers: Vec::new(),
            capabilities: Vec::new(),
            injection_points: Vec::new(),
            lazy: false,
            constructor: None,
            seal: None,
        }
    }

    /// 登记无参构造函数
    pub fn with_constructor<T, E, F>(mut self, constructor: F) -> Self
    where
        T: Send + 'static,
        E: Into<BoxError>,
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(move || -> Result<Box<dyn Any + Send>, BoxError> {
            constructor()
                .map(|instance| Box::new(instance) as Box<dyn Any + Send>)
                .map_err(Into::into)
        }));
        self
    }

    /// 添加标记属性
    pub fn with_marker(mut self, marker: MarkerAttribute) -> Self {
        self.markers.push(marker);
        self
    }

    /// 声明实现的能力
    pub fn implements<T, C, F>(mut self, cast: F) -> Self
    where
        T: Send + Sync + 'static,
        C: ?Sized + NamedType + Send + Sync + 'static,
        F: Fn(Arc<T>) -> Arc<C> + Send + Sync + 'static,
    {
        self.capabilities.push(CapabilityBinding::new(cast));
        self
    }

    /// 添加注入点
    pub fn with_injection_point(mut self, point: InjectionPoint) -> Self {
        self.injection_points.push(point);
        self
    }

    /// 设置是否懒加载
    pub fn lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    pub fn simple_name(&self) -> &'static str {
        self.simple_name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn fully_qualified_name(&self) -> String {
        conventions::qualify(&self.namespace, self.simple_name)
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn is_capability(&self) -> bool {
        self.kind == TypeKind::Capability
    }

    pub fn markers(&self) -> &[MarkerAttribute] {
        &self.markers
    }

    pub fn capabilities(&self) -> &[CapabilityBinding] {
        &self.capabilities
    }

    pub fn injection_points(&self) -> &[InjectionPoint] {
        &self.injection_points
    }

    pub fn is_lazy(&self) -> bool {
        self.lazy
    }

    /// 第一个组件构造型标记
    pub fn stereotype(&self) -> Option<&MarkerAttribute> {
        self.markers.iter().find(|marker| marker.is_component())
    }

    /// 调用无参构造函数创建尚未注入依赖的实例
    pub fn instantiate(&self) -> Result<Box<dyn Any + Send>, BoxError> {
        match &self.constructor {
            Some(constructor) => constructor(),
            None => Err(format!("类型 {} 没有无参构造函数", self.fully_qualified_name()).into()),
        }
    }

    /// 把注入完成的实例封装为共享的 BeanWrapper
    pub fn seal(&self, instance: Box<dyn Any + Send>) -> DependencyResult<BeanWrapper> {
        let type_name = self.fully_qualified_name();
        match self.seal {
            Some(seal) => seal(instance, &type_name, &self.capabilities),
            None => Err(DependencyError::TypeMismatch {
                name: type_name,
                expected: "可实例化的具体类型".to_string(),
            }),
        }
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.fully_qualified_name())
            .field("kind", &self.kind)
            .field("markers", &self.markers)
            .field("capabilities", &self.capabilities)
            .field("injection_points", &self.injection_points)
            .field("lazy", &self.lazy)
            .field("constructible", &self.constructor.is_some())
            .finish()
    }
}

fn seal_instance<T>(
    instance: Box<dyn Any + Send>,
    type_name: &str,
    capabilities: &[CapabilityBinding],
) -> DependencyResult<BeanWrapper>
where
    T: Send + Sync + 'static,
{
    let instance = instance
        .downcast::<T>()
        .map_err(|_| DependencyError::TypeMismatch {
            name: type_name.to_string(),
            expected: std::any::type_name::<T>().to_string(),
        })?;
    Ok(BeanWrapper::new(Arc::new(*instance), type_name, capabilities))
}
