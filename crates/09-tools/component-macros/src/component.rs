//! 组件注册宏实现

use crate::utils::{extract_generic_type, is_arc_type, is_option_type, registration_fn_name};
use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse::Parse, parse::ParseStream, parse_macro_input, punctuated::Punctuated, Error, Expr,
    Field, Fields, Ident, ItemStruct, Lit, LitStr, Meta, Path, Result, Token, Type,
};

/// 依赖注入字段标记
const AUTOWIRED: &str = "autowired";

/// 组件构造型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stereotype {
    Component,
    Service,
    Controller,
    Repository,
}

impl Stereotype {
    fn marker(self) -> proc_macro2::TokenStream {
        match self {
            Stereotype::Component => quote! { ::infrastructure_common::MarkerAttribute::component() },
            Stereotype::Service => quote! { ::infrastructure_common::MarkerAttribute::service() },
            Stereotype::Controller => {
                quote! { ::infrastructure_common::MarkerAttribute::controller() }
            }
            Stereotype::Repository => {
                quote! { ::infrastructure_common::MarkerAttribute::repository() }
            }
        }
    }
}

/// 组件配置参数
#[derive(Default)]
pub struct ComponentArgs {
    /// 显式 Bean 名称
    pub name: Option<String>,
    /// 显式命名空间，缺省时使用模块路径
    pub namespace: Option<String>,
    /// 是否懒加载
    pub lazy: bool,
    /// 实现的能力
    pub implements: Vec<Path>,
    /// 自定义构造函数
    pub constructor: Option<Expr>,
}

impl Parse for ComponentArgs {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut args = ComponentArgs::default();

        let parsed = Punctuated::<Meta, Token![,]>::parse_terminated(input)?;

        for meta in parsed {
            match meta {
                Meta::Path(path) if path.is_ident("lazy") => {
                    args.lazy = true;
                }
                Meta::NameValue(nv) if nv.path.is_ident("name") => {
                    args.name = Some(string_value(&nv.value)?);
                }
                Meta::NameValue(nv) if nv.path.is_ident("namespace") => {
                    args.namespace = Some(string_value(&nv.value)?);
                }
                Meta::NameValue(nv) if nv.path.is_ident("constructor") => {
                    args.constructor = Some(nv.value);
                }
                Meta::List(list) if list.path.is_ident("implements") => {
                    let paths =
                        list.parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated)?;
                    args.implements.extend(paths);
                }
                other => {
                    return Err(Error::new_spanned(
                        other,
                        "不支持的组件参数，可用参数: name, namespace, lazy, implements(..), constructor",
                    ));
                }
            }
        }

        Ok(args)
    }
}

fn string_value(expr: &Expr) -> Result<String> {
    match expr {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            Lit::Str(lit_str) => Ok(lit_str.value()),
            other => Err(Error::new_spanned(other, "参数值必须是字符串")),
        },
        other => Err(Error::new_spanned(other, "参数值必须是字符串")),
    }
}

/// 注入字段
pub struct AutowiredField {
    pub field: Ident,
    pub target: Type,
    pub qualifier: Option<String>,
}

/// 解析 `#[autowired]` / `#[autowired("name")]` / `#[autowired(name = "name")]`
fn parse_autowired(attr: &syn::Attribute) -> Result<Option<String>> {
    match &attr.meta {
        Meta::Path(_) => Ok(None),
        Meta::List(_) => attr.parse_args_with(|input: ParseStream| {
            if input.peek(LitStr) {
                let lit: LitStr = input.parse()?;
                return Ok(Some(lit.value()));
            }
            let key: Ident = input.parse()?;
            if key != "name" {
                return Err(Error::new(key.span(), "autowired 只支持 name 参数"));
            }
            input.parse::<Token![=]>()?;
            let lit: LitStr = input.parse()?;
            Ok(Some(lit.value()))
        }),
        Meta::NameValue(nv) => Err(Error::new_spanned(nv, "请使用 #[autowired(\"name\")] 形式")),
    }
}

/// 提取注入字段，并从字段上移除 `#[autowired]` 属性
pub fn take_autowired_fields(fields: &mut Fields) -> Result<Vec<AutowiredField>> {
    let mut autowired = Vec::new();

    let named = match fields {
        Fields::Named(named) => named,
        Fields::Unit => return Ok(autowired),
        Fields::Unnamed(unnamed) => {
            if let Some(field) = unnamed
                .unnamed
                .iter()
                .find(|field| has_autowired(field))
            {
                return Err(Error::new_spanned(field, "元组结构体不支持字段注入"));
            }
            return Ok(autowired);
        }
    };

    for field in named.named.iter_mut() {
        let mut qualifier = None;
        let mut tagged = false;
        let mut kept = Vec::with_capacity(field.attrs.len());
        for attr in field.attrs.drain(..) {
            if attr.path().is_ident(AUTOWIRED) {
                qualifier = parse_autowired(&attr)?;
                tagged = true;
            } else {
                kept.push(attr);
            }
        }
        field.attrs = kept;

        if !tagged {
            continue;
        }

        let target = injection_target(&field.ty).ok_or_else(|| {
            Error::new_spanned(&field.ty, "注入字段的类型必须是 Option<Arc<T>>")
        })?;
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        autowired.push(AutowiredField {
            field: ident,
            target: target.clone(),
            qualifier,
        });
    }

    Ok(autowired)
}

fn has_autowired(field: &Field) -> bool {
    field.attrs.iter().any(|attr| attr.path().is_ident(AUTOWIRED))
}

/// `Option<Arc<T>>` 中的 `T`
fn injection_target(ty: &Type) -> Option<&Type> {
    if !is_option_type(ty) {
        return None;
    }
    let arc = extract_generic_type(ty)?;
    if !is_arc_type(arc) {
        return None;
    }
    extract_generic_type(arc)
}

/// 生成命名空间表达式
pub fn namespace_expr(namespace: Option<&str>) -> proc_macro2::TokenStream {
    match namespace {
        Some(namespace) => quote! { ::std::string::String::from(#namespace) },
        None => quote! {
            ::infrastructure_common::module_path_to_namespace(::core::module_path!())
        },
    }
}

/// 实现构造型宏
pub fn stereotype_impl(stereotype: Stereotype, args: TokenStream, input: TokenStream) -> TokenStream {
    let component_args = if args.is_empty() {
        ComponentArgs::default()
    } else {
        match syn::parse::<ComponentArgs>(args) {
            Ok(args) => args,
            Err(e) => return e.to_compile_error().into(),
        }
    };

    let input_struct = parse_macro_input!(input as ItemStruct);

    match expand_stereotype(stereotype, component_args, input_struct) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand_stereotype(
    stereotype: Stereotype,
    args: ComponentArgs,
    mut input_struct: ItemStruct,
) -> Result<proc_macro2::TokenStream> {
    if !input_struct.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input_struct.generics,
            "组件类型不支持泛型参数",
        ));
    }

    let autowired = take_autowired_fields(&mut input_struct.fields)?;

    let struct_name = &input_struct.ident;
    let simple_name = struct_name.to_string();
    let namespace = namespace_expr(args.namespace.as_deref());

    let mut marker = stereotype.marker();
    if let Some(name) = &args.name {
        marker = quote! { #marker.with_value(#name) };
    }

    let constructor = match &args.constructor {
        Some(constructor) => quote! { .with_constructor::<Self, _, _>(#constructor) },
        None => quote! {
            .with_constructor(|| {
                ::core::result::Result::Ok::<Self, ::infrastructure_common::BoxError>(
                    <Self as ::core::default::Default>::default(),
                )
            })
        },
    };

    let capabilities = args.implements.iter().map(|capability| {
        quote! {
            .implements::<Self, dyn #capability, _>(
                |this: ::std::sync::Arc<Self>| -> ::std::sync::Arc<dyn #capability> { this },
            )
        }
    });

    let injection_points = autowired.iter().map(|point| {
        let field = &point.field;
        let field_name = field.to_string();
        let target = &point.target;
        let qualifier = point
            .qualifier
            .as_ref()
            .map(|qualifier| quote! { .with_qualifier(#qualifier) });
        quote! {
            .with_injection_point(
                ::infrastructure_common::InjectionPoint::new::<Self, #target, _>(
                    #field_name,
                    |target: &mut Self, dependency: ::std::sync::Arc<#target>| {
                        target.#field = ::core::option::Option::Some(dependency);
                    },
                )
                #qualifier
            )
        }
    });

    let lazy = args.lazy;
    let registration_fn = registration_fn_name("component", struct_name);

    Ok(quote! {
        #input_struct

        impl ::infrastructure_common::NamedType for #struct_name {
            fn simple_name() -> &'static str {
                #simple_name
            }

            fn namespace() -> ::std::string::String {
                #namespace
            }
        }

        impl ::infrastructure_common::ManagedType for #struct_name {
            fn descriptor() -> ::infrastructure_common::TypeDescriptor {
                ::infrastructure_common::TypeDescriptor::concrete::<Self>()
                    #constructor
                    .with_marker(#marker)
                    #(#capabilities)*
                    #(#injection_points)*
                    .lazy(#lazy)
            }
        }

        // 程序启动时登记类型描述符
        #[::ctor::ctor]
        fn #registration_fn() {
            ::infrastructure_common::submit_type_descriptor(
                <#struct_name as ::infrastructure_common::ManagedType>::descriptor,
            );
        }
    })
}
