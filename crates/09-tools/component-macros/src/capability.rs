//! 能力声明宏实现

use crate::component::namespace_expr;
use crate::utils::registration_fn_name;
use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse::Parse, parse::ParseStream, parse_macro_input, parse_quote, punctuated::Punctuated,
    Error, Expr, ItemTrait, Lit, Meta, Result, Token, TypeParamBound,
};

/// 能力配置参数
#[derive(Default)]
pub struct CapabilityArgs {
    /// 显式命名空间，缺省时使用模块路径
    pub namespace: Option<String>,
}

impl Parse for CapabilityArgs {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut args = CapabilityArgs::default();

        for meta in Punctuated::<Meta, Token![,]>::parse_terminated(input)? {
            match meta {
                Meta::NameValue(nv) if nv.path.is_ident("namespace") => match &nv.value {
                    Expr::Lit(expr_lit) => match &expr_lit.lit {
                        Lit::Str(lit_str) => args.namespace = Some(lit_str.value()),
                        other => return Err(Error::new_spanned(other, "namespace 必须是字符串")),
                    },
                    other => return Err(Error::new_spanned(other, "namespace 必须是字符串")),
                },
                other => {
                    return Err(Error::new_spanned(other, "不支持的能力参数，可用参数: namespace"));
                }
            }
        }

        Ok(args)
    }
}

fn has_supertrait(item: &ItemTrait, name: &str) -> bool {
    item.supertraits.iter().any(|bound| match bound {
        TypeParamBound::Trait(bound) => bound
            .path
            .segments
            .last()
            .map(|segment| segment.ident == name)
            .unwrap_or(false),
        _ => false,
    })
}

/// 补齐 `Send + Sync` 约束，使能力视图可以跨线程共享
pub fn ensure_thread_safe(item: &mut ItemTrait) {
    if !has_supertrait(item, "Send") {
        item.supertraits.push(parse_quote!(::core::marker::Send));
    }
    if !has_supertrait(item, "Sync") {
        item.supertraits.push(parse_quote!(::core::marker::Sync));
    }
    if item.colon_token.is_none() {
        item.colon_token = Some(Default::default());
    }
}

/// 实现 #[capability] 宏
pub fn capability_impl(args: TokenStream, input: TokenStream) -> TokenStream {
    let capability_args = if args.is_empty() {
        CapabilityArgs::default()
    } else {
        match syn::parse::<CapabilityArgs>(args) {
            Ok(args) => args,
            Err(e) => return e.to_compile_error().into(),
        }
    };

    let item = parse_macro_input!(input as ItemTrait);

    match expand_capability(capability_args, item) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand_capability(args: CapabilityArgs, mut item: ItemTrait) -> Result<proc_macro2::TokenStream> {
    if !item.generics.params.is_empty() {
        return Err(Error::new_spanned(&item.generics, "能力不支持泛型参数"));
    }

    ensure_thread_safe(&mut item);

    let trait_name = &item.ident;
    let simple_name = trait_name.to_string();
    let namespace = namespace_expr(args.namespace.as_deref());
    let registration_fn = registration_fn_name("capability", trait_name);

    Ok(quote! {
        #item

        impl ::infrastructure_common::NamedType for dyn #trait_name {
            fn simple_name() -> &'static str {
                #simple_name
            }

            fn namespace() -> ::std::string::String {
                #namespace
            }
        }

        #[::ctor::ctor]
        fn #registration_fn() {
            ::infrastructure_common::submit_type_descriptor(|| {
                ::infrastructure_common::TypeDescriptor::capability::<dyn #trait_name>()
            });
        }
    })
}
