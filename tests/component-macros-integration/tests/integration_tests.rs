//! Centralized integration tests for component-macros crate

use component_macros::{capability, component, controller, repository, service};
use config_impl::MemoryConfigProvider;
use di_abstractions::{ApplicationContext, BeanFactory, BeanFactoryExt, ContainerConfig};
use di_impl::DefaultApplicationContext;
use infrastructure_common::{
    module_path_to_namespace, BoxError, ManagedType, NamedType, TypeCatalog, TypeKind,
};
use infrastructure_composition::ApplicationContextBuilder;
use std::collections::HashMap;
use std::sync::Arc;

#[capability(namespace = "com.shop")]
pub trait PriceCatalog {
    fn price_of(&self, sku: &str) -> Option<u32>;
}

#[repository(namespace = "com.shop", implements(PriceCatalog), constructor = Self::create)]
pub struct InMemoryPriceCatalog {
    prices: HashMap<String, u32>,
}

impl InMemoryPriceCatalog {
    fn create() -> Result<Self, BoxError> {
        let mut prices = HashMap::new();
        prices.insert("apple".to_string(), 3);
        prices.insert("pear".to_string(), 5);
        Ok(Self { prices })
    }
}

impl PriceCatalog for InMemoryPriceCatalog {
    fn price_of(&self, sku: &str) -> Option<u32> {
        self.prices.get(sku).copied()
    }
}

#[service(namespace = "com.shop", name = "checkout")]
#[derive(Default)]
pub struct CheckoutService {
    #[autowired]
    prices: Option<Arc<dyn PriceCatalog>>,
    #[autowired("inMemoryPriceCatalog")]
    concrete: Option<Arc<InMemoryPriceCatalog>>,
}

impl CheckoutService {
    fn total(&self, items: &[&str]) -> u32 {
        let Some(prices) = &self.prices else {
            return 0;
        };
        items.iter().filter_map(|sku| prices.price_of(sku)).sum()
    }
}

#[controller(namespace = "com.shop.web", lazy)]
#[derive(Default)]
pub struct CheckoutController {
    #[autowired(name = "checkout")]
    checkout: Option<Arc<CheckoutService>>,
}

mod tracking {
    use super::component;

    #[component]
    #[derive(Debug, Default)]
    pub struct Tracker;
}

fn registered_catalog() -> Arc<TypeCatalog> {
    Arc::new(TypeCatalog::from_registered().unwrap())
}

#[test]
fn test_generated_names() {
    assert_eq!(InMemoryPriceCatalog::simple_name(), "InMemoryPriceCatalog");
    assert_eq!(
        InMemoryPriceCatalog::fully_qualified_name(),
        "com.shop.InMemoryPriceCatalog"
    );
    assert_eq!(<dyn PriceCatalog as NamedType>::fully_qualified_name(), "com.shop.PriceCatalog");
    assert_eq!(
        CheckoutController::fully_qualified_name(),
        "com.shop.web.CheckoutController"
    );
    assert_eq!(
        tracking::Tracker::namespace(),
        format!("{}.tracking", module_path_to_namespace(module_path!()))
    );
}

#[test]
fn test_generated_descriptors() {
    let repository = InMemoryPriceCatalog::descriptor();
    assert_eq!(repository.stereotype().unwrap().name, "repository");
    assert_eq!(repository.capabilities().len(), 1);
    assert_eq!(repository.capabilities()[0].name(), "com.shop.PriceCatalog");
    assert!(!repository.is_lazy());

    let service = CheckoutService::descriptor();
    assert_eq!(service.stereotype().unwrap().explicit_value(), Some("checkout"));
    let points = service.injection_points();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].field_name(), "prices");
    assert_eq!(points[0].qualifier(), None);
    assert_eq!(points[0].target_name(), "com.shop.PriceCatalog");
    assert_eq!(points[1].target_name(), "inMemoryPriceCatalog");

    let controller = CheckoutController::descriptor();
    assert!(controller.is_lazy());
    assert_eq!(controller.injection_points()[0].target_name(), "checkout");
}

#[test]
fn test_types_registered_at_startup() {
    let catalog = registered_catalog();

    let capability = catalog.find("com.shop.PriceCatalog").unwrap();
    assert_eq!(capability.kind(), TypeKind::Capability);
    assert!(catalog.find("com.shop.CheckoutService").is_some());
    assert!(catalog.find("com.shop.web.CheckoutController").is_some());
    assert!(catalog
        .find(&tracking::Tracker::fully_qualified_name())
        .is_some());
}

#[test]
fn test_bare_component_is_not_registered() {
    let context = DefaultApplicationContext::refresh(
        registered_catalog(),
        ContainerConfig::new(tracking::Tracker::namespace()),
    )
    .unwrap();

    assert!(tracking::Tracker::descriptor().stereotype().is_none());
    assert!(context.bean_definition_names().is_empty());
    assert!(!context.contains_bean("tracker"));
}

#[test]
fn test_container_wires_macro_components() {
    let context =
        DefaultApplicationContext::refresh(registered_catalog(), ContainerConfig::new("com.shop"))
            .unwrap();

    assert_eq!(
        context.bean_definition_names(),
        vec![
            "checkout",
            "inMemoryPriceCatalog",
            "com.shop.PriceCatalog",
            "checkoutController"
        ]
    );

    let checkout = context.get_bean_as::<Arc<CheckoutService>>("checkout").unwrap();
    assert_eq!(checkout.total(&["apple", "pear", "plum"]), 8);

    let by_type = context.get_bean_of::<dyn PriceCatalog>().unwrap();
    assert!(Arc::ptr_eq(checkout.prices.as_ref().unwrap(), &by_type));
    let concrete = checkout.concrete.as_ref().unwrap();
    assert!(Arc::ptr_eq(
        concrete,
        &context.get_bean_of::<InMemoryPriceCatalog>().unwrap()
    ));

    // 懒加载控制器在首次访问时创建
    assert_eq!(context.stats().instantiated_beans, 2);
    let controller = context
        .get_bean_as::<Arc<CheckoutController>>("checkoutController")
        .unwrap();
    assert!(Arc::ptr_eq(controller.checkout.as_ref().unwrap(), &checkout));
    assert_eq!(context.stats().instantiated_beans, 3);
    assert!(context.contains_bean("com.shop.web.CheckoutController"));
}

#[tokio::test]
async fn test_builder_uses_registered_types() {
    let context = ApplicationContextBuilder::new()
        .add_config_provider(
            MemoryConfigProvider::new()
                .with_value("scan.package", " com.shop.web ")
                .with_value("context.lazy-init", "true"),
        )
        .build()
        .await
        .unwrap();

    assert_eq!(context.config().scan_package, "com.shop.web");
    assert_eq!(context.bean_definition_names(), vec!["checkoutController"]);
    assert_eq!(context.stats().instantiated_beans, 0);

    // checkout 不在扫描范围内, 严格模式下注入失败
    assert!(context.get_bean("checkoutController").is_err());
}
