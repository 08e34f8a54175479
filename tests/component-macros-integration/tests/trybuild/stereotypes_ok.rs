use component_macros::{capability, component, controller, service};
use infrastructure_common::{ManagedType, NamedType, TypeCatalog};
use std::sync::Arc;

#[capability(namespace = "com.demo")]
pub trait GreetingService {
    fn greet(&self, name: &str) -> String;
}

#[service(namespace = "com.demo", implements(GreetingService))]
#[derive(Default)]
pub struct EnglishGreetingServiceImpl;

impl GreetingService for EnglishGreetingServiceImpl {
    fn greet(&self, name: &str) -> String {
        format!("Hello, {}!", name)
    }
}

#[controller(namespace = "com.demo")]
#[derive(Default)]
pub struct GreetingController {
    #[autowired]
    greeting_service: Option<Arc<dyn GreetingService>>,
}

#[component]
#[derive(Default)]
struct Unscoped;

fn main() {
    assert_eq!(
        GreetingController::fully_qualified_name(),
        "com.demo.GreetingController"
    );
    assert_eq!(GreetingController::descriptor().injection_points().len(), 1);
    assert_eq!(Unscoped::simple_name(), "Unscoped");

    let catalog = TypeCatalog::from_registered().unwrap();
    assert_eq!(catalog.len(), 4);

    let controller = GreetingController::default();
    assert!(controller.greeting_service.is_none());
}
