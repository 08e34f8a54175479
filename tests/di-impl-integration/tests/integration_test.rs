//! Centralized integration tests for di-impl crate
use di_abstractions::{
    ApplicationContext, BeanFactory, BeanFactoryExt, ContainerConfig, StartupPolicy,
};
use di_impl::DefaultApplicationContext;
use infrastructure_common::{
    BoxError, ComponentError, DependencyError, InfrastructureError, InjectionPoint, ManagedType,
    MarkerAttribute, NamedType, TypeCatalog, TypeDescriptor,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

macro_rules! named {
    ($ty:ty, $simple:literal, $ns:literal) => {
        impl NamedType for $ty {
            fn simple_name() -> &'static str {
                $simple
            }

            fn namespace() -> String {
                $ns.to_string()
            }
        }
    };
}

pub trait GreetingService: Send + Sync {
    fn greet(&self, name: &str) -> String;
}

named!(dyn GreetingService, "GreetingService", "com.demo");

#[derive(Debug, Default)]
struct EnglishGreetingServiceImpl;

impl GreetingService for EnglishGreetingServiceImpl {
    fn greet(&self, name: &str) -> String {
        format!("Hello, {}!", name)
    }
}

named!(EnglishGreetingServiceImpl, "EnglishGreetingServiceImpl", "com.demo");

impl ManagedType for EnglishGreetingServiceImpl {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::default_constructible::<Self>()
            .with_marker(MarkerAttribute::service())
            .implements::<Self, dyn GreetingService, _>(|this| this as Arc<dyn GreetingService>)
    }
}

#[derive(Debug, Default)]
struct FrenchGreetingServiceImpl;

impl GreetingService for FrenchGreetingServiceImpl {
    fn greet(&self, name: &str) -> String {
        format!("Bonjour, {} !", name)
    }
}

named!(FrenchGreetingServiceImpl, "FrenchGreetingServiceImpl", "com.demo");

impl ManagedType for FrenchGreetingServiceImpl {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::default_constructible::<Self>()
            .with_marker(MarkerAttribute::service())
            .implements::<Self, dyn GreetingService, _>(|this| this as Arc<dyn GreetingService>)
    }
}

#[derive(Default)]
struct GreetingController {
    greeting_service: Option<Arc<dyn GreetingService>>,
}

impl GreetingController {
    fn say_hello(&self, name: &str) -> Option<String> {
        self.greeting_service.as_ref().map(|service| service.greet(name))
    }
}

named!(GreetingController, "GreetingController", "com.demo");

impl ManagedType for GreetingController {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::default_constructible::<Self>()
            .with_marker(MarkerAttribute::controller())
            .with_injection_point(InjectionPoint::new::<Self, dyn GreetingService, _>(
                "greeting_service",
                |this, dependency| this.greeting_service = Some(dependency),
            ))
    }
}

fn greeting_catalog() -> TypeCatalog {
    let mut catalog = TypeCatalog::new();
    catalog.register_capability::<dyn GreetingService>().unwrap();
    catalog.register::<EnglishGreetingServiceImpl>().unwrap();
    catalog.register::<GreetingController>().unwrap();
    catalog
}

fn refresh(catalog: TypeCatalog, config: ContainerConfig) -> DefaultApplicationContext {
    DefaultApplicationContext::refresh(Arc::new(catalog), config).unwrap()
}

#[test]
fn test_greeting_scenario() {
    let context = refresh(greeting_catalog(), ContainerConfig::new("com.demo"));

    assert_eq!(
        context.bean_definition_names(),
        vec![
            "englishGreetingServiceImpl",
            "com.demo.GreetingService",
            "greetingController"
        ]
    );

    let controller = context
        .get_bean_as::<Arc<GreetingController>>("greetingController")
        .unwrap();
    assert_eq!(controller.say_hello("World").as_deref(), Some("Hello, World!"));

    let by_name = context
        .get_bean_as::<Arc<EnglishGreetingServiceImpl>>("englishGreetingServiceImpl")
        .unwrap();
    let by_capability = context.get_bean_of::<dyn GreetingService>().unwrap();
    assert!(Arc::ptr_eq(
        controller.greeting_service.as_ref().unwrap(),
        &by_capability
    ));
    assert_eq!(
        Arc::as_ptr(&by_capability) as *const u8,
        Arc::as_ptr(&by_name) as *const u8
    );

    let stats = context.stats();
    assert_eq!(stats.registered_definitions, 3);
    assert_eq!(stats.instantiated_beans, 2);
}

#[test]
fn test_alias_definition_points_at_implementation() {
    let context = refresh(greeting_catalog(), ContainerConfig::new("com.demo"));

    let alias = context.get_bean_definition("com.demo.GreetingService").unwrap();
    assert!(alias.is_alias());
    assert_eq!(alias.implementation_type, "com.demo.EnglishGreetingServiceImpl");
    assert_eq!(alias.source_factory_name, "englishGreetingServiceImpl");

    let first = context.get_bean("com.demo.GreetingService").unwrap();
    let second = context.get_bean("englishGreetingServiceImpl").unwrap();
    assert!(first.same_instance(&second));
}

#[test]
fn test_second_implementation_fails_refresh() {
    let mut catalog = greeting_catalog();
    catalog.register::<FrenchGreetingServiceImpl>().unwrap();

    let result = DefaultApplicationContext::refresh(Arc::new(catalog), ContainerConfig::new("com.demo"));
    match result {
        Err(InfrastructureError::ComponentError {
            source: ComponentError::DuplicateRegistration { name },
        }) => assert_eq!(name, "com.demo.GreetingService"),
        other => panic!("期望重复注册错误, 实际: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_scan_limited_to_sub_namespace() {
    let mut catalog = greeting_catalog();
    catalog.register::<Ledger>().unwrap();

    let context = refresh(catalog, ContainerConfig::new("com.demo.accounting"));
    assert_eq!(context.bean_definition_names(), vec!["ledger"]);
    assert!(matches!(
        context.get_bean("greetingController"),
        Err(DependencyError::NotFound { .. })
    ));
}

static LEDGER_BUILDS: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug)]
struct Ledger {
    entries: usize,
}

named!(Ledger, "Ledger", "com.demo.accounting");

impl ManagedType for Ledger {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::concrete::<Self>()
            .with_constructor(|| {
                LEDGER_BUILDS.fetch_add(1, Ordering::SeqCst);
                std::thread::sleep(std::time::Duration::from_millis(20));
                Ok::<Self, BoxError>(Ledger { entries: 0 })
            })
            .with_marker(MarkerAttribute::repository())
            .lazy(true)
    }
}

#[test]
fn test_concurrent_first_access_builds_once() {
    let mut catalog = TypeCatalog::new();
    catalog.register::<Ledger>().unwrap();
    let context = refresh(catalog, ContainerConfig::new("com.demo"));
    assert_eq!(LEDGER_BUILDS.load(Ordering::SeqCst), 0);

    let handles: Vec<Arc<Ledger>> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| context.get_bean_as::<Arc<Ledger>>("ledger").unwrap()))
            .collect();
        workers.into_iter().map(|worker| worker.join().unwrap()).collect()
    });

    assert_eq!(LEDGER_BUILDS.load(Ordering::SeqCst), 1);
    assert!(handles.iter().all(|ledger| Arc::ptr_eq(ledger, &handles[0])));
    assert_eq!(handles[0].entries, 0);
}

#[derive(Default)]
struct AuditTrail {
    sink: Option<Arc<dyn GreetingService>>,
}

named!(AuditTrail, "AuditTrail", "com.audit");

impl ManagedType for AuditTrail {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::default_constructible::<Self>()
            .with_marker(MarkerAttribute::service())
            .with_injection_point(
                InjectionPoint::new::<Self, dyn GreetingService, _>("sink", |this, dependency| {
                    this.sink = Some(dependency)
                })
                .with_qualifier("missingSink"),
            )
    }
}

#[test]
fn test_startup_policy_on_missing_dependency() {
    let catalog = || {
        let mut catalog = TypeCatalog::new();
        catalog.register_capability::<dyn GreetingService>().unwrap();
        catalog.register::<AuditTrail>().unwrap();
        catalog
    };

    let strict = DefaultApplicationContext::refresh(Arc::new(catalog()), ContainerConfig::new("com.audit"));
    assert!(matches!(
        strict,
        Err(InfrastructureError::DependencyError {
            source: DependencyError::UnresolvedDependency { ref field, .. }
        }) if field == "sink"
    ));

    let tolerant = refresh(
        catalog(),
        ContainerConfig::new("com.audit").with_startup_policy(StartupPolicy::Tolerant),
    );
    let audit = tolerant.get_bean_as::<Arc<AuditTrail>>("auditTrail").unwrap();
    assert!(audit.sink.is_none());
}

#[tokio::test]
async fn test_context_shared_across_tasks() {
    let context = Arc::new(refresh(greeting_catalog(), ContainerConfig::new("com.demo")));

    let mut tasks = Vec::new();
    for i in 0..4 {
        let context = context.clone();
        tasks.push(tokio::spawn(async move {
            let service = context.get_bean_of::<dyn GreetingService>().unwrap();
            service.greet(&format!("task-{}", i))
        }));
    }

    for (i, task) in tasks.into_iter().enumerate() {
        assert_eq!(task.await.unwrap(), format!("Hello, task-{}!", i));
    }
    assert_eq!(context.stats().instantiated_beans, 2);
}
