//! 单元测试使用的示例类型

use infrastructure_common::{
    BoxError, InjectionPoint, ManagedType, MarkerAttribute, NamedType, TypeCatalog,
    TypeDescriptor, COMPONENT,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
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
pub struct EnglishGreetingServiceImpl;

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
pub struct FrenchGreetingServiceImpl;

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
pub struct GreetingController {
    pub greeting_service: Option<Arc<dyn GreetingService>>,
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

#[derive(Debug, Default)]
pub struct PlainHelper;

named!(PlainHelper, "PlainHelper", "com.demo");

impl ManagedType for PlainHelper {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::default_constructible::<Self>()
            .with_marker(MarkerAttribute::new("deprecated", &[]))
    }
}

#[derive(Default)]
pub struct StatusEndpoint {
    pub controller: Option<Arc<GreetingController>>,
}

named!(StatusEndpoint, "StatusEndpoint", "com.demo.web");

impl ManagedType for StatusEndpoint {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::default_constructible::<Self>()
            .with_marker(MarkerAttribute::new("endpoint", &["controller", COMPONENT]).with_value("status"))
            .with_injection_point(
                InjectionPoint::new::<Self, GreetingController, _>("controller", |this, dependency| {
                    this.controller = Some(dependency)
                })
                .with_qualifier(" greetingController "),
            )
            .lazy(true)
    }
}

/// com.demo 下的完整示例目录
pub fn greeting_catalog() -> TypeCatalog {
    let mut catalog = TypeCatalog::new();
    catalog.register_capability::<dyn GreetingService>().unwrap();
    catalog.register::<EnglishGreetingServiceImpl>().unwrap();
    catalog.register::<GreetingController>().unwrap();
    catalog.register::<PlainHelper>().unwrap();
    catalog.register::<StatusEndpoint>().unwrap();
    catalog
}

#[derive(Default)]
pub struct CycleA {
    pub b: Option<Arc<CycleB>>,
}

#[derive(Default)]
pub struct CycleB {
    pub a: Option<Arc<CycleA>>,
}

named!(CycleA, "CycleA", "com.cycle");
named!(CycleB, "CycleB", "com.cycle");

impl ManagedType for CycleA {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::default_constructible::<Self>()
            .with_marker(MarkerAttribute::service())
            .with_injection_point(
                InjectionPoint::new::<Self, CycleB, _>("b", |this, dependency| this.b = Some(dependency))
                    .with_qualifier("cycleB"),
            )
    }
}

impl ManagedType for CycleB {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::default_constructible::<Self>()
            .with_marker(MarkerAttribute::service())
            .with_injection_point(
                InjectionPoint::new::<Self, CycleA, _>("a", |this, dependency| this.a = Some(dependency))
                    .with_qualifier("cycleA"),
            )
    }
}

/// com.cycle 下互相依赖的两个类型
pub fn cycle_catalog() -> TypeCatalog {
    let mut catalog = TypeCatalog::new();
    catalog.register::<CycleA>().unwrap();
    catalog.register::<CycleB>().unwrap();
    catalog
}

pub static FAULTY_ATTEMPTS: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug)]
pub struct FaultyRepository;

named!(FaultyRepository, "FaultyRepository", "com.faulty");

impl ManagedType for FaultyRepository {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::concrete::<Self>()
            .with_marker(MarkerAttribute::repository())
            .with_constructor(|| -> Result<Self, BoxError> {
                FAULTY_ATTEMPTS.fetch_add(1, Ordering::SeqCst);
                Err("数据库不可用".into())
            })
    }
}

#[derive(Default)]
pub struct ReportService {
    pub repository: Option<Arc<FaultyRepository>>,
}

named!(ReportService, "ReportService", "com.faulty");

impl ManagedType for ReportService {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::default_constructible::<Self>()
            .with_marker(MarkerAttribute::service())
            .with_injection_point(InjectionPoint::new::<Self, FaultyRepository, _>(
                "repository",
                |this, dependency| this.repository = Some(dependency),
            ))
    }
}

/// com.faulty 下构造失败的仓储及其依赖方
pub fn faulty_catalog() -> TypeCatalog {
    let mut catalog = TypeCatalog::new();
    catalog.register::<FaultyRepository>().unwrap();
    catalog.register::<ReportService>().unwrap();
    catalog
}

pub static GAUGE_PANICKED: AtomicBool = AtomicBool::new(false);

/// 第一次构造时 panic 的仪表
#[derive(Debug)]
pub struct FlakyGauge;

named!(FlakyGauge, "FlakyGauge", "com.flaky");

impl ManagedType for FlakyGauge {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::concrete::<Self>()
            .with_marker(MarkerAttribute::repository())
            .with_constructor(|| -> Result<Self, BoxError> {
                if !GAUGE_PANICKED.swap(true, Ordering::SeqCst) {
                    panic!("仪表初始化崩溃");
                }
                Ok(FlakyGauge)
            })
            .lazy(true)
    }
}

#[derive(Default)]
pub struct GaugePanel {
    pub gauge: Option<Arc<FlakyGauge>>,
}

named!(GaugePanel, "GaugePanel", "com.flaky");

impl ManagedType for GaugePanel {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::default_constructible::<Self>()
            .with_marker(MarkerAttribute::controller())
            .with_injection_point(InjectionPoint::new::<Self, FlakyGauge, _>(
                "gauge",
                |this, dependency| this.gauge = Some(dependency),
            ))
            .lazy(true)
    }
}

/// com.flaky 下首次构造会 panic 的仪表及其依赖方
pub fn flaky_catalog() -> TypeCatalog {
    let mut catalog = TypeCatalog::new();
    catalog.register::<FlakyGauge>().unwrap();
    catalog.register::<GaugePanel>().unwrap();
    catalog
}
