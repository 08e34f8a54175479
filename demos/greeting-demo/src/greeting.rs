//! 问候组件

use component_macros::{capability, controller, service};
use std::sync::Arc;

/// 问候服务
#[capability(namespace = "com.demo")]
pub trait GreetingService {
    fn greet(&self, name: &str) -> String;
}

#[service(namespace = "com.demo", implements(GreetingService))]
#[derive(Debug, Default)]
pub struct EnglishGreetingServiceImpl;

impl GreetingService for EnglishGreetingServiceImpl {
    fn greet(&self, name: &str) -> String {
        format!("Hello, {}!", name)
    }
}

/// 问候控制器，依赖按能力类型注入
#[controller(namespace = "com.demo")]
#[derive(Default)]
pub struct GreetingController {
    #[autowired]
    greeting_service: Option<Arc<dyn GreetingService>>,
}

impl GreetingController {
    pub fn say_hello(&self, name: &str) -> Option<String> {
        self.greeting_service
            .as_ref()
            .map(|service| service.greet(name))
    }
}
