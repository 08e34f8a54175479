//! # 问候示例
//!
//! 从 properties 文件读取扫描根命名空间，启动应用上下文并调用注入完成的控制器。

mod greeting;

use anyhow::Context;
use clap::Parser;
use di_abstractions::{ApplicationContext, BeanFactoryExt};
use greeting::{GreetingController, GreetingService};
use infrastructure_composition::{ApplicationContextBuilder, LoggingConfig};
use std::sync::Arc;
use tracing::info;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "greeting-demo")]
#[command(about = "构造型组件扫描示例")]
struct Args {
    /// 配置文件路径
    #[arg(short, long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/application.properties"))]
    config: String,

    /// 问候对象
    #[arg(short, long, default_value = "World")]
    name: String,

    /// 环境变量前缀，如 GREETING_SCAN_PACKAGE
    #[arg(long, default_value = "GREETING")]
    env_prefix: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let context = ApplicationContextBuilder::new()
        .with_logging(LoggingConfig::development())
        .add_config_properties(&args.config)
        .with_context(|| format!("无法加载配置文件 {}", args.config))?
        .add_config_env_vars(args.env_prefix.as_str())
        .build()
        .await
        .context("应用上下文启动失败")?;

    info!("已注册的 Bean: {:?}", context.bean_definition_names());

    let controller = context.get_bean_as::<Arc<GreetingController>>("greetingController")?;
    let greeting = controller
        .say_hello(&args.name)
        .context("greetingController 未注入 GreetingService")?;
    println!("{}", greeting);

    let service = context.get_bean_of::<dyn GreetingService>()?;
    info!("按能力类型获取: {}", service.greet("container"));
    info!("统计: {:?}", context.stats());

    Ok(())
}
