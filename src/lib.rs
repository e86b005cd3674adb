pub mod broker;
pub mod cli;
pub mod engine;
pub mod error;
pub mod history;
pub mod llm;
pub mod models;
pub mod queue;
pub mod store;
pub mod worker;

use broker::RedisBroker;
use cli::Args;
use engine::{ AnswerAdapter, LlmAnswerEngine };
use error::WorkerError;
use log::info;
use queue::QueueListener;
use std::sync::Arc;
use store::ResultPublisher;
use tokio::sync::watch;
use worker::Worker;

pub async fn run(args: Args, shutdown: watch::Receiver<bool>) -> Result<(), WorkerError> {
    args.validate()?;
    let sleep = args.sleep()?;
    let poll_timeout = args.poll_timeout()?;
    let engine_timeout = args.engine_timeout()?;

    info!("--- Worker Configuration ---");
    info!("Broker: {}:{} db={}", args.redis_host, args.redis_port, args.redis_db);
    info!("Queue: {}", args.queue);
    info!("Sleep Between Jobs: {:?}", sleep);
    info!("Poll Timeout: {:?}", poll_timeout);
    info!("Engine Timeout: {}", if engine_timeout.is_zero() {
        "none".to_string()
    } else {
        format!("{:?}", engine_timeout)
    });
    info!("Chat LLM Type: {}", args.chat_llm_type);
    info!("----------------------------");

    let llm_config = args.llm_config()?;
    let engine = LlmAnswerEngine::from_config(&llm_config, args.system_prompt()).map_err(|e|
        WorkerError::EngineSetup(e.to_string())
    )?;

    let broker = Arc::new(RedisBroker::connect(&args.broker_url()?, args.queue.clone()).await?);
    let worker = Worker::new(
        QueueListener::new(broker.clone(), poll_timeout),
        AnswerAdapter::new(Arc::new(engine)).with_timeout(engine_timeout),
        ResultPublisher::new(broker),
        sleep
    );
    worker.run(shutdown).await
}
