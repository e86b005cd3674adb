use async_trait::async_trait;
use log::{ debug, info };
use redis::{ AsyncCommands, Client };
use redis::aio::MultiplexedConnection;
use std::time::Duration;
use url::Url;

use crate::broker::{ JobQueue, ResultStore };
use crate::error::WorkerError;

/// One broker connection shared by the queue listener and the result publisher.
///
/// The queue name is fixed at construction; result keys are supplied per call.
#[derive(Clone)]
pub struct RedisBroker {
    conn: MultiplexedConnection,
    queue: String,
}

impl RedisBroker {
    pub async fn connect(url: &Url, queue: impl Into<String>) -> Result<Self, WorkerError> {
        let client = Client::open(url.as_str())?;
        let mut conn = client.get_multiplexed_async_connection().await?;
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        info!("Connected to broker at {}:{} ({})", host_of(url), port_of(url), pong);
        Ok(Self {
            conn,
            queue: queue.into(),
        })
    }
}

fn host_of(url: &Url) -> &str {
    url.host_str().unwrap_or("?")
}

fn port_of(url: &Url) -> u16 {
    url.port().unwrap_or(6379)
}

/// Whole-second timeouts go out as integers. Fractional ones need Redis 6.0+.
fn brpop_cmd(queue: &str, timeout: Duration) -> redis::Cmd {
    let mut cmd = redis::cmd("BRPOP");
    cmd.arg(queue);
    if timeout.subsec_nanos() == 0 {
        cmd.arg(timeout.as_secs());
    } else {
        cmd.arg(timeout.as_secs_f64());
    }
    cmd
}

#[async_trait]
impl JobQueue for RedisBroker {
    async fn pop(&self, timeout: Duration) -> Result<Option<Vec<u8>>, WorkerError> {
        let mut conn = self.conn.clone();
        let popped: Option<(String, Vec<u8>)> = brpop_cmd(&self.queue, timeout).query_async(
            &mut conn
        ).await?;
        if popped.is_none() {
            debug!("No job on '{}' within {:?}", self.queue, timeout);
        }
        Ok(popped.map(|(_, payload)| payload))
    }
}

#[async_trait]
impl ResultStore for RedisBroker {
    async fn set(&self, key: &str, value: &str) -> Result<(), WorkerError> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }
}
