use answer_worker::cli::Args;
use clap::Parser;
use dotenv::dotenv;
use log::{ error, info };
use std::error::Error;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        wait_for_signal().await;
        info!("Signal received, finishing current job before exit");
        let _ = shutdown_tx.send(true);
        wait_for_signal().await;
        error!("Second signal received, exiting without waiting for the current job");
        std::process::exit(130);
    });

    if let Err(e) = answer_worker::run(args, shutdown_rx).await {
        error!("Worker stopped: {}", e);
        return Err(e.into());
    }
    Ok(())
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{ signal, SignalKind };
    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = term.recv() => {}
            }
        }
        Err(_) => {
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
