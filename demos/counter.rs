use chrono::Local;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use taskweaver::PeriodicRunner;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let count = Arc::new(AtomicU64::new(0));
    let counter = count.clone();

    let runner = PeriodicRunner::builder()
        .name("counter")
        .interval(Duration::from_secs(1))
        .on_tick(move |_cancel| {
            let counter = counter.clone();
            async move {
                let value = counter.fetch_add(1, Ordering::SeqCst) + 1;
                println!("[{}] {}", Local::now().format("%H:%M:%S"), value);
                Ok(())
            }
        })
        .on_complete(|| async {
            println!("Executing before stop");
            Ok(())
        })
        .build()?;

    println!("Counting every second, press Ctrl+C to stop\n");
    runner.start().await?;

    tokio::signal::ctrl_c().await?;
    let summary = runner.stop().await?;

    println!("\nStopped after {} ticks (counter = {})", summary.ticks, count.load(Ordering::SeqCst));
    Ok(())
}
