//! Basic logger usage example
//!
//! Demonstrates construction from options, request context enrichment,
//! child loggers and a channel-backed monitoring mirror.
//!
//! Run with: cargo run --example basic_usage

use rust_context_logger::prelude::*;
use rust_context_logger::{info, warn};
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== Rust Context Logger - Basic Usage Example ===\n");

    // Mirror records to a harvester thread
    let (backend, receiver) = ChannelBackend::bounded("harvester", 128);
    let harvester = std::thread::spawn(move || receiver.iter().count());

    let logger = Logger::builder()
        .level("debug")
        .app_mode("development")
        .encoding("console")
        .colored_levels(true)
        .disable_caller(false)
        .name("demo")
        .monitoring_backend(Arc::new(backend))
        .build()?;

    println!("1. Logging at different levels:");
    logger.debug(None, "This is a debug message", &[]);
    logger.info(None, "This is an info message", &[]);
    logger.warn(None, "This is a warning message", &[]);
    logger.error(None, "This is an error message", &[]);

    println!("\n2. Enriching from the request context:");
    let ctx = RequestContext::new()
        .with_value(ContextKey::TRACE_ID, "4bf92f3577b34da6".to_string())
        .with_value(ContextKey::USER_ID, "u-42".to_string())
        .with_value(ContextKey::HOSTNAME, "web-1");
    logger.info(Some(&ctx), "Request handled", &[Field::new("status", 200)]);

    println!("\n3. Registering an application key:");
    logger.context_keys().append([ContextKey::new("tenant_id")]);
    let ctx = ctx.with_value(ContextKey::new("tenant_id"), "acme".to_string());
    info!(logger, Some(&ctx), "Tenant {} resolved", "acme");

    println!("\n4. Child loggers:");
    let db = logger.named("db").with(&[Field::new("pool", "primary")]);
    warn!(db, None, "Slow query took {}ms", 870);

    println!("\n5. Fatal without exiting:");
    let termination = logger.fatal(None, "Configuration store unreachable", &[]);
    println!("   caller decides: {}", termination);

    logger.sync()?;
    println!(
        "\n   {} records written, {:.1}% failed",
        logger.metrics().written_count(),
        logger.metrics().failure_rate()
    );
    drop(logger);
    drop(db);
    let mirrored = harvester.join().unwrap_or(0);

    println!("\n   {} records mirrored to the harvester", mirrored);
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
