//! Counter Example
//!
//! Demonstrates reflex-core with a small counter root.
//! Subscribers stand in for template bindings and print what they would render.
//!
//! Run with `RUST_LOG=reflex_core=debug` to see registrations and notifications.

use reflex_core::{Options, Subscriber, ViewModel};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const DEFAULT_OPTIONS: &str = include_str!("../data/counter.ron");

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "counter demo failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> reflex_core::Result<()> {
    println!("=== Reflex Counter Example ===\n");

    let source = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .map_err(|e| reflex_core::Error::Config(format!("{}: {}", path, e)))?,
        None => DEFAULT_OPTIONS.to_string(),
    };
    let options = Options::from_ron(&source)?;
    let vm = ViewModel::new(options)?;

    println!("Root {:?} with keys:", vm.el().unwrap_or("<none>"));
    for key in vm.proxy_keys() {
        println!("  {} = {}", key, vm.get(key)?);
    }
    println!();

    // One subscriber per binding a template would contain.
    let _count_text = Subscriber::new(&vm, "count", |v| {
        println!("  [text] count -> {}", v);
        Ok(())
    })?;
    let _count_title = Subscriber::new(&vm, "count", |v| {
        println!("  [attr] title -> \"Clicked {} times\"", v);
        Ok(())
    })?;
    let _name = Subscriber::new(&vm, "user.name", |v| {
        println!("  [text] user.name -> {}", v);
        Ok(())
    })?;

    for i in 1..=3i64 {
        println!("click {}:", i);
        let report = vm.set("count", i)?;
        println!("  ({} subscribers updated)", report.delivered);
    }

    println!("same value again:");
    let report = vm.set("count", 3i64)?;
    println!("  (changed: {})", report.changed);

    println!("rename:");
    vm.set_path("user.name", "Grace")?;

    println!("replace user wholesale, then rename (not tracked):");
    let user = reflex_core::Value::from_iter([("name", "Linus")]);
    vm.set("user", user)?;
    let report = vm.set_path("user.name", "Ken")?;
    println!(
        "  (changed: {}, {} subscribers updated)",
        report.changed, report.delivered
    );

    println!("\nFinal state: {}", vm.snapshot());
    Ok(())
}
