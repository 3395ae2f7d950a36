//! Development server hosting the showcase pages.
//!
//! Streams over plain HTTP/1.1 with chunked transfer encoding so flush
//! boundaries are observable with `curl -N`.

mod http;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use console::style;
use rill_core::{RillConfig, RuntimeMode};
use rill_server::Pipeline;
use tokio::net::TcpListener;

/// Development server for rill demo pages.
#[derive(Parser)]
#[command(name = "rill-dev")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Hosting runtime mode (server or edge).
    #[arg(long, default_value = "server")]
    runtime: RuntimeMode,

    /// Disable dev-mode head lint warnings.
    #[arg(long)]
    prod: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = RillConfig::new("showcase")
        .with_runtime(cli.runtime)
        .with_dev(!cli.prod);

    let pipeline = Arc::new(Pipeline::new(config));
    let routes = Arc::new(showcase::routes());
    let listener = TcpListener::bind(&cli.addr).await?;

    println!(
        "{} rill dev server on {} (runtime={}, dev={})",
        style("▲").cyan(),
        style(&cli.addr).bold(),
        cli.runtime,
        !cli.prod,
    );
    let mut paths: Vec<_> = routes.keys().collect();
    paths.sort();
    for path in paths {
        println!("  {} http://{}{}", style("-").dim(), cli.addr, path);
    }

    http::serve(listener, pipeline, routes).await
}
