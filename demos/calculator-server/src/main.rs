//! # Calculator JSON-RPC Server
//!
//! Serves a small namespace tree over HTTP:
//!
//! - `math.sum` / `math.product` take an array of integers
//! - `math.stats.mean` takes an array of numbers
//! - `math.divide` takes `{"dividend": .., "divisor": ..}`
//! - `rpc.methods` lists every registered method

use std::net::SocketAddr;

use clap::Parser;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use nsrpc_http_server::{HttpRpcServer, ServerConfig};
use nsrpc_json_rpc_server::prelude::*;

#[derive(Parser)]
#[command(name = "calculator-server")]
#[command(about = "Namespaced JSON-RPC calculator over HTTP")]
struct Args {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:8000")]
    bind: SocketAddr,

    /// Endpoint path
    #[arg(long, default_value = "/rpc")]
    path: String,

    /// Maximum request body size in bytes
    #[arg(long, default_value_t = 1024 * 1024)]
    max_body_size: usize,
}

#[derive(Deserialize)]
struct DivideParams {
    dividend: Option<f64>,
    divisor: Option<f64>,
}

fn overflow() -> RpcError {
    RpcError::new("integer overflow", INVALID_PARAMS)
}

fn sum(params: RawParams) -> HandlerResult {
    let numbers: Vec<i64> = params.parse()?;
    let total = numbers
        .iter()
        .try_fold(0i64, |acc, n| acc.checked_add(*n))
        .ok_or_else(overflow)?;
    Ok(json!(total))
}

fn product(params: RawParams) -> HandlerResult {
    let numbers: Vec<i64> = params.parse()?;
    let total = numbers
        .iter()
        .try_fold(1i64, |acc, n| acc.checked_mul(*n))
        .ok_or_else(overflow)?;
    Ok(json!(total))
}

fn mean(params: RawParams) -> HandlerResult {
    let numbers: Vec<f64> = params.parse()?;
    if numbers.is_empty() {
        return Err(RpcError::new("mean of an empty list", INVALID_PARAMS));
    }
    Ok(json!(numbers.iter().sum::<f64>() / numbers.len() as f64))
}

fn divide(params: RawParams) -> HandlerResult {
    let input: DivideParams = params.parse()?;
    let dividend = input.dividend.ok_or_else(|| RpcError::missing_param("dividend"))?;
    let divisor = input.divisor.ok_or_else(|| RpcError::missing_param("divisor"))?;
    if divisor == 0.0 {
        return Err(RpcError::new("division by zero", INVALID_PARAMS));
    }
    Ok(json!(dividend / divisor))
}

fn build_dispatcher() -> Dispatcher {
    let stats = Namespace::new().with_handler("mean", mean);
    let math = Namespace::new()
        .with_handler("sum", sum)
        .with_handler("product", product)
        .with_handler("divide", divide)
        .with_namespace("stats", stats);

    let mut dispatcher = Dispatcher::new();
    dispatcher.register_namespace("math", math);

    let methods = json!(dispatcher.registered_methods());
    dispatcher
        .root_mut()
        .namespace_mut("rpc")
        .register_handler("methods", move |_: RawParams| -> HandlerResult {
            Ok(methods.clone())
        });
    dispatcher
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "calculator_server=info,nsrpc_http_server=info,nsrpc_json_rpc_server=info".into()
            }),
        )
        .init();

    let args = Args::parse();
    let config = ServerConfig {
        bind_address: args.bind,
        rpc_path: args.path,
        max_body_size: args.max_body_size,
        ..Default::default()
    };

    let server = HttpRpcServer::builder()
        .config(config)
        .dispatcher(build_dispatcher())
        .build()?;

    info!(
        "Try: curl -X POST http://{}{} -H 'Content-Type: application/json' \
         -d '{{\"jsonrpc\":\"2.0\",\"method\":\"math.sum\",\"params\":[1,2,3,4],\"id\":1}}'",
        server.config().bind_address,
        server.config().rpc_path
    );

    server.run().await?;
    Ok(())
}
