//! rege-radar: Reg E dispute classifier runner.
//!
//! Usage:
//!   rege-radar classify --input disputes.json
//!   rege-radar history --store sqlite --store-path audit.db
//!   rege-radar serve --port 4000
//!   rege-radar --ipc-mode

mod http;
mod ipc;

use anyhow::{bail, Result};
use rege_core::{
    clock::SystemClock,
    config::{DeskConfig, StoreBackend},
    desk::DisputeDesk,
    store::open_audit_log,
};
use std::env;
use std::io::{self, Read};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config = build_config(&args)?;
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");

    let audit_log = open_audit_log(&config.store)?;
    let desk = DisputeDesk::new(audit_log, Box::new(SystemClock));

    if ipc_mode {
        return ipc::run_ipc_loop(&desk);
    }

    match args.get(1).map(String::as_str) {
        Some("classify") => {
            let body = read_input(flag_value(&args, "--input"))?;
            let response = desk.classify(&body)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Some("history") => {
            println!("{}", serde_json::to_string_pretty(&desk.history())?);
        }
        Some("serve") => http::serve(&desk, &config)?,
        Some(other) => bail!("unknown command: {other} (expected classify, history or serve)"),
        None => bail!("usage: rege-radar <classify|history|serve> [options] | --ipc-mode"),
    }

    Ok(())
}

/// Defaults, then the config file, then environment, then flags.
fn build_config(args: &[String]) -> Result<DeskConfig> {
    let mut config = match flag_value(args, "--config") {
        Some(path) => DeskConfig::load(path)?,
        None => DeskConfig::default(),
    }
    .apply_env();

    if let Some(backend) = flag_value(args, "--store") {
        config.store.backend = match StoreBackend::parse(backend) {
            Some(b) => b,
            None => bail!("unknown store backend: {backend} (expected json, sqlite or memory)"),
        };
    }
    if let Some(path) = flag_value(args, "--store-path") {
        config.store.path = Some(path.to_string());
    }
    if let Some(bind) = flag_value(args, "--bind") {
        config.bind = bind.to_string();
    }
    config.port = parse_arg(args, "--port", config.port);
    Ok(config)
}

fn read_input(path: Option<&str>) -> Result<serde_json::Value> {
    let raw = match path {
        Some(p) => std::fs::read_to_string(p)
            .map_err(|e| anyhow::anyhow!("Cannot read {p}: {e}"))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(serde_json::from_str(&raw)?)
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
