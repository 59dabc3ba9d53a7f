//! Line-delimited JSON commands on stdin, one JSON response line each.

use anyhow::Result;
use rege_core::{desk::DisputeDesk, error::RegeError};
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Status,
    History,
    Classify {
        #[serde(default)]
        rows: Value,
    },
    Quit,
}

pub fn run_ipc_loop(desk: &DisputeDesk) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let Some(reply) = respond(desk, &buffer) else {
            break;
        };
        writeln!(stdout, "{reply}")?;
        stdout.flush()?;
    }
    Ok(())
}

/// Answer one command line. `None` means the caller asked to quit.
fn respond(desk: &DisputeDesk, line: &str) -> Option<Value> {
    let cmd: IpcCommand = match serde_json::from_str(line) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("ipc: bad command: {e}");
            return Some(json!({ "error": e.to_string() }));
        }
    };

    let reply = match cmd {
        IpcCommand::Quit => return None,
        IpcCommand::Status => json!(desk.status()),
        IpcCommand::History => json!(desk.history()),
        IpcCommand::Classify { rows } => match desk.classify(&json!({ "rows": rows })) {
            Ok(response) => json!(response),
            Err(RegeError::InvalidBatch { message }) => json!({ "error": message }),
            Err(e) => {
                log::warn!("ipc: classify failed: {e}");
                json!({ "error": "Could not record the audit entries." })
            }
        },
    };
    Some(reply)
}
