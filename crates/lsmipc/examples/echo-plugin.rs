//! Minimal plugin: accepts one client and answers a few methods until the
//! client unregisters or disconnects.
//!
//! Run with:
//!   cargo run --example echo-plugin
//!
//! Known methods are `plugin_info`, `volumes` and `echo` (returns the
//! params). Anything else is answered with a "not supported" error.

use std::fs;

use lsmipc::rpc::{IpcListener, Request, RpcError, NO_SUPPORT};
use lsmipc::value::Value;
use tracing::{info, warn};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .init();

    let sock_dir = std::env::temp_dir().join(format!("lsmipc-echo-{}", std::process::id()));
    fs::create_dir_all(&sock_dir)?;
    let sock_path = sock_dir.join("echo.sock");

    let listener = IpcListener::bind(&sock_path)?;
    info!(path = %sock_path.display(), "plugin listening");

    let mut ipc = listener.accept()?;
    loop {
        let request = match ipc.read_call() {
            Ok(request) => request,
            Err(RpcError::Communication { source, .. }) => {
                info!("client disconnected: {source}");
                break;
            }
            Err(err) => {
                warn!("bad request: {err}");
                ipc.send_error(None, err.code(), &err.to_string(), None)?;
                continue;
            }
        };

        let Request { method, id, params } = request;
        match method.as_str() {
            "plugin_info" => ipc.send_response(
                Value::from(vec![Value::from("echo plugin"), Value::from("0.1.0")]),
                id,
            )?,
            "volumes" => ipc.send_response(
                Value::from(vec![Value::from_iter([
                    ("id", Value::from("v1")),
                    ("name", Value::from("vol1")),
                    ("block_size", Value::from(512u32)),
                    ("num_of_blocks", Value::from(2_097_152u64)),
                ])]),
                id,
            )?,
            "echo" => ipc.send_response(params, id)?,
            "plugin_unregister" => {
                ipc.send_response(Value::Null, id)?;
                break;
            }
            other => ipc.send_error(
                Some(id),
                NO_SUPPORT,
                &format!("method {other} not supported"),
                None,
            )?,
        }
    }

    drop(listener);
    let _ = fs::remove_dir_all(&sock_dir);
    Ok(())
}
