#![forbid(unsafe_code)]

mod commands;

use std::{fs, sync::Arc};

use serde_json::Value;
use tokio::{
    io,
    net::{UnixListener, UnixStream},
};
use web::AppState;

use crate::commands::{RpcCommandData, RpcCommandResponse, RpcResponse};

/// Upper bound for a single unfinished message
pub const MAX_MESSAGE_SIZE: usize = 64 * 1024;

/// Splits every complete JSON value off the front of `buffer`. A value that
/// is not a known command, or bytes that can never become JSON, yield `None`.
/// An incomplete trailing value stays in the buffer.
fn take_commands(buffer: &mut Vec<u8>) -> Vec<Option<RpcCommandData>> {
    let mut commands = Vec::new();
    let mut consumed = 0;

    {
        let mut values = serde_json::Deserializer::from_slice(&buffer[..]).into_iter::<Value>();
        loop {
            match values.next() {
                Some(Ok(value)) => {
                    consumed = values.byte_offset();
                    match serde_json::from_value::<RpcCommandData>(value) {
                        Ok(command) => commands.push(Some(command)),
                        Err(err) => {
                            log::error!("Invalid RPC command: {}", err);
                            commands.push(None);
                        }
                    }
                }
                Some(Err(err)) if err.is_eof() => break,
                Some(Err(err)) => {
                    log::error!("Malformed RPC message: {}", err);
                    commands.push(None);
                    consumed = buffer.len();
                    break;
                }
                None => {
                    consumed = buffer.len();
                    break;
                }
            }
        }
    }

    buffer.drain(..consumed);
    commands
}

async fn respond(stream: &UnixStream, response: &RpcCommandResponse) -> anyhow::Result<()> {
    let mut response = serde_json::to_string(response)?;
    response.push('\n');
    let mut written = 0;

    while written < response.len() {
        // Wait for the socket to be writable
        stream.writable().await?;

        // Try to write data, this may still fail with `WouldBlock`
        // if the readiness event is a false positive.
        match stream.try_write(&response.as_bytes()[written..]) {
            Ok(n) => {
                written += n;
            }
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {
                continue;
            }
            Err(e) => {
                return Err(e.into());
            }
        }
    }

    Ok(())
}

pub async fn process(stream: UnixStream, state: Arc<AppState>) -> anyhow::Result<()> {
    let mut msg = vec![0; 1024];
    let mut buffer = Vec::new();

    loop {
        // Wait for the socket to be readable
        stream.readable().await?;

        // Try to read request, this may still fail with `WouldBlock`
        // if the readiness event is a false positive.
        match stream.try_read(&mut msg) {
            Ok(0) => return Ok(()),
            Ok(n) => buffer.extend_from_slice(&msg[0..n]),
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {
                continue;
            }
            Err(e) => {
                return Err(e.into());
            }
        }

        let mut pending = take_commands(&mut buffer);
        if buffer.len() > MAX_MESSAGE_SIZE {
            log::error!("RPC message exceeds {} bytes, dropping it", MAX_MESSAGE_SIZE);
            buffer.clear();
            pending.push(None);
        }

        for command in pending {
            let response = match command {
                Some(command) => commands::dispatch(command, &state).await,
                None => RpcCommandResponse::Invalid(RpcResponse { ok: false }),
            };
            respond(&stream, &response).await?;
        }
    }
}

pub async fn start(state: Arc<AppState>) -> anyhow::Result<()> {
    let socket = state.config.rpc.socket.clone();
    let _ = fs::remove_file(&socket);
    let listener = UnixListener::bind(&socket)?;
    log::info!("RPC listening on {}", socket);

    loop {
        match listener.accept().await {
            Ok((stream, _addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    if let Err(err) = process(stream, state).await {
                        log::error!("RPC connection failed: {:#}", err);
                    }
                });
            }
            Err(err) => log::error!("RPC accept failed: {}", err),
        }
    }
}
