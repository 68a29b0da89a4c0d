//! TCP server for game sessions
//!
//! Handles incoming connections and manages client lifecycle.
//! Uses tokio for async networking.

use std::net::SocketAddr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::core::{ConnectionId, RoomEvent};
use crate::error::ProtocolError;
use crate::protocol::{parse_message, ClientMessage, ServerMessage};
use crate::room_task::{Outbound, RoomHandle, RoomInput, RoomRegistry};
use crate::types::Role;

/// Attempts to join before giving up on a room that keeps disposing under us
const JOIN_ATTEMPTS: usize = 3;

/// Longest accepted inbound line, newline excluded
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Start the TCP server.
///
/// `ready_tx` receives the bound address once the listener is up, which lets
/// callers bind port 0.
pub async fn run_server(
    config: ServerConfig,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.bind_addr()).await?;
    let bound = listener.local_addr()?;
    info!(addr = %bound, "listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let registry = RoomRegistry::new();
    let mut client_id_counter: ConnectionId = 0;

    // Accept incoming connections
    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;

        info!(client = client_id, %addr, "client connected");

        let registry = registry.clone();
        let config = config.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, client_id, registry, config).await {
                warn!(client = client_id, error = %e, "client error");
            }
            info!(client = client_id, "client disconnected");
        });
    }
}

/// Room membership of one connection
struct Membership {
    room: RoomHandle,
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    client_id: ConnectionId,
    registry: RoomRegistry,
    config: ServerConfig,
) -> anyhow::Result<()> {
    let (reader, mut writer) = socket.into_split();
    let mut reader = BufReader::new(reader);

    // Channel to send messages to this client
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    // Spawn task to write messages to client
    let write_task = tokio::spawn(async move {
        let mut buf: Vec<u8> = Vec::with_capacity(4096);
        while let Some(msg) = rx.recv().await {
            buf.clear();
            if serde_json::to_writer(&mut buf, &msg).is_err() {
                continue;
            }
            buf.push(b'\n');
            if writer.write_all(&buf).await.is_err() {
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
        }
    });

    let mut membership: Option<Membership> = None;
    let result = read_loop(
        &mut reader,
        client_id,
        &registry,
        &config,
        &tx,
        &mut membership,
    )
    .await;

    // Exactly one leave per joined connection, whatever ended the read loop
    if let Some(member) = membership.take() {
        let _ = member
            .room
            .tx
            .send(RoomInput::Event(RoomEvent::Left(client_id)))
            .await;
    }

    drop(tx);
    let _ = write_task.await;
    result
}

async fn read_loop<R>(
    reader: &mut R,
    client_id: ConnectionId,
    registry: &RoomRegistry,
    config: &ServerConfig,
    tx: &Outbound,
    membership: &mut Option<Membership>,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();

    loop {
        match read_capped_line(reader, &mut buf, MAX_LINE_BYTES).await? {
            LineRead::Eof => return Ok(()),
            LineRead::TooLong => {
                let e = ProtocolError::LineTooLong {
                    limit: MAX_LINE_BYTES,
                };
                warn!(client = client_id, error = %e, "closing connection");
                let _ = tx.send(ServerMessage::from(&e));
                return Ok(());
            }
            LineRead::Line => {}
        }

        let line = String::from_utf8_lossy(&buf);
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let message = match parse_message(trimmed) {
            Ok(message) => message,
            Err(e) => {
                warn!(client = client_id, error = %e, "rejected message");
                let _ = tx.send(ServerMessage::from(&e));
                continue;
            }
        };
        debug!(client = client_id, kind = message.name(), "message");

        match membership.as_ref() {
            None => match &message {
                ClientMessage::Join { room } => {
                    let name = room.as_deref().unwrap_or(config.default_room.as_str());
                    let (handle, role) =
                        join_room(registry, name, config.max_pending, client_id, tx).await?;
                    debug!(client = client_id, room = %handle.name, role = role.as_str(), "joined");
                    *membership = Some(Membership { room: handle });
                }
                _ => {
                    let e = ProtocolError::JoinRequired {
                        command: message.name(),
                    };
                    warn!(client = client_id, error = %e, "rejected message");
                    let _ = tx.send(ServerMessage::from(&e));
                }
            },
            Some(member) => match message.command() {
                None => {
                    let e = ProtocolError::AlreadyJoined {
                        room: member.room.name.clone(),
                    };
                    warn!(client = client_id, error = %e, "rejected message");
                    let _ = tx.send(ServerMessage::from(&e));
                }
                Some(command) => {
                    if member
                        .room
                        .tx
                        .send(RoomInput::Event(RoomEvent::Message(client_id, command)))
                        .await
                        .is_err()
                    {
                        anyhow::bail!("room {} is gone", member.room.name);
                    }
                }
            },
        }
    }
}

enum LineRead {
    Line,
    TooLong,
    Eof,
}

/// Read one `\n`-terminated line into `buf`, consuming at most `limit + 1` bytes
async fn read_capped_line<R>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    limit: usize,
) -> std::io::Result<LineRead>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let bytes_read = (&mut *reader)
        .take(limit as u64 + 1)
        .read_until(b'\n', buf)
        .await?;

    if bytes_read == 0 {
        return Ok(LineRead::Eof);
    }
    if buf.last() != Some(&b'\n') && buf.len() > limit {
        return Ok(LineRead::TooLong);
    }
    Ok(LineRead::Line)
}

/// Join or create `name`, retrying when the room disposes between lookup and join
async fn join_room(
    registry: &RoomRegistry,
    name: &str,
    max_pending: usize,
    client_id: ConnectionId,
    tx: &Outbound,
) -> anyhow::Result<(RoomHandle, Role)> {
    for _ in 0..JOIN_ATTEMPTS {
        let handle = registry.join_or_create(name, max_pending).await;
        let (reply_tx, reply_rx) = oneshot::channel();
        let join = RoomInput::Join {
            id: client_id,
            outbound: tx.clone(),
            reply: reply_tx,
        };
        if handle.tx.send(join).await.is_err() {
            continue;
        }
        if let Ok(role) = reply_rx.await {
            return Ok((handle, role));
        }
    }
    anyhow::bail!("could not join room {}", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_capped_line() {
        let mut reader = BufReader::new(&b"abc\n12345678\ntail"[..]);
        let mut buf = Vec::new();

        assert!(matches!(
            read_capped_line(&mut reader, &mut buf, 8).await.unwrap(),
            LineRead::Line
        ));
        assert_eq!(buf, b"abc\n");

        // Exactly at the limit, newline excluded
        assert!(matches!(
            read_capped_line(&mut reader, &mut buf, 8).await.unwrap(),
            LineRead::Line
        ));
        assert_eq!(buf, b"12345678\n");

        // Unterminated last line before EOF
        assert!(matches!(
            read_capped_line(&mut reader, &mut buf, 8).await.unwrap(),
            LineRead::Line
        ));
        assert_eq!(buf, b"tail");

        assert!(matches!(
            read_capped_line(&mut reader, &mut buf, 8).await.unwrap(),
            LineRead::Eof
        ));
    }

    #[tokio::test]
    async fn test_read_capped_line_stops_at_limit() {
        let long = vec![b'x'; 100];
        let mut reader = BufReader::new(&long[..]);
        let mut buf = Vec::new();

        assert!(matches!(
            read_capped_line(&mut reader, &mut buf, 16).await.unwrap(),
            LineRead::TooLong
        ));
        assert_eq!(buf.len(), 17);
    }
}
