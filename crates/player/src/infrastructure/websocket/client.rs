//! Desktop push transport using tokio-tungstenite

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use url::Url;

use crate::ports::outbound::{
    ChannelEvent, ChannelEventKind, ChannelEventSender, ChannelWriter, ConnectionId, PushTransport,
};

/// Opens one WebSocket per `open` call and pumps it on its own task.
///
/// Every event is tagged with the connection id it was opened with; the transport
/// keeps no state between connections.
#[derive(Debug, Clone, Default)]
pub struct WsTransport;

impl WsTransport {
    pub fn new() -> Self {
        Self
    }
}

impl PushTransport for WsTransport {
    fn open(&self, url: &Url, connection: ConnectionId, events: ChannelEventSender) {
        let url = url.to_string();
        tokio::spawn(run_connection(url, connection, events));
    }
}

async fn run_connection(url: String, connection: ConnectionId, events: ChannelEventSender) {
    let emit = |kind: ChannelEventKind| events.send(ChannelEvent::new(connection, kind)).is_ok();

    let ws_stream = match connect_async(url.as_str()).await {
        Ok((ws_stream, _)) => ws_stream,
        Err(e) => {
            tracing::error!(%connection, "Failed to connect to {}: {}", url, e);
            emit(ChannelEventKind::OpenFailed(e.to_string()));
            return;
        }
    };
    tracing::info!(%connection, "Connected to {}", url);

    let (mut write, mut read) = ws_stream.split();
    let (writer, mut outbound) = ChannelWriter::channel();
    if !emit(ChannelEventKind::Opened(writer)) {
        // Session already gone
        let _ = write.close().await;
        return;
    }

    loop {
        tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if !emit(ChannelEventKind::Message(text)) {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!(%connection, "Server closed connection");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::error!(%connection, "WebSocket error: {}", e);
                    emit(ChannelEventKind::Errored(e.to_string()));
                    break;
                }
            },
            text = outbound.recv() => match text {
                Some(text) => {
                    if let Err(e) = write.send(Message::Text(text)).await {
                        tracing::error!(%connection, "Failed to send message: {}", e);
                        emit(ChannelEventKind::Errored(e.to_string()));
                        break;
                    }
                }
                None => {
                    // Every writer dropped: the session closed this connection
                    tracing::debug!(%connection, "Closing connection");
                    let _ = write.close().await;
                    break;
                }
            },
        }
    }

    emit(ChannelEventKind::Closed);
}
