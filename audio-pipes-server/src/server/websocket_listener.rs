use crate::server::{AppState, HubHandle, OutboundChannel};
use audio_pipes_core::{
    ConnectionInfo, EndpointChannel, EndpointCommand, EndpointId, HubCommand, MonitorChannel,
    MonitorId, MonitorUpdate, SessionId,
};
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc::{self, Receiver};
use tracing::{debug, error, info, warn};

/// Query parameters of an endpoint connection
#[derive(Debug, Default, Deserialize)]
pub struct EndpointParams {
    pub origin: Option<String>,
    pub sub_origin: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
}

impl From<EndpointParams> for ConnectionInfo {
    fn from(params: EndpointParams) -> Self {
        ConnectionInfo {
            origin_id: params.origin,
            sub_origin_id: params.sub_origin,
            title: params.title,
            url: params.url,
        }
    }
}

pub async fn handle_endpoint(
    ws: WebSocketUpgrade,
    Query(params): Query<EndpointParams>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| listen_endpoint(socket, params.into(), state))
}

pub async fn handle_monitor(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| listen_monitor(socket, state))
}

async fn listen_endpoint(mut socket: WebSocket, info: ConnectionInfo, state: AppState) {
    let id = info.endpoint_id();
    if !id.is_valid() {
        warn!(?info, "Refusing endpoint without origin");
        let _ = socket.send(Message::Close(None)).await;
        return;
    }

    let session = SessionId::new();
    let (ws_sender, ws_receiver) = socket.split();
    let (tx, rx) = mpsc::channel::<EndpointCommand>(state.channel_capacity);
    let channel: EndpointChannel = Arc::new(OutboundChannel::new(tx));

    let connect = HubCommand::ConnectEndpoint {
        info,
        session,
        channel,
    };
    if let Err(e) = state.hub.submit(connect).await {
        error!(endpoint = %id, error = %e, "Failed to register endpoint");
        return;
    }
    info!(endpoint = %id, %session, "Endpoint socket opened");

    let sender_task = handle_outgoing_messages(rx, ws_sender);
    let receiver_task = handle_incoming_messages(ws_receiver, &state.hub, |message| {
        HubCommand::EndpointMessage {
            id: id.clone(),
            message,
        }
    });

    tokio::select! {
        _ = sender_task => {
            debug!(endpoint = %id, "Sender task completed");
        }
        _ = receiver_task => {
            debug!(endpoint = %id, "Receiver task completed");
        }
    }

    disconnect(&state.hub, id, session).await;
}

async fn disconnect(hub: &HubHandle, id: EndpointId, session: SessionId) {
    info!(endpoint = %id, "Endpoint socket closed");
    if let Err(e) = hub.submit(HubCommand::DisconnectEndpoint { id, session }).await {
        error!(error = %e, "Failed to disconnect endpoint");
    }
}

async fn listen_monitor(socket: WebSocket, state: AppState) {
    let id = MonitorId::new();
    let (ws_sender, ws_receiver) = socket.split();
    let (tx, rx) = mpsc::channel::<MonitorUpdate>(state.channel_capacity);
    let channel: MonitorChannel = Arc::new(OutboundChannel::new(tx));

    if let Err(e) = state
        .hub
        .submit(HubCommand::SubscribeMonitor { id, channel })
        .await
    {
        error!(monitor = %id, error = %e, "Failed to subscribe monitor");
        return;
    }
    info!(monitor = %id, "Monitor socket opened");

    let sender_task = handle_outgoing_messages(rx, ws_sender);
    let receiver_task = handle_incoming_messages(ws_receiver, &state.hub, |request| {
        HubCommand::MonitorRequest { id, request }
    });

    tokio::select! {
        _ = sender_task => {
            debug!(monitor = %id, "Sender task completed");
        }
        _ = receiver_task => {
            debug!(monitor = %id, "Receiver task completed");
        }
    }

    info!(monitor = %id, "Monitor socket closed");
    if let Err(e) = state
        .hub
        .submit(HubCommand::UnsubscribeMonitor { id })
        .await
    {
        error!(monitor = %id, error = %e, "Failed to unsubscribe monitor");
    }
}

/// Serialize queued frames onto the socket until either side goes away
pub async fn handle_outgoing_messages<M: Serialize>(
    mut rx: Receiver<M>,
    mut ws_sender: SplitSink<WebSocket, Message>,
) {
    while let Some(frame) = rx.recv().await {
        let text = match serde_json::to_string(&frame) {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "Failed to serialize frame");
                continue;
            }
        };
        if let Err(e) = ws_sender.send(Message::Text(text)).await {
            debug!(error = %e, "Failed to send frame");
            break;
        }
    }
}

/// Forward parsed frames to the hub; unparseable frames are logged and skipped
pub async fn handle_incoming_messages<T, F>(
    mut receiver: SplitStream<WebSocket>,
    hub: &HubHandle,
    to_command: F,
) where
    T: DeserializeOwned,
    F: Fn(T) -> HubCommand,
{
    while let Some(message) = receiver.next().await {
        let text = match message {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(other) => {
                debug!(frame = ?other, "Ignoring non-text frame");
                continue;
            }
            Err(e) => {
                debug!(error = %e, "Failed to receive frame");
                break;
            }
        };

        match serde_json::from_str::<T>(&text) {
            Ok(parsed) => {
                if hub.submit(to_command(parsed)).await.is_err() {
                    break;
                }
            }
            Err(e) => warn!(error = %e, frame = %text, "Failed to parse frame"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audio_pipes_core::{EndpointMessage, MonitorRequest};

    #[test]
    fn test_params_into_connection_info() {
        let params = EndpointParams {
            origin: Some("7".to_string()),
            sub_origin: Some("2".to_string()),
            title: Some("Page".to_string()),
            url: Some("https://radio.example/embed".to_string()),
        };

        let info: ConnectionInfo = params.into();
        assert_eq!(info.endpoint_id().as_str(), "7_2");
        assert_eq!(info.derive_title(), "radio.example/embed");
    }

    #[test]
    fn test_params_without_origin_map_to_sentinel() {
        let info: ConnectionInfo = EndpointParams::default().into();
        assert!(!info.endpoint_id().is_valid());
    }

    #[test]
    fn test_endpoint_frames_parse() {
        let frame = r#"{"type":"rtc_candidate","candidate":{"candidate":"c1"}}"#;
        let parsed: EndpointMessage = serde_json::from_str(frame).unwrap();
        assert_eq!(parsed.kind(), "rtc_candidate");

        let frame = r#"{"type":"refresh_nodes"}"#;
        let parsed: MonitorRequest = serde_json::from_str(frame).unwrap();
        assert_eq!(parsed, MonitorRequest::RequestSnapshot);
    }
}
