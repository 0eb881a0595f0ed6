use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{Card, PlayerId, RoomId};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::current_player::CurrentPlayer;
use crate::services::sessions::SessionOutcome;
use crate::state::app_state::AppState;
use crate::ws::hub::{HubEvent, WsRegistry};
use crate::ws::protocol::{ClientMsg, ServerMsg, PROTOCOL_VERSION};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

/// GET /api/ws
pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    player: CurrentPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let session = WsSession::new(Uuid::new_v4(), player.id, app_state);
    ws::start(session, &req, stream)
}

pub struct WsSession {
    conn_id: Uuid,
    player_id: PlayerId,
    app_state: web::Data<AppState>,
    registry: Arc<WsRegistry>,

    last_heartbeat: Instant,

    hello_done: bool,
}

enum Action {
    Play(Vec<Card>),
    Pass,
}

impl WsSession {
    fn new(conn_id: Uuid, player_id: PlayerId, app_state: web::Data<AppState>) -> Self {
        let registry = app_state.registry.clone();
        Self {
            conn_id,
            player_id,
            app_state,
            registry,
            last_heartbeat: Instant::now(),
            hello_done: false,
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    /// Report a refused command; the socket stays open.
    fn send_rejection(ctx: &mut ws::WebsocketContext<Self>, err: &AppError) {
        Self::send_json(
            ctx,
            &ServerMsg::Error {
                code: err.code().as_str(),
                message: err.to_string(),
            },
        );
    }

    fn send_error_and_close(
        &self,
        ctx: &mut ws::WebsocketContext<Self>,
        code: ErrorCode,
        message: impl Into<String>,
    ) {
        let msg = ServerMsg::Error {
            code: code.as_str(),
            message: message.into(),
        };
        Self::send_json(ctx, &msg);
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
        ctx.stop();
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(
                    conn_id = %actor.conn_id,
                    player_id = %actor.player_id,
                    "[WS SESSION] heartbeat timed out"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }

    fn require_hello(&self, ctx: &mut ws::WebsocketContext<Self>) -> bool {
        if !self.hello_done {
            self.send_error_and_close(ctx, ErrorCode::BadRequest, "Must send hello first");
        }
        self.hello_done
    }

    fn handle_subscribe(&mut self, room_id: RoomId, ctx: &mut ws::WebsocketContext<Self>) {
        match self.app_state.sessions.view_for(room_id, self.player_id) {
            Ok(session) => {
                self.registry.subscribe(self.conn_id, room_id);
                // Ordering guarantee: ack then snapshot
                Self::send_json(
                    ctx,
                    &ServerMsg::Ack {
                        message: "subscribed",
                    },
                );
                Self::send_json(
                    ctx,
                    &ServerMsg::Snapshot {
                        version: session.session.version,
                        session,
                    },
                );
            }
            Err(err) => {
                debug!(%room_id, conn_id = %self.conn_id, error = %err, "[WS SESSION] subscribe refused");
                Self::send_rejection(ctx, &AppError::from(err));
            }
        }
    }

    /// Run a play or pass off the actor; only this connection hears a refusal.
    fn submit(&mut self, room_id: RoomId, action: Action, ctx: &mut ws::WebsocketContext<Self>) {
        let sessions = self.app_state.sessions.clone();
        let player_id = self.player_id;

        ctx.spawn(
            async move {
                match action {
                    Action::Play(cards) => sessions.submit_play(room_id, player_id, cards).await,
                    Action::Pass => sessions.submit_pass(room_id, player_id).await,
                }
            }
            .into_actor(self)
            .map(move |res: Result<SessionOutcome, _>, actor, ctx| match res {
                Ok(_) => Self::send_json(
                    ctx,
                    &ServerMsg::Ack {
                        message: "accepted",
                    },
                ),
                Err(err) => {
                    debug!(
                        %room_id,
                        conn_id = %actor.conn_id,
                        player_id = %actor.player_id,
                        error = %err,
                        "[WS SESSION] action rejected"
                    );
                    Self::send_rejection(ctx, &AppError::from(err));
                }
            }),
        );
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(
            conn_id = %self.conn_id,
            player_id = %self.player_id,
            "[WS SESSION] started"
        );

        let recipient = ctx.address().recipient::<HubEvent>();
        self.registry
            .register_connection(self.player_id, self.conn_id, recipient);

        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.registry.unregister_connection(self.conn_id);
        info!(
            conn_id = %self.conn_id,
            player_id = %self.player_id,
            "[WS SESSION] stopped"
        );
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();

                let Ok(cmd) = serde_json::from_str::<ClientMsg>(&text) else {
                    self.send_error_and_close(ctx, ErrorCode::BadRequest, "Malformed JSON");
                    return;
                };

                match cmd {
                    ClientMsg::Hello { protocol } => {
                        if protocol != PROTOCOL_VERSION {
                            self.send_error_and_close(
                                ctx,
                                ErrorCode::BadProtocol,
                                "Unsupported protocol version",
                            );
                            return;
                        }
                        self.hello_done = true;
                        Self::send_json(
                            ctx,
                            &ServerMsg::HelloAck {
                                protocol: PROTOCOL_VERSION,
                                player_id: self.player_id,
                            },
                        );
                    }
                    ClientMsg::Subscribe { room_id } => {
                        if self.require_hello(ctx) {
                            self.handle_subscribe(room_id, ctx);
                        }
                    }
                    ClientMsg::Unsubscribe { room_id } => {
                        if self.require_hello(ctx) {
                            self.registry.unsubscribe(self.conn_id, room_id);
                            Self::send_json(
                                ctx,
                                &ServerMsg::Ack {
                                    message: "unsubscribed",
                                },
                            );
                        }
                    }
                    ClientMsg::Play { room_id, cards } => {
                        if self.require_hello(ctx) {
                            self.submit(room_id, Action::Play(cards), ctx);
                        }
                    }
                    ClientMsg::Pass { room_id } => {
                        if self.require_hello(ctx) {
                            self.submit(room_id, Action::Pass, ctx);
                        }
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                self.send_error_and_close(ctx, ErrorCode::BadRequest, "Binary not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(
                    conn_id = %self.conn_id,
                    player_id = %self.player_id,
                    error = %err,
                    "[WS SESSION] protocol error"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<HubEvent> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: HubEvent, ctx: &mut Self::Context) -> Self::Result {
        let out = match msg {
            HubEvent::Room(event) => ServerMsg::Event { event },
            HubEvent::Private(event) => ServerMsg::private(event),
        };
        Self::send_json(ctx, &out);
    }
}
