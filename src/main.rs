use log::{error, info};
use serde_json::json;
use service::{config::Config, logging::Logger, AppState};
use session_group::{ChannelSession, Message, Session, UserId};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[tokio::main]
async fn main() {
    let config = Config::new();
    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to start logger: {e}");
        std::process::exit(1);
    }

    let app_state = AppState::new(config);
    let config = &app_state.config;
    let group = app_state
        .group_manager_ref()
        .get_or_create(config.group_name());

    let mut sessions = Vec::new();
    let mut receivers: Vec<JoinHandle<usize>> = Vec::new();
    for i in 0..config.demo_members {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = Arc::new(ChannelSession::new(tx));
        session.bind(UserId::from(i) + 1);

        if let Err(e) = group.add(session.clone()) {
            error!("Failed to join session {} to group: {e}", session.sid());
            std::process::exit(1);
        }
        receivers.push(tokio::spawn(drain(session.uid(), rx)));
        sessions.push(session);
    }
    info!(
        "Group [{}] has {} member(s): {:?}",
        group.name(),
        group.count(),
        group.members()
    );

    if let Err(e) = group.broadcast(config.route(), &json!({ "text": "hello everyone" })) {
        error!("Broadcast failed: {e}");
    }

    // A dropped connection only produces a warning on that session.
    if let Some(first) = sessions.first() {
        first.close();
    }
    if let Err(e) = group.multicast(
        config.route(),
        &json!({ "text": "odd members only" }),
        |s| s.uid() % 2 == 1,
    ) {
        error!("Multicast failed: {e}");
    }
    info!(
        "{} of {} session(s) disconnected",
        sessions.iter().filter(|s| s.is_closed()).count(),
        sessions.len()
    );

    if let Err(e) = app_state.group_manager_ref().remove(group.name()) {
        error!("Failed to remove group [{}]: {e}", group.name());
    }
    drop(sessions);

    for handle in receivers {
        match handle.await {
            Ok(received) => info!("Receiver finished after {received} message(s)"),
            Err(e) => error!("Receiver task failed: {e}"),
        }
    }
}

async fn drain(uid: UserId, mut rx: mpsc::UnboundedReceiver<Message>) -> usize {
    let mut received = 0;
    while let Some(message) = rx.recv().await {
        received += 1;
        match serde_json::to_string(&message) {
            Ok(json) => info!("UID[{uid}] <- {json}"),
            Err(e) => error!("Failed to serialize message for UID[{uid}]: {e}"),
        }
    }
    received
}
