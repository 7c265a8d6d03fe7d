//! Tertulia room and matchmaking server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tertulia-server
//! cargo run --bin tertulia-server -- --host 0.0.0.0 --port 3000
//! PORT=4000 cargo run --bin tertulia-server
//! ```

use std::{collections::HashMap, sync::Arc};

use clap::Parser;
use tertulia_server::{
    domain::{Coordinator, DEFAULT_HISTORY_CAPACITY},
    infrastructure::message_pusher::WebSocketMessagePusher,
    ui::Server,
    usecase::{EventRouter, QueryRoomsUseCase},
};
use tertulia_shared::{logger::setup_logger, time::SystemClock};
use tokio::sync::Mutex;

#[derive(Parser, Debug)]
#[command(name = "tertulia-server")]
#[command(about = "Real-time room and matchmaking server over WebSocket", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Number of recent messages kept per room
    #[arg(long, env = "HISTORY_CAPACITY", default_value_t = DEFAULT_HISTORY_CAPACITY)]
    history_capacity: usize,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Coordinator (in-memory state)
    // 2. MessagePusher
    // 3. UseCases
    // 4. Server

    // 1. Coordinator
    let coordinator = Arc::new(Mutex::new(Coordinator::new(args.history_capacity)));
    tracing::info!("Keeping the last {} messages per room", args.history_capacity);

    // 2. MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
        HashMap::new(),
    ))));

    // 3. UseCases
    let router = Arc::new(EventRouter::new(
        coordinator.clone(),
        message_pusher,
        Arc::new(SystemClock),
    ));
    let query_rooms = Arc::new(QueryRoomsUseCase::new(coordinator));

    // 4. Server
    let server = Server::new(router, query_rooms);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
