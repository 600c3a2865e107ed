//! In-process stub API server for exercising the remote sources end to
//! end, canned responses included.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

/// Serve a router on an ephemeral loopback port and return its address.
///
/// The server task lives until the test runtime shuts down.
pub async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}
