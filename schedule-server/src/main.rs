use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use schedule_server::store::{MemoryStore, PgStore};
use schedule_server::web::{AppState, create_router};

/// Pool ceiling for the Postgres backend.
const MAX_DB_CONNECTIONS: u32 = 5;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Pick the storage backend from the environment
    let state = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let store = PgStore::connect(&url, MAX_DB_CONNECTIONS)
                .await
                .expect("Failed to connect to database");
            store
                .init_schema()
                .await
                .expect("Failed to initialise database schema");
            AppState::new(store)
        }
        Err(_) => {
            eprintln!("Warning: DATABASE_URL not set. Using in-memory storage; data is lost on exit.");
            AppState::new(MemoryStore::new())
        }
    };

    // Create router
    let app = create_router(state);

    // Bind and serve
    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    println!("Train Schedule Service listening on http://{addr}");
    println!();
    println!("Open http://{addr} in your browser for the schedule page.");
    println!();
    println!("API Endpoints:");
    println!("  GET    /health         - Health check");
    println!("  GET    /trains/        - List trains");
    println!("  POST   /trains/        - Add a train");
    println!("  PUT    /trains/:id     - Replace a train");
    println!("  DELETE /trains/:id     - Delete a train");
    println!("  GET    /stations/      - List stations");
    println!("  POST   /stations/      - Add a station");
    println!("  PUT    /stations/:id   - Replace a station");
    println!("  DELETE /stations/:id   - Delete a station");
    println!("  GET    /records/       - List schedule records");
    println!("  POST   /records/       - Add a schedule record");
    println!("  PUT    /records/:id    - Replace a schedule record");
    println!("  DELETE /records/:id    - Delete a schedule record");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
