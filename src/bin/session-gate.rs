#[cfg(not(target_arch = "wasm32"))]
use anyhow::Result;
#[cfg(not(target_arch = "wasm32"))]
use session_gate::cli::{self, telemetry};

// Main function
#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<()> {
    let action = cli::start()?;

    let result = action.execute().await;

    telemetry::shutdown_tracer();

    result
}

// The browser build mounts `RequireToken` from the host app instead.
#[cfg(target_arch = "wasm32")]
fn main() {}
