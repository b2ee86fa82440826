//! Voicee Backend Binary
//!
//! Session authentication server for the interview app.
//! Runs on BIND_ADDR (e.g. 0.0.0.0:8888).

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vce_core::log();
    vce_core::kys();
    vce_server::run().await
}
