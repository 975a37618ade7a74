//! Reset command.

use anyhow::Result;

use crate::context::Context;

/// Run the reset command.
///
/// Skips loading, so a snapshot that no longer parses can still be cleared.
pub async fn run(ctx: &Context) -> Result<()> {
    let provider = ctx.open_provider().await?;
    provider.store().reset().await?;

    ctx.output.success(&format!(
        "Cleared cart under {}",
        provider.store().config().storage_key
    ));
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "reset": true }));
    }
    Ok(())
}
