//! List command.

use anyhow::Result;

use crate::context::Context;

/// Run the list command.
pub async fn run(ctx: &Context) -> Result<()> {
    let scope = ctx.mount_cart().await?;
    ctx.output.cart(&scope.use_cart()?.products());
    Ok(())
}
