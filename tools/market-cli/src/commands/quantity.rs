//! Increment and decrement commands.

use anyhow::Result;
use market_cart::ProductId;

use super::QuantityArgs;
use crate::context::Context;

/// Run the increment command.
pub async fn increment(args: QuantityArgs, ctx: &Context) -> Result<()> {
    let scope = ctx.mount_cart().await?;
    let cart = scope.use_cart()?;
    let id = ProductId::new(args.id);

    if cart.products().get(&id).is_none() {
        ctx.output.info(&format!("{} is not in the cart", id));
    }
    cart.increment(&id).await?;

    ctx.output.cart(&cart.products());
    Ok(())
}

/// Run the decrement command.
pub async fn decrement(args: QuantityArgs, ctx: &Context) -> Result<()> {
    let scope = ctx.mount_cart().await?;
    let cart = scope.use_cart()?;
    let id = ProductId::new(args.id);

    cart.decrement(&id).await?;

    let products = cart.products();
    match products.get(&id) {
        Some(entry) => ctx
            .output
            .success(&format!("{} quantity {}", entry.title, entry.quantity)),
        None => ctx.output.info(&format!("{} is not in the cart", id)),
    }
    ctx.output.cart(&products);
    Ok(())
}
