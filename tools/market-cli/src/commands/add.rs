//! Add command.

use anyhow::Result;
use market_cart::NewLineItem;

use super::AddArgs;
use crate::context::Context;

/// Run the add command.
pub async fn run(args: AddArgs, ctx: &Context) -> Result<()> {
    let scope = ctx.mount_cart().await?;
    let cart = scope.use_cart()?;

    let item = NewLineItem::new(args.id, args.title, args.image_url, args.price);
    let id = item.id.clone();
    cart.add_to_cart(item).await?;

    let products = cart.products();
    if let Some(entry) = products.get(&id) {
        ctx.output
            .success(&format!("{} in cart (quantity {})", entry.title, entry.quantity));
    }
    ctx.output.cart(&products);

    Ok(())
}
