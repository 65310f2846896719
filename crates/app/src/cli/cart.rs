use clap::Args;

use concession::cart::CartItemId;
use concession_app::{
    context::AppContext, pages::CheckoutPage, prompt::StdinPrompt, session::Session,
};

use super::{finish, stdout};

#[derive(Debug, Args)]
pub(crate) struct CartArgs {
    /// Cart line to change
    #[arg(long, requires = "quantity")]
    item: Option<u64>,

    /// New quantity for the line; below 1 removes it after confirmation
    #[arg(long, requires = "item", allow_negative_numbers = true)]
    quantity: Option<i64>,

    /// Cart line to remove
    #[arg(long)]
    remove: Option<u64>,
}

pub(crate) async fn run(ctx: AppContext, session: Session, args: CartArgs) -> Result<(), String> {
    let mut page = CheckoutPage::new(ctx, session);
    page.mount().await;

    if let (Some(item), Some(quantity)) = (args.item, args.quantity) {
        page.change_quantity(CartItemId::new(item), quantity, &StdinPrompt)
            .await;
    }

    if let Some(item) = args.remove {
        page.remove_item(CartItemId::new(item)).await;
    }

    let mut out = stdout();
    let rendered = page.render(&mut out);

    finish(&mut out, page.feedback_mut(), rendered)
}
