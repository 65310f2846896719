use clap::Args;

use concession::{bundles::BundleId, products::ProductId};
use concession_app::{context::AppContext, pages::MenuPage, session::Session};

use super::{finish, stdout};

#[derive(Debug, Args)]
pub(crate) struct AddArgs {
    /// Product or bundle id
    id: u64,
}

pub(crate) async fn show(ctx: AppContext, session: Session) -> Result<(), String> {
    let mut page = MenuPage::new(ctx, session);
    page.mount().await;

    print(&mut page)
}

pub(crate) async fn add_product(
    ctx: AppContext,
    session: Session,
    args: AddArgs,
) -> Result<(), String> {
    let mut page = MenuPage::new(ctx, session);
    page.mount().await;
    page.add_product(ProductId::new(args.id)).await;

    print(&mut page)
}

pub(crate) async fn add_bundle(
    ctx: AppContext,
    session: Session,
    args: AddArgs,
) -> Result<(), String> {
    let mut page = MenuPage::new(ctx, session);
    page.mount().await;
    page.add_bundle(BundleId::new(args.id)).await;

    print(&mut page)
}

fn print(page: &mut MenuPage) -> Result<(), String> {
    let mut out = stdout();
    let rendered = page.render(&mut out);

    finish(&mut out, page.feedback_mut(), rendered)
}
