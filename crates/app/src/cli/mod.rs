use std::io::{self, Write};

use clap::{Parser, Subcommand};

use concession_app::{
    config::{ApiConfig, LoggingConfig, SessionConfig},
    context::AppContext,
    observability,
    pages::{Feedback, PageError},
};

mod bundles;
mod cart;
mod checkout;
mod menu;

#[derive(Debug, Parser)]
#[command(name = "concession", about = "Concession storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    api: ApiConfig,

    #[command(flatten)]
    session: SessionConfig,

    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show products and bundles
    Menu,

    /// Put one unit of a product in the cart
    AddProduct(menu::AddArgs),

    /// Put one bundle in the cart
    AddBundle(menu::AddArgs),

    /// Show or edit the cart
    Cart(cart::CartArgs),

    /// Apply coupons and donations, manage cards, and pay
    Checkout(checkout::CheckoutArgs),

    /// Manage bundles (staff)
    Bundles(bundles::BundlesCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        observability::init(&self.logging).map_err(|error| error.to_string())?;

        let ctx = AppContext::from_config(&self.api)
            .map_err(|error| format!("{error}: {}", self.api.api_base_url))?;
        let session = self.session.session();

        match self.command {
            Commands::Menu => menu::show(ctx, session).await,
            Commands::AddProduct(args) => menu::add_product(ctx, session, args).await,
            Commands::AddBundle(args) => menu::add_bundle(ctx, session, args).await,
            Commands::Cart(args) => cart::run(ctx, session, args).await,
            Commands::Checkout(args) => checkout::run(ctx, session, args).await,
            Commands::Bundles(command) => bundles::run(ctx, command).await,
        }
    }
}

/// Print a rendered page followed by its notices and error banner. Render
/// failures are shown in the banner.
fn finish(
    out: &mut impl Write,
    feedback: &mut Feedback,
    rendered: Result<(), PageError>,
) -> Result<(), String> {
    feedback.record(rendered);

    for notice in feedback.take_notices() {
        writeln!(out, " {notice}").map_err(|error| error.to_string())?;
    }

    if let Some(banner) = feedback.banner() {
        writeln!(out, " \x1b[31mError:\x1b[0m {banner}").map_err(|error| error.to_string())?;
    }

    Ok(())
}

fn stdout() -> io::StdoutLock<'static> {
    io::stdout().lock()
}
