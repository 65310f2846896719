use clap::{Args, Subcommand};

use concession::{
    bundles::{BundleDraft, BundleId, DraftLine},
    products::ProductId,
};
use concession_app::{context::AppContext, pages::BundlesPage, prompt::StdinPrompt};

use super::{finish, stdout};

#[derive(Debug, Args)]
pub(crate) struct BundlesCommand {
    #[command(subcommand)]
    command: BundlesSubcommand,
}

#[derive(Debug, Subcommand)]
enum BundlesSubcommand {
    /// List every bundle, available or not
    List,

    /// Create a bundle
    Create(DraftArgs),

    /// Update a bundle
    Update {
        /// Bundle id
        id: u64,

        #[command(flatten)]
        draft: DraftArgs,
    },

    /// Delete a bundle
    Delete {
        /// Bundle id
        id: u64,
    },

    /// Flip a bundle's availability
    Toggle {
        /// Bundle id
        id: u64,
    },
}

#[derive(Debug, Args)]
struct DraftArgs {
    /// Bundle name
    #[arg(long)]
    name: Option<String>,

    /// Bundle description
    #[arg(long)]
    description: Option<String>,

    /// Product line as PRODUCT_ID:QUANTITY; replaces every line when given
    #[arg(long = "item", value_parser = parse_line)]
    items: Vec<DraftLine>,
}

pub(crate) async fn run(ctx: AppContext, command: BundlesCommand) -> Result<(), String> {
    let mut page = BundlesPage::new(ctx);
    page.mount().await;

    match command.command {
        BundlesSubcommand::List => {}
        BundlesSubcommand::Create(args) => {
            page.new_draft();
            fill(&mut page.draft, args);
            page.save().await;
        }
        BundlesSubcommand::Update { id, draft } => {
            page.edit(BundleId::new(id));

            if page.feedback().banner().is_none() {
                fill(&mut page.draft, draft);
                print_preview(&page)?;
                page.save().await;
            }
        }
        BundlesSubcommand::Delete { id } => page.delete(BundleId::new(id), &StdinPrompt).await,
        BundlesSubcommand::Toggle { id } => page.toggle(BundleId::new(id)).await,
    }

    let mut out = stdout();
    let rendered = page.render(&mut out);

    finish(&mut out, page.feedback_mut(), rendered)
}

fn fill(draft: &mut BundleDraft, args: DraftArgs) {
    if let Some(name) = args.name {
        draft.name = name;
    }

    if let Some(description) = args.description {
        draft.description = description;
    }

    if !args.items.is_empty() {
        draft.clear_lines();

        for line in args.items {
            draft.push_line(line);
        }
    }
}

fn print_preview(page: &BundlesPage) -> Result<(), String> {
    use std::io::Write as _;

    let Ok(preview) = page.preview() else {
        return Ok(());
    };

    writeln!(
        stdout(),
        " Original price: {}  Bundle price: {}",
        preview.original_price, preview.bundle_price
    )
    .map_err(|error| error.to_string())
}

fn parse_line(value: &str) -> Result<DraftLine, String> {
    let (product, quantity) = value
        .split_once(':')
        .ok_or_else(|| format!("expected PRODUCT_ID:QUANTITY, got {value}"))?;

    Ok(DraftLine {
        product_id: ProductId::new(
            product
                .trim()
                .parse()
                .map_err(|error| format!("invalid product id {product}: {error}"))?,
        ),
        quantity: quantity
            .trim()
            .parse()
            .map_err(|error| format!("invalid quantity {quantity}: {error}"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_product_lines() {
        assert_eq!(
            parse_line("3:2"),
            Ok(DraftLine {
                product_id: ProductId::new(3),
                quantity: 2,
            })
        );
        assert!(parse_line("3").is_err());
        assert!(parse_line("x:2").is_err());
    }
}
