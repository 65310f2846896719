//! Receipt
//!
//! Plain-text rendering of the storefront pages: the cart and order summary,
//! payment methods, the menu, and the bundle listing.

use std::{fmt::Write as _, io, ops::Range};

use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    bundles::Bundle,
    checkout::CheckoutState,
    money::PricingError,
    payments::PaymentMethod,
    products::MenuProduct,
};

/// Errors that can occur while rendering a page.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Totals could not be computed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Print the cart lines and the order summary.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if totals fail or the output cannot be written.
pub fn write_checkout(mut out: impl io::Write, state: &CheckoutState) -> Result<(), ReceiptError> {
    if state.cart().is_empty() {
        writeln!(out, "\nYour cart is empty.").map_err(|_err| ReceiptError::IO)?;
    } else {
        write_cart_table(&mut out, state)?;
    }

    write_summary(&mut out, state)?;

    if let Some(challenge) = state.coupon.challenge() {
        writeln!(out, " Puzzle: {}", challenge.prompt.text()).map_err(|_err| ReceiptError::IO)?;
    }

    write_payment_methods(&mut out, state)
}

fn write_cart_table(out: &mut impl io::Write, state: &CheckoutState) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["", "Item", "Type", "Unit Price", "Qty", "Total"]);

    for item in state.cart() {
        builder.push_record([
            format!("#{:<3}", item.item_id),
            item.line.name().to_string(),
            item.line.kind().to_string(),
            format!("{}", item.line.unit_price()),
            item.quantity.to_string(),
            format!("{}", item.line_total()?),
        ]);
    }

    let rows = state.cart().len();

    write_table(out, builder, 3..6, |table| {
        for row in 1..=rows {
            table.modify((row, 2), color_dark_grey());
        }
    })
}

fn write_summary(out: &mut impl io::Write, state: &CheckoutState) -> Result<(), ReceiptError> {
    let totals = state.totals()?;
    let mut lines = vec![(" Subtotal:".to_string(), format!("{}  ", totals.subtotal))];

    if let Some(coupon) = state.coupon.applied() {
        lines.push((
            format!(" Coupon {}:", coupon.code),
            format!("\x1b[32m-{}\x1b[0m  ", totals.discount),
        ));
    }

    if state.donation.ngo().is_some() {
        lines.push((" Donation:".to_string(), format!("{}  ", totals.donation)));
    }

    lines.push((
        " \x1b[1mTotal:\x1b[0m".to_string(),
        format!("\x1b[1m{}\x1b[0m  ", totals.final_total),
    ));

    let label_width = lines.iter().map(|(label, _)| visible_width(label)).max().unwrap_or(0);
    let value_width = lines.iter().map(|(_, value)| visible_width(value)).max().unwrap_or(0);

    for (label, value) in &lines {
        write_summary_line(out, label, value, label_width, value_width)?;
    }

    writeln!(out).map_err(|_err| ReceiptError::IO)
}

fn write_payment_methods(
    out: &mut impl io::Write,
    state: &CheckoutState,
) -> Result<(), ReceiptError> {
    let selected = state.selected_payment_method().map(|method| method.id);

    if state.payment_methods().is_empty() {
        return writeln!(out, " No payment methods on file.").map_err(|_err| ReceiptError::IO);
    }

    writeln!(out, " Payment methods:").map_err(|_err| ReceiptError::IO)?;

    for method in state.payment_methods() {
        let marker = if Some(method.id) == selected { '>' } else { ' ' };

        writeln!(out, " {marker} {}", payment_method_line(method)).map_err(|_err| ReceiptError::IO)?;
    }

    Ok(())
}

/// One-line description of a payment method.
pub fn payment_method_line(method: &PaymentMethod) -> String {
    let mut line = format!(
        "[{}] **** {}  exp {}  balance {}",
        method.id,
        method.last_four(),
        method.expiry(),
        method.balance()
    );

    if method.is_default {
        _ = line.write_str("  (default)");
    }

    line
}

/// Print the menu: products with their supplier, then available bundles.
///
/// # Errors
///
/// Returns [`ReceiptError::IO`] if the output cannot be written.
pub fn write_menu(
    mut out: impl io::Write,
    products: &[MenuProduct],
    bundles: &[Bundle],
) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["Id", "Product", "Supplier", "Price", "Discount", "Stock", "Status"]);

    for entry in products {
        let product = &entry.product;
        let status = if product.inventory_quantity == 0 {
            product.cart_button_label()
        } else {
            product.availability_label()
        };

        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            entry.supplier_name.clone(),
            format!("{}", product.unit_price),
            percent_label(product.discount_points()),
            product.inventory_quantity.to_string(),
            status.to_string(),
        ]);
    }

    write_table(&mut out, builder, 3..6, |_| {})?;

    write_bundle_table(&mut out, bundles.iter().filter(|bundle| bundle.is_available), false)
}

/// Print the bundle listing, including unavailable bundles.
///
/// # Errors
///
/// Returns [`ReceiptError::IO`] if the output cannot be written.
pub fn write_bundles(mut out: impl io::Write, bundles: &[Bundle]) -> Result<(), ReceiptError> {
    write_bundle_table(&mut out, bundles.iter(), true)
}

fn write_bundle_table<'a>(
    out: &mut impl io::Write,
    bundles: impl Iterator<Item = &'a Bundle>,
    show_availability: bool,
) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["Id", "Bundle", "Contents", "Was", "Price", "Status"]);

    for bundle in bundles {
        let contents = bundle
            .items
            .iter()
            .map(|item| {
                let name = item
                    .product_name
                    .clone()
                    .unwrap_or_else(|| format!("product {}", item.product_id));

                format!("{}x {name}", item.quantity)
            })
            .collect::<Vec<_>>()
            .join("\n");

        let status = match (show_availability, bundle.is_available) {
            (false, _) => String::new(),
            (true, true) => "Available".to_string(),
            (true, false) => "Unavailable".to_string(),
        };

        builder.push_record([
            bundle.id.to_string(),
            bundle.name.clone(),
            contents,
            bundle
                .original_price
                .map(|price| format!("{price}"))
                .unwrap_or_default(),
            format!("{}", bundle.total_price),
            status,
        ]);
    }

    write_table(out, builder, 3..5, |_| {})
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    money_columns: Range<usize>,
    colorize: impl FnOnce(&mut tabled::Table),
) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(
        1,
        HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
    );

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(money_columns), Alignment::right());

    colorize(&mut table);

    writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)
}

/// Visible width of a string, skipping ANSI escapes.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            in_escape = !ch.is_ascii_alphabetic();
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), ReceiptError> {
    let label_pad = label_col_width.saturating_sub(visible_width(label));
    let value_pad = value_col_width.saturating_sub(visible_width(value));

    writeln!(
        out,
        "{:>label_pad$}{label}  {}{value}",
        "",
        " ".repeat(value_pad)
    )
    .map_err(|_err| ReceiptError::IO)
}

/// Percent points rendered without trailing zeros.
pub fn percent_label(points: Decimal) -> String {
    format!("{}%", points.normalize())
}

fn color_dark_grey() -> Color {
    Color::new("\x1b[90m", "\x1b[0m")
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        cart::{CartEntry, CartItemId},
        checkout::Catalog,
        coupons::AppliedCoupon,
        donations::NgoId,
        money::cents,
        payments::tests::method,
        products::{ProductId, tests::product},
    };

    use super::*;

    fn render(state: &CheckoutState) -> Result<String, Box<dyn std::error::Error>> {
        let mut out = Vec::new();
        write_checkout(&mut out, state)?;

        Ok(String::from_utf8(out)?)
    }

    fn state() -> CheckoutState {
        let mut state = CheckoutState::new();
        state.set_catalog(Catalog {
            products: vec![product(1, 1_000)],
            ..Catalog::default()
        });
        state.set_cart_entries(vec![CartEntry {
            id: CartItemId::new(5),
            product_id: Some(ProductId::new(1)),
            bundle_id: None,
            quantity: 2,
        }]);
        state.set_payment_methods(vec![method(1, 5_000, true)]);
        state
    }

    #[test]
    fn checkout_lists_lines_and_total() -> TestResult {
        let output = render(&state())?;

        assert!(output.contains("Snack 1"), "{output}");
        assert!(output.contains("$20.00"), "{output}");
        assert!(output.contains("Subtotal:"), "{output}");
        assert!(output.contains("**** 1111"), "{output}");
        assert!(output.contains("(default)"), "{output}");

        Ok(())
    }

    #[test]
    fn checkout_shows_coupon_and_donation_lines() -> TestResult {
        let mut state = state();
        state.coupon.set_code("SAVE10");
        state.coupon.applied_confirmed(AppliedCoupon {
            code: "SAVE10".to_string(),
            discount_percent: Decimal::TEN,
            new_total: cents(1_800),
        });
        state.donation.set_ngo(Some(NgoId::new(1)));

        let output = render(&state)?;

        assert!(output.contains("Coupon SAVE10:"), "{output}");
        assert!(output.contains("$2.00"), "{output}");
        assert!(output.contains("Donation:"), "{output}");
        assert!(output.contains("$0.30"), "{output}");

        Ok(())
    }

    #[test]
    fn empty_cart_says_so() -> TestResult {
        let output = render(&CheckoutState::new())?;

        assert!(output.contains("Your cart is empty."), "{output}");
        assert!(output.contains("No payment methods on file."), "{output}");

        Ok(())
    }

    #[test]
    fn percent_label_drops_trailing_zeros() {
        assert_eq!(percent_label(Decimal::new(1500, 2)), "15%");
    }
}
