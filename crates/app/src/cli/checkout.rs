use clap::Args;
use rust_decimal::Decimal;

use concession::{
    checkout::CheckoutError,
    donations::{DonationType, NgoId},
    money,
    payments::PaymentMethodId,
};
use concession_app::{
    context::AppContext,
    pages::{CheckoutPage, PageError},
    prompt::{Prompt, StdinPrompt},
    session::Session,
};

use super::{finish, stdout};

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Coupon code to apply
    #[arg(long)]
    coupon: Option<String>,

    /// Apply the coupon without solving a puzzle
    #[arg(long, requires = "coupon")]
    skip_puzzle: bool,

    /// Puzzle answer; asked for when omitted
    #[arg(long, requires = "coupon")]
    answer: Option<String>,

    /// Charity to donate to
    #[arg(long)]
    ngo: Option<u64>,

    /// Donate this percentage of the subtotal
    #[arg(long, requires = "ngo", conflicts_with = "donation_amount")]
    donation_percentage: Option<Decimal>,

    /// Donate a fixed amount, in dollars
    #[arg(long, requires = "ngo")]
    donation_amount: Option<Decimal>,

    /// Card to charge
    #[arg(long)]
    payment_method: Option<u64>,

    /// Top up the selected card, in dollars
    #[arg(long, num_args = 0..=1, default_missing_value = "100")]
    add_funds: Option<Decimal>,

    /// Place the order
    #[arg(long)]
    pay: bool,
}

pub(crate) async fn run(
    ctx: AppContext,
    session: Session,
    args: CheckoutArgs,
) -> Result<(), String> {
    let mut page = CheckoutPage::new(ctx, session);
    page.mount().await;

    if let Some(id) = args.payment_method {
        page.select_payment_method(PaymentMethodId::new(id));
    }

    if let Some(amount) = args.add_funds {
        add_funds(&mut page, amount).await;
    }

    if let Some(ngo) = args.ngo {
        donate(&mut page, ngo, args.donation_amount, args.donation_percentage);
    }

    if let Some(code) = args.coupon {
        apply_coupon(&mut page, code, args.skip_puzzle, args.answer, &StdinPrompt).await;
    }

    if args.pay {
        page.checkout().await;
    }

    let mut out = stdout();
    let rendered = page.render(&mut out);

    finish(&mut out, page.feedback_mut(), rendered)
}

async fn add_funds(page: &mut CheckoutPage, dollars: Decimal) {
    let method = page
        .state()
        .selected_payment_method()
        .map(|method| method.id)
        .ok_or(PageError::from(CheckoutError::NoPaymentMethod));

    let amount = money::from_decimal(dollars).map_err(PageError::from);

    match method.and_then(|method| amount.map(|amount| (method, amount))) {
        Ok((method, amount)) => page.add_funds(method, amount).await,
        Err(error) => {
            page.feedback_mut().record::<()>(Err(error));
        }
    }
}

fn donate(
    page: &mut CheckoutPage,
    ngo: u64,
    amount: Option<Decimal>,
    percentage: Option<Decimal>,
) {
    let donation = &mut page.state_mut().donation;

    donation.set_ngo(Some(NgoId::new(ngo)));

    let result = match (amount, percentage) {
        (Some(amount), _) => {
            donation.set_kind(DonationType::Amount);
            donation.set_fixed_amount(amount)
        }
        (None, Some(points)) => {
            donation.set_kind(DonationType::Percentage);
            donation.set_percentage(points)
        }
        (None, None) => Ok(()),
    };

    page.feedback_mut().record(result.map_err(PageError::from));
}

async fn apply_coupon(
    page: &mut CheckoutPage,
    code: String,
    skip_puzzle: bool,
    answer: Option<String>,
    prompt: &dyn Prompt,
) {
    let coupon = &mut page.state_mut().coupon;
    coupon.set_code(code);
    coupon.set_skip_puzzle(skip_puzzle);

    page.apply_coupon().await;

    let Some(question) = page
        .state()
        .coupon
        .challenge()
        .map(|challenge| challenge.prompt.text().to_string())
    else {
        return;
    };

    match answer.or_else(|| prompt.ask(&format!("Puzzle: {question}\nAnswer:"))) {
        Some(answer) => {
            page.state_mut().coupon.set_answer(answer);
            page.submit_puzzle_answer().await;
        }
        None => page.dismiss_puzzle(),
    }
}
