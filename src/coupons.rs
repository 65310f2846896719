//! Coupons
//!
//! Coupons are verified by the backend, either directly (skip flag) or after
//! the customer answers a puzzle. [`CouponFlow`] tracks the coupon text
//! field and which of the three coupon states the checkout is in.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    ids::TypedId,
    money::{Amount, wire},
};

/// Coupon id
pub type CouponId = TypedId<CouponListing>;

/// Errors raised before a coupon request is sent.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CouponError {
    /// The coupon text field is blank.
    #[error("Enter a coupon code")]
    EmptyCode,

    /// An answer was submitted with no puzzle outstanding.
    #[error("Missing puzzle token")]
    MissingPuzzleToken,
}

/// A coupon offered to customers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponListing {
    /// Coupon id
    pub id: CouponId,

    /// Code typed at checkout
    pub code: String,

    /// Puzzle difficulty label
    #[serde(default)]
    pub difficulty: Option<String>,

    /// Discount in percent points
    #[serde(with = "wire::decimal")]
    pub discount_percent: Decimal,
}

/// Puzzle issued for a coupon code, as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PuzzleResponse {
    /// Token to send back with the answer
    pub token: String,

    /// Plain question text
    #[serde(default)]
    pub puzzle: Option<String>,

    /// Script form of the puzzle
    #[serde(default)]
    pub puzzle_script: Option<String>,
}

/// What the customer is asked to solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PuzzlePrompt {
    /// A question to answer
    Question(String),

    /// A script to work through
    Script(String),
}

impl PuzzlePrompt {
    /// Prompt text.
    pub fn text(&self) -> &str {
        match self {
            PuzzlePrompt::Question(text) | PuzzlePrompt::Script(text) => text,
        }
    }
}

/// An outstanding puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleChallenge {
    /// Token to send back with the answer
    pub token: String,

    /// What to solve
    pub prompt: PuzzlePrompt,
}

impl From<PuzzleResponse> for PuzzleChallenge {
    fn from(response: PuzzleResponse) -> Self {
        let prompt = match (response.puzzle_script, response.puzzle) {
            (Some(script), _) => PuzzlePrompt::Script(script),
            (None, question) => PuzzlePrompt::Question(question.unwrap_or_default()),
        };

        Self {
            token: response.token,
            prompt,
        }
    }
}

/// A coupon the backend has verified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedCoupon {
    /// Coupon code
    pub code: String,

    /// Discount in percent points
    #[serde(with = "wire::decimal")]
    pub discount_percent: Decimal,

    /// Cart total after the discount
    #[serde(with = "wire::amount")]
    pub new_total: Amount,
}

/// Body for `POST /coupons/apply`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplyCouponRequest {
    /// Coupon code
    pub code: String,

    /// Pre-coupon subtotal
    #[serde(with = "wire::amount")]
    pub total: Amount,

    /// Puzzle answer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,

    /// Puzzle token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Apply without a puzzle
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub skip_puzzle: bool,
}

/// Coupon state.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CouponState {
    /// Nothing applied or pending
    #[default]
    NoCoupon,

    /// A puzzle is outstanding. `previous` is the coupon that was applied
    /// when the puzzle was requested, if any.
    PuzzlePending {
        /// Outstanding puzzle
        challenge: PuzzleChallenge,

        /// Coupon applied before the puzzle was requested
        previous: Option<AppliedCoupon>,
    },

    /// The backend verified a coupon
    Applied(AppliedCoupon),
}

/// The request to make after the customer presses "Apply".
#[derive(Debug, Clone, PartialEq)]
pub enum CouponStep {
    /// Ask the backend for a puzzle for this code
    RequestPuzzle {
        /// Trimmed coupon code
        code: String,
    },

    /// Apply the coupon without a puzzle
    ApplyDirect(ApplyCouponRequest),
}

/// Coupon text field, skip flag, puzzle answer, and coupon state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CouponFlow {
    code: String,
    skip_puzzle: bool,
    answer: String,
    state: CouponState,
}

impl CouponFlow {
    /// A blank coupon form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw coupon text.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Whether the skip-puzzle box is ticked.
    pub fn skip_puzzle(&self) -> bool {
        self.skip_puzzle
    }

    /// Answer typed into the puzzle modal.
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Current state.
    pub fn state(&self) -> &CouponState {
        &self.state
    }

    /// Edit the coupon text. Any change drops a pending puzzle or applied
    /// coupon.
    pub fn set_code(&mut self, code: impl Into<String>) {
        let code = code.into();

        if code == self.code {
            return;
        }

        self.code = code;
        self.state = CouponState::NoCoupon;
        self.answer.clear();
    }

    /// Tick or untick the skip-puzzle box.
    pub fn set_skip_puzzle(&mut self, skip: bool) {
        self.skip_puzzle = skip;
    }

    /// Type into the puzzle answer field.
    pub fn set_answer(&mut self, answer: impl Into<String>) {
        self.answer = answer.into();
    }

    /// Decide what "Apply" should send.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::EmptyCode`] when the text field is blank.
    pub fn begin_apply(&self, subtotal: Amount) -> Result<CouponStep, CouponError> {
        let code = self.code.trim();

        if code.is_empty() {
            return Err(CouponError::EmptyCode);
        }

        if self.skip_puzzle {
            return Ok(CouponStep::ApplyDirect(ApplyCouponRequest {
                code: code.to_string(),
                total: subtotal,
                answer: None,
                token: None,
                skip_puzzle: true,
            }));
        }

        Ok(CouponStep::RequestPuzzle {
            code: code.to_string(),
        })
    }

    /// Record a puzzle issued by the backend and open the modal.
    pub fn puzzle_issued(&mut self, challenge: PuzzleChallenge) {
        let previous = self.applied().cloned();

        self.answer.clear();
        self.state = CouponState::PuzzlePending {
            challenge,
            previous,
        };
    }

    /// Body for submitting the puzzle answer.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::MissingPuzzleToken`] when no puzzle is pending.
    pub fn submission(&self, subtotal: Amount) -> Result<ApplyCouponRequest, CouponError> {
        let Some(challenge) = self.challenge() else {
            return Err(CouponError::MissingPuzzleToken);
        };

        Ok(ApplyCouponRequest {
            code: self.code.trim().to_string(),
            total: subtotal,
            answer: Some(self.answer.clone()),
            token: Some(challenge.token.clone()),
            skip_puzzle: false,
        })
    }

    /// Record a coupon the backend verified. Closes the modal.
    pub fn applied_confirmed(&mut self, coupon: AppliedCoupon) {
        self.answer.clear();
        self.state = CouponState::Applied(coupon);
    }

    /// Close the puzzle modal without answering. The coupon applied before
    /// the puzzle was requested, if any, comes back.
    pub fn dismiss_puzzle(&mut self) {
        let state = std::mem::take(&mut self.state);

        self.answer.clear();
        self.state = match state {
            CouponState::PuzzlePending {
                previous: Some(previous),
                ..
            } => CouponState::Applied(previous),
            CouponState::PuzzlePending { previous: None, .. } => CouponState::NoCoupon,
            other => other,
        };
    }

    /// Drop the applied coupon and clear the text field.
    pub fn remove(&mut self) {
        self.code.clear();
        self.answer.clear();
        self.state = CouponState::NoCoupon;
    }

    /// The coupon pricing the order, if any.
    pub fn applied(&self) -> Option<&AppliedCoupon> {
        match &self.state {
            CouponState::Applied(coupon) => Some(coupon),
            CouponState::PuzzlePending { previous, .. } => previous.as_ref(),
            CouponState::NoCoupon => None,
        }
    }

    /// The outstanding puzzle, if any.
    pub fn challenge(&self) -> Option<&PuzzleChallenge> {
        match &self.state {
            CouponState::PuzzlePending { challenge, .. } => Some(challenge),
            CouponState::Applied(_) | CouponState::NoCoupon => None,
        }
    }

    /// Whether the puzzle modal is showing.
    pub fn is_modal_open(&self) -> bool {
        self.challenge().is_some()
    }
}
