//! Checkout and simulated payment.
//!
//! No money moves. A payment "succeeds" once the chosen method's form is
//! complete and the cart has something in it; the receipt reports the cart
//! total at that moment.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;
use crate::types::Price;

/// Banks offered in the internet banking form.
pub const BANKS: &[&str] = &[
    "First National Bank",
    "City Savings Bank",
    "Union Trust",
    "Metro Credit Union",
];

/// Errors that block checkout or payment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Your cart is empty!")]
    EmptyCart,
    #[error("Please fill in all card details before proceeding.")]
    IncompleteCardDetails,
    #[error("Please select a bank and enter your account/email.")]
    IncompleteBankDetails,
    #[error("{0} form not found in the submitted page.")]
    FormMissing(PaymentMethod),
}

/// How the shopper pays. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    #[default]
    Card,
    InternetBanking,
}

impl PaymentMethod {
    /// URL slug for the method.
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::InternetBanking => "internet-banking",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Card => write!(f, "Card"),
            Self::InternetBanking => write!(f, "Internet Banking"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(Self::Card),
            "internet-banking" => Ok(Self::InternetBanking),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

/// Card payment form as submitted. Absent fields are `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardDetails {
    pub card_holder: Option<String>,
    pub card_number: Option<String>,
    pub expiry: Option<String>,
    pub cvv: Option<String>,
}

impl CardDetails {
    fn fields(&self) -> [Option<&str>; 4] {
        [
            self.card_holder.as_deref(),
            self.card_number.as_deref(),
            self.expiry.as_deref(),
            self.cvv.as_deref(),
        ]
    }

    /// Check that every card field was submitted and is non-blank.
    ///
    /// # Errors
    ///
    /// `FormMissing` when no card field was submitted at all,
    /// `IncompleteCardDetails` when any field is missing or blank.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let fields = self.fields();
        if fields.iter().all(Option::is_none) {
            return Err(CheckoutError::FormMissing(PaymentMethod::Card));
        }
        if fields.iter().any(|field| is_blank(*field)) {
            return Err(CheckoutError::IncompleteCardDetails);
        }
        Ok(())
    }
}

/// Internet banking form as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InternetBankingDetails {
    pub bank: Option<String>,
    pub account: Option<String>,
}

impl InternetBankingDetails {
    /// Check that a bank is selected and an account/email entered.
    ///
    /// # Errors
    ///
    /// `FormMissing` when neither field was submitted,
    /// `IncompleteBankDetails` when either is blank.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        if self.bank.is_none() && self.account.is_none() {
            return Err(CheckoutError::FormMissing(PaymentMethod::InternetBanking));
        }
        if is_blank(self.bank.as_deref()) || is_blank(self.account.as_deref()) {
            return Err(CheckoutError::IncompleteBankDetails);
        }
        Ok(())
    }
}

fn is_blank(field: Option<&str>) -> bool {
    field.is_none_or(|value| value.trim().is_empty())
}

/// Confirmation of a simulated payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentReceipt {
    pub method: PaymentMethod,
    pub amount: Decimal,
}

impl PaymentReceipt {
    /// Message shown to the shopper after paying.
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "{} payment successful! Amount Paid: {}",
            self.method,
            Price::from_amount(self.amount)
        )
    }
}

/// Ensure there is something to check out.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart` if the cart has no lines.
pub fn ensure_not_empty(cart: &Cart) -> Result<(), CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    Ok(())
}

/// Take a card payment for the cart total.
///
/// The form is validated before the cart so an incomplete form is reported
/// even when the cart happens to be empty.
///
/// # Errors
///
/// Any validation failure from [`CardDetails::validate`], or `EmptyCart`.
pub fn pay_by_card(cart: &Cart, details: &CardDetails) -> Result<PaymentReceipt, CheckoutError> {
    details.validate()?;
    pay(cart, PaymentMethod::Card)
}

/// Take an internet banking payment for the cart total.
///
/// # Errors
///
/// Any validation failure from [`InternetBankingDetails::validate`], or
/// `EmptyCart`.
pub fn pay_by_internet_banking(
    cart: &Cart,
    details: &InternetBankingDetails,
) -> Result<PaymentReceipt, CheckoutError> {
    details.validate()?;
    pay(cart, PaymentMethod::InternetBanking)
}

fn pay(cart: &Cart, method: PaymentMethod) -> Result<PaymentReceipt, CheckoutError> {
    let amount = cart.total();
    if cart.is_empty() || amount <= Decimal::ZERO {
        return Err(CheckoutError::EmptyCart);
    }
    Ok(PaymentReceipt { method, amount })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::cart::LineItem;
    use crate::types::{Color, ProductId, Size};
    use std::str::FromStr;

    fn cart_worth_59_97() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(LineItem {
            id: ProductId::new("p1"),
            name: "Basic Tee".to_string(),
            price: Decimal::from_str("19.99").unwrap(),
            quantity: 3,
            size: Size::M,
            color: Color::Black,
            image: "tee.jpg".to_string(),
        })
        .unwrap();
        cart
    }

    fn full_card() -> CardDetails {
        CardDetails {
            card_holder: Some("Ada Lovelace".to_string()),
            card_number: Some("4111 1111 1111 1111".to_string()),
            expiry: Some("12/29".to_string()),
            cvv: Some("123".to_string()),
        }
    }

    #[test]
    fn test_card_payment_reports_total() {
        let receipt = pay_by_card(&cart_worth_59_97(), &full_card()).unwrap();
        assert_eq!(receipt.amount, Decimal::from_str("59.97").unwrap());
        assert_eq!(
            receipt.message(),
            "Card payment successful! Amount Paid: $59.97"
        );
    }

    #[test]
    fn test_card_payment_with_blank_field_is_rejected() {
        let mut details = full_card();
        details.cvv = Some("   ".to_string());
        assert_eq!(
            pay_by_card(&cart_worth_59_97(), &details),
            Err(CheckoutError::IncompleteCardDetails)
        );
    }

    #[test]
    fn test_card_payment_with_missing_field_is_rejected() {
        let mut details = full_card();
        details.expiry = None;
        assert_eq!(
            pay_by_card(&cart_worth_59_97(), &details),
            Err(CheckoutError::IncompleteCardDetails)
        );
    }

    #[test]
    fn test_card_form_not_submitted() {
        assert_eq!(
            pay_by_card(&cart_worth_59_97(), &CardDetails::default()),
            Err(CheckoutError::FormMissing(PaymentMethod::Card))
        );
    }

    #[test]
    fn test_card_payment_with_empty_cart() {
        assert_eq!(
            pay_by_card(&Cart::new(), &full_card()),
            Err(CheckoutError::EmptyCart)
        );
    }

    #[test]
    fn test_internet_banking_requires_bank_and_account() {
        let details = InternetBankingDetails {
            bank: Some(String::new()),
            account: Some("ada@example.com".to_string()),
        };
        assert_eq!(
            pay_by_internet_banking(&cart_worth_59_97(), &details),
            Err(CheckoutError::IncompleteBankDetails)
        );
    }

    #[test]
    fn test_internet_banking_form_not_submitted() {
        let err = pay_by_internet_banking(&cart_worth_59_97(), &InternetBankingDetails::default())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Internet Banking form not found in the submitted page."
        );
    }

    #[test]
    fn test_internet_banking_success() {
        let details = InternetBankingDetails {
            bank: Some(BANKS[0].to_string()),
            account: Some("ada@example.com".to_string()),
        };
        let receipt = pay_by_internet_banking(&cart_worth_59_97(), &details).unwrap();
        assert_eq!(receipt.method, PaymentMethod::InternetBanking);
        assert_eq!(
            receipt.message(),
            "Internet Banking payment successful! Amount Paid: $59.97"
        );
    }

    #[test]
    fn test_ensure_not_empty() {
        assert_eq!(ensure_not_empty(&Cart::new()), Err(CheckoutError::EmptyCart));
        assert!(ensure_not_empty(&cart_worth_59_97()).is_ok());
    }

    #[test]
    fn test_payment_method_slug_roundtrip() {
        for method in [PaymentMethod::Card, PaymentMethod::InternetBanking] {
            assert_eq!(PaymentMethod::from_str(method.slug()).unwrap(), method);
        }
    }
}
