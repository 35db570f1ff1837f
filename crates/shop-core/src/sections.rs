//! Grouping of available payment methods into the sections shown at checkout.

use crate::types::{AvailablePaymentMethods, PaymentMethodDetail, TokenizedCard};

/// Substring identifying the Finnish bank redirect family.
const FINNISH_BANK_MARKER: &str = "paytrail";

/// Mobile wallets recognized by the merchant backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MobileWallet {
    ApplePay,
    PayPal,
    Vipps,
    Swish,
    MobilePay,
}

impl MobileWallet {
    pub const ALL: [MobileWallet; 5] = [
        MobileWallet::ApplePay,
        MobileWallet::PayPal,
        MobileWallet::Vipps,
        MobileWallet::Swish,
        MobileWallet::MobilePay,
    ];

    /// Payment method id used by the merchant backend.
    pub fn id(&self) -> &'static str {
        match self {
            MobileWallet::ApplePay => "ApplePay",
            MobileWallet::PayPal => "PayPal",
            MobileWallet::Vipps => "Vipps",
            // Swish's method id is not its name.
            MobileWallet::Swish => "SwishM",
            MobileWallet::MobilePay => "MobilePay",
        }
    }

    /// Case-insensitive lookup by method id.
    pub fn from_id(id: &str) -> Option<MobileWallet> {
        Self::ALL
            .into_iter()
            .find(|w| w.id().eq_ignore_ascii_case(id))
    }
}

/// Payment methods grouped into the sections of the checkout list.
///
/// Every method lands in exactly one section, except the tokenization and Apple Pay
/// methods, which are left out since they have dedicated flows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentMethodSections {
    pub tokens: Vec<TokenizedCard>,
    pub wallets: Vec<PaymentMethodDetail>,
    pub finnish_banks: Vec<PaymentMethodDetail>,
    pub s_business_cards: Vec<PaymentMethodDetail>,
    pub card_scheme_ids: Vec<String>,
}

impl PaymentMethodSections {
    pub fn classify(available: &AvailablePaymentMethods) -> PaymentMethodSections {
        let initial = PaymentMethodSections {
            tokens: available
                .tokens
                .iter()
                .cloned()
                .map(|token| TokenizedCard {
                    card_verification_required: available.card_verification_required,
                    ..token
                })
                .collect(),
            ..Default::default()
        };

        let mut methods: Vec<&PaymentMethodDetail> = available
            .methods
            .iter()
            .filter(|m| m.id != PaymentMethodDetail::EASY_PAY_ID)
            .filter(|m| m.id != PaymentMethodDetail::APPLE_PAY_ID)
            .collect();
        methods.sort_by(|a, b| a.id.cmp(&b.id));

        methods
            .into_iter()
            .fold(initial, |sections, method| sections.with(method))
    }

    /// Returns a copy with `method` appended to its section.
    fn with(mut self, method: &PaymentMethodDetail) -> PaymentMethodSections {
        let id = method.id.to_lowercase();

        if id.contains(FINNISH_BANK_MARKER) {
            self.finnish_banks.push(method.clone());
        } else if MobileWallet::from_id(&id).is_some() {
            self.wallets.push(method.clone());
        } else if id == PaymentMethodDetail::S_BUSINESS_CARD_ID.to_lowercase() {
            self.s_business_cards.push(method.clone());
        } else {
            self.card_scheme_ids.push(method.id.clone());
        }

        self
    }

    /// Number of methods placed in a section, tokens excluded.
    pub fn method_count(&self) -> usize {
        self.wallets.len()
            + self.finnish_banks.len()
            + self.s_business_cards.len()
            + self.card_scheme_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.method_count() == 0
    }
}

impl From<&AvailablePaymentMethods> for PaymentMethodSections {
    fn from(available: &AvailablePaymentMethods) -> Self {
        PaymentMethodSections::classify(available)
    }
}
