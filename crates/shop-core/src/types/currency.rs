use serde::Serialize;

/// Currency offered at checkout, with the locale used to format amounts in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub currency_code: &'static str,
    pub language_code: &'static str,
    pub country_code: &'static str,
}

impl Currency {
    pub const EUR: Currency = Currency {
        currency_code: "EUR",
        language_code: "en",
        country_code: "FI",
    };
    pub const SEK: Currency = Currency {
        currency_code: "SEK",
        language_code: "en",
        country_code: "SE",
    };
    pub const DKK: Currency = Currency {
        currency_code: "DKK",
        language_code: "en",
        country_code: "DK",
    };
    pub const NOK: Currency = Currency {
        currency_code: "NOK",
        language_code: "en",
        country_code: "NO",
    };

    /// All currencies offered at checkout, default first.
    pub const ALL: [Currency; 4] = [Self::EUR, Self::SEK, Self::DKK, Self::NOK];

    pub fn from_code(code: &str) -> Option<Currency> {
        Self::ALL
            .into_iter()
            .find(|c| c.currency_code.eq_ignore_ascii_case(code))
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::ALL[0]
    }
}
