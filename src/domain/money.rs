use {
    super::error::GatewayError,
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// Amount in the currency's minor unit (cents for EUR).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MoneyAmount(i64);

impl MoneyAmount {
    pub fn new(minor: i64) -> Result<Self, GatewayError> {
        if minor < 0 {
            return Err(GatewayError::Validation(format!(
                "MoneyAmount cannot be negative, got: {minor}"
            )));
        }
        Ok(Self(minor))
    }

    pub fn zero() -> Self {
        Self(0)
    }

    pub fn minor(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: MoneyAmount) -> Option<MoneyAmount> {
        self.0.checked_add(other.0).map(MoneyAmount)
    }
}

impl fmt::Display for MoneyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Currencies Mollie settles in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Eur,
    Usd,
    Gbp,
    Chf,
    Dkk,
    Nok,
    Sek,
    Pln,
    Jpy,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eur => "EUR",
            Self::Usd => "USD",
            Self::Gbp => "GBP",
            Self::Chf => "CHF",
            Self::Dkk => "DKK",
            Self::Nok => "NOK",
            Self::Sek => "SEK",
            Self::Pln => "PLN",
            Self::Jpy => "JPY",
        }
    }

    /// Digits after the decimal point in the API's string amounts.
    pub fn decimals(&self) -> u32 {
        match self {
            Self::Jpy => 0,
            _ => 2,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for Currency {
    type Error = GatewayError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_ascii_uppercase().as_str() {
            "EUR" => Ok(Self::Eur),
            "USD" => Ok(Self::Usd),
            "GBP" => Ok(Self::Gbp),
            "CHF" => Ok(Self::Chf),
            "DKK" => Ok(Self::Dkk),
            "NOK" => Ok(Self::Nok),
            "SEK" => Ok(Self::Sek),
            "PLN" => Ok(Self::Pln),
            "JPY" => Ok(Self::Jpy),
            other => Err(GatewayError::Validation(format!(
                "unknown currency: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: MoneyAmount,
    currency: Currency,
}

impl Money {
    pub fn new(amount: MoneyAmount, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Parse a decimal string such as `"10.5"` or `"12.00"`.
    ///
    /// Extra fractional digits are accepted only when they are zeros.
    pub fn parse(value: &str, currency: Currency) -> Result<Self, GatewayError> {
        let value = value.trim();
        let invalid = || GatewayError::Validation(format!("invalid {currency} amount: {value:?}"));

        let (whole, frac) = value.split_once('.').unwrap_or((value, ""));
        if whole.is_empty()
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let decimals = currency.decimals() as usize;
        if frac.len() > decimals && frac[decimals..].bytes().any(|b| b != b'0') {
            return Err(invalid());
        }

        let mut frac_digits: String = frac.chars().take(decimals).collect();
        while frac_digits.len() < decimals {
            frac_digits.push('0');
        }

        let scale = 10i64.pow(currency.decimals());
        let whole: i64 = whole.parse().map_err(|_| invalid())?;
        let frac: i64 = if frac_digits.is_empty() {
            0
        } else {
            frac_digits.parse().map_err(|_| invalid())?
        };

        let minor = whole
            .checked_mul(scale)
            .and_then(|w| w.checked_add(frac))
            .ok_or_else(invalid)?;

        Ok(Self::new(MoneyAmount::new(minor)?, currency))
    }

    pub fn amount(&self) -> MoneyAmount {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Decimal string in the form the Mollie API expects (`"10.00"`).
    pub fn value_string(&self) -> String {
        let decimals = self.currency.decimals();
        let minor = self.amount.minor();
        if decimals == 0 {
            return minor.to_string();
        }
        let scale = 10i64.pow(decimals);
        format!(
            "{}.{:0width$}",
            minor / scale,
            minor % scale,
            width = decimals as usize
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.currency, self.value_string())
    }
}
