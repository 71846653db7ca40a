use crate::core::money::{self, non_negative};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Contractual category of a debt account.
///
/// Revolving subtypes (credit card, HELOC, UIL) have billing cycles and
/// interest-free grace periods; fixed-amortization loans do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum DebtSubtype {
    CreditCard,
    Heloc,
    Uil,
    AutoLoan,
    Mortgage,
    PersonalLoan,
    StudentLoan,
    #[default]
    Unknown,
}

impl From<String> for DebtSubtype {
    fn from(s: String) -> Self {
        match s.as_str() {
            "credit_card" => Self::CreditCard,
            "heloc" => Self::Heloc,
            "uil" => Self::Uil,
            "auto_loan" => Self::AutoLoan,
            "mortgage" => Self::Mortgage,
            "personal_loan" => Self::PersonalLoan,
            "student_loan" => Self::StudentLoan,
            // "" and any unrecognized subtype degrade to Unknown
            _ => Self::Unknown,
        }
    }
}

impl From<DebtSubtype> for String {
    fn from(s: DebtSubtype) -> Self {
        match s {
            DebtSubtype::Unknown => String::new(),
            other => other.to_string(),
        }
    }
}

impl DebtSubtype {
    /// Revolving credit carries a statement cycle and grace period.
    pub fn is_revolving(&self) -> bool {
        matches!(self, Self::CreditCard | Self::Heloc | Self::Uil)
    }

    /// Subtypes that can be deployed offensively as velocity weapons.
    pub fn is_weapon(&self) -> bool {
        matches!(self, Self::Heloc | Self::Uil)
    }
}

impl fmt::Display for DebtSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::CreditCard => "credit_card",
            Self::Heloc => "heloc",
            Self::Uil => "uil",
            Self::AutoLoan => "auto_loan",
            Self::Mortgage => "mortgage",
            Self::PersonalLoan => "personal_loan",
            Self::StudentLoan => "student_loan",
            // Display keeps a readable word; the wire format uses "".
            Self::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// An interest-bearing liability in a user's debt set.
///
/// `interest_rate` is the annual percentage rate as a percentage
/// (24.99 means 24.99%). `due_day` and `closing_day` are days of the
/// month, with 0 meaning unknown.
///
/// The constructor normalizes negative balances, rates, and payments to
/// zero — the engine never propagates negative debt. Balances are only
/// mutated on clones made inside simulation loops; caller-owned accounts
/// are never aliased.
///
/// # Examples
///
/// ```
/// use velocity_engine::core::debt::{DebtAccount, DebtSubtype};
/// use rust_decimal_macros::dec;
///
/// let card = DebtAccount::new("Amex Platinum", dec!(18500), dec!(24.99), dec!(450))
///     .with_due_day(5)
///     .with_subtype(DebtSubtype::CreditCard);
/// assert!(card.is_revolving());
/// assert_eq!(card.monthly_interest(), dec!(385.26));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtAccount {
    /// Unique display identifier within a user's debt set.
    pub name: String,
    /// Outstanding balance; 0 means paid off.
    pub balance: Decimal,
    /// Annual percentage rate as a percentage (e.g. 24.99).
    pub interest_rate: Decimal,
    /// Contractual minimum monthly payment.
    pub min_payment: Decimal,
    /// Day of month the payment is due (1–31, 0 = unknown).
    #[serde(default)]
    pub due_day: u32,
    /// Statement closing day for revolving debt (1–31, 0 = unknown).
    #[serde(default)]
    pub closing_day: u32,
    #[serde(default)]
    pub subtype: DebtSubtype,
    /// Credit limit; meaningful for revolving subtypes only.
    #[serde(default)]
    pub credit_limit: Decimal,
}

impl DebtAccount {
    pub fn new(
        name: impl Into<String>,
        balance: Decimal,
        interest_rate: Decimal,
        min_payment: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            balance: non_negative(balance),
            interest_rate: non_negative(interest_rate),
            min_payment: non_negative(min_payment),
            due_day: 0,
            closing_day: 0,
            subtype: DebtSubtype::Unknown,
            credit_limit: Decimal::ZERO,
        }
    }

    pub fn with_due_day(mut self, day: u32) -> Self {
        self.due_day = day.min(31);
        self
    }

    pub fn with_closing_day(mut self, day: u32) -> Self {
        self.closing_day = day.min(31);
        self
    }

    pub fn with_subtype(mut self, subtype: DebtSubtype) -> Self {
        self.subtype = subtype;
        self
    }

    pub fn with_credit_limit(mut self, limit: Decimal) -> Self {
        self.credit_limit = non_negative(limit);
        self
    }

    /// Monthly periodic rate: `APR / 100 / 12`.
    pub fn monthly_rate(&self) -> Decimal {
        money::monthly_rate(self.interest_rate)
    }

    /// One month of interest on the current balance, rounded.
    pub fn monthly_interest(&self) -> Decimal {
        money::round_money(self.balance * self.monthly_rate())
    }

    /// One day of interest on the current balance, rounded.
    pub fn daily_interest(&self) -> Decimal {
        money::round_money(self.balance * money::daily_rate(self.interest_rate))
    }

    pub fn is_revolving(&self) -> bool {
        self.subtype.is_revolving()
    }

    /// A debt with zero balance is excluded from further attack.
    pub fn is_active(&self) -> bool {
        self.balance > Decimal::ZERO
    }

    /// Unused credit on a revolving line.
    pub fn available_credit(&self) -> Decimal {
        non_negative(self.credit_limit - self.balance)
    }

    /// Apply a payment capped at the outstanding balance.
    /// Returns the amount actually applied.
    pub fn apply_payment(&mut self, amount: Decimal) -> Decimal {
        let applied = amount.min(self.balance).max(Decimal::ZERO);
        self.balance -= applied;
        applied
    }
}

/// A revolving credit line used offensively rather than paid down.
///
/// A weapon deploys a "chunk" of its available credit against a
/// higher-APR debt, capturing the rate spread as savings. Deployment is
/// only arbitrage when the weapon's own APR is strictly below the
/// target's APR.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VelocityWeapon {
    pub name: String,
    pub balance: Decimal,
    pub credit_limit: Decimal,
    /// The weapon's own APR as a percentage.
    pub interest_rate: Decimal,
    pub weapon_type: DebtSubtype,
}

impl VelocityWeapon {
    pub fn new(
        name: impl Into<String>,
        balance: Decimal,
        credit_limit: Decimal,
        interest_rate: Decimal,
        weapon_type: DebtSubtype,
    ) -> Self {
        Self {
            name: name.into(),
            balance: non_negative(balance),
            credit_limit: non_negative(credit_limit),
            interest_rate: non_negative(interest_rate),
            weapon_type,
        }
    }

    pub fn available_credit(&self) -> Decimal {
        non_negative(self.credit_limit - self.balance)
    }

    /// Whether deploying this weapon against `target` is valid arbitrage:
    /// credit must be available, the spread must be positive, and the
    /// target must not itself be a weapon-type line.
    pub fn can_attack(&self, target: &DebtAccount) -> bool {
        self.available_credit() > Decimal::ZERO
            && target.is_active()
            && target.interest_rate > self.interest_rate
            && !target.subtype.is_weapon()
    }

    /// Draw a chunk from this line, capped at available credit.
    /// Returns the amount actually drawn.
    pub fn draw(&mut self, amount: Decimal) -> Decimal {
        let drawn = amount.min(self.available_credit()).max(Decimal::ZERO);
        self.balance += drawn;
        drawn
    }
}

/// The highest-APR active debt — the avalanche strategy's target.
/// APR ties go to the larger balance.
pub fn avalanche_target(debts: &[DebtAccount]) -> Option<&DebtAccount> {
    debts
        .iter()
        .filter(|d| d.is_active())
        .max_by(|a, b| {
            a.interest_rate
                .cmp(&b.interest_rate)
                .then(b.balance.cmp(&a.balance))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn card() -> DebtAccount {
        DebtAccount::new("Test Card", dec!(5000), dec!(24.99), dec!(150))
            .with_due_day(15)
            .with_closing_day(25)
            .with_subtype(DebtSubtype::CreditCard)
            .with_credit_limit(dec!(10000))
    }

    #[test]
    fn test_negative_inputs_normalized() {
        let d = DebtAccount::new("Broken", dec!(-500), dec!(-10), dec!(-25));
        assert_eq!(d.balance, Decimal::ZERO);
        assert_eq!(d.interest_rate, Decimal::ZERO);
        assert_eq!(d.min_payment, Decimal::ZERO);
        assert!(!d.is_active());
    }

    #[test]
    fn test_monthly_rate_conversion() {
        let d = card();
        assert_eq!(d.monthly_rate(), dec!(24.99) / dec!(100) / dec!(12));
    }

    #[test]
    fn test_revolving_classification() {
        assert!(DebtSubtype::CreditCard.is_revolving());
        assert!(DebtSubtype::Heloc.is_revolving());
        assert!(DebtSubtype::Uil.is_revolving());
        assert!(!DebtSubtype::AutoLoan.is_revolving());
        assert!(!DebtSubtype::Mortgage.is_revolving());
        assert!(!DebtSubtype::Unknown.is_revolving());
    }

    #[test]
    fn test_available_credit() {
        let d = card();
        assert_eq!(d.available_credit(), dec!(5000));
    }

    #[test]
    fn test_payment_capped_at_balance() {
        let mut d = card();
        let applied = d.apply_payment(dec!(99999));
        assert_eq!(applied, dec!(5000));
        assert_eq!(d.balance, Decimal::ZERO);
    }

    #[test]
    fn test_weapon_rejects_higher_apr_target() {
        let weapon = VelocityWeapon::new("HELOC", dec!(10000), dec!(60000), dec!(8), DebtSubtype::Heloc);
        let cheap = DebtAccount::new("Auto", dec!(20000), dec!(5), dec!(400));
        let expensive = card();
        assert!(!weapon.can_attack(&cheap), "no arbitrage below own APR");
        assert!(weapon.can_attack(&expensive));
    }

    #[test]
    fn test_weapon_rejects_weapon_target() {
        let weapon = VelocityWeapon::new("HELOC", dec!(0), dec!(60000), dec!(6), DebtSubtype::Heloc);
        let uil = DebtAccount::new("IUL Loan", dec!(15000), dec!(9), dec!(200))
            .with_subtype(DebtSubtype::Uil);
        assert!(!weapon.can_attack(&uil));
    }

    #[test]
    fn test_weapon_exhausted_credit() {
        let weapon = VelocityWeapon::new("HELOC", dec!(60000), dec!(60000), dec!(8), DebtSubtype::Heloc);
        assert!(!weapon.can_attack(&card()));
    }

    #[test]
    fn test_avalanche_target_highest_apr() {
        let debts = vec![
            DebtAccount::new("Low", dec!(3000), dec!(10), dec!(100)),
            DebtAccount::new("High", dec!(3000), dec!(25), dec!(100)),
            DebtAccount::new("Paid", dec!(0), dec!(99), dec!(0)),
        ];
        assert_eq!(avalanche_target(&debts).unwrap().name, "High");
    }

    #[test]
    fn test_avalanche_target_empty() {
        assert!(avalanche_target(&[]).is_none());
    }

    #[test]
    fn test_subtype_wire_names() {
        let json = serde_json::to_string(&DebtSubtype::CreditCard).unwrap();
        assert_eq!(json, "\"credit_card\"");
        let parsed: DebtSubtype = serde_json::from_str("\"heloc\"").unwrap();
        assert_eq!(parsed, DebtSubtype::Heloc);
        let unknown: DebtSubtype = serde_json::from_str("\"\"").unwrap();
        assert_eq!(unknown, DebtSubtype::Unknown);
    }
}
