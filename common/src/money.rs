use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Escala fija de todos los valores monetarios: dos decimales.
pub const MONEY_SCALE: u32 = 2;

/// Precisión máxima total (dígitos enteros + decimales).
pub const MONEY_PRECISION: usize = 20;

/// Dígitos usados por cálculos intermedios antes del redondeo final.
pub const INTERNAL_SCALE: u32 = 10;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid money format: '{0}'")]
    InvalidFormat(String),

    #[error("Money arithmetic overflow")]
    Overflow,
}

/// Valor monetario de escala fija (2 decimales) con redondeo bancario.
///
/// Envuelve un `rust_decimal::Decimal` normalizado a escala 2, de modo que dos
/// valores iguales siempre tienen la misma representación y la serialización
/// es canónica (`"900.00"`). Nunca pasa por punto flotante binario.
///
/// # Examples
/// ```
/// use common::money::Money;
///
/// let balance: Money = "1000.00".parse().unwrap();
/// let amount: Money = "99.99".parse().unwrap();
/// let rest = balance.checked_sub(amount).unwrap();
/// assert_eq!(rest.to_string(), "900.01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    /// Cero monetario en la escala canónica (`"0.00"`).
    pub fn zero() -> Money {
        Money::from_decimal(Decimal::ZERO)
    }

    /// Normaliza un `Decimal` arbitrario a un `Money` de escala 2.
    ///
    /// Decimales con más de dos cifras se redondean con redondeo bancario
    /// (ROUND_HALF_EVEN); con menos, se rellenan con ceros.
    ///
    /// # Examples
    /// ```
    /// use common::money::Money;
    /// use rust_decimal_macros::dec;
    ///
    /// assert_eq!(Money::from_decimal(dec!(2.345)).to_string(), "2.34");
    /// assert_eq!(Money::from_decimal(dec!(2.355)).to_string(), "2.36");
    /// assert_eq!(Money::from_decimal(dec!(5)).to_string(), "5.00");
    /// ```
    pub fn from_decimal(value: Decimal) -> Self {
        let mut normalized =
            value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven);
        normalized.rescale(MONEY_SCALE);
        Money(normalized)
    }

    /// Acceso al decimal interno (escala 2 garantizada).
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn checked_add(self, other: Money) -> Result<Money, MoneyError> {
        self.0
            .checked_add(other.0)
            .map(Money::from_decimal)
            .ok_or(MoneyError::Overflow)
    }

    pub fn checked_sub(self, other: Money) -> Result<Money, MoneyError> {
        self.0
            .checked_sub(other.0)
            .map(Money::from_decimal)
            .ok_or(MoneyError::Overflow)
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }
}

// Validación manual del formato canónico `^-?\d+(\.\d{1,2})?$`.
// Se hace antes de delegar en el parser de Decimal para rechazar notación
// científica, signos '+', espacios y cualquier otra forma no canónica.
fn is_canonical(raw: &str) -> bool {
    let unsigned = raw.strip_prefix('-').unwrap_or(raw);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    if int_part.len() + MONEY_SCALE as usize > MONEY_PRECISION {
        return false;
    }

    match frac_part {
        Some(f) => {
            (1..=MONEY_SCALE as usize).contains(&f.len()) && f.bytes().all(|b| b.is_ascii_digit())
        }
        None => true,
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    /// Parsea la forma canónica: dígitos, punto opcional y 1 o 2 decimales.
    ///
    /// # Examples
    /// ```
    /// use common::money::Money;
    ///
    /// assert!("100.00".parse::<Money>().is_ok());
    /// assert!("100.5".parse::<Money>().is_ok());
    /// assert!("-3.10".parse::<Money>().is_ok());
    /// assert!("1.234".parse::<Money>().is_err());
    /// assert!("1e5".parse::<Money>().is_err());
    /// assert!("NaN".parse::<Money>().is_err());
    /// ```
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if !is_canonical(raw) {
            return Err(MoneyError::InvalidFormat(raw.to_string()));
        }

        let parsed =
            Decimal::from_str(raw).map_err(|_| MoneyError::InvalidFormat(raw.to_string()))?;

        Ok(Money::from_decimal(parsed))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // El invariante de escala 2 hace que Decimal ya imprima "900.00".
        write!(f, "{}", self.0)
    }
}

impl From<Money> for Decimal {
    fn from(m: Money) -> Self {
        m.0
    }
}

// Serialización canónica como string de dos decimales. Los montos viajan por
// JSON y por el result cache, y el formato textual evita cualquier pérdida de
// precisión en clientes que parsean números como float.
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<Money>().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("0.01", "0.01")]
    #[case("100", "100.00")]
    #[case("100.5", "100.50")]
    #[case("-3.1", "-3.10")]
    #[case("1000000000", "1000000000.00")]
    fn test_parse_canonical_forms(#[case] input: &str, #[case] expected: &str) {
        let money: Money = input.parse().unwrap();
        assert_eq!(money.to_string(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("1.234")]
    #[case("1.")]
    #[case(".5")]
    #[case("+5.00")]
    #[case("1e5")]
    #[case("NaN")]
    #[case("Inf")]
    #[case(" 1.00")]
    #[case("1,00")]
    #[case("1234567890123456789.00")]
    fn test_parse_rejects_non_canonical(#[case] input: &str) {
        assert!(input.parse::<Money>().is_err(), "should reject '{}'", input);
    }

    #[test]
    fn test_add_and_sub_are_exact_at_scale_two() {
        let balance: Money = "1000.00".parse().unwrap();
        let amount: Money = "99.99".parse().unwrap();

        let debited = balance.checked_sub(amount).unwrap();
        let credited = "500.00".parse::<Money>().unwrap().checked_add(amount).unwrap();

        assert_eq!(debited.to_string(), "900.01");
        assert_eq!(credited.to_string(), "599.99");
    }

    #[test]
    fn test_bankers_rounding_on_normalization() {
        // Empates a mitad de camino van hacia el dígito par.
        assert_eq!(Money::from_decimal(dec!(2.345)).to_string(), "2.34");
        assert_eq!(Money::from_decimal(dec!(2.355)).to_string(), "2.36");
        assert_eq!(Money::from_decimal(dec!(-2.345)).to_string(), "-2.34");
        assert_eq!(Money::from_decimal(dec!(0.005)).to_string(), "0.00");
        assert_eq!(Money::from_decimal(dec!(0.015)).to_string(), "0.02");
    }

    #[test]
    fn test_comparisons() {
        let fifty: Money = "50.00".parse().unwrap();
        let hundred: Money = "100.00".parse().unwrap();

        assert!(fifty < hundred);
        assert!(hundred.is_positive());
        assert!(!Money::zero().is_positive());
        assert!("-1.00".parse::<Money>().unwrap().is_negative());
        assert_eq!("50.0".parse::<Money>().unwrap(), fifty);
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_serde_roundtrip_is_canonical_string() {
        let money: Money = "900.00".parse().unwrap();

        let json = serde_json::to_string(&money).unwrap();
        assert_eq!(json, "\"900.00\"");

        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, money);

        assert!(serde_json::from_str::<Money>("\"1.999\"").is_err());
        assert!(serde_json::from_str::<Money>("900.0").is_err());
    }
}
