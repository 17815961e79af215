// Payment-redirect parameter builder. The core only assembles the register
// request for the redirect service; it never performs the redirect or
// touches card data.

use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_MERCHANT_ID: &str = "AMERICAN-TOURS";
pub const DEFAULT_ACTION_URL: &str = "https://test.clictopay.com.tn/payment/rest/register.do";
pub const DEFAULT_RETURN_URL: &str = "https://www.hotel.com.tn/payment/success";
pub const DEFAULT_FAIL_URL: &str = "https://www.hotel.com.tn/payment/fail";

// ISO 4217 numeric code for the Tunisian dinar.
const TUNISIAN_DINAR_CODE: u32 = 788;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PaymentError {
    #[error("invalid payment amount")]
    InvalidAmount,

    #[error("missing merchant password")]
    MissingPassword,
}

#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub merchant_id: String,
    pub action_url: String,
    pub return_url: String,
    pub fail_url: String,
    pub password: Option<String>,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            merchant_id: DEFAULT_MERCHANT_ID.to_string(),
            action_url: DEFAULT_ACTION_URL.to_string(),
            return_url: DEFAULT_RETURN_URL.to_string(),
            fail_url: DEFAULT_FAIL_URL.to_string(),
            password: None,
        }
    }
}

impl PaymentConfig {
    // Environment overrides; unset variables keep the storefront defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            merchant_id: std::env::var("CTP_MERCHANT_ID").unwrap_or(defaults.merchant_id),
            action_url: std::env::var("CTP_ACTION_URL").unwrap_or(defaults.action_url),
            return_url: std::env::var("CTP_RETURN_URL").unwrap_or(defaults.return_url),
            fail_url: std::env::var("CTP_FAIL_URL").unwrap_or(defaults.fail_url),
            password: std::env::var("CTP_PASSWORD").ok(),
        }
    }
}

// Parameter set posted to the redirect service's register endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterParams {
    pub user_name: String,
    pub password: String,
    pub order_number: String,
    // Millimes, not dinars.
    pub amount: i64,
    pub currency: u32,
    pub return_url: String,
    pub fail_url: String,
}

fn to_millimes(amount_dinars: f64) -> i64 {
    (amount_dinars * 1000.0).round() as i64
}

pub fn register_params(
    config: &PaymentConfig,
    order_id: &str,
    amount_dinars: f64,
) -> Result<RegisterParams, PaymentError> {
    if !amount_dinars.is_finite() || amount_dinars <= 0.0 {
        return Err(PaymentError::InvalidAmount);
    }
    let password = config
        .password
        .clone()
        .ok_or(PaymentError::MissingPassword)?;

    Ok(RegisterParams {
        user_name: config.merchant_id.clone(),
        password,
        order_number: order_id.to_string(),
        amount: to_millimes(amount_dinars),
        currency: TUNISIAN_DINAR_CODE,
        return_url: config.return_url.clone(),
        fail_url: config.fail_url.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn config() -> PaymentConfig {
        PaymentConfig {
            password: Some("secret".to_string()),
            ..PaymentConfig::default()
        }
    }

    #[test_case(1.0, 1000 ; "one dinar")]
    #[test_case(249.5, 249_500 ; "fractional dinars")]
    #[test_case(0.001, 1 ; "smallest unit")]
    #[test_case(120.3334, 120_333 ; "rounds down")]
    fn amounts_convert_to_millimes(dinars: f64, millimes: i64) {
        let params = register_params(&config(), "TN00000001", dinars).unwrap();
        assert_eq!(params.amount, millimes);
    }

    #[test_case(0.0 ; "zero")]
    #[test_case(-12.0 ; "negative")]
    #[test_case(f64::NAN ; "nan")]
    #[test_case(f64::INFINITY ; "infinite")]
    fn invalid_amounts_are_rejected(dinars: f64) {
        assert_eq!(
            register_params(&config(), "TN00000001", dinars),
            Err(PaymentError::InvalidAmount)
        );
    }

    #[test]
    fn missing_password_is_rejected() {
        let config = PaymentConfig::default();
        assert_eq!(
            register_params(&config, "TN00000001", 10.0),
            Err(PaymentError::MissingPassword)
        );
    }

    #[test]
    fn params_carry_merchant_and_redirect_targets() {
        let params = register_params(&config(), "TN12345678", 75.0).unwrap();
        assert_eq!(params.user_name, DEFAULT_MERCHANT_ID);
        assert_eq!(params.order_number, "TN12345678");
        assert_eq!(params.currency, 788);
        assert_eq!(params.return_url, DEFAULT_RETURN_URL);
        assert_eq!(params.fail_url, DEFAULT_FAIL_URL);
    }
}
