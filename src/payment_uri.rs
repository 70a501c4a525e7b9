//! `algorand://` payment URIs, the payload carried by a payment QR code.

use crate::algorand::utils::{algos_to_microalgos, microalgos_to_algos};
use crate::algorand::wallet::decode_address;
use anyhow::{anyhow, Result};
use url::form_urlencoded;

const SCHEME: &str = "algorand://";

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentUri {
    pub address: String,
    /// ALGO; the URI itself carries microalgos
    pub amount: Option<f64>,
    pub label: Option<String>,
    pub note: Option<String>,
}

impl PaymentUri {
    pub fn new(address: &str, amount: Option<f64>) -> Self {
        Self {
            address: address.to_string(),
            amount,
            label: None,
            note: None,
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        let rest = input
            .trim()
            .strip_prefix(SCHEME)
            .ok_or_else(|| anyhow!("Not an algorand:// payment link"))?;

        let (address, query) = match rest.split_once('?') {
            Some((address, query)) => (address, query),
            None => (rest, ""),
        };
        let address = address.trim_end_matches('/');
        decode_address(address)?;

        let mut uri = Self::new(address, None);
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "amount" => {
                    let microalgos = value
                        .parse::<u64>()
                        .map_err(|_| anyhow!("Invalid amount in payment link: {}", value))?;
                    uri.amount = Some(microalgos_to_algos(microalgos));
                }
                "label" => uri.label = Some(value.into_owned()),
                "note" | "xnote" => uri.note = Some(value.into_owned()),
                // asset transfers and unknown keys are ignored
                _ => {}
            }
        }

        Ok(uri)
    }

    pub fn to_uri(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(amount) = self.amount {
            query.append_pair("amount", &algos_to_microalgos(amount).to_string());
        }
        if let Some(label) = &self.label {
            query.append_pair("label", label);
        }
        if let Some(note) = &self.note {
            query.append_pair("note", note);
        }

        let query = query.finish();
        if query.is_empty() {
            format!("{}{}", SCHEME, self.address)
        } else {
            format!("{}{}?{}", SCHEME, self.address, query)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "7ZUECA7HFLZTXENRV24SHLU4AVPUTMTTDUFUBNBD64C73F3UHRTHAIOF6Q";

    #[test]
    fn test_parse_amount_and_note() {
        let uri = PaymentUri::parse(&format!(
            "algorand://{}?amount=150500000&note=coffee%20beans",
            ADDRESS
        ))
        .unwrap();
        assert_eq!(uri.address, ADDRESS);
        assert_eq!(uri.amount, Some(150.5));
        assert_eq!(uri.note.as_deref(), Some("coffee beans"));
    }

    #[test]
    fn test_parse_bare_address() {
        let uri = PaymentUri::parse(&format!("algorand://{}", ADDRESS)).unwrap();
        assert_eq!(uri, PaymentUri::new(ADDRESS, None));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(PaymentUri::parse(&format!("bitcoin://{}", ADDRESS)).is_err());
        assert!(PaymentUri::parse("algorand://NOTANADDRESS").is_err());
        assert!(PaymentUri::parse(&format!("algorand://{}?amount=1.5", ADDRESS)).is_err());
    }

    #[test]
    fn test_to_uri() {
        let mut uri = PaymentUri::new(ADDRESS, Some(2.0));
        uri.note = Some("rent".to_string());
        assert_eq!(
            uri.to_uri(),
            format!("algorand://{}?amount=2000000&note=rent", ADDRESS)
        );
        assert_eq!(PaymentUri::parse(&uri.to_uri()).unwrap(), uri);
    }
}
