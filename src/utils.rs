use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ALGORAND_ADDRESS_RE: Regex = Regex::new(r"^[A-Z2-7]{58}$").unwrap();
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9]{10,15}$").unwrap();
    static ref AMOUNT_RE: Regex = Regex::new(r"^(\d+(?:\.\d+)?)(?:\s*(?i:algos?|dollars?|usd))?$").unwrap();
}

// Format check for an Algorand address: 58 characters of base32 alphabet.
// The checksum is verified separately by `algorand::wallet::decode_address`.
pub fn is_valid_algorand_address(address: &str) -> bool {
    ALGORAND_ADDRESS_RE.is_match(address)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

// Spaces, dashes and parentheses are ignored
pub fn is_valid_phone(phone: &str) -> bool {
    let digits: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    PHONE_RE.is_match(&digits)
}

// Parse a typed amount such as "12.5" or "12.5 algo"
pub fn parse_amount(input: &str) -> Option<f64> {
    AMOUNT_RE
        .captures(input.trim())
        .and_then(|cap| cap.get(1)?.as_str().parse::<f64>().ok())
        .filter(|amount| *amount > 0.0)
}

// Format amount with appropriate precision
pub fn format_amount(amount: f64, currency: &str) -> String {
    match currency.to_uppercase().as_str() {
        "ALGO" => format!("{:.6} ALGO", amount), // microalgo precision
        other => format!("{:.2} {}", amount, other),
    }
}

// Shorten address for display
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }

    let start: String = chars[..5].iter().collect();
    let end: String = chars[chars.len() - 5..].iter().collect();

    format!("{}...{}", start, end)
}
