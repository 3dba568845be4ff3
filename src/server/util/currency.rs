/// Currencies clients list first
pub const COMMON_CURRENCIES: [&str; 3] = ["USD", "CNY", "EUR"];

/// ISO 4217 codes with a known issuing region
const FLAG_CODES: &[&str] = &[
    "AED", "AFN", "ALL", "AMD", "ANG", "AOA", "ARS", "AUD", "AWG", "AZN", "BAM", "BBD", "BDT",
    "BGN", "BHD", "BIF", "BMD", "BND", "BOB", "BRL", "BSD", "BTN", "BWP", "BYN", "BZD", "CAD",
    "CDF", "CHF", "CLF", "CLP", "CNH", "CNY", "COP", "CRC", "CUP", "CVE", "CZK", "DJF", "DKK",
    "DOP", "DZD", "EGP", "ERN", "ETB", "EUR", "FJD", "FKP", "FOK", "GBP", "GEL", "GGP", "GHS",
    "GIP", "GMD", "GNF", "GTQ", "GYD", "HKD", "HNL", "HRK", "HTG", "HUF", "IDR", "ILS", "IMP",
    "INR", "IQD", "IRR", "ISK", "JEP", "JMD", "JOD", "JPY", "KES", "KGS", "KHR", "KID", "KMF",
    "KRW", "KWD", "KYD", "KZT", "LAK", "LBP", "LKR", "LRD", "LSL", "LYD", "MAD", "MDL", "MGA",
    "MKD", "MMK", "MNT", "MOP", "MRU", "MUR", "MVR", "MWK", "MXN", "MYR", "MZN", "NAD", "NGN",
    "NIO", "NOK", "NPR", "NZD", "OMR", "PAB", "PEN", "PGK", "PHP", "PKR", "PLN", "PYG", "QAR",
    "RON", "RSD", "RUB", "RWF", "SAR", "SBD", "SCR", "SDG", "SEK", "SGD", "SHP", "SLE", "SLL",
    "SOS", "SRD", "SSP", "STN", "SYP", "SZL", "THB", "TJS", "TMT", "TND", "TOP", "TRY", "TTD",
    "TVD", "TWD", "TZS", "UAH", "UGX", "USD", "UYU", "UZS", "VES", "VND", "VUV", "WST", "XAF",
    "XCD", "XOF", "XPF", "YER", "ZAR", "ZMW", "ZWG", "ZWL",
];

/// Region of a currency whose code does not start with it
fn region_override(code: &str) -> Option<&'static str> {
    match code {
        "ANG" => Some("NL"),
        "XAF" | "XOF" => Some("FR"),
        "XCD" => Some("AG"),
        "XPF" => Some("NC"),
        _ => None,
    }
}

/// Two regional indicator symbols spelling `region`
fn regional_indicators(region: &str) -> String {
    region
        .chars()
        .filter_map(|c| char::from_u32(0x1F1E6 + (c as u32).checked_sub('A' as u32)?))
        .collect()
}

/// Emoji flag of a currency code, empty for unknown codes
pub fn currency_flag(code: &str) -> String {
    let code = code.to_uppercase();

    if !FLAG_CODES.contains(&code.as_str()) {
        return String::new();
    }

    let region = region_override(&code).unwrap_or(&code[..2]);

    regional_indicators(region)
}

pub fn is_common(code: &str) -> bool {
    COMMON_CURRENCIES.contains(&code)
}
