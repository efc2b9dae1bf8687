// ABOUTME: Country-based bank suggestions for the bank account form
// ABOUTME: Falls back to an international list and searches case-insensitively by substring

pub const DEFAULT_COUNTRY: &str = "US";

pub const GLOBAL_BANKS: &[&str] = &[
    // International presence
    "HSBC", "Citibank", "Standard Chartered", "Deutsche Bank", "BNP Paribas", "Santander",
    "ING Bank", "Barclays",
    // North America
    "Chase Bank", "Bank of America", "Wells Fargo", "TD Bank", "RBC Royal Bank",
    "BMO Bank of Montreal", "Scotia Bank", "Capital One", "U.S. Bank", "PNC Bank",
    "Truist Bank", "Goldman Sachs Bank", "Morgan Stanley", "Fifth Third Bank", "KeyBank",
    "Regions Bank", "M&T Bank", "Huntington Bank", "SunTrust Bank", "BB&T",
    // Europe
    "Credit Suisse", "UBS", "Lloyds Bank", "Intesa Sanpaolo", "Crédit Agricole",
    "Société Générale", "UniCredit", "Rabobank", "Commerzbank", "ABN AMRO", "NatWest",
    "Credit Mutuel", "Banca Monte dei Paschi", "Banco Bilbao Vizcaya", "CaixaBank",
    "Nordea Bank", "Swedbank", "DNB Bank", "Danske Bank", "KBC Bank",
    // Asia
    "ICBC", "China Construction Bank", "Agricultural Bank of China", "Bank of China",
    "Mitsubishi UFJ", "HDFC Bank", "ICICI Bank", "State Bank of India", "Sumitomo Mitsui",
    "DBS Bank", "Mizuho Bank", "Bank of Communications", "Postal Savings Bank of China",
    "Industrial Bank", "China Merchants Bank", "Ping An Bank", "Bank of Tokyo-Mitsubishi",
    "Resona Bank", "SMBC", "OCBC Bank",
    // Africa
    "Standard Bank", "FirstRand", "Nedbank", "Absa Group", "Ecobank", "Access Bank",
    "Zenith Bank", "Equity Bank", "KCB Bank", "Stanbic Bank", "United Bank for Africa",
    "GTBank", "Fidelity Bank", "Union Bank", "Sterling Bank", "FCMB", "Diamond Trust Bank",
    "I&M Bank", "Family Bank", "Cooperative Bank", "Moniepoint", "Kuda Bank",
    "Providus Bank", "Palmpay",
    // South America
    "Banco do Brasil", "Itaú Unibanco", "Bradesco", "Santander Brasil", "Banco de Chile",
    "Bancolombia", "BBVA Colombia", "Banco Nacional", "Banesco", "Banco Pichincha",
    "Banco de Crédito del Perú", "Interbank", "Banco Galicia", "Banco Macro",
    "Banco Santander Rio", "BBVA Argentina", "Banco de Venezuela", "Mercantil Bank",
    "Banco Provincial", "Banorte",
    // Australia/Oceania
    "Commonwealth Bank", "Westpac", "ANZ Bank", "NAB", "ASB Bank", "Bank of New Zealand",
    "Kiwibank", "Suncorp Bank", "Bendigo Bank", "ING Australia", "Macquarie Bank",
    "Adelaide Bank", "Heritage Bank", "Bank of Queensland", "ME Bank", "AMP Bank",
    "Teachers Mutual Bank", "Newcastle Permanent", "Bankwest", "St.George Bank",
    "Other",
];

pub struct CountryBanks {
    pub code: &'static str,
    pub name: &'static str,
    pub banks: &'static [&'static str],
}

pub const COUNTRY_BANKS: &[CountryBanks] = &[
    CountryBanks {
        code: "US",
        name: "United States",
        banks: &[
            "Chase Bank", "Bank of America", "Wells Fargo", "Citibank", "Capital One",
            "PNC Bank", "TD Bank", "U.S. Bank", "Truist Bank", "Goldman Sachs Bank",
            "American Express", "Discover Bank", "Other",
        ],
    },
    CountryBanks {
        code: "NG",
        name: "Nigeria",
        banks: &[
            "Access Bank", "Ecobank Nigeria", "FCMB", "First Bank Nigeria", "GTBank",
            "Jaiz Bank", "Keystone Bank", "Kuda Bank", "Palmpay", "Polaris Bank",
            "Providus Bank", "UBA", "Zenith Bank", "Wema Bank", "Union Bank",
            "Stanbic IBTC Bank", "Opay", "Moniepoint",
        ],
    },
    CountryBanks {
        code: "GB",
        name: "United Kingdom",
        banks: &[
            "Barclays", "HSBC UK", "Lloyds Bank", "NatWest", "Santander UK", "TSB Bank",
            "Metro Bank", "Nationwide", "Halifax", "Bank of Scotland", "Monzo",
            "Starling Bank", "Revolut", "First Direct", "Other",
        ],
    },
    CountryBanks {
        code: "KE",
        name: "Kenya",
        banks: &[
            "Equity Bank", "KCB Bank", "Cooperative Bank", "Standard Chartered Kenya",
            "Absa Bank Kenya", "NCBA Bank", "Diamond Trust Bank", "I&M Bank", "Family Bank",
            "Stanbic Bank Kenya", "CBA Bank", "HFC Bank", "Other",
        ],
    },
    CountryBanks {
        code: "ZA",
        name: "South Africa",
        banks: &[
            "Standard Bank", "FNB", "Absa Bank", "Nedbank", "Capitec Bank", "African Bank",
            "Investec", "TymeBank", "Discovery Bank", "Bidvest Bank", "Mercantile Bank",
            "Other",
        ],
    },
    CountryBanks {
        code: "GH",
        name: "Ghana",
        banks: &[
            "MTN MoMo", "GCB Bank", "Ecobank Ghana", "Standard Chartered Ghana",
            "Stanbic Bank Ghana", "Absa Bank Ghana", "CalBank", "Fidelity Bank Ghana",
            "ADB Bank", "Republic Bank Ghana", "Zenith Bank Ghana", "Access Bank Ghana",
            "Other",
        ],
    },
    CountryBanks {
        code: "CA",
        name: "Canada",
        banks: &[
            "RBC Royal Bank", "TD Canada Trust", "Bank of Nova Scotia", "BMO Bank of Montreal",
            "CIBC", "National Bank of Canada", "Desjardins", "ATB Financial", "Tangerine",
            "Simplii Financial", "Other",
        ],
    },
    CountryBanks {
        code: "IN",
        name: "India",
        banks: &[
            "State Bank of India", "HDFC Bank", "ICICI Bank", "Axis Bank",
            "Kotak Mahindra Bank", "Punjab National Bank", "Bank of Baroda", "Canara Bank",
            "Union Bank of India", "Yes Bank", "IndusInd Bank", "IDFC First Bank",
            "Paytm Payments Bank", "Other",
        ],
    },
    CountryBanks {
        code: "AU",
        name: "Australia",
        banks: &[
            "Commonwealth Bank", "Westpac", "ANZ Bank", "NAB", "Macquarie Bank",
            "ING Australia", "Bendigo Bank", "Bank of Queensland", "Suncorp Bank",
            "Adelaide Bank", "Heritage Bank", "Other",
        ],
    },
    CountryBanks {
        code: "AE",
        name: "United Arab Emirates",
        banks: &[
            "Emirates NBD", "First Abu Dhabi Bank", "ADCB", "Dubai Islamic Bank",
            "Mashreq Bank", "RAK Bank", "HSBC UAE", "Standard Chartered UAE", "CBD Bank",
            "ENBD Islamic", "Abu Dhabi Islamic Bank", "Other",
        ],
    },
];

fn find_country(code: &str) -> Option<&'static CountryBanks> {
    COUNTRY_BANKS
        .iter()
        .find(|country| country.code.eq_ignore_ascii_case(code))
}

pub fn country_name(code: &str) -> Option<&'static str> {
    find_country(code).map(|country| country.name)
}

/// Banks for a country, or the international list when the country is unknown.
pub fn banks_for_country(code: &str) -> &'static [&'static str] {
    find_country(code)
        .map(|country| country.banks)
        .unwrap_or(GLOBAL_BANKS)
}

pub fn search_banks<'a>(banks: &[&'a str], query: &str) -> Vec<&'a str> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return banks.to_vec();
    }

    banks
        .iter()
        .filter(|bank| bank.to_lowercase().contains(&query))
        .copied()
        .collect()
}

/// Country list when not searching; otherwise search country and global banks together.
pub fn suggest_banks(country: &str, query: Option<&str>) -> Vec<&'static str> {
    let local = banks_for_country(country);

    match query.map(str::trim).filter(|q| !q.is_empty()) {
        None => local.to_vec(),
        Some(query) => {
            let mut combined: Vec<&'static str> = Vec::with_capacity(local.len() + GLOBAL_BANKS.len());
            for bank in local.iter().chain(GLOBAL_BANKS.iter()) {
                if !combined.contains(bank) {
                    combined.push(*bank);
                }
            }
            search_banks(&combined, query)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_country_list() {
        let banks = banks_for_country("NG");
        assert!(banks.contains(&"GTBank"));
        assert!(!banks.contains(&"Chase Bank"));
        assert_eq!(country_name("ng"), Some("Nigeria"));
    }

    #[test]
    fn test_unknown_country_falls_back_to_global() {
        assert_eq!(banks_for_country("FR").len(), GLOBAL_BANKS.len());
        assert_eq!(country_name("FR"), None);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let results = search_banks(banks_for_country("GB"), "BANK");
        assert!(results.contains(&"Lloyds Bank"));
        assert!(results.contains(&"Starling Bank"));
        assert!(!results.contains(&"Monzo"));
    }

    #[test]
    fn test_blank_query_returns_country_list() {
        assert_eq!(suggest_banks("KE", Some("   ")), banks_for_country("KE").to_vec());
        assert_eq!(suggest_banks("KE", None), banks_for_country("KE").to_vec());
    }

    #[test]
    fn test_search_spans_global_banks_without_duplicates() {
        let results = suggest_banks("NG", Some("zenith"));
        assert_eq!(results, vec!["Zenith Bank"]);

        let results = suggest_banks("NG", Some("deutsche"));
        assert_eq!(results, vec!["Deutsche Bank"]);
    }
}
