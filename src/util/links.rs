use url::Url;

const ACCESS2MARKETS_RESULTS: &str = "https://trade.ec.europa.eu/access-to-markets/en/results";

/// Deep link into the EU Access2Markets tariff search for an HS code.
/// Returns `None` for a blank code. The link is never fetched.
pub fn tariff_lookup_url(hs_code: &str) -> Option<Url> {
    let code = hs_code.trim();
    if code.is_empty() {
        return None;
    }
    Url::parse_with_params(ACCESS2MARKETS_RESULTS, &[("text", code)]).ok()
}
