// ABOUTME: Builds QuickFacts table URLs from county/state names.
// ABOUTME: Names are reduced to QuickFacts slugs; anything that cannot form a slug is rejected.

use url::Url;

use crate::error::ScrapeError;

/// Characters QuickFacts drops when spelling a place name in a URL.
const DROPPED_CHARS: &[char] = &['.', '\'', '-'];

/// Reduce a county or state name to its QuickFacts URL slug.
///
/// "St. Louis" becomes `stlouis`, "New York" becomes `newyork`. Names that
/// still contain anything but ASCII letters and digits after that, or that
/// end up empty, are rejected.
pub fn slug(name: &str) -> Result<String, ScrapeError> {
    let slug: String = name
        .chars()
        .filter(|c| !c.is_whitespace() && !DROPPED_CHARS.contains(c))
        .flat_map(char::to_lowercase)
        .collect();

    if slug.is_empty() {
        return Err(ScrapeError::invalid_identifier(
            name,
            "Slug",
            Some(anyhow::anyhow!("name is empty")),
        ));
    }
    if let Some(bad) = slug.chars().find(|c| !c.is_ascii_alphanumeric()) {
        return Err(ScrapeError::invalid_identifier(
            name,
            "Slug",
            Some(anyhow::anyhow!("unsupported character {:?}", bad)),
        ));
    }
    Ok(slug)
}

/// Parse and check a base URL (scheme and host only, e.g. `https://www.census.gov`).
pub fn parse_base_url(base: &str) -> Result<Url, ScrapeError> {
    let parsed = Url::parse(base).map_err(|e| {
        ScrapeError::input(base, "ParseBaseUrl", Some(anyhow::anyhow!("invalid URL: {}", e)))
    })?;
    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ScrapeError::input(
            base,
            "ParseBaseUrl",
            Some(anyhow::anyhow!("scheme must be http or https")),
        ));
    }
    if parsed.host_str().is_none() {
        return Err(ScrapeError::input(
            base,
            "ParseBaseUrl",
            Some(anyhow::anyhow!("missing host")),
        ));
    }
    Ok(parsed)
}

/// The QuickFacts table URL for one county.
///
/// Shape: `{base}/quickfacts/fact/table/{county}county{state}/{vintage}`.
/// Depends only on its arguments.
pub fn county_url(
    base: &Url,
    vintage: &str,
    county: &str,
    state: &str,
) -> Result<String, ScrapeError> {
    let county = slug(county)?;
    let state = slug(state)?;
    let origin = base.as_str().trim_end_matches('/');
    Ok(format!(
        "{}/quickfacts/fact/table/{}county{}/{}",
        origin, county, state, vintage
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn census() -> Url {
        parse_base_url("https://www.census.gov").unwrap()
    }

    #[test]
    fn fairfax_virginia_url() {
        let url = county_url(&census(), "PST045222", "fairfax", "va").unwrap();
        assert_eq!(
            url,
            "https://www.census.gov/quickfacts/fact/table/fairfaxcountyva/PST045222"
        );
    }

    #[test]
    fn url_is_deterministic() {
        let a = county_url(&census(), "PST045222", "travis", "texas").unwrap();
        let b = county_url(&census(), "PST045222", "travis", "texas").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn base_url_with_path_keeps_it() {
        let base = parse_base_url("http://127.0.0.1:8080/mirror/").unwrap();
        let url = county_url(&base, "V2023", "travis", "texas").unwrap();
        assert_eq!(
            url,
            "http://127.0.0.1:8080/mirror/quickfacts/fact/table/traviscountytexas/V2023"
        );
    }

    #[test]
    fn slug_drops_spaces_and_punctuation() {
        assert_eq!(slug("St. Louis").unwrap(), "stlouis");
        assert_eq!(slug("New York").unwrap(), "newyork");
        assert_eq!(slug("Prince George's").unwrap(), "princegeorges");
        assert_eq!(slug("Miami-Dade").unwrap(), "miamidade");
    }

    #[test]
    fn slug_rejects_non_ascii_and_empty() {
        let err = slug("Doña Ana").unwrap_err();
        assert!(err.is_invalid_identifier());
        assert!(err.to_string().contains("unsupported character"));

        assert!(slug("   ").unwrap_err().is_invalid_identifier());
        assert!(slug("a/b").unwrap_err().is_invalid_identifier());
    }

    #[test]
    fn base_url_must_be_http() {
        assert!(parse_base_url("ftp://census.gov").unwrap_err().is_input());
        assert!(parse_base_url("not a url").unwrap_err().is_input());
    }
}
