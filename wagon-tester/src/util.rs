use anyhow::{Context, Result};

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse seed tokens as decimal or `0x`-prefixed hex integers.
pub fn parse_seeds(tokens: &[String]) -> Result<Vec<u64>> {
    tokens
        .iter()
        .map(|token| {
            let parsed = match token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
            {
                Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
                None => token.replace('_', "").parse::<u64>(),
            };
            parsed.with_context(|| format!("invalid seed '{token}'"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" alpha, ,beta,  gamma ");
        assert_eq!(parts, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn parse_seeds_accepts_decimal_and_hex() {
        let seeds = parse_seeds(&split_csv("1337, 0xC0_FFEE,1_000")).unwrap();
        assert_eq!(seeds, vec![1337, 0x00C0_FFEE, 1000]);
    }

    #[test]
    fn parse_seeds_reports_bad_token() {
        let err = parse_seeds(&split_csv("12,banana")).unwrap_err();
        assert!(err.to_string().contains("banana"));
    }
}
