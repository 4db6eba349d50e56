use std::str::FromStr;

use user_knn::prelude::*;

/// Upper bound of the requested recommendation count.
pub const MAX_COUNT: usize = 100;

pub fn non_zero_usize(value: &str) -> Result<usize> {
    match FromStr::from_str(value)? {
        value if value >= 1 => Ok(value),
        _ => Err(anyhow!("expected a positive number")),
    }
}

pub fn recommendation_count(value: &str) -> Result<usize> {
    match non_zero_usize(value)? {
        value if value <= MAX_COUNT => Ok(value),
        value => Err(anyhow!("{} is more than {} recommendations", value, MAX_COUNT)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommendation_count_ok() -> Result {
        assert_eq!(recommendation_count("1")?, 1);
        assert_eq!(recommendation_count("100")?, 100);
        assert!(recommendation_count("0").is_err());
        assert!(recommendation_count("101").is_err());
        assert!(recommendation_count("five").is_err());
        Ok(())
    }
}
