//! Conversion between token names and target variable names
//!
//! Tokens are addressed by dot paths (`color.brand.primary`); the target
//! store groups variables with slashes (`color/brand/primary`).

/// Convert a dot-path token name into a target variable name.
pub fn token_name_to_target(name: &str) -> String {
    name.replace('.', "/")
}

/// Convert a target variable name into a dot-path token name.
pub fn target_name_to_token(name: &str) -> String {
    name.replace('/', ".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_to_target() {
        assert_eq!(token_name_to_target("color.brand.primary"), "color/brand/primary");
        assert_eq!(token_name_to_target("spacing"), "spacing");
    }

    #[test]
    fn test_target_to_token() {
        assert_eq!(target_name_to_token("color/brand"), "color.brand");
    }
}
