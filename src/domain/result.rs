//! Result type alias for Quarry

use super::errors::QuarryError;

/// Result type alias for Quarry operations
///
/// # Examples
///
/// ```
/// use quarry::domain::result::Result;
/// use quarry::domain::errors::QuarryError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(QuarryError::InputNotFound("container/missing.txt".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, QuarryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<u64> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_result_err() {
        let result: Result<u64> = Err(QuarryError::Other("boom".to_string()));
        assert!(result.is_err());
    }
}
