use std::fmt::Display;

pub trait ResultExt<T, InitialError> {
    /// Convert a foreign error into one of our string carrying error variants
    ///
    /// Errors crossing the FFI boundary are flattened to their `Display` output,
    /// this keeps that conversion to a single call at the `?` site.
    ///
    /// # Example
    /// ```rust
    /// use opsync_util::result_ext::ResultExt;
    ///
    /// #[derive(Debug, thiserror::Error)]
    /// enum CacheError {
    ///     #[error("unable to parse cached account: {0}")]
    ///     Parse(String),
    /// }
    ///
    /// fn parse_height(height: &str) -> Result<u64, CacheError> {
    ///     let height = height.parse::<u64>().map_err_str(CacheError::Parse)?;
    ///     Ok(height)
    /// }
    ///
    /// assert!(parse_height("not a number").is_err());
    /// ```
    fn map_err_str<FinalError, F>(self, f: F) -> Result<T, FinalError>
    where
        InitialError: Display,
        F: FnOnce(String) -> FinalError;

    /// map an error using Into::into before passing to error constructor
    fn map_err_into<I, FinalError, F>(self, f: F) -> Result<T, FinalError>
    where
        InitialError: Into<I>,
        F: FnOnce(I) -> FinalError;
}

impl<Type, InitialError> ResultExt<Type, InitialError> for Result<Type, InitialError> {
    fn map_err_str<FinalError, F>(self, f: F) -> Result<Type, FinalError>
    where
        InitialError: Display,
        F: FnOnce(String) -> FinalError,
    {
        self.map_err(|e| f(e.to_string()))
    }

    fn map_err_into<I, FinalError, F>(self, f: F) -> Result<Type, FinalError>
    where
        InitialError: Into<I>,
        F: FnOnce(I) -> FinalError,
    {
        self.map_err(|e| f(e.into()))
    }
}
