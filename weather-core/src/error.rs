/// Why a lookup produced no weather. The `Display` text is what API
/// consumers see, so it never carries upstream error detail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("City name is required")]
    MissingInput,

    #[error("City \"{0}\" not found. Try another spelling.")]
    CityNotFound(String),

    #[error("Could not fetch weather data")]
    UpstreamUnavailable,
}
