use std::sync::LazyLock;
use std::time::Duration;

/// User agent sent with every provider request
pub const USER_AGENT: &str = concat!("courier-rs/", env!("CARGO_PKG_VERSION"));

/// Global blocking HTTP client shared by every live transport
///
/// This client is initialized lazily on first access and reused for the
/// lifetime of the process.
///
/// # Features
/// - **Connection pooling**: Reuses TCP connections across sends to the same provider
/// - **Timeouts**: 30s request timeout, 10s connect timeout
/// - **Compression**: Accepts gzip encoded responses
///
/// The core performs no retries; a timeout surfaces once as a provider API error.
///
/// # Example
/// ```rust,ignore
/// use courier_rs::external::client::HTTP_CLIENT;
///
/// fn ping(url: &str) -> Result<u16, reqwest::Error> {
///     let response = HTTP_CLIENT.get(url).send()?;
///     Ok(response.status().as_u16())
/// }
/// ```
pub static HTTP_CLIENT: LazyLock<reqwest::blocking::Client> = LazyLock::new(|| {
    reqwest::blocking::Client::builder()
        // Timeouts
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        // Connection pooling
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .gzip(true)
        .user_agent(USER_AGENT)
        .build()
        .expect("Failed to build HTTP client")
});
