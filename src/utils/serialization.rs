use anyhow::Result;

/// Get the bincode configuration
fn get_config() -> impl bincode::config::Config {
    // Legacy configuration keeps serde compatibility; the limit guards against
    // corrupt length prefixes.
    bincode::config::legacy().with_limit::<{ 16 * 1024 * 1024 }>() // 16MB limit
}

/// Serialize data using bincode v2.0 with serde
///
/// # Errors
///
/// Returns an error if serialization fails
pub fn serialize<T: serde::Serialize>(data: &T) -> Result<Vec<u8>> {
    bincode::serde::encode_to_vec(data, get_config()).map_err(Into::into)
}

/// Deserialize data using bincode v2.0 with serde
///
/// # Errors
///
/// Returns an error if:
/// - Deserialization fails
/// - Data is malformed or incompatible
pub fn deserialize<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let (result, _bytes_read) = bincode::serde::decode_from_slice(bytes, get_config())?;
    Ok(result)
}
