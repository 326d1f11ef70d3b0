//! Utility functions for wire decoding and local file cleanup

use std::path::PathBuf;

/// Collect URIs pointing to the same resource into the list `add_uri` expects
///
/// # Examples
///
/// ```
/// use aria2_dl::utils::uris;
///
/// let sources = uris(["http://a.example/file.iso", "http://b.example/file.iso"]);
/// assert_eq!(sources.len(), 2);
/// ```
pub fn uris<I, S>(uris: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    uris.into_iter().map(Into::into).collect()
}

/// Delete files left behind by a removed download
///
/// Cleanup is advisory: failures are logged and counted, never returned.
/// Empty paths (files aria2 has not named yet) are skipped.
///
/// Returns the number of files that were actually removed.
pub async fn remove_files<I>(paths: I) -> usize
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut removed = 0;
    for path in paths {
        if path.as_os_str().is_empty() {
            continue;
        }
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "removed download file");
                removed += 1;
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to remove download file"
                );
            }
        }
    }
    removed
}

/// Serde helper for integers aria2 encodes as decimal strings
///
/// Accepts both `"123"` and `123` on input and always writes a string.
pub(crate) mod string_u64 {
    use serde::{Deserialize, Deserializer, Serializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(u64),
    }

    pub fn serialize<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match StringOrNumber::deserialize(deserializer)? {
            StringOrNumber::Number(n) => Ok(n),
            StringOrNumber::String(s) if s.is_empty() => Ok(0),
            StringOrNumber::String(s) => s.parse().map_err(de::Error::custom),
        }
    }
}

/// Optional variant of [`string_u64`]
pub(crate) mod string_u64_opt {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => serializer.serialize_some(&v.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wrapper(#[serde(with = "super::string_u64")] u64);

        let value = Option::<Wrapper>::deserialize(deserializer)?;
        Ok(value.map(|Wrapper(v)| v))
    }
}
