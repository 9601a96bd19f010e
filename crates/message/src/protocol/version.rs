//! Mapping between protocol version strings and `http::Version`.

use http::Version;

use crate::protocol::MessageError;

/// The protocol version string for `version`, e.g. `"1.1"`.
pub fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

/// Parses a protocol version string. `"2"` and `"2.0"` are both accepted,
/// likewise for `"3"`.
pub fn parse_version(version: &str) -> Result<Version, MessageError> {
    match version {
        "0.9" => Ok(Version::HTTP_09),
        "1.0" => Ok(Version::HTTP_10),
        "1.1" => Ok(Version::HTTP_11),
        "2" | "2.0" => Ok(Version::HTTP_2),
        "3" | "3.0" => Ok(Version::HTTP_3),
        other => Err(MessageError::invalid_argument(format!("unsupported protocol version {other:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        for version in [Version::HTTP_09, Version::HTTP_10, Version::HTTP_11, Version::HTTP_2, Version::HTTP_3] {
            assert_eq!(parse_version(version_str(version)).unwrap(), version);
        }
    }

    #[test]
    fn aliases_and_errors() {
        assert_eq!(parse_version("2.0").unwrap(), Version::HTTP_2);
        assert!(parse_version("1.2").is_err());
        assert!(parse_version("").is_err());
    }
}
