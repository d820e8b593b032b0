//! Immutable challenge parameters handed to a session, validated up front.
use crate::codec::decode_hex;
use crate::digest::DIGEST_BITS;
use crate::error::{Error, Result};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::time::Duration;

pub const DEFAULT_SEED_COOKIE: &str = "__challenge_seed";
pub const DEFAULT_SOLUTION_COOKIE: &str = "__challenge_solution";
pub const DEFAULT_MAC_COOKIE: &str = "__challenge_mac";

/// Everything the issuing server supplies for one challenge.
///
/// `seed_hex` and `authentication_tag` are echoed back verbatim in the
/// credential; only the seed is ever decoded.
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[builder(pattern = "owned")]
pub struct ChallengeConfig {
    #[builder(setter(into))]
    pub seed_hex: String,
    #[builder(setter(into))]
    pub authentication_tag: String,
    /// Required leading zero bits in the SHA-512 digest.
    pub complexity: u32,
    /// Lifetime applied to every emitted credential record.
    pub credential_ttl_secs: u64,
    #[builder(setter(into), default = "DEFAULT_SEED_COOKIE.to_owned()")]
    #[serde(default = "default_seed_cookie")]
    pub seed_cookie_name: String,
    #[builder(setter(into), default = "DEFAULT_SOLUTION_COOKIE.to_owned()")]
    #[serde(default = "default_solution_cookie")]
    pub solution_cookie_name: String,
    #[builder(setter(into), default = "DEFAULT_MAC_COOKIE.to_owned()")]
    #[serde(default = "default_mac_cookie")]
    pub mac_cookie_name: String,
}

fn default_seed_cookie() -> String {
    DEFAULT_SEED_COOKIE.to_owned()
}

fn default_solution_cookie() -> String {
    DEFAULT_SOLUTION_COOKIE.to_owned()
}

fn default_mac_cookie() -> String {
    DEFAULT_MAC_COOKIE.to_owned()
}

impl ChallengeConfig {
    /// Check every field. A malformed seed surfaces as [`Error::Format`],
    /// everything else as [`Error::InvalidConfig`].
    pub fn validate(&self) -> Result<()> {
        self.validated_seed().map(drop)
    }

    /// [`validate`](Self::validate), handing back the decoded seed so callers
    /// do not decode it a second time.
    pub fn validated_seed(&self) -> Result<Vec<u8>> {
        let seed = decode_hex(&self.seed_hex)?;
        if seed.is_empty() {
            return Err(Error::InvalidConfig("seed must not be empty".into()));
        }
        if self.complexity > DIGEST_BITS {
            return Err(Error::InvalidConfig(format!(
                "complexity {} exceeds digest width of {DIGEST_BITS} bits",
                self.complexity
            )));
        }
        if self.credential_ttl_secs == 0 {
            return Err(Error::InvalidConfig(
                "credential_ttl_secs must be >= 1".into(),
            ));
        }
        let names = [
            ("seed_cookie_name", &self.seed_cookie_name),
            ("solution_cookie_name", &self.solution_cookie_name),
            ("mac_cookie_name", &self.mac_cookie_name),
        ];
        for (field, name) in names {
            if !is_cookie_token(name) {
                return Err(Error::InvalidConfig(format!(
                    "{field} {name:?} is not a valid cookie name"
                )));
            }
        }
        if self.seed_cookie_name == self.solution_cookie_name
            || self.seed_cookie_name == self.mac_cookie_name
            || self.solution_cookie_name == self.mac_cookie_name
        {
            return Err(Error::InvalidConfig("cookie names must be distinct".into()));
        }
        if self.authentication_tag.is_empty()
            || !self.authentication_tag.bytes().all(is_cookie_octet)
        {
            return Err(Error::InvalidConfig(
                "authentication_tag must be a non-empty cookie value".into(),
            ));
        }
        Ok(seed)
    }

    /// Parse and validate a JSON challenge.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let config: Self = serde_json::from_reader(reader)
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn decode_seed(&self) -> Result<Vec<u8>> {
        decode_hex(&self.seed_hex)
    }

    pub fn credential_ttl(&self) -> Duration {
        Duration::from_secs(self.credential_ttl_secs)
    }
}

impl ChallengeConfigBuilder {
    pub fn build_validated(self) -> Result<ChallengeConfig> {
        let config = self
            .build()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// RFC 6265 cookie-name: an RFC 2616 token.
fn is_cookie_token(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_graphic()
                && !matches!(
                    b,
                    b'(' | b')'
                        | b'<'
                        | b'>'
                        | b'@'
                        | b','
                        | b';'
                        | b':'
                        | b'\\'
                        | b'"'
                        | b'/'
                        | b'['
                        | b']'
                        | b'?'
                        | b'='
                        | b'{'
                        | b'}'
                )
        })
}

/// RFC 6265 cookie-octet.
fn is_cookie_octet(b: u8) -> bool {
    matches!(b, 0x21 | 0x23..=0x2b | 0x2d..=0x3a | 0x3c..=0x5b | 0x5d..=0x7e)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ChallengeConfigBuilder {
        ChallengeConfigBuilder::default()
            .seed_hex("0102")
            .authentication_tag("abc")
            .complexity(4)
            .credential_ttl_secs(60)
    }

    #[test]
    fn builder_fills_default_cookie_names() {
        let config = base().build_validated().expect("valid config");
        assert_eq!(config.seed_cookie_name, DEFAULT_SEED_COOKIE);
        assert_eq!(config.solution_cookie_name, DEFAULT_SOLUTION_COOKIE);
        assert_eq!(config.mac_cookie_name, DEFAULT_MAC_COOKIE);
        assert_eq!(config.credential_ttl(), Duration::from_secs(60));
        assert_eq!(config.decode_seed().unwrap(), vec![1, 2]);
    }

    #[test]
    fn validated_seed_returns_decoded_bytes() {
        let config = base().seed_hex("00ff10").build_validated().unwrap();
        assert_eq!(config.validated_seed().unwrap(), vec![0x00, 0xff, 0x10]);

        let mut bad = config.clone();
        bad.credential_ttl_secs = 0;
        assert!(matches!(bad.validated_seed(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn builder_requires_seed() {
        let err = ChallengeConfigBuilder::default()
            .authentication_tag("abc")
            .complexity(1)
            .credential_ttl_secs(1)
            .build_validated()
            .expect_err("missing seed");
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn malformed_seed_is_a_format_error() {
        let err = base().seed_hex("010").build_validated().unwrap_err();
        assert!(matches!(err, Error::Format(_)));
        let err = base().seed_hex("zz").build_validated().unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn rejects_empty_seed() {
        let err = base().seed_hex("").build_validated().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn complexity_bounded_by_digest_width() {
        base().complexity(512).build_validated().expect("512 is satisfiable");
        let err = base().complexity(513).build_validated().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn rejects_zero_ttl() {
        let err = base().credential_ttl_secs(0).build_validated().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn rejects_bad_cookie_names() {
        for bad in ["", "a b", "a;b", "a=b", "é"] {
            let err = base().seed_cookie_name(bad).build_validated().unwrap_err();
            assert!(matches!(err, Error::InvalidConfig(_)), "{bad:?}");
        }
        let err = base()
            .seed_cookie_name("x")
            .mac_cookie_name("x")
            .build_validated()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn rejects_tag_that_would_break_cookie() {
        for bad in ["", "a;b", "a b", "\"q\"", "a,b"] {
            let err = base().authentication_tag(bad).build_validated().unwrap_err();
            assert!(matches!(err, Error::InvalidConfig(_)), "{bad:?}");
        }
    }

    #[test]
    fn json_uses_defaults_for_missing_names() {
        let json = r#"{
            "seed_hex": "00ff",
            "authentication_tag": "deadbeef",
            "complexity": 16,
            "credential_ttl_secs": 300
        }"#;
        let config = ChallengeConfig::from_json_str(json).expect("parse");
        assert_eq!(config.complexity, 16);
        assert_eq!(config.seed_cookie_name, DEFAULT_SEED_COOKIE);

        let back: ChallengeConfig =
            serde_json::from_str(&serde_json::to_string(&config).unwrap()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn json_is_validated_on_load() {
        let json = r#"{"seed_hex":"abc","authentication_tag":"t","complexity":1,"credential_ttl_secs":1}"#;
        assert!(matches!(
            ChallengeConfig::from_json_str(json),
            Err(Error::Format(_))
        ));
        assert!(matches!(
            ChallengeConfig::from_reader(&b"not json"[..]),
            Err(Error::InvalidConfig(_))
        ));
    }
}
