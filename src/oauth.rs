/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

//! OAuth1 (RFC 5849) HMAC-SHA1 request signing.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use url::Url;

type HmacSha1 = Hmac<Sha1>;

/// Consumer and access tokens used to sign every request
#[derive(Default, Clone)]
pub struct Creds {
    consumer_key: String,
    consumer_secret: String,
    oauth_token: Option<String>,
    oauth_secret: Option<String>,
}

impl Creds {
    pub fn from_tokens(
        consumer_key: &str,
        consumer_secret: &str,
        oauth_token: Option<&str>,
        oauth_secret: Option<&str>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            oauth_token: oauth_token.map(Into::into),
            oauth_secret: oauth_secret.map(Into::into),
        }
    }

    /// Builds the `Authorization` header value for a request.
    ///
    /// `params` are the query string and url-encoded form body pairs; both
    /// take part in the signature.
    pub fn authorization_header(&self, method: &str, url: &Url, params: &[(String, String)]) -> String {
        let nonce = format!("{:016x}{:016x}", rand::random::<u64>(), rand::random::<u64>());
        let timestamp = chrono::Utc::now().timestamp().to_string();
        self.authorization_header_with(method, url, params, &nonce, &timestamp)
    }

    pub(crate) fn authorization_header_with(
        &self,
        method: &str,
        url: &Url,
        params: &[(String, String)],
        nonce: &str,
        timestamp: &str,
    ) -> String {
        let mut oauth_params = vec![
            ("oauth_consumer_key".to_string(), self.consumer_key.clone()),
            ("oauth_nonce".to_string(), nonce.to_string()),
            ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
        ];
        if let Some(token) = &self.oauth_token {
            oauth_params.push(("oauth_token".to_string(), token.clone()));
        }
        oauth_params.push(("oauth_version".to_string(), "1.0".to_string()));

        let signature = self.signature(method, url, params, &oauth_params);
        oauth_params.push(("oauth_signature".to_string(), signature));

        let fields: Vec<String> = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect();
        format!("OAuth {}", fields.join(", "))
    }

    fn signature(
        &self,
        method: &str,
        url: &Url,
        params: &[(String, String)],
        oauth_params: &[(String, String)],
    ) -> String {
        let base = signature_base_string(method, url, params, oauth_params);
        let key = format!(
            "{}&{}",
            encode(&self.consumer_secret),
            encode(self.oauth_secret.as_deref().unwrap_or_default())
        );
        let mut mac =
            HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC can take key of any size");
        mac.update(base.as_bytes());
        STANDARD.encode(mac.finalize().into_bytes())
    }
}

impl std::fmt::Debug for Creds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Creds")
            .field("consumer_key", &"xxx")
            .field("consumer_secret", &"xxx")
            .field("oauth_token", &"xxx")
            .field("oauth_secret", &"xxx")
            .finish()
    }
}

fn encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

fn signature_base_string(
    method: &str,
    url: &Url,
    params: &[(String, String)],
    oauth_params: &[(String, String)],
) -> String {
    let mut base_url = url.clone();
    base_url.set_query(None);
    base_url.set_fragment(None);

    // Query pairs already on the url count too
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (encode(&k), encode(&v)))
        .chain(params.iter().map(|(k, v)| (encode(k), encode(v))))
        .chain(oauth_params.iter().map(|(k, v)| (encode(k), encode(v))))
        .collect();
    pairs.sort();

    let normalized: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        encode(base_url.as_str()),
        encode(&normalized.join("&"))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // Worked example from the Twitter developer documentation
    fn example_creds() -> Creds {
        Creds::from_tokens(
            "xvz1evFS4wEEPTGEFPHBog",
            "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
            Some("370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb"),
            Some("LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE"),
        )
    }

    #[test]
    fn signs_known_example() {
        let url = Url::parse("https://api.twitter.com/1.1/statuses/update.json?include_entities=true").unwrap();
        let body = vec![(
            "status".to_string(),
            "Hello Ladies + Gentlemen, a signed OAuth request!".to_string(),
        )];
        let header = example_creds().authorization_header_with(
            "post",
            &url,
            &body,
            "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg",
            "1318622958",
        );
        assert!(header.starts_with("OAuth oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\""));
        assert!(header.contains("oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\""));
    }

    #[test]
    fn token_is_optional() {
        let creds = Creds::from_tokens("key", "secret", None, None);
        let url = Url::parse("https://example.com/photos/list.json").unwrap();
        let header = creds.authorization_header("GET", &url, &[]);
        assert!(!header.contains("oauth_token"));
        assert!(header.contains("oauth_signature_method=\"HMAC-SHA1\""));
    }

    #[test]
    fn debug_hides_secrets() {
        let printed = format!("{:?}", example_creds());
        assert!(!printed.contains("kAcSOq"));
    }
}
