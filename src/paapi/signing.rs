//! AWS Signature Version 4 for PA-API requests.
//!
//! Every step is a pure function of its inputs (including the timestamp) so the
//! whole chain can be checked against the published AWS signing vectors.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

type HmacSha256 = Hmac<Sha256>;

pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Service name PA-API expects in the credential scope.
pub const PAAPI_SERVICE: &str = "ProductAdvertisingAPI";

/// Key material and scope for one signature.
#[derive(Clone, Copy)]
pub struct SigningParams<'a> {
    pub access_key: &'a str,
    pub secret_key: &'a str,
    pub region: &'a str,
    pub service: &'a str,
}

/// The parts of an HTTP request covered by the signature.
#[derive(Debug, Clone)]
pub struct SignableRequest<'a> {
    pub method: &'a str,
    pub path: &'a str,
    /// Already-canonical query string (empty for PA-API).
    pub query: &'a str,
    /// Header names are lowercased on insert; iteration order is the canonical order.
    headers: BTreeMap<String, String>,
    pub payload: &'a [u8],
}

impl<'a> SignableRequest<'a> {
    pub fn new(method: &'a str, path: &'a str, payload: &'a [u8]) -> Self {
        Self { method, path, query: "", headers: BTreeMap::new(), payload }
    }

    /// Adds a header that will be part of the signature.
    pub fn header(mut self, name: &str, value: impl AsRef<str>) -> Self {
        self.headers.insert(name.to_lowercase(), normalize_value(value.as_ref()));
        self
    }

    /// Signed headers in canonical order, for sending alongside `Authorization`.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `host;x-amz-date;...`
    pub fn signed_headers(&self) -> String {
        self.headers.keys().map(String::as_str).collect::<Vec<_>>().join(";")
    }

    /// Canonical request string, step 1 of SigV4.
    pub fn canonical_request(&self) -> String {
        let canonical_headers: String =
            self.headers.iter().map(|(k, v)| format!("{}:{}\n", k, v)).collect();

        [
            self.method,
            self.path,
            self.query,
            canonical_headers.as_str(),
            self.signed_headers().as_str(),
            sha256_hex(self.payload).as_str(),
        ]
        .join("\n")
    }
}

/// Trims and collapses inner whitespace runs.
fn normalize_value(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `YYYYMMDD'T'HHMMSS'Z'`, the `x-amz-date` header format.
pub fn amz_date(now: DateTime<Utc>) -> String {
    now.format("%Y%m%dT%H%M%SZ").to_string()
}

/// `YYYYMMDD`, used in the credential scope.
pub fn date_stamp(now: DateTime<Utc>) -> String {
    now.format("%Y%m%d").to_string()
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], msg: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(msg);
    mac.finalize().into_bytes().to_vec()
}

pub fn credential_scope(date_stamp: &str, region: &str, service: &str) -> String {
    format!("{}/{}/{}/aws4_request", date_stamp, region, service)
}

/// String to sign, step 2 of SigV4.
pub fn string_to_sign(amz_date: &str, scope: &str, canonical_request: &str) -> String {
    [ALGORITHM, amz_date, scope, sha256_hex(canonical_request.as_bytes()).as_str()].join("\n")
}

/// Derives the per-day signing key, step 3 of SigV4.
pub fn signing_key(secret_key: &str, date_stamp: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{}", secret_key).as_bytes(), date_stamp.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

/// Hex signature over the string to sign, step 4 of SigV4.
pub fn signature(signing_key: &[u8], string_to_sign: &str) -> String {
    hex::encode(hmac_sha256(signing_key, string_to_sign.as_bytes()))
}

/// Builds the full `Authorization` header value for `request` signed at `now`.
///
/// The request must already carry an `x-amz-date` header matching `now`.
pub fn authorization(
    params: &SigningParams<'_>,
    request: &SignableRequest<'_>,
    now: DateTime<Utc>,
) -> String {
    let day = date_stamp(now);
    let scope = credential_scope(&day, params.region, params.service);
    let to_sign = string_to_sign(&amz_date(now), &scope, &request.canonical_request());
    let key = signing_key(params.secret_key, &day, params.region, params.service);

    format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        ALGORITHM,
        params.access_key,
        scope,
        request.signed_headers(),
        signature(&key, &to_sign)
    )
}
