//! Weather data provisioning.
//!
//! A simulation needs its reanalysis weather file locally before it starts.
//! [`ensure_weather_file`] checks for it and, if absent, pulls it through an
//! [`ObjectFetcher`]. The default fetcher talks to S3 with SigV4-signed GETs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Bucket holding the reanalysis weather files.
pub const WEATHER_BUCKET: &str = "im3sweather";
pub const ENV_ACCESS_KEY: &str = "AWS_KEY";
pub const ENV_SECRET_KEY: &str = "AWS_SEC";
pub const ENV_REGION: &str = "AWS_REGION";
const DEFAULT_REGION: &str = "us-east-1";

/// Downloads a named object to a local path.
pub trait ObjectFetcher {
    fn fetch(&self, key: &str, dest: &Path) -> Result<()>;
}

/// Return the path of `file_name` in `dir`, downloading it first if missing.
pub fn ensure_weather_file(dir: &Path, file_name: &str, fetcher: &dyn ObjectFetcher) -> Result<PathBuf> {
    let path = dir.join(file_name);
    if path.is_file() {
        tracing::info!(path = %path.display(), "weather data present");
        return Ok(path);
    }

    tracing::info!(file = file_name, bucket = WEATHER_BUCKET, "weather data not found, downloading");
    fs::create_dir_all(dir)?;
    fetcher.fetch(file_name, &path)?;
    tracing::info!(path = %path.display(), "weather data download complete");
    Ok(path)
}

/// AWS access credentials.
#[derive(Clone)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        match (std::env::var(ENV_ACCESS_KEY), std::env::var(ENV_SECRET_KEY)) {
            (Ok(access_key), Ok(secret_key)) if !access_key.is_empty() && !secret_key.is_empty() => {
                Ok(Self {
                    access_key,
                    secret_key,
                })
            }
            _ => Err(Error::Weather(format!(
                "{} and {} environment variables have not been set",
                ENV_ACCESS_KEY, ENV_SECRET_KEY
            ))),
        }
    }
}

/// S3 object fetcher for a single bucket.
#[derive(Debug, Clone)]
pub struct S3Fetcher {
    bucket: String,
    region: String,
    credentials: Credentials,
}

impl S3Fetcher {
    pub fn new(bucket: impl Into<String>, region: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            bucket: bucket.into(),
            region: region.into(),
            credentials,
        }
    }

    /// Fetcher for the weather bucket, configured from the environment.
    pub fn from_env() -> Result<Self> {
        let region = std::env::var(ENV_REGION).unwrap_or_else(|_| DEFAULT_REGION.to_string());
        Ok(Self::new(WEATHER_BUCKET, region, Credentials::from_env()?))
    }

    fn host(&self) -> String {
        if self.region == DEFAULT_REGION {
            format!("{}.s3.amazonaws.com", self.bucket)
        } else {
            format!("{}.s3.{}.amazonaws.com", self.bucket, self.region)
        }
    }
}

impl ObjectFetcher for S3Fetcher {
    fn fetch(&self, key: &str, dest: &Path) -> Result<()> {
        let host = self.host();
        let uri = canonical_uri(key);
        let signed = sign_get(&self.credentials, &self.region, &host, &uri, &[], Utc::now())?;

        let mut request = ureq::get(&format!("https://{}{}", host, uri));
        for (name, value) in &signed.headers {
            request = request.set(name, value);
        }
        let response = request.call().map_err(|e| match e {
            ureq::Error::Status(code, _) => Error::Weather(format!(
                "authentication failed or object unavailable (HTTP {}) for s3://{}/{}",
                code, self.bucket, key
            )),
            ureq::Error::Transport(t) => Error::Weather(format!("server unavailable: {}", t)),
        })?;

        write_via_partial(&mut response.into_reader(), dest)
    }
}

/// `dest` with `.part` appended to its file name.
fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

/// Stream `reader` into `dest` through a sibling `.part` file. On failure
/// the partial file is removed and `dest` is left untouched.
fn write_via_partial<R: io::Read + ?Sized>(reader: &mut R, dest: &Path) -> Result<()> {
    let partial = partial_path(dest);
    let written = fs::File::create(&partial).and_then(|mut out| {
        io::copy(reader, &mut out)?;
        out.sync_all()?;
        fs::rename(&partial, dest)
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&partial);
        return Err(e.into());
    }
    Ok(())
}

/// S3 fetcher for the weather bucket whose credentials are read from the
/// environment only when a download is actually needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvS3Fetcher;

impl ObjectFetcher for EnvS3Fetcher {
    fn fetch(&self, key: &str, dest: &Path) -> Result<()> {
        S3Fetcher::from_env()?.fetch(key, dest)
    }
}

/// Headers to attach to a signed request.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub headers: Vec<(String, String)>,
    pub signature: String,
}

fn hmac_sha256(key: &[u8], data: &str) -> Result<Vec<u8>> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key)
        .map_err(|e| Error::Weather(format!("cannot sign request: {}", e)))?;
    mac.update(data.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Percent-encode an object key, keeping `/` separators.
fn canonical_uri(key: &str) -> String {
    let mut uri = String::from("/");
    for b in key.trim_start_matches('/').bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                uri.push(b as char)
            }
            _ => uri.push_str(&format!("%{:02X}", b)),
        }
    }
    uri
}

/// AWS Signature Version 4 for an S3 GET with an empty body.
///
/// `extra` headers must be lowercase and are signed alongside `host`,
/// `x-amz-content-sha256` and `x-amz-date`.
pub fn sign_get(
    credentials: &Credentials,
    region: &str,
    host: &str,
    uri: &str,
    extra: &[(&str, &str)],
    now: DateTime<Utc>,
) -> Result<SignedRequest> {
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let date = now.format("%Y%m%d").to_string();
    let payload_hash = sha256_hex(b"");

    let mut headers: Vec<(String, String)> = vec![
        ("host".into(), host.into()),
        ("x-amz-content-sha256".into(), payload_hash.clone()),
        ("x-amz-date".into(), amz_date.clone()),
    ];
    headers.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    headers.sort_by(|a, b| a.0.cmp(&b.0));

    let canonical_headers: String = headers
        .iter()
        .map(|(k, v)| format!("{}:{}\n", k, v.trim()))
        .collect();
    let signed_headers = headers
        .iter()
        .map(|(k, _)| k.as_str())
        .collect::<Vec<_>>()
        .join(";");
    let canonical_request = format!(
        "GET\n{}\n\n{}\n{}\n{}",
        uri, canonical_headers, signed_headers, payload_hash
    );

    let scope = format!("{}/{}/s3/aws4_request", date, region);
    let string_to_sign = format!(
        "AWS4-HMAC-SHA256\n{}\n{}\n{}",
        amz_date,
        scope,
        sha256_hex(canonical_request.as_bytes())
    );

    let k_date = hmac_sha256(format!("AWS4{}", credentials.secret_key).as_bytes(), &date)?;
    let k_region = hmac_sha256(&k_date, region)?;
    let k_service = hmac_sha256(&k_region, "s3")?;
    let k_signing = hmac_sha256(&k_service, "aws4_request")?;
    let signature = hex::encode(hmac_sha256(&k_signing, &string_to_sign)?);

    let authorization = format!(
        "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
        credentials.access_key, scope, signed_headers, signature
    );
    // ureq sets Host itself.
    headers.retain(|(k, _)| k != "host");
    headers.push(("authorization".into(), authorization));

    Ok(SignedRequest { headers, signature })
}
