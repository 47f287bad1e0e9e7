//! Locating and fetching TinyWiiBackupManager releases

use serde::Serialize;
use std::io::{Cursor, Read};
use thiserror::Error;

const RELEASES_URL: &str = "https://github.com/mq1/TinyWiiBackupManager/releases";

const USER_AGENT: &str = concat!("twbm-installer/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },
    #[error("Unable to read response from {url}: {source}")]
    Read {
        url: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Release version file is empty")]
    EmptyVersion,
    #[error("Invalid release archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("Unable to extract {name}: {source}")]
    Extract {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Os {
    Windows,
    Windows7,
}

impl Os {
    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Windows => "windows",
            Os::Windows7 => "windows7",
        }
    }

    /// Builds for Windows 7/8/8.1 are used unless `ver` reports Windows 10 or later
    pub fn from_ver_output(output: &str) -> Self {
        if output.contains("Version 10") {
            Os::Windows
        } else {
            Os::Windows7
        }
    }

    #[cfg(windows)]
    pub fn detect() -> Self {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x08000000;
        match std::process::Command::new("cmd")
            .args(["/c", "ver"])
            .creation_flags(CREATE_NO_WINDOW)
            .output()
        {
            Ok(output) => Self::from_ver_output(&String::from_utf8_lossy(&output.stdout)),
            Err(e) => {
                log::warn!("Unable to query Windows version: {}", e);
                Os::Windows7
            }
        }
    }

    #[cfg(not(windows))]
    pub fn detect() -> Self {
        Os::Windows
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Arch {
    I686,
    X86_64,
    /// x86_64 with AVX2, FMA and BMI2
    X86_64v3,
    Aarch64,
}

impl Arch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::I686 => "x86",
            Arch::X86_64 => "x86_64",
            Arch::X86_64v3 => "x86_64-v3",
            Arch::Aarch64 => "arm64",
        }
    }

    /// `processor_arch` is the `PROCESSOR_ARCHITEW6432` variable
    pub fn from_env(processor_arch: Option<&str>, has_v3_features: bool) -> Self {
        match processor_arch {
            Some("AMD64") if has_v3_features => Arch::X86_64v3,
            Some("AMD64") => Arch::X86_64,
            Some("ARM64") => Arch::Aarch64,
            _ => Arch::I686,
        }
    }

    pub fn detect() -> Self {
        let var = std::env::var("PROCESSOR_ARCHITEW6432").ok();
        Self::from_env(var.as_deref(), has_v3_features())
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn has_v3_features() -> bool {
    std::is_x86_feature_detected!("avx2")
        && std::is_x86_feature_detected!("fma")
        && std::is_x86_feature_detected!("bmi2")
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
fn has_v3_features() -> bool {
    false
}

pub fn latest_version_url() -> String {
    format!("{}/latest/download/version.txt", RELEASES_URL)
}

pub fn archive_url(version: &str, os: Os, arch: Arch) -> String {
    format!(
        "{base}/download/v{version}/TinyWiiBackupManager-v{version}-{}-{}.zip",
        os.as_str(),
        arch.as_str(),
        base = RELEASES_URL,
    )
}

/// Strips whitespace and a leading `v`
pub fn parse_version(body: &str) -> Result<String, ReleaseError> {
    let version = body.trim().trim_start_matches('v');
    if version.is_empty() {
        return Err(ReleaseError::EmptyVersion);
    }
    Ok(version.to_owned())
}

fn get(url: &str) -> Result<ureq::Response, ReleaseError> {
    log::info!("Fetching {}", url);
    ureq::get(url)
        .set("User-Agent", USER_AGENT)
        .call()
        .map_err(|e| ReleaseError::Http {
            url: url.to_owned(),
            source: Box::new(e),
        })
}

pub fn fetch_latest_version() -> Result<String, ReleaseError> {
    let url = latest_version_url();
    let body = get(&url)?
        .into_string()
        .map_err(|source| ReleaseError::Read { url, source })?;
    parse_version(&body)
}

pub fn download_archive(version: &str, os: Os, arch: Arch) -> Result<Vec<u8>, ReleaseError> {
    let url = archive_url(version, os, arch);
    let mut bytes = Vec::new();
    get(&url)?
        .into_reader()
        .read_to_end(&mut bytes)
        .map_err(|source| ReleaseError::Read { url, source })?;
    log::debug!("Downloaded {} bytes", bytes.len());
    Ok(bytes)
}

/// Reads one file out of a release archive
pub fn extract_file(archive: &[u8], name: &str) -> Result<Vec<u8>, ReleaseError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(archive))?;
    let mut file = archive.by_name(name)?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)
        .map_err(|source| ReleaseError::Extract {
            name: name.to_owned(),
            source,
        })?;
    Ok(data)
}
