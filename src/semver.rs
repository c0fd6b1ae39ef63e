//! Semantic Versioning string engine
//!
//! Pure, stateless functions that validate, parse, increment, and rebuild
//! version strings of the form `major.minor.patch[-prerelease][+metadata]`.
//! Identifiers use the character set `[0-9A-Za-z-]` and every grammar check
//! is anchored, so partial matches are rejected.
//!
//! Only syntax and trailing-suffix increments are handled here. Precedence
//! and ordering between versions are out of scope.

use crate::clock::{Clock, SystemClock, TIMESTAMP_PATTERN};
use crate::error::{BumpError, Result};
use regex::Regex;
use std::sync::LazyLock;

static NORMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").unwrap());

static PRERELEASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*$").unwrap());

static METADATA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*$").unwrap());

static FULL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([0-9]+\.[0-9]+\.[0-9]+)(-[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?(\+[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?$",
    )
    .unwrap()
});

static TRAILING_DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+$").unwrap());

/// Optional trailing components for [build_semver].
///
/// Both fields are fragments without their leading separator; an absent or
/// empty field means the component is omitted from the rebuilt string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub prerelease: Option<String>,
    pub metadata: Option<String>,
}

/// Check whether a string is a fully valid SemVer version.
///
/// Valid examples: `1.0.1`, `1.0.1-alpha`, `1.0.1-b.12`, `1.0.1-beta.123+456`,
/// `1.0.1-beta+exp.sha.5114f85`.
pub fn is_valid_semver(version: &str) -> bool {
    FULL_RE.is_match(version)
}

/// Check whether a string is exactly a normal version (`major.minor.patch`).
///
/// All three components must be present, dot separated, digits only, with
/// nothing before or after.
pub fn is_valid_semver_normal(normal_version: &str) -> bool {
    NORMAL_RE.is_match(normal_version)
}

/// Check whether a string is a valid prerelease fragment, leading `-` included.
///
/// Callers testing a bare fragment must prepend the `-` separator first.
pub fn is_valid_semver_prerelease(prerelease: &str) -> bool {
    PRERELEASE_RE.is_match(prerelease)
}

/// Check whether a string is a valid metadata fragment, leading `+` included.
///
/// Callers testing a bare fragment must prepend the `+` separator first.
pub fn is_valid_semver_metadata(metadata: &str) -> bool {
    METADATA_RE.is_match(metadata)
}

/// Split a SemVer string into (normal, prerelease, metadata) components.
///
/// Missing prerelease or metadata come back as empty strings. When
/// `strip_separators` is true the leading `-`/`+` are removed from the
/// returned fragments; when false they are retained.
///
/// # Errors
/// Returns `InvalidFormat` if `version` is not fully valid SemVer.
pub fn parse_semver(version: &str, strip_separators: bool) -> Result<(String, String, String)> {
    let caps = FULL_RE
        .captures(version)
        .ok_or_else(|| BumpError::invalid_format("semver", version))?;

    let normal = caps[1].to_string();
    let mut prerelease = caps
        .get(2)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    let mut metadata = caps
        .get(3)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    if strip_separators {
        // Only the single leading separator goes; identifiers may themselves
        // contain hyphens.
        if !prerelease.is_empty() {
            prerelease.remove(0);
        }
        if !metadata.is_empty() {
            metadata.remove(0);
        }
    }

    Ok((normal, prerelease, metadata))
}

/// Reassemble a SemVer string from a normal version and optional fragments.
///
/// Fragments are supplied without separators and appended in fixed order:
/// normal, `-prerelease`, `+metadata`. Each present non-empty fragment is
/// validated before being appended.
///
/// # Errors
/// Returns `InvalidFormat` if the normal version or any supplied fragment
/// fails its grammar.
pub fn build_semver(normal: &str, options: &BuildOptions) -> Result<String> {
    if !is_valid_semver_normal(normal) {
        return Err(BumpError::invalid_format("semver normal version", normal));
    }

    let mut version = normal.to_string();

    if let Some(prerelease) = options.prerelease.as_deref() {
        if !prerelease.is_empty() {
            let fragment = format!("-{}", prerelease);
            if !is_valid_semver_prerelease(&fragment) {
                return Err(BumpError::invalid_format("semver prerelease", prerelease));
            }
            version.push_str(&fragment);
        }
    }

    if let Some(metadata) = options.metadata.as_deref() {
        if !metadata.is_empty() {
            let fragment = format!("+{}", metadata);
            if !is_valid_semver_metadata(&fragment) {
                return Err(BumpError::invalid_format("semver metadata", metadata));
            }
            version.push_str(&fragment);
        }
    }

    Ok(version)
}

/// Increment the trailing decimal digit run of a fragment by one.
///
/// Everything before the digit run is preserved verbatim; the run itself is
/// re-read as an integer, so leading zeros are dropped. A fragment with no
/// trailing digits reads the empty run as 0 and gets `1` appended
/// (`alpha` -> `alpha1`).
fn bump_trailing_digits(fragment: &str) -> String {
    match TRAILING_DIGITS_RE.find(fragment) {
        Some(m) => format!(
            "{}{}",
            &fragment[..m.start()],
            increment_decimal(m.as_str())
        ),
        None => format!("{}1", fragment),
    }
}

/// Add one to a decimal digit run of any length.
///
/// Carries through the digits directly so runs longer than any machine
/// integer still increment; leading zeros are dropped first, matching the
/// integer semantics of the fragment increments.
fn increment_decimal(run: &str) -> String {
    let mut digits: Vec<u8> = run
        .trim_start_matches('0')
        .bytes()
        .map(|b| b - b'0')
        .collect();

    let mut index = digits.len();
    loop {
        if index == 0 {
            digits.insert(0, 1);
            break;
        }
        index -= 1;
        if digits[index] == 9 {
            digits[index] = 0;
        } else {
            digits[index] += 1;
            break;
        }
    }

    digits.into_iter().map(|d| char::from(b'0' + d)).collect()
}

/// Increment the trailing numeric component of a prerelease fragment.
///
/// The fragment is supplied without its leading `-`.
///
/// # Errors
/// Returns `InvalidFormat` if the fragment is not a valid prerelease
/// identifier sequence.
pub fn increment_semver_prerelease(fragment: &str) -> Result<String> {
    if !is_valid_semver_prerelease(&format!("-{}", fragment)) {
        return Err(BumpError::invalid_format("semver prerelease", fragment));
    }

    Ok(bump_trailing_digits(fragment))
}

/// Increment the trailing numeric component of a metadata fragment.
///
/// Uses the real wall clock for timestamp runs; see
/// [increment_semver_metadata_with_clock].
pub fn increment_semver_metadata(fragment: &str) -> Result<String> {
    increment_semver_metadata_with_clock(fragment, &SystemClock)
}

/// Increment the trailing numeric component of a metadata fragment.
///
/// The fragment is supplied without its leading `+`. A trailing digit run
/// that forms a syntactically valid `YYYYMMDDhhmmss` timestamp is replaced
/// wholesale with the clock's current stamp rather than incremented; any
/// other run is incremented with integer semantics (`007` -> `8`).
///
/// # Errors
/// Returns `InvalidFormat` if the fragment is not a valid metadata
/// identifier sequence.
pub fn increment_semver_metadata_with_clock(fragment: &str, clock: &dyn Clock) -> Result<String> {
    if !is_valid_semver_metadata(&format!("+{}", fragment)) {
        return Err(BumpError::invalid_format("semver metadata", fragment));
    }

    if let Some(m) = TRAILING_DIGITS_RE.find(fragment) {
        if is_timestamp_run(m.as_str()) {
            return Ok(format!("{}{}", &fragment[..m.start()], clock.timestamp()));
        }
    }

    Ok(bump_trailing_digits(fragment))
}

/// Advance exactly one trailing component of a full SemVer string.
///
/// Uses the real wall clock; see [increment_semver_with_clock].
pub fn increment_semver(version: &str, prerelease: bool) -> Result<String> {
    increment_semver_with_clock(version, prerelease, &SystemClock)
}

/// Advance exactly one trailing component of a full SemVer string.
///
/// With `prerelease` false (the usual release flow) the metadata component is
/// incremented and the prerelease component passes through untouched; with
/// `prerelease` true the roles swap. The targeted component must be present,
/// since an empty fragment is not valid.
///
/// # Errors
/// Returns `InvalidFormat` if `version` is not fully valid SemVer or the
/// targeted component is missing.
pub fn increment_semver_with_clock(
    version: &str,
    prerelease: bool,
    clock: &dyn Clock,
) -> Result<String> {
    let (normal, prerelease_part, metadata_part) = parse_semver(version, true)?;

    let (new_prerelease, new_metadata) = if prerelease {
        (increment_semver_prerelease(&prerelease_part)?, metadata_part)
    } else {
        (
            prerelease_part,
            increment_semver_metadata_with_clock(&metadata_part, clock)?,
        )
    };

    build_semver(
        &normal,
        &BuildOptions {
            prerelease: Some(new_prerelease),
            metadata: Some(new_metadata),
        },
    )
}

/// Split a combined build string into (prerelease, metadata) fragments.
///
/// Build numbers concatenate the two trailing SemVer components, e.g.
/// `build.2045+1234`, `beta.193`, or `+20130313144700`. Either part may be
/// absent but not both. Returned fragments carry no separators.
///
/// # Errors
/// Returns `InvalidFormat` if the string is empty or either part fails its
/// grammar.
pub fn split_build_fragment(build: &str) -> Result<(String, String)> {
    if build.trim().is_empty() {
        return Err(BumpError::invalid_format("build fragment", build));
    }

    let (prerelease, metadata) = match build.strip_prefix('+') {
        Some(metadata) => ("", metadata),
        None => match build.split_once('+') {
            Some((prerelease, metadata)) => (prerelease, metadata),
            None => (build, ""),
        },
    };

    if !prerelease.is_empty() && !is_valid_semver_prerelease(&format!("-{}", prerelease)) {
        return Err(BumpError::invalid_format("build fragment", build));
    }
    if !metadata.is_empty() && !is_valid_semver_metadata(&format!("+{}", metadata)) {
        return Err(BumpError::invalid_format("build fragment", build));
    }

    Ok((prerelease.to_string(), metadata.to_string()))
}

/// Join a normal version and a combined build string into one SemVer string.
///
/// Build strings with prerelease data need a `-` separator; those starting
/// with `+` carry metadata only and join as-is.
pub fn join_version_build(normal: &str, build: &str) -> String {
    let separator = if build.starts_with('+') { "" } else { "-" };
    format!("{}{}{}", normal, separator, build)
}

/// True if a digit run forms a syntactically valid `YYYYMMDDhhmmss` stamp.
fn is_timestamp_run(run: &str) -> bool {
    run.len() == 14 && chrono::NaiveDateTime::parse_from_str(run, TIMESTAMP_PATTERN).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    const VALID_SEMVER: &[&str] = &[
        "1.0.1",
        "1.0.1-alpha",
        "1.0.1-b.12",
        "1.0.1-beta.123+456",
        "1.0.1-beta+exp.sha.5114f85",
    ];

    const INVALID_SEMVER: &[&str] = &["1", "1.0", "1.0.", "1.0.1-alpha.", "1.0.1-@beta"];

    #[test]
    fn test_is_valid_semver_with_valid_data() {
        for valid in VALID_SEMVER {
            assert!(is_valid_semver(valid), "expected valid: {}", valid);
        }
    }

    #[test]
    fn test_is_valid_semver_with_invalid_data() {
        for invalid in INVALID_SEMVER {
            assert!(!is_valid_semver(invalid), "expected invalid: {}", invalid);
        }
    }

    #[test]
    fn test_is_valid_semver_rejects_trailing_garbage() {
        assert!(!is_valid_semver("1.0.1-alpha+123 "));
        assert!(!is_valid_semver(" 1.0.1"));
        assert!(!is_valid_semver("1.0.1-alpha+123+456"));
    }

    #[test]
    fn test_is_valid_semver_normal() {
        for valid in ["0.7.0", "1.1.23", "1.23.456"] {
            assert!(is_valid_semver_normal(valid), "expected valid: {}", valid);
        }
        for invalid in ["0", "1", "1.0", "1.2.b", "a.b.c", "1.0.1-alpha"] {
            assert!(
                !is_valid_semver_normal(invalid),
                "expected invalid: {}",
                invalid
            );
        }
    }

    #[test]
    fn test_is_valid_semver_prerelease() {
        for valid in ["-b", "-b.b", "-beta", "-beta.123", "-123", "-0.3.7"] {
            assert!(
                is_valid_semver_prerelease(valid),
                "expected valid: {}",
                valid
            );
        }
        for invalid in ["b", "-b@", "-b1.#", "-", "-b."] {
            assert!(
                !is_valid_semver_prerelease(invalid),
                "expected invalid: {}",
                invalid
            );
        }
    }

    #[test]
    fn test_is_valid_semver_metadata() {
        for valid in ["+001", "+20130313144700", "+exp.sha.5114f85"] {
            assert!(is_valid_semver_metadata(valid), "expected valid: {}", valid);
        }
        for invalid in ["-001", "abcd12143", "+", "+a."] {
            assert!(
                !is_valid_semver_metadata(invalid),
                "expected invalid: {}",
                invalid
            );
        }
    }

    #[test]
    fn test_validators_are_idempotent() {
        for s in VALID_SEMVER.iter().chain(INVALID_SEMVER) {
            assert_eq!(is_valid_semver(s), is_valid_semver(s));
        }
    }

    #[test]
    fn test_parse_semver_strips_separators() {
        let (normal, prerelease, metadata) =
            parse_semver("1.2.1-build.2+abcd.we13", true).unwrap();
        assert_eq!(normal, "1.2.1");
        assert_eq!(prerelease, "build.2");
        assert_eq!(metadata, "abcd.we13");
    }

    #[test]
    fn test_parse_semver_keeps_separators() {
        let (normal, prerelease, metadata) =
            parse_semver("1.2.1-build.2+abcd.we13", false).unwrap();
        assert_eq!(normal, "1.2.1");
        assert_eq!(prerelease, "-build.2");
        assert_eq!(metadata, "+abcd.we13");
    }

    #[test]
    fn test_parse_semver_missing_components_are_empty() {
        let (normal, prerelease, metadata) = parse_semver("1.0.1", true).unwrap();
        assert_eq!(normal, "1.0.1");
        assert_eq!(prerelease, "");
        assert_eq!(metadata, "");

        let (_, prerelease, metadata) = parse_semver("1.0.1+456", false).unwrap();
        assert_eq!(prerelease, "");
        assert_eq!(metadata, "+456");
    }

    #[test]
    fn test_parse_semver_invalid_input() {
        let err = parse_semver("1.0.1-@beta", true).unwrap_err();
        assert!(matches!(err, BumpError::InvalidFormat { .. }));
    }

    #[test]
    fn test_build_semver_full() {
        let version = build_semver(
            "1.0.1",
            &BuildOptions {
                prerelease: Some("build.3".to_string()),
                metadata: Some("abcd.we13".to_string()),
            },
        )
        .unwrap();
        assert_eq!(version, "1.0.1-build.3+abcd.we13");
    }

    #[test]
    fn test_build_semver_normal_only() {
        assert_eq!(
            build_semver("1.0.1", &BuildOptions::default()).unwrap(),
            "1.0.1"
        );
    }

    #[test]
    fn test_build_semver_empty_fragments_are_omitted() {
        let version = build_semver(
            "1.0.1",
            &BuildOptions {
                prerelease: Some(String::new()),
                metadata: Some("456".to_string()),
            },
        )
        .unwrap();
        assert_eq!(version, "1.0.1+456");
    }

    #[test]
    fn test_build_semver_rejects_invalid_normal() {
        assert!(build_semver("1.0", &BuildOptions::default()).is_err());
        assert!(build_semver("1.0.1-alpha", &BuildOptions::default()).is_err());
    }

    #[test]
    fn test_build_semver_rejects_invalid_fragments() {
        assert!(build_semver(
            "1.0.1",
            &BuildOptions {
                prerelease: Some("b@".to_string()),
                metadata: None,
            },
        )
        .is_err());
        assert!(build_semver(
            "1.0.1",
            &BuildOptions {
                prerelease: None,
                metadata: Some("a.".to_string()),
            },
        )
        .is_err());
    }

    #[test]
    fn test_round_trip() {
        for valid in VALID_SEMVER {
            let (normal, prerelease, metadata) = parse_semver(valid, true).unwrap();
            let rebuilt = build_semver(
                &normal,
                &BuildOptions {
                    prerelease: Some(prerelease.clone()),
                    metadata: Some(metadata.clone()),
                },
            )
            .unwrap();
            let reparsed = parse_semver(&rebuilt, true).unwrap();
            assert_eq!(reparsed, (normal, prerelease, metadata));
        }
    }

    #[test]
    fn test_increment_prerelease() {
        assert_eq!(increment_semver_prerelease("build.2").unwrap(), "build.3");
        assert_eq!(increment_semver_prerelease("beta.123").unwrap(), "beta.124");
        assert_eq!(increment_semver_prerelease("0.3.7").unwrap(), "0.3.8");
    }

    #[test]
    fn test_increment_prerelease_without_digits_appends_one() {
        assert_eq!(increment_semver_prerelease("alpha").unwrap(), "alpha1");
    }

    #[test]
    fn test_increment_prerelease_carries_through_nines() {
        assert_eq!(increment_semver_prerelease("build.999").unwrap(), "build.1000");
    }

    #[test]
    fn test_increment_prerelease_beyond_machine_integers() {
        // u64::MAX and a 21-digit run are grammatically valid and must
        // increment rather than overflow or be rejected
        assert_eq!(
            increment_semver_prerelease("build.18446744073709551615").unwrap(),
            "build.18446744073709551616"
        );
        assert_eq!(
            increment_semver_prerelease("build.184467440737095516150").unwrap(),
            "build.184467440737095516151"
        );
    }

    #[test]
    fn test_increment_prerelease_invalid() {
        assert!(increment_semver_prerelease("b@").is_err());
        assert!(increment_semver_prerelease("").is_err());
    }

    #[test]
    fn test_increment_metadata_integer_run() {
        let clock = FixedClock::new("20130313144700");
        assert_eq!(
            increment_semver_metadata_with_clock("abcd.we13", &clock).unwrap(),
            "abcd.we14"
        );
    }

    #[test]
    fn test_increment_metadata_drops_leading_zeros() {
        let clock = FixedClock::new("20130313144700");
        assert_eq!(
            increment_semver_metadata_with_clock("007", &clock).unwrap(),
            "8"
        );
    }

    #[test]
    fn test_increment_metadata_refreshes_timestamp() {
        let clock = FixedClock::new("20260830120000");
        assert_eq!(
            increment_semver_metadata_with_clock("abcd.we.20130313144700", &clock).unwrap(),
            "abcd.we.20260830120000"
        );
    }

    #[test]
    fn test_increment_metadata_non_calendar_run_increments() {
        // 14 digits but month 99 is not a calendar timestamp
        let clock = FixedClock::new("20260830120000");
        assert_eq!(
            increment_semver_metadata_with_clock("20139913144700", &clock).unwrap(),
            "20139913144701"
        );
    }

    #[test]
    fn test_increment_metadata_beyond_machine_integers() {
        // 21 digits is too long to be a timestamp and too wide for u64
        let clock = FixedClock::new("20260830120000");
        assert_eq!(
            increment_semver_metadata_with_clock("sha.184467440737095516159", &clock).unwrap(),
            "sha.184467440737095516160"
        );
    }

    #[test]
    fn test_increment_metadata_all_zero_run() {
        let clock = FixedClock::new("20260830120000");
        assert_eq!(
            increment_semver_metadata_with_clock("sha.000", &clock).unwrap(),
            "sha.1"
        );
    }

    #[test]
    fn test_increment_metadata_without_digits_appends_one() {
        let clock = FixedClock::new("20260830120000");
        assert_eq!(
            increment_semver_metadata_with_clock("sha", &clock).unwrap(),
            "sha1"
        );
    }

    #[test]
    fn test_increment_metadata_invalid() {
        assert!(increment_semver_metadata("abcd we13").is_err());
        assert!(increment_semver_metadata("").is_err());
    }

    #[test]
    fn test_increment_semver_metadata_path() {
        let clock = FixedClock::new("20260830120000");
        assert_eq!(
            increment_semver_with_clock("1.0.1-alpha+123", false, &clock).unwrap(),
            "1.0.1-alpha+124"
        );
    }

    #[test]
    fn test_increment_semver_prerelease_path() {
        let clock = FixedClock::new("20260830120000");
        assert_eq!(
            increment_semver_with_clock("1.0.1-b.12+we13", true, &clock).unwrap(),
            "1.0.1-b.13+we13"
        );
    }

    #[test]
    fn test_increment_semver_timestamp_metadata() {
        let clock = FixedClock::new("20260830120000");
        assert_eq!(
            increment_semver_with_clock("1.2.1-build.2+abcd.we.20130313144700", false, &clock)
                .unwrap(),
            "1.2.1-build.2+abcd.we.20260830120000"
        );
    }

    #[test]
    fn test_increment_semver_missing_target_component_fails() {
        // no metadata to advance on the default path
        assert!(increment_semver("1.0.1-alpha", false).is_err());
        // no prerelease to advance on the prerelease path
        assert!(increment_semver("1.0.1+456", true).is_err());
    }

    #[test]
    fn test_increment_semver_invalid_input() {
        assert!(increment_semver("1.0", false).is_err());
        assert!(increment_semver("1.0.1-@beta", false).is_err());
    }

    #[test]
    fn test_split_build_fragment() {
        assert_eq!(
            split_build_fragment("build.2045+1234").unwrap(),
            ("build.2045".to_string(), "1234".to_string())
        );
        assert_eq!(
            split_build_fragment("beta.193").unwrap(),
            ("beta.193".to_string(), String::new())
        );
        assert_eq!(
            split_build_fragment("+20130313144700").unwrap(),
            (String::new(), "20130313144700".to_string())
        );
    }

    #[test]
    fn test_join_version_build() {
        assert_eq!(join_version_build("1.2.1", "build.2+abcd.we13"), "1.2.1-build.2+abcd.we13");
        assert_eq!(join_version_build("1.0.1", "+20130313144700"), "1.0.1+20130313144700");
        assert_eq!(join_version_build("1.0.1", "beta.193"), "1.0.1-beta.193");
    }

    #[test]
    fn test_split_build_fragment_invalid() {
        assert!(split_build_fragment("").is_err());
        assert!(split_build_fragment("  ").is_err());
        assert!(split_build_fragment("b@d+123").is_err());
        assert!(split_build_fragment("beta+a b").is_err());
    }
}
