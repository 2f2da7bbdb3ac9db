use keypin_types::{CanonicalHost, HostNameError, PinError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const LABEL_63: &str = "123456789-123456789-123456789-123456789-123456789-123456789-123";

fn host_255() -> String {
    [LABEL_63; 4].join(".")
}

fn reason(raw: &str) -> HostNameError {
    match CanonicalHost::parse(raw) {
        Err(PinError::InvalidHostName { reason, .. }) => reason,
        other => panic!("expected invalid host name for {raw:?}, got {other:?}"),
    }
}

// ── Valid host names ─────────────────────────────────────────────

#[test]
fn accepts_plain_domains() {
    for host in [
        "domain.com",
        "my-domain.com",
        "section4.domain.info",
        "44.domain44.info",
        "very.long.long.long.long.long.long.long.domain.com",
        "host",
        "127.0.0.z",
    ] {
        assert!(CanonicalHost::parse(host).is_ok(), "{host} should be valid");
    }
}

#[test]
fn accepts_unicode_labels_verbatim() {
    for host in ["новости.ру", "самые-последние.новости.рус", "最新消息.中国"] {
        let parsed = CanonicalHost::parse(host).unwrap();
        assert_eq!(parsed.as_str(), host);
    }
}

#[test]
fn accepts_max_label_length() {
    let host = format!("{LABEL_63}.com");
    assert!(CanonicalHost::parse(&host).is_ok());
}

#[test]
fn accepts_max_host_length() {
    let host = host_255();
    assert_eq!(host.len(), 255);
    assert!(CanonicalHost::parse(&host).is_ok());
}

#[test]
fn folds_ascii_case_and_trailing_dot() {
    let host = CanonicalHost::parse("Test.Example.COM.").unwrap();
    assert_eq!(host.as_str(), "test.example.com");
    assert_eq!(host, CanonicalHost::parse("test.example.com").unwrap());
}

// ── Invalid host names ───────────────────────────────────────────

#[test]
fn rejects_ports_schemes_and_paths() {
    for host in [
        "domain.com:300",
        "http://domain.com",
        "domain.com:",
        "domain.com/",
        "новости.ру:",
        "новости.ру/",
        "user@domain.com",
        "domain.com?q",
        "*.example.com",
        "exa!mple.com",
        "a$b.com",
        "<x>.com",
        "a,b.com",
        "domain.com\u{3000}",
    ] {
        assert!(
            matches!(reason(host), HostNameError::ForbiddenCharacter(_)),
            "{host} should be rejected"
        );
    }
}

#[test]
fn wildcard_reports_offending_character() {
    assert_eq!(reason("*.example.com"), HostNameError::ForbiddenCharacter('*'));
    assert_eq!(reason("exa!mple.com"), HostNameError::ForbiddenCharacter('!'));
}

#[test]
fn accepts_inner_underscore() {
    let host = CanonicalHost::parse("my_host.example.com").unwrap();
    assert_eq!(host.as_str(), "my_host.example.com");
}

#[test]
fn rejects_hyphen_at_label_edges() {
    assert_eq!(
        reason("-domain.com"),
        HostNameError::LeadingHyphen("-domain".into())
    );
    assert_eq!(
        reason("domain-.com"),
        HostNameError::TrailingHyphen("domain-".into())
    );
}

#[test]
fn rejects_leading_underscore() {
    assert!(matches!(
        reason("_http.sctp.www.example.com"),
        HostNameError::LeadingUnderscore(_)
    ));
    assert!(matches!(
        reason("http.sctp._www.example.com"),
        HostNameError::LeadingUnderscore(_)
    ));
}

#[test]
fn rejects_label_over_63_chars() {
    let host = format!("{LABEL_63}4.com");
    assert!(matches!(
        reason(&host),
        HostNameError::LabelTooLong { len: 64, .. }
    ));
}

#[test]
fn rejects_host_over_255_chars() {
    let host = format!("{}.com", &host_255()[3..]);
    assert_eq!(reason(&host), HostNameError::TooLong(256));
}

#[test]
fn rejects_ipv6_literals() {
    for host in ["FE80:0000:0000:0000:0202:B3FF:FE1E:8329", "[2001:db8:0:1]:80", "::1"] {
        assert!(CanonicalHost::parse(host).is_err(), "{host} should be rejected");
    }
}

#[test]
fn rejects_ipv4_like_names() {
    for host in [
        "127.0.0.1",
        "68.44.222.12",
        "256.0.0.1",
        "127.0.0.1.1",
        "127.0.0",
        "127.0.0.",
        "127.0.0.299",
    ] {
        assert_eq!(reason(host), HostNameError::IpAddress, "{host}");
    }
}

#[test]
fn rejects_empty_and_empty_labels() {
    assert_eq!(reason(""), HostNameError::Empty);
    assert_eq!(reason("."), HostNameError::Empty);
    assert_eq!(reason("a..com"), HostNameError::EmptyLabel);
    assert_eq!(reason(".com"), HostNameError::EmptyLabel);
}

#[test]
fn error_keeps_raw_input() {
    let err = CanonicalHost::parse("Bad-.Com").unwrap_err();
    assert!(err.is_invalid_host());
    assert!(format!("{err}").contains("Bad-.Com"));
}

// ── Ancestors ────────────────────────────────────────────────────

#[test]
fn ancestors_nearest_first() {
    let host = CanonicalHost::parse("a.b.example.com").unwrap();
    let ancestors: Vec<&str> = host.ancestors().collect();
    assert_eq!(ancestors, vec!["b.example.com", "example.com", "com"]);
}

#[test]
fn subdomain_relation_is_strict() {
    let parent = CanonicalHost::parse("example.com").unwrap();
    let child = CanonicalHost::parse("sub.example.com").unwrap();
    let lookalike = CanonicalHost::parse("notexample.com").unwrap();

    assert!(child.is_subdomain_of(&parent));
    assert!(!parent.is_subdomain_of(&parent));
    assert!(!lookalike.is_subdomain_of(&parent));
}

// ── Conversions ──────────────────────────────────────────────────

#[test]
fn from_str_and_display() {
    let host: CanonicalHost = "Example.com".parse().unwrap();
    assert_eq!(host.to_string(), "example.com");
}

#[test]
fn serde_rejects_invalid_host() {
    let ok: CanonicalHost = serde_json::from_str(r#""Example.com""#).unwrap();
    assert_eq!(ok.as_str(), "example.com");
    assert!(serde_json::from_str::<CanonicalHost>(r#""127.0.0.1""#).is_err());
}

// ── Properties ───────────────────────────────────────────────────

fn label_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9-]{0,20}[a-z0-9]").unwrap()
}

proptest! {
    /// Canonicalization is idempotent.
    #[test]
    fn canonical_form_is_stable(labels in prop::collection::vec(label_strategy(), 1..6)) {
        let raw = labels.join(".").to_uppercase();
        let once = CanonicalHost::parse(&raw).unwrap();
        let twice = CanonicalHost::parse(once.as_str()).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// The ancestor count is one less than the label count.
    #[test]
    fn ancestors_drop_one_label_each(labels in prop::collection::vec(label_strategy(), 1..6)) {
        let host = CanonicalHost::parse(&labels.join(".")).unwrap();
        prop_assert_eq!(host.ancestors().count(), labels.len() - 1);
        for ancestor in host.ancestors() {
            let suffix = format!(".{ancestor}");
            prop_assert!(host.as_str().ends_with(&suffix));
        }
    }

    /// Dotted-decimal strings are never accepted.
    #[test]
    fn dotted_decimal_is_rejected(parts in prop::collection::vec(0u16..1000, 1..6)) {
        let raw = parts.iter().map(u16::to_string).collect::<Vec<_>>().join(".");
        prop_assert!(CanonicalHost::parse(&raw).is_err());
    }
}
