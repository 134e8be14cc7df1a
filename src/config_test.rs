use super::*;

/// # Safety
/// Tests must run with `--test-threads=1` to avoid env races.
unsafe fn clear_store_env() {
    unsafe {
        std::env::remove_var("POSTBOARD_API_BASE_URL");
        std::env::remove_var("POSTBOARD_SESSION_FILE");
    }
}

// Defaults and overrides share one test so the env mutations never interleave.
#[test]
fn from_env_defaults_then_overrides() {
    unsafe { clear_store_env() };

    let cfg = StoreConfig::from_env().unwrap();
    assert_eq!(cfg, StoreConfig::default());
    assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(cfg.session_file, PathBuf::from(DEFAULT_SESSION_FILE));

    unsafe {
        std::env::set_var("POSTBOARD_API_BASE_URL", "https://posts.example.test/api/");
        std::env::set_var("POSTBOARD_SESSION_FILE", "/tmp/pb/session.json");
    }

    let cfg = StoreConfig::from_env().unwrap();
    assert_eq!(cfg.api_base_url, "https://posts.example.test/api");
    assert_eq!(cfg.session_file, PathBuf::from("/tmp/pb/session.json"));

    unsafe { clear_store_env() };
}

#[test]
fn parse_base_url_rejects_non_http() {
    let err = parse_base_url(Some("ftp://example.test")).unwrap_err().to_string();
    assert!(err.contains("must be an http(s) URL"));
}

#[test]
fn parse_base_url_blank_uses_default() {
    assert_eq!(parse_base_url(Some("   ")).unwrap(), DEFAULT_API_BASE_URL);
    assert_eq!(parse_base_url(None).unwrap(), DEFAULT_API_BASE_URL);
}
