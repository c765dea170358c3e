use super::*;

fn raw() -> RawSettings {
    RawSettings::default()
}

#[test]
fn defaults_resolve_to_local_server() {
    let settings = Settings::from_raw(raw()).expect("defaults are valid");
    assert_eq!(settings.server.public_addr.port(), DEFAULT_PUBLIC_PORT);
    assert_eq!(settings.site.title, DEFAULT_SITE_TITLE);
    assert_eq!(settings.site.public_url, DEFAULT_PUBLIC_URL);
    assert_eq!(settings.content.directory, PathBuf::from("content"));
    assert!(!settings.content.include_drafts);
    assert_eq!(settings.site.previous_articles, DEFAULT_PREVIOUS_ARTICLES);
}

#[test]
fn rejects_zero_port() {
    let mut raw = raw();
    raw.server.port = Some(0);
    let err = Settings::from_raw(raw).expect_err("port 0 must fail");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "server.port",
            ..
        }
    ));
}

#[test]
fn rejects_non_http_public_url() {
    let mut raw = raw();
    raw.site.public_url = Some("ftp://example.com".to_string());
    let err = Settings::from_raw(raw).expect_err("ftp must fail");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "site.public_url",
            ..
        }
    ));
}

#[test]
fn public_url_drops_trailing_slash() {
    let mut raw = raw();
    raw.site.public_url = Some("https://blog.example.com/".to_string());
    let settings = Settings::from_raw(raw).expect("valid url");
    assert_eq!(settings.site.public_url, "https://blog.example.com");
}

#[test]
fn blank_analytics_tag_is_treated_as_unset() {
    let mut raw = raw();
    raw.site.analytics_tag = Some("   ".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.site.analytics_tag.is_none());
}

#[test]
fn serve_overrides_take_precedence() {
    let mut raw = raw();
    raw.server.port = Some(8080);
    raw.content.include_drafts = Some(false);

    let overrides = ServeOverrides {
        server_port: Some(9090),
        content: ContentOverrides {
            content_include_drafts: Some(true),
            ..ContentOverrides::default()
        },
        ..ServeOverrides::default()
    };
    raw.apply_serve_overrides(&overrides);

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.server.public_addr.port(), 9090);
    assert!(settings.content.include_drafts);
}

#[test]
fn invalid_log_level_is_reported_by_key() {
    let mut raw = raw();
    raw.logging.level = Some("chatty".to_string());
    let err = Settings::from_raw(raw).expect_err("bogus level must fail");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "logging.level",
            ..
        }
    ));
}
