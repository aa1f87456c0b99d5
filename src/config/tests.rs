use clap::Parser;

use super::*;

#[test]
fn defaults_match_the_shipped_configuration() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.server.addr.port(), DEFAULT_PORT);
    assert_eq!(settings.cache.static_ttl, Duration::from_secs(3600));
    assert_eq!(settings.cache.dynamic_ttl, Duration::from_secs(300));
    assert_eq!(settings.site.brand, "Aitoonic");
    assert_eq!(settings.export.output_dir, PathBuf::from("dist/static"));
    assert!(settings.database.url.is_none());
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());
    raw.cache.dynamic_ttl_seconds = Some(60);

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        cache_dynamic_ttl_seconds: Some(30),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert_eq!(settings.cache.dynamic_ttl, Duration::from_secs(30));
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn zero_ttl_is_rejected() {
    let mut raw = RawSettings::default();
    raw.cache.static_ttl_seconds = Some(0);

    match Settings::from_raw(raw) {
        Err(LoadError::Invalid { key, .. }) => assert_eq!(key, "cache.static_ttl_seconds"),
        other => panic!("expected invalid ttl, got {other:?}"),
    }
}

#[test]
fn public_url_must_be_http() {
    let mut raw = RawSettings::default();
    raw.site.public_url = Some("ftp://aitoonic.com".to_string());

    match Settings::from_raw(raw) {
        Err(LoadError::Invalid { key, .. }) => assert_eq!(key, "site.public_url"),
        other => panic!("expected invalid url, got {other:?}"),
    }
}

#[test]
fn blank_database_url_is_treated_as_missing() {
    let mut raw = RawSettings::default();
    raw.database.url = Some("   ".to_string());

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.database.url.is_none());
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["aitoonic"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn parse_export_static_arguments() {
    let args = CliArgs::parse_from([
        "aitoonic",
        "export-static",
        "--database-url",
        "postgres://example",
        "--output-dir",
        "/tmp/site",
        "--site-brand",
        "Toolbox",
    ]);

    match args.command.expect("export command") {
        Command::ExportStatic(export) => {
            assert_eq!(
                export.database.database_url.as_deref(),
                Some("postgres://example")
            );
            assert_eq!(
                export.output_dir.as_deref(),
                Some(std::path::Path::new("/tmp/site"))
            );

            let mut raw = RawSettings::default();
            raw.apply_export_overrides(&export);
            let settings = Settings::from_raw(raw).expect("valid settings");
            assert_eq!(settings.site.brand, "Toolbox");
            assert_eq!(settings.export.output_dir, PathBuf::from("/tmp/site"));
        }
        _ => panic!("wrong command parsed"),
    }
}
