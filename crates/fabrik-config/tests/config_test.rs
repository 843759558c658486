// Integration tests for profile loading and translation.
#![allow(clippy::unwrap_used)]

use std::path::Path;
use std::time::Duration;

use figment::Jail;
use pretty_assertions::assert_eq;
use secrecy::ExposeSecret;

use fabrik_api::{ApiFamily, Credentials, TlsMode};
use fabrik_config::{
    Config, ConfigError, Profile, load_config_from, profile_to_settings, resolve_token,
    save_config_to,
};

const CONFIG: &str = r#"
default_profile = "lab"

[defaults]
request_timeout = 45
create_timeout = "20m"

[profiles.lab]
endpoint = "https://lab.example.net"
token = "plain-token"
update_timeout = "15m"

[profiles.metal]
endpoint = "https://metal.example.net"
api = "metal"
token = "metal-token"
insecure = true
"#;

fn bearer(creds: &Credentials) -> &str {
    match creds {
        Credentials::Bearer(token) => token.expose_secret(),
        Credentials::AuthToken(_) => panic!("expected a bearer token"),
    }
}

// ── Loading ─────────────────────────────────────────────────────────

#[test]
fn toml_values_layer_over_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", CONFIG)?;
        let cfg = load_config_from(Path::new("config.toml")).unwrap();

        let (name, profile) = cfg.profile(None).unwrap();
        assert_eq!(name, "lab");
        assert_eq!(profile.api, "fabric");

        let settings = profile_to_settings(&cfg, profile, name).unwrap();
        assert_eq!(settings.endpoint.as_str(), "https://lab.example.net/");
        assert_eq!(settings.family, ApiFamily::Fabric);
        assert_eq!(bearer(&settings.credentials), "plain-token");
        assert_eq!(settings.transport.timeout, Duration::from_secs(45));
        assert_eq!(settings.transport.tls, TlsMode::System);
        assert_eq!(settings.lifecycle.timeouts.create, Duration::from_secs(20 * 60));
        assert_eq!(settings.lifecycle.timeouts.update, Duration::from_secs(15 * 60));
        assert_eq!(settings.lifecycle.timeouts.delete, Duration::from_secs(10 * 60));
        assert_eq!(settings.lifecycle.polling.delay, Duration::from_secs(30));
        Ok(())
    });
}

#[test]
fn environment_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", CONFIG)?;
        jail.set_env("FABRIK_DEFAULTS__POLL_DELAY", "5s");
        jail.set_env("FABRIK_PROFILES__LAB__ENDPOINT", "https://override.example.net");
        let cfg = load_config_from(Path::new("config.toml")).unwrap();

        let (name, profile) = cfg.profile(Some("lab")).unwrap();
        assert_eq!(profile.endpoint, "https://override.example.net");

        let settings = profile_to_settings(&cfg, profile, name).unwrap();
        assert_eq!(settings.lifecycle.polling.delay, Duration::from_secs(5));
        Ok(())
    });
}

#[test]
fn missing_file_yields_defaults() {
    Jail::expect_with(|_jail| {
        let cfg = load_config_from(Path::new("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert!(cfg.profiles.is_empty());
        assert!(matches!(
            cfg.profile(None),
            Err(ConfigError::UnknownProfile { ref profile }) if profile == "default"
        ));
        Ok(())
    });
}

#[test]
fn metal_profile_uses_auth_token_and_insecure_tls() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", CONFIG)?;
        let cfg = load_config_from(Path::new("config.toml")).unwrap();
        let (name, profile) = cfg.profile(Some("metal")).unwrap();

        let settings = profile_to_settings(&cfg, profile, name).unwrap();
        assert_eq!(settings.family, ApiFamily::Metal);
        assert!(matches!(settings.credentials, Credentials::AuthToken(_)));
        assert_eq!(settings.transport.tls, TlsMode::DangerAcceptInvalid);
        assert!(settings.client().is_ok());
        Ok(())
    });
}

// ── Validation ──────────────────────────────────────────────────────

#[test]
fn invalid_values_are_reported_per_field() {
    let cfg = Config::default();
    let cases = [
        (
            Profile {
                endpoint: "not a url".into(),
                api: "fabric".into(),
                token: Some("t".into()),
                ..Profile::default()
            },
            "endpoint",
        ),
        (
            Profile {
                endpoint: "https://api.example.net".into(),
                api: "network-edge".into(),
                token: Some("t".into()),
                ..Profile::default()
            },
            "api",
        ),
        (
            Profile {
                endpoint: "https://api.example.net".into(),
                api: "fabric".into(),
                token: Some("t".into()),
                delete_timeout: Some("eventually".into()),
                ..Profile::default()
            },
            "delete_timeout",
        ),
    ];

    for (profile, expected) in cases {
        match profile_to_settings(&cfg, &profile, "bad") {
            Err(ConfigError::Validation { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected validation error on {expected}, got {other:?}"),
        }
    }
}

// ── Credentials ─────────────────────────────────────────────────────

#[test]
fn token_env_wins_over_plaintext() {
    Jail::expect_with(|jail| {
        jail.set_env("FABRIK_TEST_LAB_TOKEN", "from-env");
        let profile = Profile {
            token_env: Some("FABRIK_TEST_LAB_TOKEN".into()),
            token: Some("from-file".into()),
            ..Profile::default()
        };
        let token = resolve_token(&profile, "fabrik-test-env").unwrap();
        assert_eq!(token.expose_secret(), "from-env");
        Ok(())
    });
}

#[test]
fn empty_token_env_falls_through() {
    Jail::expect_with(|jail| {
        jail.set_env("FABRIK_TEST_EMPTY_TOKEN", "");
        let profile = Profile {
            token_env: Some("FABRIK_TEST_EMPTY_TOKEN".into()),
            token: Some("from-file".into()),
            ..Profile::default()
        };
        let token = resolve_token(&profile, "fabrik-test-empty").unwrap();
        assert_eq!(token.expose_secret(), "from-file");
        Ok(())
    });
}

#[test]
fn no_token_anywhere_is_an_error() {
    let profile = Profile {
        token_env: Some("FABRIK_TEST_UNSET_TOKEN".into()),
        ..Profile::default()
    };
    let err = resolve_token(&profile, "fabrik-test-none").unwrap_err();
    assert!(matches!(err, ConfigError::NoCredentials { ref profile } if profile == "fabrik-test-none"));
}

// ── Saving ──────────────────────────────────────────────────────────

#[test]
fn saved_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut cfg = Config::default();
    cfg.profiles.insert(
        "default".into(),
        Profile {
            endpoint: "https://api.example.net".into(),
            api: "fabric".into(),
            token_env: Some("FABRIK_TOKEN".into()),
            poll_delay: Some("10s".into()),
            ..Profile::default()
        },
    );
    save_config_to(&cfg, &path).unwrap();

    let loaded = load_config_from(&path).unwrap();
    let (_, profile) = loaded.profile(None).unwrap();
    assert_eq!(profile.endpoint, "https://api.example.net");
    assert_eq!(profile.token_env.as_deref(), Some("FABRIK_TOKEN"));
    assert_eq!(profile.poll_delay.as_deref(), Some("10s"));
    assert_eq!(loaded.defaults.update_timeout, "10m");
}
