use std::io::Write;

use turnstile::config::Config;

#[test]
fn test_config_defaults_without_file() {
    let cfg = Config::load_from(None, None).unwrap();
    assert_eq!(cfg.server.listen_addr, "127.0.0.1:8080");
    assert_eq!(cfg.static_files.root, ".");
    assert_eq!(cfg.admission.max_live_connections, 5);
}

#[test]
fn test_config_listen_override() {
    let cfg = Config::load_from(None, Some("0.0.0.0:3000".to_string())).unwrap();
    assert_eq!(cfg.server.listen_addr, "0.0.0.0:3000");
}

#[test]
fn test_config_from_yaml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "server:\n  listen_addr: \"127.0.0.1:9090\"\nstatic_files:\n  root: \"/srv/www\"\nadmission:\n  max_live_connections: 2"
    )
    .unwrap();

    let cfg = Config::load_from(Some(file.path()), None).unwrap();
    assert_eq!(cfg.server.listen_addr, "127.0.0.1:9090");
    assert_eq!(cfg.static_files.root, "/srv/www");
    assert_eq!(cfg.admission.max_live_connections, 2);
}

#[test]
fn test_config_env_override_beats_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "server:\n  listen_addr: \"127.0.0.1:9090\"").unwrap();

    let cfg = Config::load_from(Some(file.path()), Some("0.0.0.0:5000".to_string())).unwrap();
    assert!(cfg.server.listen_addr.starts_with("0.0.0.0"));
    assert_eq!(cfg.static_files.root, ".");
}

#[test]
fn test_config_partial_yaml_keeps_defaults() {
    let cfg = Config::from_yaml("static_files:\n  root: public\n").unwrap();
    assert_eq!(cfg.server.listen_addr, "127.0.0.1:8080");
    assert_eq!(cfg.static_files.root, "public");
    assert_eq!(cfg.admission.max_live_connections, 5);
}

#[test]
fn test_config_rejects_zero_ceiling() {
    assert!(Config::from_yaml("admission:\n  max_live_connections: 0\n").is_err());
}

#[test]
fn test_config_missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.yaml");
    assert!(Config::load_from(Some(missing.as_path()), None).is_err());
}

#[test]
fn test_config_with_port() {
    let cfg = Config::load_from(None, Some("0.0.0.0:3000".to_string()))
        .unwrap()
        .with_port(8081);
    assert_eq!(cfg.server.listen_addr, "0.0.0.0:8081");
}
