// tests/config_tests.rs

use fieldreport::Config;

const VARS: [(&str, &str); 6] = [
    ("API_KEY", "test-key"),
    ("AUTH_DOMAIN", "example.firebaseapp.com"),
    ("PROJECT_ID", "example"),
    ("STORAGE_BUCKET", "example.appspot.com"),
    ("MESSAGING_SENDER_ID", "1234567890"),
    ("APP_ID", "1:1234567890:web:abc"),
];

// Single test so the env mutations stay sequential within this binary.
#[test]
fn from_env_requires_every_project_identifier() {
    for (name, value) in VARS {
        unsafe { std::env::set_var(name, value) };
    }

    let config = Config::from_env().unwrap();
    assert_eq!(config.project_id, "example");
    assert_eq!(config.storage_bucket, "example.appspot.com");

    unsafe { std::env::remove_var("STORAGE_BUCKET") };
    let err = Config::from_env().unwrap_err();
    assert!(err.to_string().contains("STORAGE_BUCKET"));
}
