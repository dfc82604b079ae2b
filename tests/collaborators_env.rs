use buildlog_archiver::collaborators::Credentials;
use serial_test::serial;
use std::env;

#[test]
#[serial]
fn credentials_load_from_environment() {
    env::set_var("GITHUB_USER", "ci-bot");
    env::set_var("GITHUB_TOKEN", "top-secret-test-token");

    let creds = Credentials::new_from_env().expect("credentials should load");
    assert_eq!(creds.user, "ci-bot");
    assert_eq!(creds.token, "top-secret-test-token");
}

#[test]
#[serial]
fn missing_token_is_an_error_naming_the_variable() {
    env::set_var("GITHUB_USER", "ci-bot");
    env::remove_var("GITHUB_TOKEN");

    let err = Credentials::new_from_env().unwrap_err();
    assert!(err.to_string().contains("GITHUB_TOKEN"));
}

#[test]
#[serial]
fn missing_user_is_an_error_naming_the_variable() {
    env::remove_var("GITHUB_USER");
    env::remove_var("GITHUB_TOKEN");

    let err = Credentials::new_from_env().unwrap_err();
    assert!(err.to_string().contains("GITHUB_USER"));
}
