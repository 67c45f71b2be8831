use secrecy::SecretString;
use session_gate::{
    config::ACCESS_TOKEN_KEY_ENV, navigation::RecordingNavigator, ConfigError, Gate,
    GateConfig, GateDecision, MemoryStore,
};
use std::collections::HashMap;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn env_with(key: Option<&str>) -> impl Fn(&str) -> Option<String> {
    let mut vars = HashMap::new();
    if let Some(value) = key {
        vars.insert(ACCESS_TOKEN_KEY_ENV.to_string(), value.to_string());
    }
    move |name: &str| vars.get(name).cloned()
}

#[test]
fn scenario_a_missing_token_redirects_to_login() -> TestResult {
    let config = GateConfig::from_lookup(env_with(Some("ACCESS_TOKEN")))?;
    let gate = Gate::new(config, MemoryStore::new());
    let navigator = RecordingNavigator::new();

    let rendered = gate.guard("<Dashboard />", &navigator)?;

    assert_eq!(rendered, None);
    assert_eq!(navigator.redirects(), vec!["/login".to_string()]);
    Ok(())
}

#[test]
fn scenario_b_stored_token_renders_children_verbatim() -> TestResult {
    let config = GateConfig::from_lookup(env_with(Some("ACCESS_TOKEN")))?;
    let store = MemoryStore::new();
    store.insert(config.token_key(), SecretString::from("xyz123"))?;
    let gate = Gate::new(config, store);
    let navigator = RecordingNavigator::new();

    let rendered = gate.guard("<Dashboard />", &navigator)?;

    assert_eq!(rendered, Some("<Dashboard />"));
    assert!(navigator.redirects().is_empty());
    Ok(())
}

#[test]
fn scenario_c_unset_or_empty_key_fails_before_any_render() {
    assert_eq!(
        GateConfig::from_lookup(env_with(None)),
        Err(ConfigError::MissingKey(ACCESS_TOKEN_KEY_ENV.to_string()))
    );
    assert_eq!(
        GateConfig::from_lookup(env_with(Some(""))),
        Err(ConfigError::EmptyKey(ACCESS_TOKEN_KEY_ENV.to_string()))
    );
}

#[test]
fn consecutive_renders_agree() -> TestResult {
    let config = GateConfig::from_lookup(env_with(Some("ACCESS_TOKEN")))?;
    let gate = Gate::new(config, MemoryStore::new());

    let first = gate.render(vec![1, 2, 3])?;
    let second = gate.render(vec![1, 2, 3])?;

    assert_eq!(first, second);
    assert_eq!(first, GateDecision::RedirectTo("/login".to_string()));
    Ok(())
}

#[test]
fn login_then_logout_flips_the_decision() -> TestResult {
    let config = GateConfig::from_lookup(env_with(Some("ACCESS_TOKEN")))?;
    let key = config.token_key().clone();
    let store = std::sync::Arc::new(MemoryStore::new());
    let gate = Gate::new(config, std::sync::Arc::clone(&store));

    assert!(!gate.render(())?.is_render());
    store.insert(&key, SecretString::from("xyz123"))?;
    assert!(gate.render(())?.is_render());
    store.remove(&key)?;
    assert!(!gate.render(())?.is_render());
    Ok(())
}
