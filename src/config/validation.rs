//! Configuration validation.
//!
//! # Responsibilities
//! - Type checks for every known gateway field (boolean, number, string, object)
//! - Value ranges and enumerated sets (time units, synchronizer mode, log levels)
//! - Cross-field rules (quota interval once a time unit is set, proxy tunnel)
//!
//! # Design Decisions
//! - Sections are checked in a fixed order and the first violation wins
//! - Validation is a pure function: &Value → Result<(), ValidationError>
//! - Runs before config is accepted into the system

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::value::Field;

/// Minimum refresh/retry interval for remote config sync, in milliseconds.
pub const MIN_SYNC_INTERVAL_MS: f64 = 3_600_000.0;

const TIME_UNITS: &[&str] = &["hour", "minute", "day", "week", "month"];
const QUOTAS_KEYS: &[&str] = &["bufferSize", "useRedis", "useDebugMpId", "failOpen", "excludeUrls"];
const BUFFER_SIZE_KEYS: &[&str] = &["hour", "minute", "day", "week", "month", "default"];
const LOG_TARGET_LEVELS: &[&str] = &["error", "warn", "trace", "info", "debug"];
const SYNCHRONIZER_MODES: &[f64] = &[0.0, 1.0, 2.0];

/// Proxy environment variables, in lookup order.
pub const PROXY_ENV_VARS: &[&str] = &["HTTPS_PROXY", "https_proxy", "HTTP_PROXY", "http_proxy"];

/// Category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Value present but of the wrong primitive type.
    Type,
    /// Correct type, outside the allowed bounds or enumerated set.
    Range,
    /// A field required by a sibling is absent.
    Missing,
    /// Individually valid fields that contradict each other.
    Conflict,
}

/// The first rule a configuration violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    kind: ErrorKind,
    path: String,
    message: String,
}

impl ValidationError {
    pub fn new(kind: ErrorKind, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Fully qualified field path, e.g. `config.edgemicro.port`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn not_a_number(path: &str) -> Self {
        Self::new(ErrorKind::Type, path, format!("{} is not a number", path))
    }

    fn not_a_string(path: &str) -> Self {
        Self::new(ErrorKind::Type, path, format!("{} is not a string", path))
    }

    fn not_an_object(path: &str) -> Self {
        Self::new(ErrorKind::Type, path, format!("{} is not an object", path))
    }

    fn not_a_boolean(path: &str) -> Self {
        Self::new(ErrorKind::Type, path, format!("{} should be a boolean", path))
    }

    fn not_defined(path: &str) -> Self {
        Self::new(ErrorKind::Missing, path, format!("{} is not defined", path))
    }

    fn invalid(path: &str) -> Self {
        Self::new(ErrorKind::Range, path, format!("{} is invalid", path))
    }

    fn invalid_value(path: &str, value: Field<'_>, valid: &[&str]) -> Self {
        Self::new(
            ErrorKind::Range,
            path,
            format!("invalid value for {}: {}, valid values are {}", path, value, join_choices(valid)),
        )
    }

    fn invalid_key(path: &str, key: &str, valid: &[&str]) -> Self {
        Self::new(
            ErrorKind::Range,
            format!("{}.{}", path, key),
            format!("invalid value in {}: {}, valid values are {}", path, key, join_choices(valid)),
        )
    }
}

/// Formats `["a", "b", "c"]` as `a, b & c`.
fn join_choices<S: AsRef<str>>(choices: &[S]) -> String {
    match choices {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(|choice| choice.as_ref()).collect();
            format!("{} & {}", head.join(", "), last.as_ref())
        }
    }
}

/// Proxy URL resolved from the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyEnv {
    pub url: Option<String>,
}

impl ProxyEnv {
    /// Read the proxy variables from the current process.
    pub fn from_process() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Resolve using an arbitrary variable lookup. The first non-empty
    /// variable in [`PROXY_ENV_VARS`] order wins.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = PROXY_ENV_VARS
            .iter()
            .filter_map(|&name| lookup(name))
            .find(|value| !value.trim().is_empty());
        Self { url }
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: Some(url.into()) }
    }
}

/// Tunable inputs to validation that are not part of the config tree.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidatorOptions {
    /// Accepted values of `accesscontrol.noRuleMatchAction`.
    pub no_rule_match_actions: Vec<String>,

    /// Proxy URL fallback for `edgemicro.proxy`.
    pub proxy_env: ProxyEnv,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            no_rule_match_actions: vec!["allow".to_string(), "deny".to_string(), "log".to_string()],
            proxy_env: ProxyEnv::default(),
        }
    }
}

/// Gateway configuration validator.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    options: ValidatorOptions,
}

type Check = Result<(), ValidationError>;

impl Validator {
    pub fn new(options: ValidatorOptions) -> Self {
        Self { options }
    }

    /// Default options with the proxy fallback taken from the environment.
    pub fn from_env() -> Self {
        Self::new(ValidatorOptions {
            proxy_env: ProxyEnv::from_process(),
            ..ValidatorOptions::default()
        })
    }

    /// Check `config`, stopping at the first violated rule.
    pub fn validate(&self, config: &serde_json::Value) -> Check {
        let root = Field::root(config);
        if root.as_object().is_none() {
            return Err(ValidationError::not_an_object("config"));
        }

        let edgemicro = root.get("edgemicro");
        let edge_config = root.get("edge_config");

        check_quota(root.get("quota"))?;
        check_spike_arrest(root.get("spikearrest"))?;
        check_port(edgemicro.get("port"))?;
        check_sync_intervals(edge_config)?;
        check_quotas(root.get("quotas"))?;

        expect_bool(edgemicro.at(&["logging", "to_console"]), "config.edgemicro.logging.to_console")?;
        expect_string(edgemicro.at(&["plugins", "excludeUrls"]), "config.edgemicro.plugins.excludeUrls")?;
        expect_bool(
            edgemicro.at(&["plugins", "disableExcUrlsCache"]),
            "config.edgemicro.plugins.disableExcUrlsCache",
        )?;

        for name in ["keep_alive_timeout", "headers_timeout"] {
            let path = format!("config.edgemicro.{}", name);
            if let Some(value) = expect_number(edgemicro.get(name), &path)? {
                if value <= 0.0 {
                    return Err(ValidationError::new(
                        ErrorKind::Range,
                        path.as_str(),
                        format!("{} should be greater than 0", path),
                    ));
                }
            }
        }

        check_redis(edgemicro)?;

        expect_bool(edge_config.get("redisBasedConfigCache"), "config.edge_config.redisBasedConfigCache")?;
        check_synchronizer_mode(edge_config.get("synchronizerMode"))?;
        check_analytics(edgemicro.get("enableAnalytics"), root.get("analytics"))?;

        let log_target = edgemicro.get("logTargetErrorsAs");
        if log_target.is_present() && !log_target.as_str().is_some_and(|s| LOG_TARGET_LEVELS.contains(&s)) {
            return Err(ValidationError::invalid_value(
                "config.edgemicro.logTargetErrorsAs",
                log_target,
                LOG_TARGET_LEVELS,
            ));
        }

        self.check_no_rule_match_action(root.at(&["accesscontrol", "noRuleMatchAction"]))?;

        expect_bool(edgemicro.get("enable_GET_req_body"), "config.edgemicro.enable_GET_req_body")?;

        self.check_proxy(edgemicro.get("proxy"))
    }

    fn check_no_rule_match_action(&self, action: Field<'_>) -> Check {
        const PATH: &str = "config.accesscontrol.noRuleMatchAction";
        let Some(value) = expect_string(action, PATH)? else {
            return Ok(());
        };
        let allowed = &self.options.no_rule_match_actions;
        if allowed.iter().any(|a| a == value) {
            return Ok(());
        }
        Err(ValidationError::new(
            ErrorKind::Range,
            PATH,
            format!("invalid value for {}: {}, valid values are {}", PATH, value, join_choices(allowed.as_slice())),
        ))
    }

    fn check_proxy(&self, proxy: Field<'_>) -> Check {
        if !proxy.is_defined() {
            return Ok(());
        }

        let configured_url = expect_string(proxy.get("url"), "config.edgemicro.proxy.url")?;
        let url_resolvable = configured_url.is_some_and(|u| !u.trim().is_empty())
            || self.options.proxy_env.url.is_some();

        let enabled = proxy.get("enabled");
        if !enabled.is_present() && !url_resolvable {
            return Err(ValidationError::new(
                ErrorKind::Missing,
                "config.edgemicro.proxy",
                "config.edgemicro.proxy must be defined with enabled or a url (HTTP_PROXY / HTTPS_PROXY)",
            ));
        }
        let enabled = expect_bool(enabled, "config.edgemicro.proxy.enabled")?;

        let tunnel = proxy.get("tunnel");
        if tunnel.is_present() {
            if enabled != Some(true) {
                return Err(ValidationError::new(
                    ErrorKind::Conflict,
                    "config.edgemicro.proxy.tunnel",
                    "config.edgemicro.proxy.tunnel requires config.edgemicro.proxy.enabled to be true",
                ));
            }
            if !url_resolvable {
                return Err(ValidationError::new(
                    ErrorKind::Missing,
                    "config.edgemicro.proxy.url",
                    "config.edgemicro.proxy.url must be defined when config.edgemicro.proxy.tunnel is set",
                ));
            }
            expect_bool(tunnel, "config.edgemicro.proxy.tunnel")?;
        }
        Ok(())
    }
}

/// Present fields must be literal booleans; `null` fails like any other type.
fn expect_bool(field: Field<'_>, path: &str) -> Result<Option<bool>, ValidationError> {
    match field {
        Field::Absent => Ok(None),
        Field::Bool(b) => Ok(Some(b)),
        _ => Err(ValidationError::not_a_boolean(path)),
    }
}

fn expect_number(field: Field<'_>, path: &str) -> Result<Option<f64>, ValidationError> {
    match field {
        Field::Absent => Ok(None),
        Field::Number(n) => Ok(Some(n)),
        _ => Err(ValidationError::not_a_number(path)),
    }
}

fn expect_string<'a>(field: Field<'a>, path: &str) -> Result<Option<&'a str>, ValidationError> {
    match field {
        Field::Absent => Ok(None),
        Field::String(s) => Ok(Some(s)),
        _ => Err(ValidationError::not_a_string(path)),
    }
}

/// Required number strictly greater than zero.
fn require_positive(field: Field<'_>, path: &str) -> Check {
    if !field.is_defined() {
        return Err(ValidationError::not_defined(path));
    }
    match field.as_number() {
        None => Err(ValidationError::not_a_number(path)),
        Some(n) if n <= 0.0 => Err(ValidationError::invalid(path)),
        Some(_) => Ok(()),
    }
}

fn check_time_unit(field: Field<'_>, path: &str) -> Check {
    match field.as_str() {
        Some(unit) if TIME_UNITS.contains(&unit) => Ok(()),
        _ => Err(ValidationError::invalid_value(path, field, TIME_UNITS)),
    }
}

fn check_quota(quota: Field<'_>) -> Check {
    if !quota.is_defined() {
        return Ok(());
    }
    let time_unit = quota.get("timeUnit");
    if time_unit.is_present() {
        check_time_unit(time_unit, "config.quota.timeUnit")?;
        require_positive(quota.get("interval"), "config.quota.interval")?;
    }
    require_positive(quota.get("allow"), "config.quota.allow")
}

fn check_spike_arrest(spike: Field<'_>) -> Check {
    if !spike.is_defined() {
        return Ok(());
    }
    let time_unit = spike.get("timeUnit");
    if time_unit.is_present() {
        check_time_unit(time_unit, "config.spikearrest.timeUnit")?;
        require_positive(spike.get("bufferSize"), "config.spikearrest.bufferSize")?;
    }
    require_positive(spike.get("allow"), "config.spikearrest.allow")
}

fn check_port(port: Field<'_>) -> Check {
    const PATH: &str = "config.edgemicro.port";
    if !port.is_present() || port.as_number().is_some() {
        return Ok(());
    }
    Err(ValidationError::new(
        ErrorKind::Type,
        PATH,
        format!("invalid value for {}: {} is not a number", PATH, port),
    ))
}

fn check_sync_intervals(edge_config: Field<'_>) -> Check {
    for name in ["refresh_interval", "retry_interval"] {
        let path = format!("config.edge_config.{}", name);
        if let Some(value) = expect_number(edge_config.get(name), &path)? {
            if value < MIN_SYNC_INTERVAL_MS {
                return Err(ValidationError::new(
                    ErrorKind::Range,
                    path.as_str(),
                    format!("{} is too small (min 1h)", path),
                ));
            }
        }
    }
    Ok(())
}

fn check_quotas(quotas: Field<'_>) -> Check {
    const PATH: &str = "config.quotas";
    if !quotas.is_present() {
        return Ok(());
    }
    let Some(entries) = quotas.as_object() else {
        return Err(ValidationError::not_an_object(PATH));
    };
    if let Some(unknown) = entries.keys().find(|k| !QUOTAS_KEYS.contains(&k.as_str())) {
        return Err(ValidationError::invalid_key(PATH, unknown, QUOTAS_KEYS));
    }

    let buffer_size = quotas.get("bufferSize");
    if buffer_size.is_present() {
        check_quota_buffer_size(buffer_size)?;
    }

    for name in ["useRedis", "useDebugMpId", "failOpen"] {
        expect_bool(quotas.get(name), &format!("{}.{}", PATH, name))?;
    }
    expect_string(quotas.get("excludeUrls"), "config.quotas.excludeUrls")?;
    Ok(())
}

fn check_quota_buffer_size(buffer_size: Field<'_>) -> Check {
    const PATH: &str = "config.quotas.bufferSize";
    let Some(entries) = buffer_size.as_object() else {
        return Err(ValidationError::not_an_object(PATH));
    };
    if let Some(unknown) = entries.keys().find(|k| !BUFFER_SIZE_KEYS.contains(&k.as_str())) {
        return Err(ValidationError::invalid_key(PATH, unknown, BUFFER_SIZE_KEYS));
    }
    for unit in BUFFER_SIZE_KEYS {
        let path = format!("{}.{}", PATH, unit);
        if let Some(size) = expect_number(buffer_size.get(unit), &path)? {
            if size < 0.0 {
                return Err(ValidationError::new(
                    ErrorKind::Range,
                    path.as_str(),
                    format!("{} must be greater than or equal to zero", path),
                ));
            }
        }
    }
    Ok(())
}

fn check_redis(edgemicro: Field<'_>) -> Check {
    expect_string(edgemicro.get("redisHost"), "config.edgemicro.redisHost")?;
    expect_number(edgemicro.get("redisPort"), "config.edgemicro.redisPort")?;
    if let Some(db) = expect_number(edgemicro.get("redisDb"), "config.edgemicro.redisDb")? {
        if db < 0.0 {
            return Err(ValidationError::new(
                ErrorKind::Range,
                "config.edgemicro.redisDb",
                "config.edgemicro.redisDb must be >= 0",
            ));
        }
    }
    expect_string(edgemicro.get("redisPassword"), "config.edgemicro.redisPassword")?;
    Ok(())
}

fn check_synchronizer_mode(mode: Field<'_>) -> Check {
    const PATH: &str = "config.edge_config.synchronizerMode";
    match expect_number(mode, PATH)? {
        Some(value) if !SYNCHRONIZER_MODES.contains(&value) => Err(ValidationError::new(
            ErrorKind::Range,
            PATH,
            format!("{} should be either 0 | 1 | 2", PATH),
        )),
        _ => Ok(()),
    }
}

fn check_analytics(enable_analytics: Field<'_>, analytics: Field<'_>) -> Check {
    const PATH: &str = "config.analytics.bufferSize";
    if expect_bool(enable_analytics, "config.edgemicro.enableAnalytics")? != Some(true) {
        return Ok(());
    }
    match analytics.get("bufferSize").as_number() {
        None => Err(ValidationError::not_a_number(PATH)),
        Some(size) if size <= 0.0 => Err(ValidationError::invalid(PATH)),
        Some(_) => Ok(()),
    }
}

/// Validate with default options and the process proxy environment.
pub fn validate(config: &serde_json::Value) -> Result<(), ValidationError> {
    Validator::from_env().validate(config)
}
