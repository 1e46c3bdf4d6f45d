use {
    crate::{
        domain::{error::GatewayError, version::PlatformVersion},
        i18n::Translator,
    },
    secrecy::{ExposeSecret, SecretString},
    serde::Serialize,
    std::env,
};

pub const DISPLAY_NAME: &str = "Mollie";
pub const API_VERSION: &str = "1.1";
pub const DEFAULT_API_BASE: &str = "https://api.mollie.com/v2";
pub const CALLBACK_PATH: &str = "/callback/mollie";

/// Gateway settings, read once at startup.
pub struct GatewayConfig {
    pub database_url: SecretString,
    pub listen_addr: String,
    pub live_api_key: Option<SecretString>,
    pub test_api_key: Option<SecretString>,
    pub sandbox: bool,
    pub api_base: String,
    pub gateway_name: String,
    pub payment_method: String,
    pub platform_version: PlatformVersion,
    pub system_url: String,
    pub system_ssl_url: Option<String>,
    pub develop: bool,
    pub nonce_secret: SecretString,
    pub customer_id_key: SecretString,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, GatewayError> {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |name: &str| {
            get(name).ok_or_else(|| GatewayError::Config(format!("{name} must be set")))
        };
        let secret = |value: String| SecretString::new(value.into());

        let platform_version = get("PLATFORM_VERSION")
            .as_deref()
            .unwrap_or("7.0.0")
            .parse::<PlatformVersion>()?;

        Ok(Self {
            database_url: secret(required("DATABASE_URL")?),
            listen_addr: get("LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into()),
            live_api_key: get("MOLLIE_LIVE_API_KEY").map(secret),
            test_api_key: get("MOLLIE_TEST_API_KEY").map(secret),
            sandbox: get("MOLLIE_SANDBOX").is_some_and(|v| is_on(&v)),
            api_base: get("MOLLIE_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.into())
                .trim_end_matches('/')
                .to_string(),
            gateway_name: get("GATEWAY_NAME").unwrap_or_else(|| DISPLAY_NAME.into()),
            payment_method: get("GATEWAY_PAYMENT_METHOD").unwrap_or_else(|| "mollie".into()),
            platform_version,
            system_url: required("SYSTEM_URL")?.trim_end_matches('/').to_string(),
            system_ssl_url: get("SYSTEM_SSL_URL").map(|u| u.trim_end_matches('/').to_string()),
            develop: get("GATEWAY_DEVELOP").is_some_and(|v| is_on(&v)),
            nonce_secret: secret(required("NONCE_SECRET")?),
            customer_id_key: secret(required("CUSTOMER_ID_KEY")?),
        })
    }

    /// Key for the current mode: test key in sandbox mode, live key otherwise.
    pub fn api_key(&self) -> Option<&SecretString> {
        if self.sandbox {
            self.test_api_key.as_ref()
        } else {
            self.live_api_key.as_ref()
        }
    }

    /// A key is configured for the current mode.
    pub fn is_active(&self) -> bool {
        self.api_key()
            .is_some_and(|key| !key.expose_secret().is_empty())
    }

    /// Full URL Mollie should call on status changes; `None` in develop mode.
    pub fn webhook_url(&self) -> Option<String> {
        if self.develop {
            return None;
        }

        let base = match &self.system_ssl_url {
            Some(ssl) if self.platform_version.is_legacy() => ssl,
            _ => &self.system_url,
        };

        Some(format!("{base}{CALLBACK_PATH}"))
    }
}

fn is_on(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "on" | "1" | "true" | "yes"
    )
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct GatewayMetadata {
    pub display_name: &'static str,
    #[serde(rename = "APIVersion")]
    pub api_version: &'static str,
}

pub fn metadata() -> GatewayMetadata {
    GatewayMetadata {
        display_name: DISPLAY_NAME,
        api_version: API_VERSION,
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum FieldType {
    System,
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "yesno")]
    YesNo,
}

/// One entry of the gateway settings form shown by the billing platform.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ConfigField {
    pub key: &'static str,
    #[serde(rename = "Type")]
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub fn config_fields(t: &Translator) -> Vec<ConfigField> {
    vec![
        ConfigField {
            key: "FriendlyName",
            field_type: FieldType::System,
            friendly_name: None,
            value: Some(DISPLAY_NAME),
            size: None,
            description: None,
        },
        ConfigField {
            key: "live_api_key",
            field_type: FieldType::Text,
            friendly_name: Some(t.dgettext("Mollie Live API Key")),
            value: None,
            size: Some("25"),
            description: Some(t.dgettext("Please enter your live API key.")),
        },
        ConfigField {
            key: "test_api_key",
            field_type: FieldType::Text,
            friendly_name: Some(t.dgettext("Mollie Test API Key")),
            value: None,
            size: Some("25"),
            description: Some(t.dgettext("Please enter your test API key.")),
        },
        ConfigField {
            key: "sandbox",
            field_type: FieldType::YesNo,
            friendly_name: Some(t.dgettext("Sandbox Mode")),
            value: None,
            size: Some("25"),
            description: Some(t.dgettext(
                "Enable sandbox mode with test API key. No real transactions will be made.",
            )),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<GatewayConfig, GatewayError> {
        let mut env: HashMap<String, String> = [
            ("DATABASE_URL", "postgres://localhost/gateway"),
            ("SYSTEM_URL", "https://billing.example.com/"),
            ("NONCE_SECRET", "nonce-secret"),
            ("CUSTOMER_ID_KEY", "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA="),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        for (k, v) in vars {
            env.insert(k.to_string(), v.to_string());
        }
        GatewayConfig::from_lookup(|name| env.get(name).cloned())
    }

    #[test]
    fn api_key_follows_sandbox_flag() {
        let cfg = config(&[
            ("MOLLIE_LIVE_API_KEY", "live_abc"),
            ("MOLLIE_TEST_API_KEY", "test_abc"),
        ])
        .unwrap();
        assert_eq!(cfg.api_key().unwrap().expose_secret(), "live_abc");

        let cfg = config(&[
            ("MOLLIE_LIVE_API_KEY", "live_abc"),
            ("MOLLIE_TEST_API_KEY", "test_abc"),
            ("MOLLIE_SANDBOX", "on"),
        ])
        .unwrap();
        assert_eq!(cfg.api_key().unwrap().expose_secret(), "test_abc");
    }

    #[test]
    fn inactive_without_key_for_mode() {
        let cfg = config(&[("MOLLIE_LIVE_API_KEY", "live_abc"), ("MOLLIE_SANDBOX", "on")]).unwrap();
        assert!(!cfg.is_active());

        let cfg = config(&[("MOLLIE_LIVE_API_KEY", "  ")]).unwrap();
        assert!(!cfg.is_active());
    }

    #[test]
    fn webhook_url_uses_system_url() {
        let cfg = config(&[]).unwrap();
        assert_eq!(
            cfg.webhook_url().as_deref(),
            Some("https://billing.example.com/callback/mollie")
        );
    }

    #[test]
    fn legacy_platform_prefers_ssl_url() {
        let cfg = config(&[
            ("PLATFORM_VERSION", "6.3.1"),
            ("SYSTEM_SSL_URL", "https://secure.example.com"),
        ])
        .unwrap();
        assert_eq!(
            cfg.webhook_url().as_deref(),
            Some("https://secure.example.com/callback/mollie")
        );

        let cfg = config(&[
            ("PLATFORM_VERSION", "7.2.0"),
            ("SYSTEM_SSL_URL", "https://secure.example.com"),
        ])
        .unwrap();
        assert_eq!(
            cfg.webhook_url().as_deref(),
            Some("https://billing.example.com/callback/mollie")
        );
    }

    #[test]
    fn develop_mode_has_no_webhook() {
        let cfg = config(&[("GATEWAY_DEVELOP", "on")]).unwrap();
        assert_eq!(cfg.webhook_url(), None);
    }

    #[test]
    fn missing_required_setting() {
        let err = GatewayConfig::from_lookup(|_| None).err().unwrap();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn config_fields_are_translated() {
        let fields = config_fields(&Translator::for_locale(Some("nl_NL")));
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[3].friendly_name.as_deref(), Some("Sandboxmodus"));

        let json = serde_json::to_value(&fields[1]).unwrap();
        assert_eq!(json["Type"], "text");
        assert_eq!(json["FriendlyName"], "Mollie Live API-sleutel");
        assert_eq!(json["Size"], "25");

        let english = config_fields(&Translator::for_locale(None));
        assert_eq!(english[1].friendly_name.as_deref(), Some("Mollie Live API Key"));
    }

    #[test]
    fn metadata_shape() {
        let json = serde_json::to_value(metadata()).unwrap();
        assert_eq!(json["DisplayName"], "Mollie");
        assert_eq!(json["APIVersion"], "1.1");
    }
}
