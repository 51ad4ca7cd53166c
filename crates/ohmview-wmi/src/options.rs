// ── Connection configuration ──
//
// The full option surface of a WMI-style connection, merged from three
// layers by one explicit function: built-in defaults < adapter defaults
// < caller overrides. Immutable once a namespace is constructed. These
// structs never touch disk; file/keyring handling belongs to binaries.

use std::path::PathBuf;

use secrecy::SecretString;

/// Finalized connection options handed to a [`Connector`](crate::Connector).
///
/// Empty strings mean "transport default" — the transport decides what an
/// unset moniker or impersonation level falls back to.
#[derive(Debug, Clone)]
pub struct ConnectionOptions {
    /// Namespace path, e.g. `root/cimv2` or `root/OpenHardwareMonitor`.
    pub namespace_path: String,
    /// Target machine (empty = local).
    pub computer: String,
    pub user: String,
    pub password: SecretString,
    pub impersonation_level: String,
    pub authentication_level: String,
    pub authority: String,
    pub privileges: Vec<String>,
    pub moniker: String,
    pub suffix: String,
    /// Whether the transport should eagerly enumerate available classes.
    pub find_classes: bool,
    pub debug: bool,
    /// Where to find the native driver backing the transport, if the
    /// deployment needs one. Purely a pass-through input.
    pub driver_path: Option<PathBuf>,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            namespace_path: String::new(),
            computer: String::new(),
            user: String::new(),
            password: SecretString::from(String::new()),
            impersonation_level: String::new(),
            authentication_level: String::new(),
            authority: String::new(),
            privileges: Vec::new(),
            moniker: String::new(),
            suffix: String::new(),
            find_classes: false,
            debug: false,
            driver_path: None,
        }
    }
}

impl ConnectionOptions {
    /// Merge the three configuration layers.
    ///
    /// Precedence, lowest to highest: built-in defaults, `adapter`
    /// (declared by a domain adapter for its namespace), `caller`
    /// (supplied at construction time).
    pub fn merged(adapter: &ConnectionOverrides, caller: &ConnectionOverrides) -> Self {
        let mut options = Self::default();
        adapter.apply_to(&mut options);
        caller.apply_to(&mut options);
        options
    }
}

/// Sparse overlay on [`ConnectionOptions`]: only `Some` fields override.
#[derive(Debug, Clone, Default)]
pub struct ConnectionOverrides {
    pub namespace_path: Option<String>,
    pub computer: Option<String>,
    pub user: Option<String>,
    pub password: Option<SecretString>,
    pub impersonation_level: Option<String>,
    pub authentication_level: Option<String>,
    pub authority: Option<String>,
    pub privileges: Option<Vec<String>>,
    pub moniker: Option<String>,
    pub suffix: Option<String>,
    pub find_classes: Option<bool>,
    pub debug: Option<bool>,
    pub driver_path: Option<PathBuf>,
}

impl ConnectionOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespace_path(mut self, path: impl Into<String>) -> Self {
        self.namespace_path = Some(path.into());
        self
    }

    pub fn computer(mut self, computer: impl Into<String>) -> Self {
        self.computer = Some(computer.into());
        self
    }

    pub fn credentials(mut self, user: impl Into<String>, password: SecretString) -> Self {
        self.user = Some(user.into());
        self.password = Some(password);
        self
    }

    pub fn driver_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.driver_path = Some(path.into());
        self
    }

    fn apply_to(&self, options: &mut ConnectionOptions) {
        if let Some(v) = &self.namespace_path {
            options.namespace_path = v.clone();
        }
        if let Some(v) = &self.computer {
            options.computer = v.clone();
        }
        if let Some(v) = &self.user {
            options.user = v.clone();
        }
        if let Some(v) = &self.password {
            options.password = v.clone();
        }
        if let Some(v) = &self.impersonation_level {
            options.impersonation_level = v.clone();
        }
        if let Some(v) = &self.authentication_level {
            options.authentication_level = v.clone();
        }
        if let Some(v) = &self.authority {
            options.authority = v.clone();
        }
        if let Some(v) = &self.privileges {
            options.privileges = v.clone();
        }
        if let Some(v) = &self.moniker {
            options.moniker = v.clone();
        }
        if let Some(v) = &self.suffix {
            options.suffix = v.clone();
        }
        if let Some(v) = self.find_classes {
            options.find_classes = v;
        }
        if let Some(v) = self.debug {
            options.debug = v;
        }
        if let Some(v) = &self.driver_path {
            options.driver_path = Some(v.clone());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn builtin_defaults_are_empty() {
        let options = ConnectionOptions::default();
        assert_eq!(options.namespace_path, "");
        assert_eq!(options.computer, "");
        assert!(!options.find_classes);
        assert!(options.driver_path.is_none());
    }

    #[test]
    fn adapter_defaults_override_builtins() {
        let adapter = ConnectionOverrides::new().namespace_path("root/OpenHardwareMonitor");
        let options = ConnectionOptions::merged(&adapter, &ConnectionOverrides::new());
        assert_eq!(options.namespace_path, "root/OpenHardwareMonitor");
    }

    #[test]
    fn caller_overrides_win_over_adapter_defaults() {
        let adapter = ConnectionOverrides::new()
            .namespace_path("root/OpenHardwareMonitor")
            .computer("adapter-host");
        let caller = ConnectionOverrides::new().computer("caller-host");

        let options = ConnectionOptions::merged(&adapter, &caller);
        // Untouched adapter fields survive; contested fields go to the caller.
        assert_eq!(options.namespace_path, "root/OpenHardwareMonitor");
        assert_eq!(options.computer, "caller-host");
    }

    #[test]
    fn unset_override_fields_do_not_clobber() {
        let adapter = ConnectionOverrides {
            find_classes: Some(true),
            ..ConnectionOverrides::new()
        };
        let options = ConnectionOptions::merged(&adapter, &ConnectionOverrides::new());
        assert!(options.find_classes);
    }
}
