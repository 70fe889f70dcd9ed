//! Credential providers for HTTP Basic authentication and TLS identity.
//!
//! Credentials are explicit per-client capability objects rather than
//! process-wide state, so one process can talk to several servers as
//! different users concurrently.

/// Capability that supplies credentials when a server asks for them.
///
/// Evaluated per request; implementations may cache internal state (a parsed
/// trust configuration for instance) but must not assume call ordering, and
/// must be reentrant since one instance can be shared across clients.
///
/// Returning `None` from [`username`](RestAuthentication::username) means
/// "no credentials available": the request executor will not attempt
/// authentication rather than send empty credentials.
pub trait RestAuthentication: Send + Sync {
    /// Username for the given server root, resource and server-declared
    /// realm. `None` when there is nothing to authenticate with.
    fn username(&self, root: &str, resource: &str, realm: Option<&str>) -> Option<String>;

    /// Password to pair with a username previously returned by
    /// [`username`](RestAuthentication::username).
    fn password(
        &self,
        root: &str,
        resource: &str,
        realm: Option<&str>,
        username: &str,
    ) -> Option<String>;

    /// Custom TLS client identity for connections to the given root.
    ///
    /// Called once per transport construction, so expensive setup should be
    /// cached by the implementation. `None` uses the platform default.
    fn tls(&self, root: &str) -> Option<ClientTls> {
        let _ = root;
        None
    }
}

/// TLS client identity material, carried as PEM bytes and consumed by the
/// transport adapter when it builds its connection pool.
#[derive(Clone)]
pub struct ClientTls {
    /// Client certificate chain plus private key, PEM-encoded.
    pub identity_pem: Vec<u8>,
    /// Additional trusted root CA, PEM-encoded, for servers whose
    /// certificate the platform store does not know.
    pub extra_root_ca_pem: Option<Vec<u8>>,
}

impl ClientTls {
    /// Client identity with the platform's default trust store.
    pub fn new(identity_pem: Vec<u8>) -> Self {
        ClientTls {
            identity_pem,
            extra_root_ca_pem: None,
        }
    }

    /// Adds an extra trusted root CA certificate.
    #[must_use]
    pub fn with_extra_root_ca(mut self, ca_pem: Vec<u8>) -> Self {
        self.extra_root_ca_pem = Some(ca_pem);
        self
    }
}

/// Static username and password for all resources, default TLS setup, no
/// validation of resource or realm.
pub struct SimpleAuthentication {
    username: String,
    password: String,
}

impl SimpleAuthentication {
    /// Sets up one username and password used for every resource.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        SimpleAuthentication {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl RestAuthentication for SimpleAuthentication {
    fn username(&self, _root: &str, _resource: &str, _realm: Option<&str>) -> Option<String> {
        Some(self.username.clone())
    }

    fn password(
        &self,
        _root: &str,
        _resource: &str,
        _realm: Option<&str>,
        _username: &str,
    ) -> Option<String> {
        Some(self.password.clone())
    }
}

/// Static credentials plus a TLS client certificate.
///
/// The TLS configuration is assembled once at construction and handed out
/// unchanged, since the transport may ask once per connection.
pub struct ClientCertAuthentication {
    credentials: SimpleAuthentication,
    tls: ClientTls,
}

impl ClientCertAuthentication {
    /// Combines a client certificate identity with Basic credentials.
    pub fn new(tls: ClientTls, username: impl Into<String>, password: impl Into<String>) -> Self {
        ClientCertAuthentication {
            credentials: SimpleAuthentication::new(username, password),
            tls,
        }
    }
}

impl RestAuthentication for ClientCertAuthentication {
    fn username(&self, root: &str, resource: &str, realm: Option<&str>) -> Option<String> {
        self.credentials.username(root, resource, realm)
    }

    fn password(
        &self,
        root: &str,
        resource: &str,
        realm: Option<&str>,
        username: &str,
    ) -> Option<String> {
        self.credentials.password(root, resource, realm, username)
    }

    fn tls(&self, _root: &str) -> Option<ClientTls> {
        Some(self.tls.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_authentication_answers_any_realm() {
        let auth = SimpleAuthentication::new("user", "pass");
        let username = auth.username("http://x.se", "/r", None).unwrap();
        assert_eq!("user", username);
        assert_eq!(
            Some("pass".to_string()),
            auth.password("http://x.se", "/r", Some("realm"), &username)
        );
        assert!(auth.tls("http://x.se").is_none());
    }

    #[test]
    fn test_client_cert_authentication_hands_out_cached_tls() {
        let tls = ClientTls::new(b"PEM".to_vec()).with_extra_root_ca(b"CA".to_vec());
        let auth = ClientCertAuthentication::new(tls, "user", "pass");
        let out = auth.tls("https://x.se").expect("tls identity");
        assert_eq!(b"PEM".to_vec(), out.identity_pem);
        assert_eq!(Some(b"CA".to_vec()), out.extra_root_ca_pem);
        assert_eq!(
            Some("user".to_string()),
            auth.username("https://x.se", "/", None)
        );
    }
}
