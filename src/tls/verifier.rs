//! Certificate verifier that observes instead of enforcing.
//!
//! Every chain is accepted so that untrusted or self-signed certificates still
//! yield data. The webpki verdict and any stapled OCSP response are recorded
//! for the report.

use std::sync::{Arc, Mutex};

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::client::WebPkiServerVerifier;
use rustls::crypto::{verify_tls12_signature, verify_tls13_signature, CryptoProvider};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{DigitallySignedStruct, Error as RustlsError, RootCertStore, SignatureScheme};

/// What the verifier saw during one handshake.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Observation {
    pub trusted: Option<bool>,
    pub trust_error: Option<String>,
    pub ocsp_stapled: Option<bool>,
}

#[derive(Debug)]
pub struct CapturingVerifier {
    webpki: Option<Arc<WebPkiServerVerifier>>,
    provider: Arc<CryptoProvider>,
    observed: Mutex<Observation>,
}

impl CapturingVerifier {
    /// Builds a verifier backed by the bundled webpki roots. If the webpki
    /// verifier cannot be built, trust is simply left unmeasured.
    pub fn new(provider: Arc<CryptoProvider>) -> Self {
        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let webpki = WebPkiServerVerifier::builder_with_provider(Arc::new(roots), provider.clone())
            .build()
            .map_err(|e| log::warn!("webpki verifier unavailable, trust will not be reported: {e}"))
            .ok();

        Self {
            webpki,
            provider,
            observed: Mutex::new(Observation::default()),
        }
    }

    /// Judges a chain read off the wire without a rustls handshake. Stapling
    /// is left unmeasured since the raw ClientHello never asks for it.
    pub fn observe_chain(&self, chain: &[Vec<u8>], host: &str) -> Observation {
        let (Some(webpki), Some((end_entity, intermediates))) = (&self.webpki, chain.split_first())
        else {
            return Observation::default();
        };
        let Ok(server_name) = ServerName::try_from(host.to_string()) else {
            return Observation::default();
        };

        let end_entity = CertificateDer::from(end_entity.as_slice());
        let intermediates: Vec<CertificateDer<'_>> = intermediates
            .iter()
            .map(|der| CertificateDer::from(der.as_slice()))
            .collect();

        match webpki.verify_server_cert(&end_entity, &intermediates, &server_name, &[], UnixTime::now()) {
            Ok(_) => Observation {
                trusted: Some(true),
                ..Observation::default()
            },
            Err(e) => Observation {
                trusted: Some(false),
                trust_error: Some(e.to_string()),
                ocsp_stapled: None,
            },
        }
    }

    pub fn observation(&self) -> Observation {
        self.observed
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl ServerCertVerifier for CapturingVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> Result<ServerCertVerified, RustlsError> {
        let (trusted, trust_error) = match &self.webpki {
            Some(webpki) => {
                match webpki.verify_server_cert(end_entity, intermediates, server_name, ocsp_response, now) {
                    Ok(_) => (Some(true), None),
                    Err(e) => (Some(false), Some(e.to_string())),
                }
            }
            None => (None, None),
        };

        if let Ok(mut observed) = self.observed.lock() {
            *observed = Observation {
                trusted,
                trust_error,
                ocsp_stapled: Some(!ocsp_response.is_empty()),
            };
        }

        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, RustlsError> {
        verify_tls12_signature(message, cert, dss, &self.provider.signature_verification_algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, RustlsError> {
        verify_tls13_signature(message, cert, dss, &self.provider.signature_verification_algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}
