//! Raw TLS handshake messages.
//!
//! rustls refuses to speak TLS 1.0/1.1 and only offers the suites it
//! implements, so legacy probes and cipher enumeration build their own
//! ClientHello and read the plaintext part of the server's first flight:
//! ServerHello, Certificate, ServerKeyExchange, ServerHelloDone. Nothing is
//! sent after the ClientHello; the connection is dropped once the flight has
//! been read.

use bytes::{BufMut, BytesMut};
use rand::RngCore;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::models::{EphemeralKeyInfo, TlsVersion};

const CONTENT_ALERT: u8 = 21;
const CONTENT_HANDSHAKE: u8 = 22;

const HS_CLIENT_HELLO: u8 = 1;
const HS_SERVER_HELLO: u8 = 2;
const HS_CERTIFICATE: u8 = 11;
const HS_SERVER_KEY_EXCHANGE: u8 = 12;
const HS_SERVER_HELLO_DONE: u8 = 14;

const EXT_SERVER_NAME: u16 = 0x0000;
const EXT_SUPPORTED_GROUPS: u16 = 0x000a;
const EXT_EC_POINT_FORMATS: u16 = 0x000b;
const EXT_SIGNATURE_ALGORITHMS: u16 = 0x000d;
pub const EXT_HEARTBEAT: u16 = 0x000f;
const EXT_SUPPORTED_VERSIONS: u16 = 0x002b;
const EXT_PSK_KEY_EXCHANGE_MODES: u16 = 0x002d;
const EXT_KEY_SHARE: u16 = 0x0033;
pub const EXT_RENEGOTIATION_INFO: u16 = 0xff01;

const GROUP_X25519: u16 = 0x001d;

const MAX_RECORD_LEN: usize = 16384 + 2048;
const MAX_FLIGHT_LEN: usize = 256 * 1024;

/// ServerHello.random of a HelloRetryRequest (RFC 8446, section 4.1.3).
const HELLO_RETRY_RANDOM: [u8; 32] = [
    0xCF, 0x21, 0xAD, 0x74, 0xE5, 0x9A, 0x61, 0x11, 0xBE, 0x1D, 0x8C, 0x02, 0x1E, 0x65, 0xB8, 0x91,
    0xC2, 0xA2, 0x11, 0x16, 0x7A, 0xBB, 0x8C, 0x5E, 0x07, 0x9E, 0x09, 0xE2, 0xC8, 0xA8, 0x33, 0x9C,
];

/// Why a raw handshake did not yield a usable server flight.
#[derive(Debug, Error)]
pub enum FlightError {
    #[error("server sent alert {level}/{description}")]
    Alert { level: u8, description: u8 },

    #[error("server closed the connection")]
    Closed,

    #[error("server negotiated version 0x{0:04x}")]
    VersionMismatch(u16),

    #[error("malformed server response: {0}")]
    Malformed(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// ClientHello builder.
pub struct ClientHelloBuilder {
    version: TlsVersion,
    cipher_suites: Vec<u16>,
    extensions: Vec<(u16, Vec<u8>)>,
    session_id: Vec<u8>,
    random: [u8; 32],
}

impl ClientHelloBuilder {
    pub fn new(version: TlsVersion) -> Self {
        let mut rng = rand::rng();
        let mut random = [0u8; 32];
        rng.fill_bytes(&mut random);

        // TLS 1.3 middlebox compatibility mode expects a non-empty session id.
        let session_id = if version == TlsVersion::Tls13 {
            let mut id = vec![0u8; 32];
            rng.fill_bytes(&mut id);
            id
        } else {
            Vec::new()
        };

        Self {
            version,
            cipher_suites: Vec::new(),
            extensions: Vec::new(),
            session_id,
            random,
        }
    }

    pub fn ciphers(mut self, ids: &[u16]) -> Self {
        self.cipher_suites.extend_from_slice(ids);
        self
    }

    /// Adds SNI. Callers pass `None` for IP literals, which SNI cannot carry.
    pub fn server_name(mut self, host: Option<&str>) -> Self {
        if let Some(host) = host {
            let mut data = BytesMut::new();
            data.put_u16((host.len() + 3) as u16);
            data.put_u8(0); // host_name
            data.put_u16(host.len() as u16);
            data.put_slice(host.as_bytes());
            self.extensions.push((EXT_SERVER_NAME, data.to_vec()));
        }
        self
    }

    /// Adds the extensions a mainstream client of this version would send.
    pub fn default_extensions(mut self) -> Self {
        let mut groups = BytesMut::new();
        let curves: [u16; 4] = [GROUP_X25519, 0x0017, 0x0018, 0x0019];
        groups.put_u16((curves.len() * 2) as u16);
        for curve in curves {
            groups.put_u16(curve);
        }
        self.extensions.push((EXT_SUPPORTED_GROUPS, groups.to_vec()));
        // One format: uncompressed.
        self.extensions.push((EXT_EC_POINT_FORMATS, vec![1, 0]));

        if self.version >= TlsVersion::Tls12 {
            // The flight is never verified, so SHA-1 costs nothing and keeps
            // old servers talking.
            let schemes: [u16; 11] = [
                0x0403, 0x0503, 0x0603, // ecdsa
                0x0804, 0x0805, 0x0806, // rsa_pss_rsae
                0x0401, 0x0501, 0x0601, // rsa_pkcs1
                0x0201, 0x0203, // sha1
            ];
            let mut data = BytesMut::new();
            data.put_u16((schemes.len() * 2) as u16);
            for scheme in schemes {
                data.put_u16(scheme);
            }
            self.extensions.push((EXT_SIGNATURE_ALGORITHMS, data.to_vec()));
        }

        if self.version == TlsVersion::Tls13 {
            self.extensions.push((EXT_SUPPORTED_VERSIONS, vec![2, 0x03, 0x04]));
            // psk_dhe_ke
            self.extensions.push((EXT_PSK_KEY_EXCHANGE_MODES, vec![1, 1]));

            // The share is never used: the handshake stops at ServerHello.
            let mut public = [0u8; 32];
            rand::rng().fill_bytes(&mut public);
            let mut data = BytesMut::new();
            data.put_u16(4 + public.len() as u16);
            data.put_u16(GROUP_X25519);
            data.put_u16(public.len() as u16);
            data.put_slice(&public);
            self.extensions.push((EXT_KEY_SHARE, data.to_vec()));
        } else {
            // Empty renegotiated_connection.
            self.extensions.push((EXT_RENEGOTIATION_INFO, vec![0]));
            // peer_allowed_to_send
            self.extensions.push((EXT_HEARTBEAT, vec![1]));
        }

        self
    }

    /// Serializes the ClientHello as a single handshake record.
    pub fn build(&self) -> Vec<u8> {
        let mut hello = BytesMut::new();

        // TLS 1.3 negotiates through supported_versions; the legacy field says 1.2.
        let legacy_version = self.version.min(TlsVersion::Tls12).wire_version();
        hello.put_u16(legacy_version);
        hello.put_slice(&self.random);
        hello.put_u8(self.session_id.len() as u8);
        hello.put_slice(&self.session_id);
        hello.put_u16((self.cipher_suites.len() * 2) as u16);
        for suite in &self.cipher_suites {
            hello.put_u16(*suite);
        }
        // Only the null compression method.
        hello.put_u8(1);
        hello.put_u8(0);

        let mut extensions = BytesMut::new();
        for (ext_type, data) in &self.extensions {
            extensions.put_u16(*ext_type);
            extensions.put_u16(data.len() as u16);
            extensions.put_slice(data);
        }
        hello.put_u16(extensions.len() as u16);
        hello.put_slice(&extensions);

        let mut record = BytesMut::with_capacity(hello.len() + 9);
        record.put_u8(CONTENT_HANDSHAKE);
        record.put_u16(0x0301);
        record.put_u16((hello.len() + 4) as u16);
        record.put_u8(HS_CLIENT_HELLO);
        record.put_uint(hello.len() as u64, 3);
        record.put_slice(&hello);
        record.to_vec()
    }
}

/// Bounds-checked cursor over a handshake message body.
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, len: usize, what: &'static str) -> Result<&'a [u8], FlightError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or(FlightError::Malformed(what))?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u8(&mut self, what: &'static str) -> Result<u8, FlightError> {
        Ok(self.take(1, what)?[0])
    }

    fn u16(&mut self, what: &'static str) -> Result<u16, FlightError> {
        let bytes = self.take(2, what)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn u24(&mut self, what: &'static str) -> Result<usize, FlightError> {
        let bytes = self.take(3, what)?;
        Ok(usize::from(bytes[0]) << 16 | usize::from(bytes[1]) << 8 | usize::from(bytes[2]))
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }
}

/// Parsed ServerHello (or HelloRetryRequest).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerHello {
    /// Negotiated version, taking supported_versions into account.
    pub version: u16,
    pub cipher_suite: u16,
    pub compression: u8,
    pub extensions: Vec<(u16, Vec<u8>)>,
    pub hello_retry: bool,
}

impl ServerHello {
    pub fn parse(body: &[u8]) -> Result<Self, FlightError> {
        let mut cursor = Cursor::new(body);
        let legacy_version = cursor.u16("ServerHello version")?;
        let random = cursor.take(32, "ServerHello random")?;
        let session_id_len = usize::from(cursor.u8("ServerHello session id")?);
        cursor.take(session_id_len, "ServerHello session id")?;
        let cipher_suite = cursor.u16("ServerHello cipher suite")?;
        let compression = cursor.u8("ServerHello compression")?;

        let mut extensions = Vec::new();
        if !cursor.is_empty() {
            let ext_len = usize::from(cursor.u16("ServerHello extensions")?);
            let mut ext_cursor = Cursor::new(cursor.take(ext_len, "ServerHello extensions")?);
            while !ext_cursor.is_empty() {
                let ext_type = ext_cursor.u16("extension type")?;
                let len = usize::from(ext_cursor.u16("extension length")?);
                extensions.push((ext_type, ext_cursor.take(len, "extension data")?.to_vec()));
            }
        }

        let version = extensions
            .iter()
            .find(|(ext_type, _)| *ext_type == EXT_SUPPORTED_VERSIONS)
            .and_then(|(_, data)| (data.len() == 2).then(|| u16::from_be_bytes([data[0], data[1]])))
            .unwrap_or(legacy_version);

        Ok(Self {
            version,
            cipher_suite,
            compression,
            extensions,
            hello_retry: random == HELLO_RETRY_RANDOM,
        })
    }

    pub fn has_extension(&self, ext_type: u16) -> bool {
        self.extensions.iter().any(|(t, _)| *t == ext_type)
    }

    /// Group selected in a TLS 1.3 key_share (ServerHello or HelloRetryRequest).
    pub fn key_share_group(&self) -> Option<u16> {
        self.extensions
            .iter()
            .find(|(t, _)| *t == EXT_KEY_SHARE)
            .and_then(|(_, data)| (data.len() >= 2).then(|| u16::from_be_bytes([data[0], data[1]])))
    }
}

/// Plaintext part of the server's first flight.
#[derive(Debug, Clone)]
pub struct ServerFlight {
    pub hello: ServerHello,
    /// DER certificates, leaf first. Empty for TLS 1.3, where they are encrypted.
    pub certificates: Vec<Vec<u8>>,
    /// Raw ServerKeyExchange body, when sent.
    pub key_exchange: Option<Vec<u8>>,
}

/// Reassembles handshake messages from TLS records.
struct HandshakeReader<'a, R> {
    stream: &'a mut R,
    buffer: Vec<u8>,
    received: usize,
}

impl<'a, R: AsyncRead + Unpin> HandshakeReader<'a, R> {
    fn new(stream: &'a mut R) -> Self {
        Self {
            stream,
            buffer: Vec::new(),
            received: 0,
        }
    }

    async fn next_message(&mut self) -> Result<(u8, Vec<u8>), FlightError> {
        loop {
            if self.buffer.len() >= 4 {
                let len = usize::from(self.buffer[1]) << 16
                    | usize::from(self.buffer[2]) << 8
                    | usize::from(self.buffer[3]);
                if self.buffer.len() >= 4 + len {
                    let message: Vec<u8> = self.buffer.drain(..4 + len).collect();
                    return Ok((message[0], message[4..].to_vec()));
                }
            }
            self.read_record().await?;
        }
    }

    async fn read_record(&mut self) -> Result<(), FlightError> {
        let mut header = [0u8; 5];
        read_exact_or_closed(self.stream, &mut header).await?;
        let len = usize::from(u16::from_be_bytes([header[3], header[4]]));
        if len > MAX_RECORD_LEN {
            return Err(FlightError::Malformed("record too long"));
        }
        let mut payload = vec![0u8; len];
        read_exact_or_closed(self.stream, &mut payload).await?;

        self.received += len;
        if self.received > MAX_FLIGHT_LEN {
            return Err(FlightError::Malformed("server flight too large"));
        }

        match header[0] {
            CONTENT_HANDSHAKE => self.buffer.extend_from_slice(&payload),
            CONTENT_ALERT if payload.len() >= 2 => {
                return Err(FlightError::Alert {
                    level: payload[0],
                    description: payload[1],
                })
            }
            CONTENT_ALERT => return Err(FlightError::Malformed("truncated alert")),
            // ChangeCipherSpec in TLS 1.3 compatibility mode; nothing to read.
            _ => {}
        }
        Ok(())
    }
}

async fn read_exact_or_closed<R: AsyncRead + Unpin>(
    stream: &mut R,
    buf: &mut [u8],
) -> Result<(), FlightError> {
    match stream.read_exact(buf).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Err(FlightError::Closed),
        Err(e) => Err(FlightError::Io(e)),
    }
}

/// Sends `client_hello` and reads the server flight.
pub async fn exchange<S>(
    stream: &mut S,
    client_hello: &[u8],
    requested: TlsVersion,
) -> Result<ServerFlight, FlightError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream.write_all(client_hello).await?;
    stream.flush().await?;
    read_flight(stream, requested).await
}

/// Reads the server flight answering a ClientHello for `requested`.
///
/// A ServerHello for any other version is a [`FlightError::VersionMismatch`].
/// For TLS 1.3 only the ServerHello is read since everything after it is
/// encrypted.
pub async fn read_flight<R: AsyncRead + Unpin>(
    stream: &mut R,
    requested: TlsVersion,
) -> Result<ServerFlight, FlightError> {
    let mut reader = HandshakeReader::new(stream);

    let (msg_type, body) = reader.next_message().await?;
    if msg_type != HS_SERVER_HELLO {
        return Err(FlightError::Malformed("expected ServerHello"));
    }
    let hello = ServerHello::parse(&body)?;
    if hello.version != requested.wire_version() {
        return Err(FlightError::VersionMismatch(hello.version));
    }

    let mut flight = ServerFlight {
        hello,
        certificates: Vec::new(),
        key_exchange: None,
    };
    if requested == TlsVersion::Tls13 {
        return Ok(flight);
    }

    loop {
        let (msg_type, body) = reader.next_message().await?;
        match msg_type {
            HS_CERTIFICATE => flight.certificates = parse_certificate_list(&body)?,
            HS_SERVER_KEY_EXCHANGE => flight.key_exchange = Some(body),
            HS_SERVER_HELLO_DONE => break,
            _ => {}
        }
    }

    Ok(flight)
}

fn parse_certificate_list(body: &[u8]) -> Result<Vec<Vec<u8>>, FlightError> {
    let mut cursor = Cursor::new(body);
    let total = cursor.u24("certificate list length")?;
    let mut list = Cursor::new(cursor.take(total, "certificate list")?);
    let mut certificates = Vec::new();
    while !list.is_empty() {
        let len = list.u24("certificate length")?;
        certificates.push(list.take(len, "certificate")?.to_vec());
    }
    Ok(certificates)
}

/// Name and effective size in bits of a named group.
pub fn group_info(id: u16) -> Option<(&'static str, u32)> {
    Some(match id {
        0x0017 => ("P-256", 256),
        0x0018 => ("P-384", 384),
        0x0019 => ("P-521", 521),
        0x001d => ("X25519", 253),
        0x001e => ("X448", 448),
        0x0100 => ("ffdhe2048", 2048),
        0x0101 => ("ffdhe3072", 3072),
        0x0102 => ("ffdhe4096", 4096),
        0x0103 => ("ffdhe6144", 6144),
        0x0104 => ("ffdhe8192", 8192),
        _ => return None,
    })
}

/// Ephemeral key info for a named group. Finite-field groups report as DH.
pub fn group_key_info(id: u16) -> EphemeralKeyInfo {
    match group_info(id) {
        Some((name, size)) => EphemeralKeyInfo {
            kind: if name.starts_with("ffdhe") { "DH" } else { "ECDH" }.to_string(),
            name: Some(name.to_string()),
            size,
        },
        None => EphemeralKeyInfo {
            kind: "ECDH".to_string(),
            name: Some(format!("0x{id:04x}")),
            size: 0,
        },
    }
}

/// Decodes the ephemeral parameters of a TLS 1.0-1.2 ServerKeyExchange.
///
/// `ecdhe` selects the layout: ECParameters for ECDHE suites, ServerDHParams
/// otherwise.
pub fn parse_server_key_exchange(body: &[u8], ecdhe: bool) -> Option<EphemeralKeyInfo> {
    let mut cursor = Cursor::new(body);
    if ecdhe {
        // named_curve only; explicit curves are long gone
        if cursor.u8("curve type").ok()? != 3 {
            return None;
        }
        Some(group_key_info(cursor.u16("named curve").ok()?))
    } else {
        let p_len = usize::from(cursor.u16("dh_p length").ok()?);
        let p = cursor.take(p_len, "dh_p").ok()?;
        let leading = p.iter().take_while(|b| **b == 0).count();
        let significant = &p[leading..];
        let bits = match significant.first() {
            Some(first) => significant.len() as u32 * 8 - first.leading_zeros(),
            None => 0,
        };
        Some(EphemeralKeyInfo {
            kind: "DH".to_string(),
            name: None,
            size: bits,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handshake_message(msg_type: u8, body: &[u8]) -> Vec<u8> {
        let mut out = vec![msg_type];
        out.extend_from_slice(&(body.len() as u32).to_be_bytes()[1..]);
        out.extend_from_slice(body);
        out
    }

    fn record(content_type: u8, payload: &[u8]) -> Vec<u8> {
        let mut out = vec![content_type, 0x03, 0x03];
        out.extend_from_slice(&(payload.len() as u16).to_be_bytes());
        out.extend_from_slice(payload);
        out
    }

    fn server_hello_body(version: u16, suite: u16, extensions: &[(u16, Vec<u8>)]) -> Vec<u8> {
        let mut body = version.to_be_bytes().to_vec();
        body.extend_from_slice(&[0x11; 32]);
        body.push(0); // session id
        body.extend_from_slice(&suite.to_be_bytes());
        body.push(0); // compression
        let mut ext = Vec::new();
        for (ext_type, data) in extensions {
            ext.extend_from_slice(&ext_type.to_be_bytes());
            ext.extend_from_slice(&(data.len() as u16).to_be_bytes());
            ext.extend_from_slice(data);
        }
        body.extend_from_slice(&(ext.len() as u16).to_be_bytes());
        body.extend_from_slice(&ext);
        body
    }

    fn certificate_body(certs: &[&[u8]]) -> Vec<u8> {
        let mut list = Vec::new();
        for cert in certs {
            list.extend_from_slice(&(cert.len() as u32).to_be_bytes()[1..]);
            list.extend_from_slice(cert);
        }
        let mut body = (list.len() as u32).to_be_bytes()[1..].to_vec();
        body.extend_from_slice(&list);
        body
    }

    #[test]
    fn test_client_hello_layout() {
        let hello = ClientHelloBuilder::new(TlsVersion::Tls11)
            .ciphers(&[0xC013, 0x002F])
            .server_name(Some("example.com"))
            .default_extensions()
            .build();

        assert_eq!(hello[0], CONTENT_HANDSHAKE);
        let record_len = usize::from(u16::from_be_bytes([hello[3], hello[4]]));
        assert_eq!(record_len, hello.len() - 5);
        assert_eq!(hello[5], HS_CLIENT_HELLO);
        let hs_len = usize::from(hello[6]) << 16 | usize::from(hello[7]) << 8 | usize::from(hello[8]);
        assert_eq!(hs_len, hello.len() - 9);
        // client_version
        assert_eq!(&hello[9..11], &[0x03, 0x02]);
        // empty session id, then two suites
        assert_eq!(hello[43], 0);
        assert_eq!(&hello[44..50], &[0x00, 0x04, 0xC0, 0x13, 0x00, 0x2F]);
        assert!(hello.windows(11).any(|w| w == b"example.com"));
    }

    #[test]
    fn test_tls13_client_hello_uses_supported_versions() {
        let hello = ClientHelloBuilder::new(TlsVersion::Tls13)
            .ciphers(&[0x1301])
            .default_extensions()
            .build();
        assert_eq!(&hello[9..11], &[0x03, 0x03]);
        // session id of 32 bytes
        assert_eq!(hello[43], 32);
        assert!(hello.windows(5).any(|w| w == [0x00, 0x2b, 0x00, 0x03, 0x02]));
    }

    #[test]
    fn test_server_hello_extensions() {
        let body = server_hello_body(
            0x0303,
            0xC02F,
            &[(EXT_RENEGOTIATION_INFO, vec![0]), (EXT_HEARTBEAT, vec![1])],
        );
        let hello = ServerHello::parse(&body).unwrap();
        assert_eq!(hello.version, 0x0303);
        assert_eq!(hello.cipher_suite, 0xC02F);
        assert!(hello.has_extension(EXT_RENEGOTIATION_INFO));
        assert!(hello.has_extension(EXT_HEARTBEAT));
        assert!(!hello.hello_retry);
    }

    #[test]
    fn test_server_hello_truncated() {
        let body = server_hello_body(0x0303, 0xC02F, &[]);
        assert!(matches!(
            ServerHello::parse(&body[..20]),
            Err(FlightError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_read_full_tls12_flight() {
        let mut ske = vec![3];
        ske.extend_from_slice(&0x0017u16.to_be_bytes());
        ske.extend_from_slice(&[65]);

        let mut payload = handshake_message(
            HS_SERVER_HELLO,
            &server_hello_body(0x0303, 0xC02F, &[(EXT_RENEGOTIATION_INFO, vec![0])]),
        );
        payload.extend(handshake_message(HS_CERTIFICATE, &certificate_body(&[b"leaf", b"ca"])));
        // Split the flight across two records.
        let mut wire = record(CONTENT_HANDSHAKE, &payload);
        let mut rest = handshake_message(HS_SERVER_KEY_EXCHANGE, &ske);
        rest.extend(handshake_message(HS_SERVER_HELLO_DONE, &[]));
        wire.extend(record(CONTENT_HANDSHAKE, &rest));

        let flight = read_flight(&mut wire.as_slice(), TlsVersion::Tls12).await.unwrap();
        assert_eq!(flight.hello.cipher_suite, 0xC02F);
        assert_eq!(flight.certificates, vec![b"leaf".to_vec(), b"ca".to_vec()]);

        let key = parse_server_key_exchange(&flight.key_exchange.unwrap(), true).unwrap();
        assert_eq!(key.kind, "ECDH");
        assert_eq!(key.name.as_deref(), Some("P-256"));
        assert_eq!(key.size, 256);
    }

    #[tokio::test]
    async fn test_alert_is_reported() {
        let wire = record(CONTENT_ALERT, &[2, 70]);
        let err = read_flight(&mut wire.as_slice(), TlsVersion::Tls10).await.unwrap_err();
        assert!(matches!(err, FlightError::Alert { level: 2, description: 70 }));
    }

    #[tokio::test]
    async fn test_version_mismatch() {
        let wire = record(
            CONTENT_HANDSHAKE,
            &handshake_message(HS_SERVER_HELLO, &server_hello_body(0x0303, 0xC02F, &[])),
        );
        let err = read_flight(&mut wire.as_slice(), TlsVersion::Tls10).await.unwrap_err();
        assert!(matches!(err, FlightError::VersionMismatch(0x0303)));
    }

    #[tokio::test]
    async fn test_closed_connection() {
        let mut empty: &[u8] = &[];
        let err = read_flight(&mut empty, TlsVersion::Tls11).await.unwrap_err();
        assert!(matches!(err, FlightError::Closed));
    }

    #[tokio::test]
    async fn test_tls13_stops_after_server_hello() {
        let mut key_share = GROUP_X25519.to_be_bytes().to_vec();
        key_share.extend_from_slice(&[0, 32]);
        key_share.extend_from_slice(&[7; 32]);
        let wire = record(
            CONTENT_HANDSHAKE,
            &handshake_message(
                HS_SERVER_HELLO,
                &server_hello_body(
                    0x0303,
                    0x1302,
                    &[(EXT_SUPPORTED_VERSIONS, vec![0x03, 0x04]), (EXT_KEY_SHARE, key_share)],
                ),
            ),
        );
        let flight = read_flight(&mut wire.as_slice(), TlsVersion::Tls13).await.unwrap();
        assert_eq!(flight.hello.version, 0x0304);
        assert_eq!(flight.hello.cipher_suite, 0x1302);
        assert_eq!(flight.hello.key_share_group(), Some(GROUP_X25519));
        assert!(flight.certificates.is_empty());
    }

    #[test]
    fn test_dh_parameter_size() {
        let mut body = 256u16.to_be_bytes().to_vec();
        body.push(0xFF);
        body.extend_from_slice(&[0xAB; 255]);
        let key = parse_server_key_exchange(&body, false).unwrap();
        assert_eq!(key.kind, "DH");
        assert_eq!(key.size, 2048);
    }
}
