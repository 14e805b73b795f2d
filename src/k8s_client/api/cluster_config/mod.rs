mod error;
mod kubeconfig;

use crate::utils::read_token;
pub use error::ClusterConfigError;
pub use kubeconfig::Kubeconfig;
use reqwest::{header::HeaderValue, Certificate, Identity};
use std::{
    fmt, fs,
    io::{self, BufReader, Read},
};
use ClusterConfigError as Error;

fn decode_base64(field: &'static str, data: String) -> Result<Vec<u8>, Error> {
    base64::decode(data).map_err(|err| Error::InvalidBase64 { field, err })
}

pub enum AuthMethod {
    Identity(Identity),
    Token(HeaderValue),
    None,
}

impl fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMethod::Identity(_) => write!(f, "Identity(..)"),
            AuthMethod::Token(_) => write!(f, "Token(..)"),
            AuthMethod::None => write!(f, "None"),
        }
    }
}

impl AuthMethod {
    pub fn bearer(token: &str) -> Result<Self, Error> {
        let mut header = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(Error::InvalidToken)?;
        header.set_sensitive(true);
        Ok(AuthMethod::Token(header))
    }
}

/// Everything needed to reach the api server.
#[derive(Debug)]
pub struct ClusterConfig {
    pub server: String,
    pub cacert: Option<Certificate>,
    pub auth: AuthMethod,
}

impl ClusterConfig {
    /// Plain `{url, token}` config, trusting the system roots.
    pub fn new<S: Into<String>>(server: S, token: Option<&str>) -> Result<Self, Error> {
        let auth = match token {
            Some(token) => AuthMethod::bearer(token)?,
            None => AuthMethod::None,
        };
        Ok(Self {
            server: server.into(),
            cacert: None,
            auth,
        })
    }

    pub fn in_cluster() -> Option<Result<Self, Error>> {
        const TOKEN_PATH: &str = "/var/run/secrets/kubernetes.io/serviceaccount/token";
        const CACERT_PATH: &str = "/var/run/secrets/kubernetes.io/serviceaccount/ca.crt";

        let token = match fs::File::open(TOKEN_PATH) {
            Ok(file) => file,
            Err(err) => match err.kind() {
                io::ErrorKind::NotFound => return None,
                _ => {
                    return Some(Err(Error::Read {
                        path: TOKEN_PATH.into(),
                        err,
                    }))
                }
            },
        };
        return Some(in_cluster_inner(token));

        fn read_to_vec(file: fs::File) -> Result<Vec<u8>, io::Error> {
            let mut buf = Vec::new();
            BufReader::new(file).read_to_end(&mut buf)?;
            Ok(buf)
        }
        fn in_cluster_inner(mut token_file: fs::File) -> Result<ClusterConfig, Error> {
            let cacert = fs::File::open(CACERT_PATH)
                .and_then(read_to_vec)
                .map_err(|err| Error::Read {
                    path: CACERT_PATH.into(),
                    err,
                })?;
            let token = read_token(&mut token_file).map_err(|err| Error::Read {
                path: TOKEN_PATH.into(),
                err,
            })?;
            Ok(ClusterConfig {
                auth: AuthMethod::bearer(&token)?,
                cacert: Some(Certificate::from_pem(&cacert).map_err(Error::Certificate)?),
                server: "https://kubernetes.default.svc:443".into(),
            })
        }
    }

    pub fn from_kubeconfig(k: Kubeconfig) -> Result<Self, Error> {
        let (cluster, user) = k.current()?;

        let auth = match (user.token, user.client_certificate_data, user.client_key_data) {
            (Some(token), _, _) => AuthMethod::bearer(&token)?,
            (None, Some(cert), Some(key)) => {
                let mut pem = decode_base64("client-key-data", key)?;
                pem.push(b'\n');
                pem.extend_from_slice(&decode_base64("client-certificate-data", cert)?);
                AuthMethod::Identity(Identity::from_pem(&pem).map_err(Error::Identity)?)
            }
            _ => AuthMethod::None,
        };

        let cacert = match cluster.certificate_authority_data {
            Some(data) => {
                let pem = decode_base64("certificate-authority-data", data)?;
                Some(Certificate::from_pem(&pem).map_err(Error::Certificate)?)
            }
            None => None,
        };

        Ok(Self {
            auth,
            cacert,
            server: cluster.server,
        })
    }

    pub fn detect() -> Result<Self, Error> {
        let cc = match Kubeconfig::from_env() {
            Some(r) => Self::from_kubeconfig(r?)?,
            None => match Self::in_cluster() {
                Some(cc) => cc?,
                None => match Kubeconfig::from_default_path() {
                    Some(r) => Self::from_kubeconfig(r?)?,
                    None => return Err(Error::Detect),
                },
            },
        };
        tracing::debug!(server = %cc.server, auth = ?cc.auth, "detected cluster config");
        Ok(cc)
    }
}
