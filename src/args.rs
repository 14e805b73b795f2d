use kube_methods::{utils::read_token, ClusterConfig, Error};
use std::{fs, path::PathBuf};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
pub struct Connection {
    /// Api server url; the cluster config is detected when omitted
    #[structopt(long)]
    pub server: Option<String>,
    #[structopt(long, conflicts_with = "token-path")]
    pub token: Option<String>,
    #[structopt(long = "token-path")]
    pub token_path: Option<PathBuf>,
}

impl Connection {
    fn token(&self) -> Result<Option<String>, Error> {
        match (&self.token, &self.token_path) {
            (Some(token), _) => Ok(Some(token.clone())),
            (None, Some(path)) => Ok(Some(read_token(&mut fs::File::open(path)?)?)),
            (None, None) => Ok(None),
        }
    }

    pub fn cluster_config(&self) -> Result<ClusterConfig, Error> {
        let token = self.token()?;
        let config = match &self.server {
            Some(server) => ClusterConfig::new(server.as_str(), token.as_deref())?,
            None => {
                let mut config = ClusterConfig::detect()?;
                if let Some(token) = token {
                    config.auth = kube_methods::AuthMethod::bearer(&token)?;
                }
                config
            }
        };
        Ok(config)
    }
}

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Lists the synthesized methods
    Methods {
        #[structopt(long)]
        markdown: bool,
    },
    /// Calls a synthesized method, e.g. `call apis/apps/v1 getDeployment default web`.
    /// Arguments that are JSON objects are passed as `{"query": .., "body": ..}` configs
    Call {
        group_version: String,
        method: String,
        args: Vec<String>,
    },
    /// Sends a request to an arbitrary path
    Raw {
        verb: String,
        path: String,
        #[structopt(long)]
        body: Option<String>,
    },
}

#[derive(Debug, StructOpt)]
#[structopt(name = "kube-methods")]
pub struct Args {
    #[structopt(flatten)]
    pub connection: Connection,
    #[structopt(subcommand)]
    pub command: Command,
}

pub fn parse() -> Args {
    Args::from_args()
}
