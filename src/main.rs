mod args;

use args::Command;
use kube_methods::{CallArg, DynamicClient, Error, MethodListing, MethodsFormat};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

fn print_json(value: &impl serde::Serialize) -> Result<(), Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = args::parse();
    let config = args.connection.cluster_config()?;
    let client = DynamicClient::build(config).await?;

    match args.command {
        Command::Methods { markdown } => {
            let format = if markdown { Some(MethodsFormat::Markdown) } else { None };
            match client.get_methods(format) {
                MethodListing::Markdown(listing) => print!("{}", listing),
                MethodListing::Spec(spec) => print_json(spec)?,
            }
        }
        Command::Call {
            group_version,
            method,
            args,
        } => {
            let args = args
                .iter()
                .map(|arg| arg.parse::<CallArg>())
                .collect::<Result<Vec<_>, _>>()?;
            let output = client.invoke(&group_version, &method, &args).await?;
            print_json(&output.into_value())?;
        }
        Command::Raw { verb, path, body } => {
            let body = body.map(|b| serde_json::from_str::<Value>(&b)).transpose()?;
            let output = client.custom_call(&verb, &path, body.as_ref()).await?;
            print_json(&output.into_value())?;
        }
    }
    Ok(())
}
