use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use rnest::api::errors::{Error, Result};
use rnest::api::query::QueryValue;
use rnest::{Client, Operation, Query, Resource, ResourceKind, ResourceParams};
use serde_json::{Value, json};

#[derive(Parser)]
#[command(name = "rnest")]
#[command(version, about = "Query the Echo Nest music metadata API", long_about = None)]
struct Cli {
    /// API host, defaults to $ECHONEST_HOST or the public host
    #[arg(long, global = true)]
    host: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one operation against an artist, track or song
    Call {
        kind: ResourceKind,
        operation: Operation,
        #[command(flatten)]
        identity: IdentityArgs,
        /// Extra query parameter as key=value; repeat a key to send a list
        #[arg(long = "opt", value_name = "KEY=VALUE")]
        options: Vec<String>,
    },
    /// Search artists or songs
    Search {
        target: SearchTarget,
        #[arg(long = "opt", value_name = "KEY=VALUE")]
        options: Vec<String>,
    },
}

#[derive(Args)]
#[group(required = true, multiple = true)]
struct IdentityArgs {
    #[arg(long)]
    id: Option<String>,
    #[arg(long)]
    name: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum SearchTarget {
    Artists,
    Songs,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let client = build_client(cli.host)?;

    match cli.command {
        Commands::Call {
            kind,
            operation,
            identity,
            options,
        } => {
            let params = ResourceParams {
                id: identity.id,
                name: identity.name,
                ..Default::default()
            };
            let resource = client.resource(kind, params)?;
            info!("Calling {kind}/{operation} ...");
            let payload = resource.call(operation, parse_options(&options)?).await?;
            println!("{payload:#}");
        }
        Commands::Search { target, options } => {
            let options = parse_options(&options)?;
            let hits = match target {
                SearchTarget::Artists => client.search_artists(options).await?,
                SearchTarget::Songs => client.search_songs(options).await?,
            };
            info!("Search returned {} results", hits.len());
            for hit in &hits {
                println!("{:#}", summarize(hit));
            }
        }
    }
    Ok(())
}

// --host wins; anything unset falls back to the environment
fn build_client(host: Option<String>) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(host) = host {
        builder = builder.host(host);
    }
    builder.build()
}

// Groups repeated keys into list values, keeping first-seen key order
fn parse_options(raw: &[String]) -> Result<Option<Query>> {
    if raw.is_empty() {
        return Ok(None);
    }
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for option in raw {
        let (key, value) = option.split_once('=').ok_or_else(|| {
            Error::ConfigurationError(format!("option `{option}` is not KEY=VALUE"))
        })?;
        match grouped.iter_mut().find(|(k, _)| k == key) {
            Some((_, values)) => values.push(value.to_string()),
            None => grouped.push((key.to_string(), vec![value.to_string()])),
        }
    }
    let query = grouped
        .into_iter()
        .map(|(key, mut values)| {
            if values.len() == 1 {
                (key, QueryValue::from(values.remove(0)))
            } else {
                (key, QueryValue::from(values))
            }
        })
        .collect::<Query>();
    Ok(Some(query))
}

fn summarize(resource: &Resource) -> Value {
    let identity = resource.identity();
    let mut summary = json!({ "id": identity.id, "name": identity.name });
    if let Value::Object(fields) = &mut summary {
        fields.extend(resource.attributes().clone());
    }
    summary
}
