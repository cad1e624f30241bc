//! # Nodegroup CLI Entry Point
//!
//! Runs the standalone group admin server and issues admin commands against a
//! running one.
//!
//! ## Usage
//!
//! ```bash
//! # Start the admin server with two online region servers
//! nodegroup serve -b 0.0.0.0:16010 -s rs1:16020 -s rs2:16020
//!
//! # Start from a TOML config file
//! nodegroup serve -c nodegroup.toml
//!
//! # Admin commands print the raw JSON result to stdout
//! nodegroup add-group batch
//! nodegroup move-servers batch -s rs1:16020
//! nodegroup move-tables batch -t sales:orders
//! nodegroup list-groups -u http://10.0.0.5:16010 | jq '.groups[].name'
//! ```

use anyhow::Result;
use argh::FromArgs;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;

use nodegroup_admin::{CoordinatorCell, GroupAdminEndpoint, HostServices, HttpServer, StandaloneHost};
use nodegroup_client::GroupAdminClient;
use nodegroup_common::auth::AuthConfig;
use nodegroup_common::config::{AdminConfig, BALANCER_CLASS_KEY};
use nodegroup_common::model::{Address, TableName};
use nodegroup_common::protocol::{
    AddGroupRequest, AdminMethod, BalanceGroupRequest, GetGroupOfServerRequest,
    GetGroupOfTableRequest, GetGroupRequest, MoveServersRequest, MoveTablesRequest,
    RemoveGroupRequest, ServerName,
};

/// Environment variable supplying the API key when no flag is given.
const API_KEY_ENV: &str = "NODEGROUP_API_KEY";

const DEFAULT_URL: &str = "http://127.0.0.1:16010";

fn validate_http_url(url: &str) -> Result<()> {
    if url.starts_with("http://") {
        Ok(())
    } else {
        Err(anyhow::anyhow!(
            "Invalid admin URL: '{}' must start with http://",
            url
        ))
    }
}

#[derive(FromArgs)]
/// Nodegroup - server group administration
struct Cli {
    #[argh(subcommand)]
    command: Commands,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Commands {
    Serve(ServeArgs),
    GetGroup(GetGroupArgs),
    GroupOfTable(GroupOfTableArgs),
    GroupOfServer(GroupOfServerArgs),
    ListGroups(ListGroupsArgs),
    AddGroup(AddGroupArgs),
    RemoveGroup(RemoveGroupArgs),
    MoveServers(MoveServersArgs),
    MoveTables(MoveTablesArgs),
    BalanceGroup(BalanceGroupArgs),
}

#[derive(FromArgs)]
#[argh(subcommand, name = "serve")]
/// start the group admin server; flags override the config file
struct ServeArgs {
    /// path to a TOML config file
    #[argh(option, short = 'c')]
    config: Option<String>,

    /// address to bind the admin HTTP server to
    #[argh(option, short = 'b')]
    bind: Option<String>,

    /// online server (host:port); repeat for several
    #[argh(option, short = 's', long = "server")]
    servers: Vec<String>,

    /// balancer class reported by the host configuration
    #[argh(option, long = "balancer-class")]
    balancer_class: Option<String>,

    /// API key required in the X-API-Key header
    #[argh(option, long = "api-key")]
    api_key: Option<String>,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "get-group")]
/// show a group by name
struct GetGroupArgs {
    #[argh(positional)]
    group: String,

    /// admin server URL
    #[argh(option, short = 'u', default = "DEFAULT_URL.into()")]
    url: String,

    /// API key
    #[argh(option, long = "api-key")]
    api_key: Option<String>,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "group-of-table")]
/// show the group a table belongs to
struct GroupOfTableArgs {
    #[argh(positional)]
    table: String,

    /// admin server URL
    #[argh(option, short = 'u', default = "DEFAULT_URL.into()")]
    url: String,

    /// API key
    #[argh(option, long = "api-key")]
    api_key: Option<String>,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "group-of-server")]
/// show the group a server belongs to
struct GroupOfServerArgs {
    #[argh(positional)]
    server: String,

    /// admin server URL
    #[argh(option, short = 'u', default = "DEFAULT_URL.into()")]
    url: String,

    /// API key
    #[argh(option, long = "api-key")]
    api_key: Option<String>,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "list-groups")]
/// list every group
struct ListGroupsArgs {
    /// admin server URL
    #[argh(option, short = 'u', default = "DEFAULT_URL.into()")]
    url: String,

    /// API key
    #[argh(option, long = "api-key")]
    api_key: Option<String>,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "add-group")]
/// create an empty group
struct AddGroupArgs {
    #[argh(positional)]
    group: String,

    /// admin server URL
    #[argh(option, short = 'u', default = "DEFAULT_URL.into()")]
    url: String,

    /// API key
    #[argh(option, long = "api-key")]
    api_key: Option<String>,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "remove-group")]
/// remove an empty group
struct RemoveGroupArgs {
    #[argh(positional)]
    group: String,

    /// admin server URL
    #[argh(option, short = 'u', default = "DEFAULT_URL.into()")]
    url: String,

    /// API key
    #[argh(option, long = "api-key")]
    api_key: Option<String>,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "move-servers")]
/// move servers into a group
struct MoveServersArgs {
    #[argh(positional)]
    target_group: String,

    /// server to move (host:port); repeat for several
    #[argh(option, short = 's', long = "server")]
    servers: Vec<String>,

    /// admin server URL
    #[argh(option, short = 'u', default = "DEFAULT_URL.into()")]
    url: String,

    /// API key
    #[argh(option, long = "api-key")]
    api_key: Option<String>,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "move-tables")]
/// move tables into a group
struct MoveTablesArgs {
    #[argh(positional)]
    target_group: String,

    /// table to move (namespace:qualifier); repeat for several
    #[argh(option, short = 't', long = "table")]
    tables: Vec<String>,

    /// admin server URL
    #[argh(option, short = 'u', default = "DEFAULT_URL.into()")]
    url: String,

    /// API key
    #[argh(option, long = "api-key")]
    api_key: Option<String>,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "balance-group")]
/// rebalance the tables of a group across its servers
struct BalanceGroupArgs {
    #[argh(positional)]
    group: String,

    /// admin server URL
    #[argh(option, short = 'u', default = "DEFAULT_URL.into()")]
    url: String,

    /// API key
    #[argh(option, long = "api-key")]
    api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli: Cli = argh::from_env();

    match cli.command {
        Commands::Serve(args) => run_serve(args).await,
        command => run_admin(command).await,
    }
}

/// Merges the config file with command-line overrides.
fn resolve_config(args: &ServeArgs) -> Result<AdminConfig> {
    let mut config = match &args.config {
        Some(path) => AdminConfig::from_file(path)?,
        None => AdminConfig::default(),
    };

    if let Some(bind) = &args.bind {
        config.server.bind = bind.clone();
    }
    if !args.servers.is_empty() {
        config.cluster.servers = args.servers.clone();
    }
    if let Some(class) = &args.balancer_class {
        config.cluster.properties.set(BALANCER_CLASS_KEY, class.clone());
    }
    if let Some(key) = args
        .api_key
        .clone()
        .or_else(|| std::env::var(API_KEY_ENV).ok())
    {
        config.server.api_key = Some(key);
    }

    config.validate()?;
    Ok(config)
}

fn init_tracing(level: &str) {
    // RUST_LOG wins over the configured level
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    init_tracing(&config.logging.level);

    let servers = config.server_addresses()?;
    tracing::info!("Starting group admin server with {} online servers", servers.len());
    if servers.is_empty() {
        tracing::warn!("No servers specified! Use --server <host:port> to add some.");
    }

    let host = Arc::new(StandaloneHost::new(config.cluster.properties.clone(), servers));
    let services: Arc<dyn HostServices> = host.clone();
    let cell = CoordinatorCell::new();
    let endpoint = GroupAdminEndpoint::start(&cell, services)?;

    let auth = AuthConfig::from_optional(config.server.api_key.clone());
    if auth.requires_auth() {
        tracing::info!("API key authentication enabled");
    }
    let server = HttpServer::new(&endpoint)
        .with_auth(auth)
        .with_events(host, endpoint.guard());

    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address {}: {}", config.server.bind, e))?;
    let result = server.run(addr).await;
    endpoint.stop();
    result?;
    Ok(())
}

/// Resolves an admin command to its method and JSON params.
///
/// Arguments are parsed locally so typos fail before any request is sent.
fn admin_request(command: &Commands) -> Result<(AdminMethod, Value)> {
    let request = match command {
        Commands::GetGroup(args) => (
            AdminMethod::GetGroup,
            serde_json::to_value(GetGroupRequest {
                group_name: args.group.clone(),
            })?,
        ),
        Commands::GroupOfTable(args) => {
            let table: TableName = args.table.parse()?;
            (
                AdminMethod::GetGroupOfTable,
                serde_json::to_value(GetGroupOfTableRequest {
                    table_name: table.to_string(),
                })?,
            )
        }
        Commands::GroupOfServer(args) => {
            let server: Address = args.server.parse()?;
            (
                AdminMethod::GetGroupOfServer,
                serde_json::to_value(GetGroupOfServerRequest {
                    server: ServerName::from(&server),
                })?,
            )
        }
        Commands::ListGroups(_) => (AdminMethod::ListGroups, json!({})),
        Commands::AddGroup(args) => (
            AdminMethod::AddGroup,
            serde_json::to_value(AddGroupRequest {
                group_name: args.group.clone(),
            })?,
        ),
        Commands::RemoveGroup(args) => (
            AdminMethod::RemoveGroup,
            serde_json::to_value(RemoveGroupRequest {
                group_name: args.group.clone(),
            })?,
        ),
        Commands::MoveServers(args) => {
            let servers = args
                .servers
                .iter()
                .map(|s| s.parse::<Address>().map(|a| ServerName::from(&a)))
                .collect::<Result<Vec<_>, _>>()?;
            (
                AdminMethod::MoveServers,
                serde_json::to_value(MoveServersRequest {
                    servers,
                    target_group: args.target_group.clone(),
                })?,
            )
        }
        Commands::MoveTables(args) => {
            let table_names = args
                .tables
                .iter()
                .map(|t| t.parse::<TableName>().map(|t| t.to_string()))
                .collect::<Result<Vec<_>, _>>()?;
            (
                AdminMethod::MoveTables,
                serde_json::to_value(MoveTablesRequest {
                    table_names,
                    target_group: args.target_group.clone(),
                })?,
            )
        }
        Commands::BalanceGroup(args) => (
            AdminMethod::BalanceGroup,
            serde_json::to_value(BalanceGroupRequest {
                group_name: args.group.clone(),
            })?,
        ),
        Commands::Serve(_) => return Err(anyhow::anyhow!("serve is not an admin command")),
    };
    Ok(request)
}

fn connection(command: &Commands) -> Option<(&str, Option<&str>)> {
    let (url, api_key) = match command {
        Commands::Serve(_) => return None,
        Commands::GetGroup(a) => (&a.url, &a.api_key),
        Commands::GroupOfTable(a) => (&a.url, &a.api_key),
        Commands::GroupOfServer(a) => (&a.url, &a.api_key),
        Commands::ListGroups(a) => (&a.url, &a.api_key),
        Commands::AddGroup(a) => (&a.url, &a.api_key),
        Commands::RemoveGroup(a) => (&a.url, &a.api_key),
        Commands::MoveServers(a) => (&a.url, &a.api_key),
        Commands::MoveTables(a) => (&a.url, &a.api_key),
        Commands::BalanceGroup(a) => (&a.url, &a.api_key),
    };
    Some((url.as_str(), api_key.as_deref()))
}

/// Runs one admin command and prints the raw JSON result to stdout.
///
/// No tracing is installed so the output can be piped to other tools.
async fn run_admin(command: Commands) -> Result<()> {
    let (url, api_key) =
        connection(&command).ok_or_else(|| anyhow::anyhow!("not an admin command"))?;
    validate_http_url(url)?;
    let (method, params) = admin_request(&command)?;

    let mut client = GroupAdminClient::new(url)?;
    if let Some(key) = api_key
        .map(str::to_string)
        .or_else(|| std::env::var(API_KEY_ENV).ok())
    {
        client = client.with_api_key(key);
    }

    let result = client.call(method, params).await?;
    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
