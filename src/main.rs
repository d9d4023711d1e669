use brrtplus::host::{Mount, RouteTable};
use brrtplus::logging::init_logging;
use brrtplus::runtime_config::LogConfig;
use brrtplus::{
    ApiInfo, HostApp, InfoOverrides, Namespace, Registry, RouteOptions, StaticResource,
};
use clap::{Parser, ValueEnum};
use http::Method;
use serde_json::json;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Parser)]
#[command(name = "brrtplus")]
#[command(about = "Build the demo registry and print its routes and specification", long_about = None)]
struct Cli {
    /// Specification output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Mount the registry under this prefix in the host application
    #[arg(short, long)]
    prefix: Option<String>,

    /// Enable development logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

const LIST_PETS_DOC: &str = "List pets.
---
description: Returns every pet
responses:
  200:
    description: A list of pets
    schema:
      type: array
      items:
        $ref: '#/definitions/Pet'
";

const GET_PET_DOC: &str = "Fetch one pet.
---
parameters:
  - name: id
    in: path
    required: true
    type: string
responses:
  200:
    description: The pet
    schema:
      $ref: '#/definitions/Pet'
";

const LIST_USERS_DOC: &str = "List users.
---
responses:
  200:
    description: A list of users
";

fn build_registry() -> anyhow::Result<Registry> {
    let registry = Registry::new(
        ApiInfo::new("Pet Store")
            .version("1.0.0")
            .description("Demonstration registry"),
    );

    let pets = registry.namespace("pets");
    pets.definition(
        "Pet",
        json!({
            "type": "object",
            "properties": {
                "id": { "type": "string" },
                "name": { "type": "string" }
            }
        }),
    );
    pets.route(["/"], RouteOptions::new())
        .to(StaticResource::new("ListPets").method(Method::GET, Some(LIST_PETS_DOC)))?;
    pets.route(["/{id}"], RouteOptions::new().arg("cache", 30))
        .to(StaticResource::new("GetPet").method(Method::GET, Some(GET_PET_DOC)))?;

    // Created on its own and attached afterwards; its binding is back-filled.
    let users = Namespace::builder("users")
        .description("User accounts")
        .build();
    users
        .route(["/"], RouteOptions::new())
        .to(StaticResource::new("ListUsers").method(Method::GET, Some(LIST_USERS_DOC)))?;
    registry.add_namespace(&users, Some("/accounts"))?;

    registry
        .default_namespace()
        .route(["/health"], RouteOptions::new().doc(false))
        .to(StaticResource::new("Health").method(Method::GET, None))?;

    Ok(registry)
}

/// The host the registry binds to: the table itself, or the table behind a mount.
fn bind_host(table: &Arc<RouteTable>, prefix: Option<&str>) -> Arc<dyn HostApp> {
    let host = Arc::clone(table) as Arc<dyn HostApp>;
    match prefix {
        Some(prefix) => Arc::new(Mount::new(prefix, host)),
        None => host,
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = if cli.verbose {
        LogConfig::default_dev()
    } else {
        LogConfig::from_env()
    };
    init_logging(&config)?;

    let registry = build_registry()?;

    let table = Arc::new(RouteTable::new());
    registry.init_app(bind_host(&table, cli.prefix.as_deref()), InfoOverrides::default())?;
    table.dump_routes();

    let doc = registry.spec()?;
    let rendered = match cli.format {
        OutputFormat::Json => doc.to_json_pretty()?,
        OutputFormat::Yaml => doc.to_yaml()?,
    };
    println!("{rendered}");
    Ok(())
}
