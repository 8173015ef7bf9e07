//! ACE World Object Dump Tool
//!
//! Builds a world object from a TOML definition and prints the messages the
//! server would send for it.
//!
//! Usage:
//!   ace-world --object <path> [--drop <guid>] [--json]
//!
//! Examples:
//!   ace-world --object ./objects/pathwarden.toml
//!   ace-world --object ./objects/pathwarden.toml --drop 0x80000001 --json

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use ace_world::config::WorldConfig;
use ace_world::game::definition::ObjectDefinition;
use ace_world::game::landblock::LandblockManager;
use ace_world::net::session::Session;
use ace_world::protocol::messages::{build_create_object, build_update_position};
use ace_world::{GameMessage, ObjectGuid, VERSION};

/// CLI arguments
struct Args {
    /// Path to the object definition
    object_path: PathBuf,
    /// Configuration file, overriding the environment
    config_path: Option<PathBuf>,
    /// Inventory item to drop after the initial dump
    drop: Option<ObjectGuid>,
    /// Print JSON instead of hex
    json: bool,
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = std::env::args().collect();

    let mut object_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut drop: Option<ObjectGuid> = None;
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--object" | "-o" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --object".to_string());
                }
                object_path = Some(PathBuf::from(&args[i]));
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --config".to_string());
                }
                config_path = Some(PathBuf::from(&args[i]));
            }
            "--drop" | "-d" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --drop".to_string());
                }
                let guid =
                    parse_guid(&args[i]).ok_or_else(|| format!("Invalid guid: {}", args[i]))?;
                drop = Some(guid);
            }
            "--json" | "-j" => {
                json = true;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            arg => {
                return Err(format!("Unknown argument: {}", arg));
            }
        }
        i += 1;
    }

    let object_path = object_path.ok_or("Missing required argument: --object")?;

    Ok(Args {
        object_path,
        config_path,
        drop,
        json,
    })
}

fn parse_guid(value: &str) -> Option<ObjectGuid> {
    let raw = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => value.parse().ok()?,
    };
    Some(ObjectGuid::new(raw))
}

fn print_help() {
    println!(
        r#"
Object Dump Tool - ACE World v{}

Builds a world object from a TOML definition and prints the create-object
and update-position messages the server would send for it.

USAGE:
    ace-world --object <PATH> [OPTIONS]

REQUIRED:
    -o, --object <PATH>    Object definition (TOML)

OPTIONS:
    -c, --config <PATH>    World configuration file (default: $ACE_WORLD_CONFIG)
    -d, --drop <GUID>      Drop an inventory item and print the messages it sends
    -j, --json             Print JSON instead of hex
    -h, --help             Print this help message
"#,
        VERSION
    );
}

fn init_logging(config: &WorldConfig) {
    let default_filter = if config.debug {
        "debug"
    } else {
        "info,ace_world=debug"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_level(true);

    if config.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// One message in the dump
#[derive(Debug, Serialize)]
struct MessageDump {
    guid: String,
    opcode: String,
    opcode_value: u32,
    len: usize,
    payload: String,
}

impl MessageDump {
    fn new(guid: ObjectGuid, message: &GameMessage) -> Self {
        Self {
            guid: guid.to_string(),
            opcode: message.opcode.to_string(),
            opcode_value: message.opcode.as_u32(),
            len: message.payload.len(),
            payload: to_hex(&message.payload),
        }
    }
}

/// Everything printed for one run
#[derive(Debug, Default, Serialize)]
struct ObjectDump {
    object: String,
    name: String,
    messages: Vec<MessageDump>,
    dropped: Vec<MessageDump>,
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn print_text(dump: &ObjectDump) {
    println!("{} ({})", dump.name, dump.object);
    for message in &dump.messages {
        println!("{} [{} bytes]", message.opcode, message.len);
        println!("  {}", message.payload);
    }
    for message in &dump.dropped {
        println!("{} for {} [{} bytes]", message.opcode, message.guid, message.len);
        println!("  {}", message.payload);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    // Load configuration
    let config = match &args.config_path {
        Some(path) => WorldConfig::load_from(path).await?,
        None => WorldConfig::load().await?,
    };

    init_logging(&config);
    info!(
        version = VERSION,
        config = %config.config_path.display(),
        strict = config.strict_flags,
        "Configuration loaded"
    );

    let content = tokio::fs::read_to_string(&args.object_path)
        .await
        .with_context(|| format!("Failed to read object file: {}", args.object_path.display()))?;
    let definition = ObjectDefinition::from_toml(&content)
        .with_context(|| format!("Failed to parse object file: {}", args.object_path.display()))?;

    let object = definition.build();
    let guid = object.guid();

    let create = build_create_object(&object, config.strict_flags)
        .with_context(|| format!("Object {} failed validation", guid))?;
    let position = build_update_position(&object);

    let mut dump = ObjectDump {
        object: guid.to_string(),
        name: object.name(),
        messages: vec![MessageDump::new(guid, &create), MessageDump::new(guid, &position)],
        ..Default::default()
    };

    if let Some(item) = args.drop {
        let (session, mut outbound_rx) = Session::channel(1, config.outbound_queue_size);
        let world = LandblockManager::new();

        match object.drop_item(item, &session, &world) {
            Some(dropped) => info!(item = %dropped.guid(), position = %dropped.position(), "Dropped item"),
            None => warn!(item = %item, "Item not in inventory"),
        }

        while let Ok(outbound) = outbound_rx.try_recv() {
            dump.dropped.push(MessageDump::new(outbound.guid, &outbound.message));
        }
    }

    if args.json {
        let json = serde_json::to_string_pretty(&dump).context("Failed to serialize dump")?;
        println!("{}", json);
    } else {
        print_text(&dump);
    }

    Ok(())
}
