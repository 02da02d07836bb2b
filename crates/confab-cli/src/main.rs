use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{RwLock, mpsc};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use confab_core::{
    AgentCatalog, ChatOrchestrator, ConversationStore, GroupAppendSink, OrchestratorConfig,
    UserProfile, select_agents, synthesize_response,
};
use confab_scheduler::{ReplyConfig, ReplyRunner};
use config::ConfabConfig;

#[derive(Parser)]
#[command(name = "confab")]
#[command(version)]
#[command(about = "Confab — multi-agent group chat in the terminal")]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session
    Chat,

    /// Print each selected agent's reply to a one-shot message
    Ask {
        /// The message to send
        message: String,
    },

    /// List agents in the catalog
    Agents {
        /// Include agents that are not installed
        #[arg(long)]
        all: bool,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Initialize config directory and default config
    Init,

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Chat => cmd_chat(&cli.config).await,
        Commands::Ask { message } => cmd_ask(&cli.config, &message).await,
        Commands::Agents { all, json } => cmd_agents(all, json),
        Commands::Init => cmd_init().await,
        Commands::Config => cmd_config(&cli.config),
    }
}

async fn cmd_init() -> Result<()> {
    let config_dir = config::config_dir();
    tokio::fs::create_dir_all(&config_dir)
        .await
        .with_context(|| format!("Failed to create config dir: {}", config_dir.display()))?;

    let config_path = config_dir.join("config.toml");
    if config_path.exists() {
        warn!("Config already exists at {}", config_path.display());
    } else {
        let default_config = include_str!("../../../config/default.toml");
        tokio::fs::write(&config_path, default_config).await?;
        info!("Created default config at {}", config_path.display());
    }

    println!("Confab initialized at {}", config_dir.display());
    println!("Edit {} to adjust chat timing.", config_path.display());
    Ok(())
}

fn cmd_config(config_path: &Option<PathBuf>) -> Result<()> {
    let config = ConfabConfig::load_or_default(config_path)?;
    println!("{config:#?}");
    Ok(())
}

fn cmd_agents(all: bool, json: bool) -> Result<()> {
    let catalog = AgentCatalog::builtin();
    let profiles: Vec<_> = catalog
        .all()
        .iter()
        .filter(|p| all || p.is_installed)
        .cloned()
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&profiles)?);
        return Ok(());
    }

    for profile in &profiles {
        let marker = if profile.is_installed { "*" } else { " " };
        println!(
            "{} {:<16} {:<14} {:<8} ★{:<4} ↓{}",
            marker,
            profile.id,
            profile.name,
            profile.category.as_deref().unwrap_or("-"),
            profile.rating.unwrap_or(0.0),
            profile.downloads.unwrap_or(0),
        );
    }
    println!("(* = 已安装)");
    Ok(())
}

async fn cmd_ask(config_path: &Option<PathBuf>, message: &str) -> Result<()> {
    let config = ConfabConfig::load_or_default(config_path)?;
    let catalog = AgentCatalog::builtin();

    let selected = select_agents(message, catalog.all(), config.chat.max_agents);
    if selected.is_empty() {
        println!("(没有已安装的agent)");
        return Ok(());
    }

    for agent in &selected {
        println!("── {} ──", agent.name);
        println!("{}\n", synthesize_response(message, agent));
    }
    Ok(())
}

async fn cmd_chat(config_path: &Option<PathBuf>) -> Result<()> {
    let config = ConfabConfig::load_or_default(config_path)?;

    let user = UserProfile::new("user-1", &config.user.name, &config.user.avatar);
    let store = Arc::new(RwLock::new(ConversationStore::new(user)));
    let catalog = Arc::new(RwLock::new(AgentCatalog::builtin()));

    let (echo_tx, mut echo_rx) = mpsc::unbounded_channel();
    let sink = Arc::new(GroupAppendSink::with_echo(store.clone(), echo_tx));
    let runner = ReplyRunner::with_config(
        sink,
        ReplyConfig {
            initial_delay: Duration::from_millis(config.chat.initial_delay_ms),
            stagger: Duration::from_millis(config.chat.stagger_ms),
            max_pending: config.chat.max_pending,
        },
    );
    let orchestrator = ChatOrchestrator::new(
        store.clone(),
        catalog.clone(),
        runner,
        OrchestratorConfig {
            max_agents: config.chat.max_agents,
        },
    );

    println!("Confab — 输入消息开始对话。");
    println!("命令：/agents /group /invite <id> /install <id> /uninstall <id> /new /quit");

    // Print agent replies as they are delivered
    tokio::spawn(async move {
        while let Some(message) = echo_rx.recv().await {
            println!("\n[{}]\n{}\n", message.sender_name, message.content);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix('/') {
            if !handle_repl_command(command, &store, &catalog, &orchestrator).await? {
                break;
            }
            continue;
        }

        let outcome = orchestrator.send_message(line).await?;
        if outcome.created_group {
            let store = store.read().await;
            if let Some(group) = store.group(&outcome.group_id) {
                let names: Vec<&str> = group.agents().iter().map(|a| a.name.as_str()).collect();
                println!("(新群组 '{}'：{})", group.name, names.join("、"));
            }
        }
    }

    orchestrator.shutdown().await;
    Ok(())
}

/// Handle a slash command in the chat REPL. Returns false to quit.
async fn handle_repl_command(
    command: &str,
    store: &Arc<RwLock<ConversationStore>>,
    catalog: &Arc<RwLock<AgentCatalog>>,
    orchestrator: &ChatOrchestrator,
) -> Result<bool> {
    let mut parts = command.split_whitespace();
    match parts.next().unwrap_or("") {
        "quit" | "exit" => return Ok(false),

        "new" => {
            store.write().await.clear_active();
            println!("(下一条消息将创建新的群组)");
        }

        "agents" => {
            let catalog = catalog.read().await;
            for profile in catalog.all() {
                let marker = if profile.is_installed { "*" } else { " " };
                println!(
                    "{} {:<16} {:<14} {}",
                    marker,
                    profile.id,
                    profile.name,
                    profile.tags.join("、"),
                );
            }
            println!("(* = 已安装)");
        }

        "group" => {
            let store = store.read().await;
            match store.active_group() {
                Some(group) => {
                    println!("{}（{} 条消息）", group.name, group.messages.len());
                    for participant in &group.participants {
                        println!("- {}", participant.name());
                    }
                }
                None => println!("(当前没有活跃群组)"),
            }
        }

        "invite" => match parts.next() {
            Some(id) => {
                let profile = catalog.read().await.get(id).cloned();
                let group_id = store.read().await.active_group().map(|g| g.id.clone());
                match (profile, group_id) {
                    (Some(profile), Some(group_id)) => {
                        let name = profile.name.clone();
                        match orchestrator.toggle_agent(&group_id, profile).await? {
                            Some(confab_core::AgentToggle::Added) => {
                                println!("({name} 加入了群组)")
                            }
                            Some(confab_core::AgentToggle::Removed) => {
                                println!("({name} 离开了群组)")
                            }
                            None => println!("(群组不存在)"),
                        }
                    }
                    (None, _) => println!("(未知agent：{id})"),
                    (_, None) => println!("(当前没有活跃群组)"),
                }
            }
            None => println!("(用法：/invite <agent-id>)"),
        },

        "install" => match parts.next() {
            Some(id) => match catalog.write().await.install(id) {
                Ok(()) => println!("(已安装 {id})"),
                Err(e) => println!("({e})"),
            },
            None => println!("(用法：/install <agent-id>)"),
        },

        "uninstall" => match parts.next() {
            Some(id) => match catalog.write().await.uninstall(id) {
                Ok(()) => {
                    store.write().await.remove_agent_everywhere(id);
                    println!("(已卸载 {id})");
                }
                Err(e) => println!("({e})"),
            },
            None => println!("(用法：/uninstall <agent-id>)"),
        },

        other => println!("(未知命令：/{other})"),
    }
    Ok(true)
}
