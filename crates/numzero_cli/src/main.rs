//! `numzero` administration CLI.
//!
//! # Responsibility
//! - Open a store on Redis or an embedded SQLite file from flags/environment.
//! - Expose store operations for inspection, seeding and repair.
//! - Print results as JSON on stdout; diagnostics go to the logger.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use numzero_core::config::{DEFAULT_POOL_SIZE, DEFAULT_REDIS_ADDR};
use numzero_core::{
    default_log_level, init_logging, Event, Player, RedisConfig, RedisStore, Rule, Score,
    ScoreService, SqliteConfig, SqliteStore, Store,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "numzero", version, about = "Inspect and administer a numzero store")]
struct Cli {
    #[command(flatten)]
    backend: BackendArgs,

    /// trace|debug|info|warn|error
    #[arg(long, env = "NUMZERO_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Absolute directory for rotating log files; logs go to stderr when unset.
    #[arg(long, env = "NUMZERO_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct BackendArgs {
    /// Use this SQLite database file instead of Redis.
    #[arg(long, env = "NUMZERO_SQLITE_PATH", global = true)]
    sqlite: Option<PathBuf>,

    #[arg(long, env = "NUMZERO_REDIS_ADDR", default_value = DEFAULT_REDIS_ADDR, global = true)]
    redis_addr: String,

    #[arg(long, env = "NUMZERO_REDIS_PASSWORD", hide_env_values = true, global = true)]
    redis_password: Option<String>,

    #[arg(long, env = "NUMZERO_REDIS_DB", default_value_t = 0, global = true)]
    redis_db: i64,

    #[arg(long, default_value_t = DEFAULT_POOL_SIZE, global = true)]
    pool_size: u32,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check that the backend answers.
    Ping,
    /// Delete every rule, player, event and index.
    Flush {
        /// Required confirmation.
        #[arg(long)]
        yes: bool,
    },
    Rule {
        #[command(subcommand)]
        action: RuleCommand,
    },
    Player {
        #[command(subcommand)]
        action: PlayerCommand,
    },
    Event {
        #[command(subcommand)]
        action: EventCommand,
    },
    /// Rebuild a player's event history from stored events.
    Reindex { player: String },
}

#[derive(Debug, Subcommand)]
enum RuleCommand {
    /// Create or replace a rule.
    Put {
        code: String,
        desc: String,
        #[arg(allow_hyphen_values = true)]
        points: i32,
    },
    Get {
        code: String,
    },
    List,
}

#[derive(Debug, Subcommand)]
enum PlayerCommand {
    /// Create or replace a player.
    Put {
        name: String,
        #[arg(long, default_value = "")]
        image: String,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        score: i32,
    },
    Get {
        name: String,
    },
    List,
    /// Players by descending score.
    Leaderboard,
}

#[derive(Debug, Subcommand)]
enum EventCommand {
    /// Record an event; its total is computed from the stored rules.
    Add {
        player: String,
        desc: String,
        #[arg(long, default_value = "")]
        url: String,
        /// `rule` or `rule=times`; repeatable.
        #[arg(long = "score", value_parser = parse_score)]
        scores: Vec<Score>,
    },
    Get {
        id: String,
    },
    /// Most recent events of a player.
    History {
        player: String,
        #[arg(long, default_value_t = 10)]
        count: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    init_logging(level, cli.log_dir.as_deref()).map_err(anyhow::Error::msg)?;

    let store = open_store(&cli.backend)?;
    let result = run(store.as_ref(), cli.command);
    store.close();
    result
}

fn open_store(args: &BackendArgs) -> Result<Box<dyn Store>> {
    if let Some(path) = &args.sqlite {
        let store = SqliteStore::sqlite(SqliteConfig::file(path))
            .with_context(|| format!("failed to open sqlite store `{}`", path.display()))?;
        return Ok(Box::new(store));
    }

    let config = RedisConfig {
        addr: args.redis_addr.clone(),
        password: args.redis_password.clone(),
        db: args.redis_db,
        pool_size: args.pool_size,
        ..RedisConfig::default()
    };
    let store = RedisStore::redis(config)
        .with_context(|| format!("failed to connect to redis at `{}`", args.redis_addr))?;
    Ok(Box::new(store))
}

fn run(store: &dyn Store, command: Command) -> Result<()> {
    match command {
        Command::Ping => {
            store.open()?;
            print_json(&"pong")
        }
        Command::Flush { yes } => {
            if !yes {
                bail!("refusing to flush without --yes");
            }
            store.flush_db()?;
            info!("event=cli_flush module=cli status=ok");
            print_json(&"flushed")
        }
        Command::Rule { action } => run_rule(store, action),
        Command::Player { action } => run_player(store, action),
        Command::Event { action } => run_event(store, action),
        Command::Reindex { player } => {
            let indexed = store
                .reindex_player_events(&player)
                .with_context(|| format!("failed to reindex `{player}`"))?;
            print_json(&indexed)
        }
    }
}

fn run_rule(store: &dyn Store, action: RuleCommand) -> Result<()> {
    match action {
        RuleCommand::Put { code, desc, points } => {
            let rule = Rule::new(code, desc, points);
            store.save_rule(&rule)?;
            print_json(&rule)
        }
        RuleCommand::Get { code } => {
            let rule = store
                .get_rule(&code)
                .with_context(|| format!("rule `{code}`"))?;
            print_json(&rule)
        }
        RuleCommand::List => print_json(&store.list_rules()?),
    }
}

fn run_player(store: &dyn Store, action: PlayerCommand) -> Result<()> {
    match action {
        PlayerCommand::Put { name, image, score } => {
            let player = Player { name, image, score };
            store.save_player(&player)?;
            print_json(&player)
        }
        PlayerCommand::Get { name } => {
            let player = store
                .get_player(&name)
                .with_context(|| format!("player `{name}`"))?;
            print_json(&player)
        }
        PlayerCommand::List => print_json(&store.list_players()?),
        PlayerCommand::Leaderboard => print_json(&ScoreService::new(store).leaderboard()?),
    }
}

fn run_event(store: &dyn Store, action: EventCommand) -> Result<()> {
    let service = ScoreService::new(store);
    match action {
        EventCommand::Add {
            player,
            desc,
            url,
            scores,
        } => {
            let mut event = Event::new(player, desc);
            event.url = url;
            event.scores = scores;
            service
                .record_event(&mut event)
                .context("failed to record event")?;
            print_json(&event)
        }
        EventCommand::Get { id } => {
            let event = store
                .get_event(&id)
                .with_context(|| format!("event `{id}`"))?;
            print_json(&event)
        }
        EventCommand::History { player, count } => {
            print_json(&service.player_history(&player, count)?)
        }
    }
}

fn parse_score(value: &str) -> Result<Score, String> {
    let (rule, times) = match value.split_once('=') {
        Some((rule, times)) => {
            let times = times
                .trim()
                .parse::<i32>()
                .map_err(|err| format!("invalid times in `{value}`: {err}"))?;
            (rule.trim(), times)
        }
        None => (value.trim(), 1),
    };
    if rule.is_empty() {
        return Err(format!("missing rule code in `{value}`"));
    }
    Ok(Score::new(rule, times))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
