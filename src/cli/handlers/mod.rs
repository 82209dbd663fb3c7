use std::path::PathBuf;

use reqwest::Client;
use tracing::{debug, info};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::ListService;
use crate::io::http::HttpListService;
use crate::model::config::{ClientConfig, ConfigOverrides};
use crate::model::session::SessionToken;
use crate::model::todo::{NewTodo, Todo, TodoId, TodoPatch};
use crate::ops::{TodoStore, views};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Everything a command needs besides its own args
struct Context {
    config_path: PathBuf,
    /// Config as stored on disk; the only thing ever written back
    file: ClientConfig,
    /// File config with env and flag overrides applied
    config: ClientConfig,
    client: Client,
    json: bool,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub async fn dispatch(cli: Cli) -> CmdResult {
    let config_path = config_io::config_path();
    let file = config_io::read_config_from(&config_path);
    let overrides = ConfigOverrides {
        server: cli.server.clone(),
        token: cli.token.clone(),
    };
    let config = config_io::effective_config(&file, &overrides, |key| std::env::var(key).ok());
    debug!(server = %config.server, path = %config_path.display(), "resolved config");

    let mut ctx = Context {
        config_path,
        file,
        config,
        client: Client::new(),
        json: cli.json,
    };

    match cli.command {
        // Session commands
        Commands::New => cmd_new(&mut ctx).await,
        Commands::Open(args) => cmd_open(&mut ctx, args).await,
        Commands::Share => cmd_share(&ctx),

        // Read commands
        Commands::List(args) => cmd_list(&ctx, args).await,

        // Write commands
        Commands::Add(args) => cmd_add(&ctx, args).await,
        Commands::Edit(args) => cmd_edit(&ctx, args).await,
        Commands::Mark(args) => cmd_mark(&ctx, args).await,
        Commands::Rm(args) => cmd_rm(&ctx, args).await,
        Commands::Mv(args) => cmd_mv(&ctx, args).await,
        Commands::Cat(cmd) => cmd_cat(&ctx, cmd).await,
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn current_token(ctx: &Context) -> Result<SessionToken, Box<dyn std::error::Error>> {
    let raw = ctx
        .config
        .token
        .as_deref()
        .ok_or("no list selected (run `tdl new` or `tdl open <token>`)")?;
    Ok(SessionToken::parse(raw)?)
}

fn service(ctx: &Context) -> Result<HttpListService, Box<dyn std::error::Error>> {
    let token = current_token(ctx)?;
    Ok(HttpListService::with_client(
        ctx.client.clone(),
        ctx.config.server.clone(),
        token,
    ))
}

/// Store for the current list, already loaded from the server.
async fn open_store(ctx: &Context) -> Result<TodoStore<HttpListService>, Box<dyn std::error::Error>> {
    let mut store = TodoStore::new(service(ctx)?);
    store.load().await?;
    Ok(store)
}

fn save_token(ctx: &mut Context, token: &SessionToken) -> CmdResult {
    ctx.file.token = Some(token.to_string());
    config_io::write_config_to(&ctx.config_path, &ctx.file)?;
    info!(path = %ctx.config_path.display(), "saved list token");
    Ok(())
}

fn print_session(ctx: &Context, token: &SessionToken) -> CmdResult {
    let share_url = ctx.config.web_url.as_deref().map(|web| token.share_url(web));
    if ctx.json {
        let out = SessionJson {
            token: token.to_string(),
            share_url,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", share_url.unwrap_or_else(|| token.to_string()));
    }
    Ok(())
}

fn print_todo(ctx: &Context, todo: &Todo) -> CmdResult {
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(todo)?);
    } else {
        println!("{}", format_todo_line(todo));
    }
    Ok(())
}

fn not_found(id: impl std::fmt::Display) -> Box<dyn std::error::Error> {
    format!("todo not found: {}", id).into()
}

/// The id of the loaded todo whose id reads as `input`.
fn resolve_id<S: ListService>(
    store: &TodoStore<S>,
    input: &str,
) -> Result<TodoId, Box<dyn std::error::Error>> {
    store
        .find_by_input(input)
        .map(|t| t.id.clone())
        .ok_or_else(|| not_found(input))
}

// ---------------------------------------------------------------------------
// Session commands
// ---------------------------------------------------------------------------

async fn cmd_new(ctx: &mut Context) -> CmdResult {
    let token = HttpListService::create_list(&ctx.client, &ctx.config.server).await?;
    save_token(ctx, &token)?;
    print_session(ctx, &token)
}

async fn cmd_open(ctx: &mut Context, args: OpenArgs) -> CmdResult {
    let token = SessionToken::from_share_input(&args.list)?;
    let service = HttpListService::with_client(ctx.client.clone(), ctx.config.server.clone(), token);
    if !service.validate().await? {
        return Err(format!("the server does not know list {}", service.token()).into());
    }
    let token = service.token().clone();
    save_token(ctx, &token)?;
    print_session(ctx, &token)
}

fn cmd_share(ctx: &Context) -> CmdResult {
    let token = current_token(ctx)?;
    print_session(ctx, &token)
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

async fn cmd_list(ctx: &Context, args: ListArgs) -> CmdResult {
    let store = open_store(ctx).await?;
    let todos = store.todos();

    if args.group {
        let grouped = views::group_by_category(todos);
        if ctx.json {
            println!("{}", serde_json::to_string_pretty(&groups_to_json(&grouped))?);
        } else {
            for line in format_groups(&grouped) {
                println!("{}", line);
            }
        }
        return Ok(());
    }

    let shown: Vec<&Todo> = match args.category {
        Some(ref label) => views::filter_by_category(todos, label),
        None => todos.iter().collect(),
    };
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
    } else {
        for line in format_listing(shown) {
            println!("{}", line);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

async fn cmd_add(ctx: &Context, args: AddArgs) -> CmdResult {
    // Adding needs no prior load: the store only checks for a repeated id
    let mut store = TodoStore::new(service(ctx)?);
    let new_todo = NewTodo {
        done: args.done,
        name: args.name,
        text: args.text,
        category: args.categories,
    };
    let created = store.add(new_todo).await?;
    if ctx.json {
        print_todo(ctx, &created)
    } else {
        println!("{}", created.id);
        Ok(())
    }
}

async fn cmd_edit(ctx: &Context, args: EditArgs) -> CmdResult {
    let category = if args.clear_categories {
        Some(Vec::new())
    } else if !args.categories.is_empty() {
        Some(args.categories)
    } else {
        None
    };
    let patch = TodoPatch {
        name: args.name,
        text: args.text,
        done: args.done,
        category,
    };
    if patch.is_empty() {
        return Err("nothing to change (use --name, --text, --category, --clear-categories or --done)".into());
    }

    let mut store = open_store(ctx).await?;
    let id = resolve_id(&store, &args.id)?;
    let updated = store.update(&id, patch).await?.ok_or_else(|| not_found(&id))?;
    print_todo(ctx, &updated)
}

async fn cmd_mark(ctx: &Context, args: IdArgs) -> CmdResult {
    let mut store = open_store(ctx).await?;
    let id = resolve_id(&store, &args.id)?;
    let updated = store.toggle(&id).await?.ok_or_else(|| not_found(&id))?;
    print_todo(ctx, &updated)
}

async fn cmd_rm(ctx: &Context, args: IdArgs) -> CmdResult {
    let mut store = open_store(ctx).await?;
    let id = resolve_id(&store, &args.id)?;
    if !store.remove(&id).await? {
        return Err(not_found(&id));
    }
    if ctx.json {
        println!("{}", serde_json::json!({ "removed": id }));
    }
    Ok(())
}

async fn cmd_mv(ctx: &Context, args: MvArgs) -> CmdResult {
    let mut store = open_store(ctx).await?;
    let id = resolve_id(&store, &args.id)?;
    store
        .move_todo(&id, args.direction)
        .await?
        .ok_or_else(|| not_found(&id))?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(store.todos())?);
    } else {
        for line in format_listing(store.todos()) {
            println!("{}", line);
        }
    }
    Ok(())
}

async fn cmd_cat(ctx: &Context, cmd: CatCmd) -> CmdResult {
    let mut store = open_store(ctx).await?;
    let (args, add) = match cmd.action {
        CatAction::Ls => {
            let labels = views::categories(store.todos());
            if ctx.json {
                println!("{}", serde_json::to_string_pretty(&labels)?);
            } else {
                for label in labels {
                    println!("#{}", label);
                }
            }
            return Ok(());
        }
        CatAction::Add(args) => (args, true),
        CatAction::Rm(args) => (args, false),
    };
    let id = resolve_id(&store, &args.id)?;
    let current = store.get(&id).ok_or_else(|| not_found(&id))?;

    let patch = if add {
        views::add_category(current, &args.label).ok_or("category label must not be blank")?
    } else {
        views::remove_category(current, &args.label)
            .ok_or_else(|| format!("todo {} has no category '{}'", id, args.label))?
    };

    let updated = store.update(&id, patch).await?.ok_or_else(|| not_found(&id))?;
    print_todo(ctx, &updated)
}
