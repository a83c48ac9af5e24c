mod init;
pub use init::cmd_init;

use std::io::IsTerminal;
use std::path::Path;

use tracing::{debug, warn};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::todo_io::home_dir;
use crate::model::config::{Config, Template, is_valid_tag_name};
use crate::model::task::Priority;
use crate::ops::capture_ops::ComposeRequest;
use crate::parse::parse_date;
use crate::service::TodoService;
use crate::util::clock::{Clock, FixedClock, ZonedClock};

/// Environment variable that pins "today" to a fixed date
pub const TODAY_ENV: &str = "QD_TODAY";

/// Width used when stdout is a terminal of unknown size
const DEFAULT_WIDTH: usize = 80;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let config_path = match cli.config {
        Some(path) => path,
        None => config_io::default_config_path()?,
    };
    debug!(config = %config_path.display(), "resolved config path");

    match cli.command {
        Commands::Init(args) => cmd_init(args, &config_path, json),
        Commands::Add(args) => cmd_add(args, &config_path, json),
        Commands::Urgent => cmd_urgent(&config_path, json),
        Commands::List => cmd_list(&config_path, json),
        Commands::Done(args) => cmd_done(args, &config_path, json),
        Commands::Templates => cmd_templates(&config_path, json),
        Commands::Template(cmd) => match cmd.action {
            TemplateAction::Add(args) => cmd_template_add(args, &config_path, json),
            TemplateAction::Remove(args) => cmd_template_remove(args, &config_path, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The clock every operation in this process shares
fn make_clock(config: &Config) -> Result<Box<dyn Clock>, Box<dyn std::error::Error>> {
    if let Ok(pinned) = std::env::var(TODAY_ENV) {
        let date = parse_date(pinned.trim())
            .ok_or_else(|| format!("{} must be YYYY-MM-DD, got {:?}", TODAY_ENV, pinned))?;
        debug!(%date, "clock pinned");
        return Ok(Box::new(FixedClock(date)));
    }
    Ok(Box::new(ZonedClock::new(config_io::utc_offset(config)?)))
}

fn load_service(
    config_path: &Path,
) -> Result<(Config, TodoService<Box<dyn Clock>>), Box<dyn std::error::Error>> {
    let (config, _) = config_io::read_config(config_path)?;
    let clock = make_clock(&config)?;
    let service = TodoService::new(&config, clock, home_dir().as_deref());
    debug!(file = %service.file_path().display(), "loaded config");
    Ok((config, service))
}

/// Resolve `-t` to a template index: numbers pass through (out of range
/// means no template), names must exist.
fn resolve_template(config: &Config, reference: Option<&str>) -> Result<i64, String> {
    let Some(reference) = reference else {
        return Ok(-1);
    };
    if let Ok(index) = reference.parse::<i64>() {
        if !usize::try_from(index).is_ok_and(|i| i < config.templates.len()) {
            warn!(index, "template index out of range, capturing without a template");
        }
        return Ok(index);
    }
    config
        .template_position(reference)
        .map(|i| i as i64)
        .ok_or_else(|| format!("no template named {:?}", reference))
}

fn terminal_width() -> usize {
    if !std::io::stdout().is_terminal() {
        return usize::MAX;
    }
    crossterm::terminal::size()
        .map(|(cols, _)| cols as usize)
        .unwrap_or(DEFAULT_WIDTH)
}

fn print_reply(reply: &Reply) -> CmdResult {
    println!("{}", serde_json::to_string(reply)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Task commands
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, config_path: &Path, json: bool) -> CmdResult {
    let (config, service) = load_service(config_path)?;
    let request = ComposeRequest {
        text: args.text.join(" "),
        priority: args.priority,
        due_today: args.today,
        template_index: resolve_template(&config, args.template.as_deref())?,
    };
    let line = service.compose(&request)?;

    if json {
        print_reply(&Reply::with_line(line))
    } else {
        println!("added: {}", line);
        Ok(())
    }
}

fn cmd_urgent(config_path: &Path, json: bool) -> CmdResult {
    let (_, service) = load_service(config_path)?;
    let items = service.list_urgent()?;

    if json {
        print_reply(&Reply::with_todos(items))
    } else {
        println!("{}", render_urgent(&items, terminal_width()));
        Ok(())
    }
}

fn cmd_list(config_path: &Path, json: bool) -> CmdResult {
    let (_, service) = load_service(config_path)?;
    let tasks = service.list_active()?;

    if json {
        print_reply(&Reply::with_tasks(tasks))
    } else {
        println!("{}", render_list(&tasks, terminal_width()));
        Ok(())
    }
}

fn cmd_done(args: DoneArgs, config_path: &Path, json: bool) -> CmdResult {
    let (_, service) = load_service(config_path)?;
    let line = service.complete(args.line)?;

    if json {
        print_reply(&Reply::with_line(line))
    } else {
        println!("done: {}", line);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Template commands
// ---------------------------------------------------------------------------

fn cmd_templates(config_path: &Path, json: bool) -> CmdResult {
    let (config, _) = config_io::read_config(config_path)?;
    if json {
        print_reply(&Reply::with_templates(&config.templates))
    } else {
        println!("{}", render_templates(&config.templates));
        Ok(())
    }
}

fn cmd_template_add(args: TemplateAddArgs, config_path: &Path, json: bool) -> CmdResult {
    let priority = match args.priority.as_deref() {
        None => None,
        Some(p) => Some(Priority::parse(p).ok_or_else(|| format!("invalid priority {:?}", p))?),
    };
    if let Some(bad) = args
        .projects
        .iter()
        .chain(&args.contexts)
        .find(|name| !is_valid_tag_name(name))
    {
        return Err(format!(
            "invalid project or context {:?}: must be non-empty with no whitespace",
            bad
        )
        .into());
    }
    let template = Template {
        name: args.name,
        projects: args.projects,
        contexts: args.contexts,
        priority,
    };

    let (_, mut doc) = config_io::read_config(config_path)?;
    config_io::add_template_to_config(&mut doc, &template)?;
    config_io::write_config(config_path, &doc)?;

    if json {
        print_reply(&Reply::ok())
    } else {
        println!("added template {}", template.name);
        Ok(())
    }
}

fn cmd_template_remove(args: TemplateRemoveArgs, config_path: &Path, json: bool) -> CmdResult {
    let (_, mut doc) = config_io::read_config(config_path)?;
    config_io::remove_template_from_config(&mut doc, &args.name)?;
    config_io::write_config(config_path, &doc)?;

    if json {
        print_reply(&Reply::ok())
    } else {
        println!("removed template {}", args.name);
        Ok(())
    }
}
