use crate::{
    api::{AssetKind, Backend, DurationBucket, HttpBackend},
    chat::{ChatSession, SubmitOutcome},
    config::Config,
    dashboard::Dashboard,
    podcast::PodcastPanel,
    project::{ProjectPage, ProjectView},
    render,
    upload::UploadPanel,
    util::{confirm, ensure_dir, write_file},
};
use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "pdfcast")]
#[command(about = "Chat with your PDFs and turn them into podcasts")]
#[command(long_about = render::ABOUT)]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./pdfcast.toml if present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL (overrides PDFCAST_API_URL and the config file).
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// What this tool does and how to get started.
    About {},
    /// Check that the backend is reachable.
    Status {},
    Projects {
        #[command(subcommand)]
        cmd: ProjectsCommand,
    },
    Project {
        #[command(subcommand)]
        cmd: ProjectCommand,
    },
    /// Attach a PDF to a project.
    Upload {
        #[arg(long)]
        project: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Ask questions about a project's PDF. Reads stdin when --query is absent.
    Chat {
        #[arg(long)]
        project: String,
        #[arg(long)]
        query: Option<String>,
        #[arg(long)]
        top_k: Option<u32>,
    },
    Podcast {
        #[command(subcommand)]
        cmd: PodcastCommand,
    },
    Asset {
        #[command(subcommand)]
        cmd: AssetCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProjectsCommand {
    List {},
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Delete {
        #[arg(long)]
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    Show {
        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum PodcastCommand {
    Generate {
        #[arg(long)]
        project: String,
        #[arg(long)]
        duration: Option<DurationBucket>,
        #[arg(long)]
        topic: Option<String>,
    },
    List {
        #[arg(long)]
        project: String,
        /// Index of the entry to expand (0 is the newest).
        #[arg(long)]
        select: Option<usize>,
    },
}

#[derive(Subcommand, Debug)]
pub enum AssetCommand {
    Url {
        #[arg(long)]
        kind: AssetKind,
        #[arg(long)]
        name: String,
    },
    Download {
        #[arg(long)]
        kind: AssetKind,
        #[arg(long)]
        name: String,
        #[arg(long)]
        out: PathBuf,
    },
}

struct Ctx<'a> {
    cfg: &'a Config,
    backend: HttpBackend,
    rt: Runtime,
    json: bool,
}

impl Ctx<'_> {
    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", text());
        }
        Ok(())
    }
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg = match resolve_config_path(args.config.as_deref()) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    let log_path = resolve_log_path(&cfg);
    let _guard = init_logging(&args, &cfg, log_path.as_deref())?;

    if let Command::About {} = &args.cmd {
        println!("{}", render::ABOUT);
        return Ok(());
    }

    let base_url = cfg.resolve_base_url(args.api_url.as_deref());
    let backend = HttpBackend::new(&base_url).with_context(|| "configuring backend URL")?;
    debug!(base_url = %backend.base_url(), "backend configured");

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .with_context(|| "building async runtime")?;

    let ctx = Ctx {
        cfg: &cfg,
        backend,
        rt,
        json: args.json || cfg.output.json,
    };

    match args.cmd {
        Command::About {} => Ok(()),
        Command::Status {} => status(&ctx),
        Command::Projects { cmd } => projects(&ctx, cmd),
        Command::Project {
            cmd: ProjectCommand::Show { id },
        } => project_show(&ctx, &id),
        Command::Upload { project, file } => upload(&ctx, &project, &file),
        Command::Chat {
            project,
            query,
            top_k,
        } => chat(&ctx, &project, query.as_deref(), top_k),
        Command::Podcast { cmd } => podcast(&ctx, cmd),
        Command::Asset { cmd } => asset(&ctx, cmd),
    }
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    let default = PathBuf::from("pdfcast.toml");
    default.exists().then_some(default)
}

fn init_logging(args: &Args, cfg: &Config, file_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn resolve_log_path(cfg: &Config) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }
    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }
    Some(PathBuf::from("pdfcast.log"))
}

fn status(ctx: &Ctx) -> Result<()> {
    let status = ctx.rt.block_on(ctx.backend.status())?;
    ctx.emit(&status, || {
        let yes_no = |b: Option<bool>| match b {
            Some(true) => "yes",
            Some(false) => "no",
            None => "unknown",
        };
        format!(
            "backend {} at {}\n  database connected: {}\n  projects: {}\n  speech synthesis configured: {}",
            status.status,
            ctx.backend.base_url(),
            yes_no(status.mongodb_connected),
            status
                .project_count
                .map(|n| n.to_string())
                .unwrap_or_else(|| "unknown".into()),
            yes_no(status.cartesia_configured),
        )
    })
}

fn projects(ctx: &Ctx, cmd: ProjectsCommand) -> Result<()> {
    let mut dashboard = Dashboard::new(&ctx.backend);
    match cmd {
        ProjectsCommand::List {} => {
            ctx.rt.block_on(dashboard.load());
            if let Some(err) = dashboard.error() {
                bail!("{err}");
            }
            ctx.emit(&dashboard.cards(), || render::project_cards(dashboard.cards()))
        }
        ProjectsCommand::Create { name, description } => {
            let created = ctx.rt.block_on(dashboard.create(&name, &description))?;
            ctx.emit(&created, || {
                format!(
                    "created {} ({})\n\n{}",
                    created.name,
                    created.project_id,
                    render::project_cards(dashboard.cards())
                )
            })
        }
        ProjectsCommand::Delete { id, yes } => {
            if !yes && !confirm(&format!("Are you sure you want to delete project {id}?"))? {
                info!(project_id = %id, "delete cancelled");
                return Ok(());
            }
            ctx.rt.block_on(async {
                dashboard.load().await;
                dashboard.delete(&id).await
            })?;
            ctx.emit(&dashboard.cards(), || {
                format!("deleted {id}\n\n{}", render::project_cards(dashboard.cards()))
            })
        }
    }
}

fn project_show(ctx: &Ctx, id: &str) -> Result<()> {
    let mut page = ProjectPage::new(&ctx.backend, id);
    ctx.rt.block_on(page.open());
    let Some(detail) = page.detail() else {
        bail!("{}", page.error().unwrap_or("Failed to fetch project"));
    };
    ctx.emit(detail, || {
        let p = &detail.project;
        let mut text = render::project_view(page.name(), page.view());
        text.push_str(&format!(
            "\n  id: {}\n  description: {}\n  created: {}\n  pdf: {}\n  chunks: {}\n  podcasts: {}",
            p.project_id,
            if p.description.is_empty() { "-" } else { p.description.as_str() },
            render::format_date(&p.created_at),
            p.pdf_filename.as_deref().unwrap_or(crate::dashboard::NO_PDF),
            detail.chunks.len(),
            detail.podcasts.len(),
        ));
        if let (ProjectView::Ready { .. }, Some(name)) = (page.view(), p.pdf_filename.as_deref()) {
            if let Ok(url) = ctx.backend.pdf_url(name) {
                text.push_str(&format!("\n  view: {url}"));
            }
        }
        text
    })
}

fn upload(ctx: &Ctx, project: &str, file: &Path) -> Result<()> {
    let mut panel = UploadPanel::new(&ctx.backend, project, ctx.cfg.upload.max_file_bytes);
    let receipt = ctx
        .rt
        .block_on(panel.upload(file))
        .with_context(|| format!("uploading {}", file.display()))?;
    ctx.emit(&receipt, || render::upload_receipt(&receipt))
}

fn chat(ctx: &Ctx, project: &str, query: Option<&str>, top_k: Option<u32>) -> Result<()> {
    let top_k = top_k.unwrap_or(ctx.cfg.chat.top_k);
    let mut session = ChatSession::new(&ctx.backend, project, top_k, &ctx.cfg.chat.greeting);

    if let Some(query) = query {
        let outcome = ctx.rt.block_on(session.submit(query));
        return match outcome {
            SubmitOutcome::Rejected(r) => bail!("message not sent: {r:?}"),
            SubmitOutcome::Answered => {
                let last = session.messages().last();
                ctx.emit(&last, || last.map(render::chat_message).unwrap_or_default())
            }
            SubmitOutcome::Failed(message) => Err(anyhow!(message)),
        };
    }

    if !ctx.json {
        print!("{}", render::chat_message(&session.messages()[0]));
        eprintln!("(type a question and press Enter; Ctrl-D or /quit to leave)");
    }
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.with_context(|| "reading stdin")?;
        if matches!(line.trim(), "/quit" | "/exit") {
            break;
        }
        let before = session.messages().len();
        if let SubmitOutcome::Rejected(r) = ctx.rt.block_on(session.submit(&line)) {
            debug!(?r, "input ignored");
            continue;
        }
        if !ctx.json {
            for m in &session.messages()[before..] {
                if m.role == crate::chat::Role::Assistant {
                    print!("{}", render::chat_message(m));
                }
            }
        }
    }

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(session.messages())?);
    }
    Ok(())
}

fn podcast(ctx: &Ctx, cmd: PodcastCommand) -> Result<()> {
    let audio_url = |name: &str| {
        ctx.backend
            .audio_url(name)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| name.to_string())
    };

    match cmd {
        PodcastCommand::Generate {
            project,
            duration,
            topic,
        } => {
            let duration = duration.unwrap_or(ctx.cfg.podcast.default_duration);
            let mut panel = PodcastPanel::new(&ctx.backend, project.as_str(), duration);
            let generated = ctx.rt.block_on(async {
                // History is informational here; a failed load is already logged.
                let _ = panel.load().await;
                if let Some(topic) = topic {
                    panel.set_topic(topic);
                }
                info!(project_id = %project, %duration, "generating podcast ({})", duration.label());
                panel.generate().await
            });
            let Some(generated) = generated else {
                bail!(
                    "{}",
                    panel.error().unwrap_or("Failed to generate podcast").to_string()
                );
            };
            ctx.emit(&generated, || {
                format!(
                    "generated {} ({} segments)\n\n{}",
                    generated.podcast_id,
                    generated.segments_count,
                    render::podcast_list(panel.podcasts(), panel.selected_index(), audio_url)
                )
            })
        }
        PodcastCommand::List { project, select } => {
            let mut panel =
                PodcastPanel::new(&ctx.backend, project.as_str(), ctx.cfg.podcast.default_duration);
            ctx.rt.block_on(panel.load())?;
            if let Some(index) = select {
                if !panel.select(index) {
                    bail!("no podcast at index {index} ({} available)", panel.podcasts().len());
                }
            }
            ctx.emit(&panel.podcasts(), || {
                render::podcast_list(panel.podcasts(), panel.selected_index(), audio_url)
            })
        }
    }
}

fn asset(ctx: &Ctx, cmd: AssetCommand) -> Result<()> {
    match cmd {
        AssetCommand::Url { kind, name } => {
            let url = ctx.backend.asset_url(kind, &name)?;
            ctx.emit(&url.as_str(), || url.to_string())
        }
        AssetCommand::Download { kind, name, out } => {
            let bytes = ctx.rt.block_on(ctx.backend.fetch_asset(kind, &name))?;
            write_file(&out, &bytes)?;
            info!(bytes = bytes.len(), out = %out.display(), "asset saved");
            ctx.emit(
                &serde_json::json!({ "name": name, "out": out, "bytes": bytes.len() }),
                || format!("wrote {} bytes to {}", bytes.len(), out.display()),
            )
        }
    }
}
