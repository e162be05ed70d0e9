use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use mediagraph::{
    CompatClass, GenConfig, MediaConverter, MediaHandle, MediaKind, ModelRef, NodeRef, Workflow,
    WorkflowGraph, inputs,
};

#[derive(Parser, Debug)]
#[command(name = "mediagraph", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a workflow from a job description and print or write its JSON.
    Plan(PlanArgs),
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Job JSON: models, input media and conversion steps.
    #[arg(long)]
    job: PathBuf,

    /// Configuration JSON (options, features, family table).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output workflow JSON path. Printed to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// First generated node id.
    #[arg(long, default_value_t = 1)]
    first_id: u64,
}

#[derive(serde::Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct Job {
    #[serde(default)]
    vae: Option<ModelSpec>,
    #[serde(default)]
    audio_vae: Option<ModelSpec>,
    input: InputSpec,
    steps: Vec<Step>,
}

#[derive(serde::Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct ModelSpec {
    #[serde(default)]
    compat: Option<String>,
    #[serde(default = "default_vae_loader")]
    loader: String,
    #[serde(default)]
    file: Option<String>,
}

#[derive(serde::Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct InputSpec {
    kind: MediaKind,
    #[serde(default)]
    compat: Option<String>,
    #[serde(default = "default_source_loader")]
    loader: String,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    frames: Option<u32>,
    #[serde(default)]
    fps: Option<u32>,
    #[serde(default)]
    attached_audio: Option<MediaKind>,
}

#[derive(serde::Deserialize, Debug)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
enum Step {
    Decode {
        #[serde(default)]
        want_audio: Option<bool>,
    },
    Encode,
    EnsureAudio,
    AsSamplingLatent,
    AsLatentImage,
    AsRawImage,
    Save {
        #[serde(default)]
        id: Option<String>,
    },
}

fn default_vae_loader() -> String {
    "VAELoader".to_string()
}

fn default_source_loader() -> String {
    "LoadImage".to_string()
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Plan(args) => cmd_plan(args),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let job = read_job(&args.job)?;
    let cfg = match &args.config {
        Some(path) => GenConfig::from_path(path)?,
        None => GenConfig::default(),
    };

    let mut wf = Workflow::with_first_id(args.first_id);
    let vae = job
        .vae
        .as_ref()
        .map(|spec| load_model(&mut wf, spec))
        .transpose()?;
    let audio_vae = job
        .audio_vae
        .as_ref()
        .map(|spec| load_model(&mut wf, spec))
        .transpose()?;
    let mut handle = load_input(&mut wf, &job.input)?;

    let mut conv = MediaConverter::from_config(&mut wf, &cfg);
    for (i, step) in job.steps.iter().enumerate() {
        handle = run_step(&mut conv, &handle, step, vae.as_ref(), audio_vae.as_ref())
            .with_context(|| format!("step {i} ({step:?})"))?;
        tracing::info!(step = i, kind = %handle.kind(), at = %handle.location(), "step done");
    }

    let json = serde_json::to_string_pretty(&wf.to_json()?)?;
    match &args.out {
        Some(out) => {
            if let Some(parent) = out.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(out, json)
                .with_context(|| format!("write workflow '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn read_job(path: &Path) -> anyhow::Result<Job> {
    let f = std::fs::File::open(path)
        .with_context(|| format!("open job JSON '{}'", path.display()))?;
    serde_json::from_reader(std::io::BufReader::new(f))
        .with_context(|| format!("parse job JSON '{}'", path.display()))
}

fn load_model(wf: &mut Workflow, spec: &ModelSpec) -> anyhow::Result<ModelRef> {
    let node_inputs = match &spec.file {
        Some(file) => inputs([("vae_name", file.as_str().into())]),
        None => inputs([]),
    };
    let id = wf.create_node(&spec.loader, node_inputs, None)?;
    Ok(ModelRef::new(
        NodeRef::new(id, 0),
        spec.compat.as_deref().map(CompatClass::new),
    ))
}

fn load_input(wf: &mut Workflow, spec: &InputSpec) -> anyhow::Result<MediaHandle> {
    let id = wf.create_node(&spec.loader, inputs([]), None)?;
    let handle = MediaHandle::new(NodeRef::new(id, 0), spec.kind)
        .with_compat(spec.compat.as_deref().map(CompatClass::new))
        .with_size(spec.width, spec.height)
        .with_frames(spec.frames)
        .with_fps(spec.fps);
    let Some(audio_kind) = spec.attached_audio else {
        return Ok(handle);
    };
    let audio_id = wf.create_node("LoadAudio", inputs([]), None)?;
    let audio = MediaHandle::new(NodeRef::new(audio_id, 0), audio_kind);
    Ok(handle.with_attached_audio(audio)?)
}

fn run_step(
    conv: &mut MediaConverter<'_>,
    handle: &MediaHandle,
    step: &Step,
    vae: Option<&ModelRef>,
    audio_vae: Option<&ModelRef>,
) -> anyhow::Result<MediaHandle> {
    let next = match step {
        Step::Decode { want_audio } => {
            let model = if handle.kind() == MediaKind::LatentAudio {
                audio_vae
            } else {
                vae
            };
            conv.decode(handle, model, *want_audio)?
        }
        Step::Encode => {
            let model = if handle.kind() == MediaKind::Audio {
                audio_vae
            } else {
                vae
            };
            conv.encode(handle, model)?
        }
        Step::EnsureAudio => conv.ensure_audio(handle, vae, audio_vae)?,
        Step::AsSamplingLatent => {
            conv.as_sampling_latent(handle, require_vae(vae)?, audio_vae)?
        }
        Step::AsLatentImage => conv.as_latent_image(handle, require_vae(vae)?)?,
        Step::AsRawImage => conv.as_raw_image(handle, vae)?,
        Step::Save { id } => {
            conv.save_with_id(handle, vae, audio_vae, id.as_deref())?;
            handle.clone()
        }
    };
    Ok(next)
}

fn require_vae(vae: Option<&ModelRef>) -> anyhow::Result<&ModelRef> {
    vae.context("job has no `vae` but the step needs one")
}
