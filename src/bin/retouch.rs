use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "retouch", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply an edit stack to an image.
    Render(RenderArgs),
    /// List operation identifiers in preferred order.
    Operations,
    /// List filter identifiers.
    Filters,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Edit stack JSON. Asset paths resolve relative to this file.
    #[arg(long)]
    stack: Option<PathBuf>,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,

    /// Output format; inferred from the output extension when omitted.
    #[arg(long, value_enum)]
    format: Option<FormatChoice>,

    /// Output dimensions as `WxH`, `Wx` or `xH`.
    #[arg(long)]
    dimensions: Option<String>,

    /// Editor config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend to use; overrides the config preference.
    #[arg(long, value_enum)]
    backend: Option<BackendChoice>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Png,
    Jpeg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendChoice {
    Gpu,
    Software,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Operations => {
            for id in retouch::operations::OPERATION_IDENTIFIERS {
                println!("{id}");
            }
            Ok(())
        }
        Command::Filters => {
            for f in retouch::FilterKind::ALL {
                println!("{:<10} {}", f.identifier(), f.display_name());
            }
            Ok(())
        }
    }
}

fn output_format(args: &RenderArgs) -> anyhow::Result<retouch::OutputFormat> {
    if let Some(choice) = args.format {
        return Ok(match choice {
            FormatChoice::Png => retouch::OutputFormat::Png,
            FormatChoice::Jpeg => retouch::OutputFormat::Jpeg,
        });
    }
    let ext = args
        .out
        .extension()
        .and_then(|e| e.to_str())
        .with_context(|| format!("cannot infer format from '{}'", args.out.display()))?;
    Ok(retouch::OutputFormat::from_extension(ext)?)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => retouch::EditorConfig::from_json_file(path)?,
        None => retouch::EditorConfig::default(),
    };
    match args.backend {
        Some(BackendChoice::Gpu) => config.renderer = retouch::RendererPreference::GpuPreferred,
        Some(BackendChoice::Software) => {
            config.renderer = retouch::RendererPreference::SoftwareOnly
        }
        None => {}
    }

    let format = output_format(&args)?;
    let dimensions = args
        .dimensions
        .as_deref()
        .map(str::parse::<retouch::Dimensions>)
        .transpose()?;

    let source = image::open(&args.in_path)
        .with_context(|| format!("open input image '{}'", args.in_path.display()))?
        .to_rgba8();

    let mut editor = retouch::Editor::new(config);
    editor.set_source(source);
    if let Some(stack_path) = &args.stack {
        let file = retouch::StackFile::from_json_file(stack_path)?;
        let assets_root = stack_path.parent().unwrap_or_else(|| Path::new("."));
        editor.set_stack(file.build(assets_root)?);
    }

    let output = editor.render(retouch::RenderRequest {
        render_type: retouch::RenderType::Buffer,
        format,
        dimensions,
    })?;
    let retouch::RenderOutput::Encoded { bytes, .. } = output else {
        anyhow::bail!("renderer returned pixels for a buffer request (bug)");
    };

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, bytes)
        .with_context(|| format!("write output '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({} backend)",
        args.out.display(),
        editor.backend().map_or("no", |b| b.identifier())
    );
    Ok(())
}
