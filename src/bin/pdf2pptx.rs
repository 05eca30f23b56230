//! CLI binary for pdf2pptx.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig`, sets up logging and reports the result.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2pptx::{
    convert, ConversionConfig, ConversionProgressCallback, ConversionStats, Pdf2PptxError,
    ProgressCallback,
};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar that first counts rendered pages,
/// then slides added to the deck.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// Spinner until `on_conversion_start` reports the page count.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    fn activate_bar(&self, total: usize, prefix: &'static str) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.set_style(progress_style);
        self.bar.set_prefix(prefix);
        self.bar.reset_eta();
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        self.activate_bar(total_pages, "Rendering");
    }

    fn on_page_rendered(&self, page_num: usize, _total_pages: usize) {
        self.bar.set_position(page_num as u64);
    }

    fn on_slide_added(&self, page_num: usize, total_pages: usize) {
        if page_num == 1 {
            self.activate_bar(total_pages, "Building ");
        }
        self.bar.set_position(page_num as u64);
    }

    fn on_conversion_complete(&self, _total_slides: usize) {
        self.bar.finish_and_clear();
    }
}

/// Stdout writer for log lines that hides the progress bar while a line is
/// printed, so the two never interleave on the terminal.
struct LogWriter {
    bar: Option<ProgressBar>,
    to_stderr: bool,
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let to_stderr = self.to_stderr;
        let emit = || {
            if to_stderr {
                io::stderr().write(buf)
            } else {
                io::stdout().write(buf)
            }
        };
        match self.bar {
            Some(ref bar) => bar.suspend(emit),
            None => emit(),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.to_stderr {
            io::stderr().flush()
        } else {
            io::stdout().flush()
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion at the default 600 DPI
  pdf2pptx -f slides.pdf -t slides.pptx

  # Lower resolution, smaller deck
  pdf2pptx -f report.pdf -t report.pptx -d 200 --jpeg-quality 60

  # Reuse the master, theme and "Title and Content" layout of a template
  pdf2pptx -f talk.pdf -t talk.pptx --template corporate.pptx

  # Machine-readable run summary
  pdf2pptx -f talk.pdf -t talk.pptx --json > stats.json

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to libpdfium (file or directory)
  RUST_LOG          Log filter, overrides --verbose (e.g. pdf2pptx=debug)
  PDF2PPTX_*        Default for the flag of the same name (PDF2PPTX_DPI, …)

SETUP:
  pdfium is loaded at run time. Download a build from
  https://github.com/bblanchon/pdfium-binaries and either set
  PDFIUM_LIB_PATH or place the library next to the pdf2pptx executable.
"#;

#[derive(Parser, Debug)]
#[command(
    name = "pdf2pptx",
    version,
    about = "Convert a PDF into a PowerPoint deck, one picture slide per page",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file to convert.
    #[arg(short, long = "from", env = "PDF2PPTX_FROM")]
    from: PathBuf,

    /// Output .pptx file.
    #[arg(short, long = "to", env = "PDF2PPTX_TO")]
    to: PathBuf,

    /// Rendering resolution for page images.
    #[arg(short, long, env = "PDF2PPTX_DPI", default_value_t = pdf2pptx::DEFAULT_DPI,
          value_parser = clap::value_parser!(u32).range(1..))]
    dpi: u32,

    /// Template deck whose master, theme and layout the slides reuse.
    #[arg(long, env = "PDF2PPTX_TEMPLATE")]
    template: Option<PathBuf>,

    /// Password for an encrypted PDF.
    #[arg(long, env = "PDF2PPTX_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// JPEG quality of the embedded page images.
    #[arg(long, env = "PDF2PPTX_JPEG_QUALITY", default_value_t = pdf2pptx::DEFAULT_JPEG_QUALITY,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    jpeg_quality: u8,

    /// Print the run summary as JSON on stdout.
    #[arg(long, env = "PDF2PPTX_JSON")]
    json: bool,

    /// Do not show the progress bar.
    #[arg(long, env = "PDF2PPTX_NO_PROGRESS")]
    no_progress: bool,

    /// Increase output verbosity.
    #[arg(short, long, env = "PDF2PPTX_VERBOSE")]
    verbose: bool,

    /// Only log errors.
    #[arg(short, long, env = "PDF2PPTX_QUIET", conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Progress bar ─────────────────────────────────────────────────────
    // Drawn on stderr, so only when stderr is a terminal.
    let show_progress =
        !cli.quiet && !cli.no_progress && !cli.json && io::stderr().is_terminal();
    let progress = show_progress.then(CliProgressCallback::new_dynamic);

    // ── Logging setup ────────────────────────────────────────────────────
    // Log lines go to stdout, except in --json mode where stdout carries
    // the summary document.
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    let bar = progress.as_ref().map(|p| p.bar.clone());
    let to_stderr = cli.json;
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(move || LogWriter {
            bar: bar.clone(),
            to_stderr,
        })
        .with_ansi(false)
        .event_format(LevelDashMessage)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let callback = progress.map(|p| p as ProgressCallback);
        match run(&cli, callback) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                match err.downcast_ref::<Pdf2PptxError>() {
                    Some(e) => error!("{}: {:#}", e.kind(), err),
                    None => error!("{:#}", err),
                }
                ExitCode::from(1)
            }
        }
    })
}

fn run(cli: &Cli, progress: Option<ProgressCallback>) -> Result<()> {
    let config = build_config(cli, progress.clone())?;

    let result = convert(&cli.from, &cli.to, &config);
    if let Some(ref cb) = progress {
        if result.is_err() {
            cb.on_conversion_complete(0);
        }
    }
    let stats = result.context("Conversion failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&stats).context("Failed to serialise stats")?;
        println!("{json}");
    } else if progress.is_some() {
        print_summary(&stats);
    }
    Ok(())
}

fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .dpi(cli.dpi)
        .jpeg_quality(cli.jpeg_quality);

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(ref template) = cli.template {
        builder = builder.template(template.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    Ok(builder.build()?)
}

fn print_summary(stats: &ConversionStats) {
    eprintln!(
        "{}  {} slides  {}ms  →  {}",
        green("✔"),
        stats.slide_count,
        stats.total_duration_ms,
        bold(&stats.output.display().to_string()),
    );
    eprintln!(
        "   {} {}",
        dim(&format!("{} dpi", stats.dpi)),
        match stats.layout_name {
            Some(ref name) if stats.template_used => cyan(&format!("layout \"{name}\"")),
            _ => dim("blank layout"),
        }
    );
}

/// `LEVEL - message` lines, no timestamp or target.
struct LevelDashMessage;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for LevelDashMessage
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        use std::fmt::Write as _;

        write!(writer, "{} - ", event.metadata().level())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
