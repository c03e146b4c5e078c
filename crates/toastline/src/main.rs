//! toastline - stacked toast notifications for Wayland desktops
//!
//! This is the CLI entry point: it loads the config, spawns the requested
//! toast (or a markup demo) and exits once every toast has been dismissed.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use gtk4::Application;
use gtk4::prelude::*;
use tracing::{debug, error, info, warn};

use toastline::{Severity, StackManager, ToastContent, ToastOverrides, Toaster};
use toastline_core::{Config, Position, logging};

/// toastline - stacked toast notifications for Wayland desktops
#[derive(Parser, Debug)]
#[command(name = "toastline", version, about, long_about = None)]
struct Args {
    /// Toast title
    title: Option<String>,

    /// Toast body text (inline markup supported)
    body: Option<String>,

    /// Path to the configuration file (uses XDG lookup if not specified)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print example configuration and exit
    #[arg(long)]
    print_example_config: bool,

    /// Validate configuration and exit (returns non-zero on errors)
    #[arg(long)]
    check_config: bool,

    /// Severity style of the toast
    #[arg(short, long, value_enum, default_value_t = SeverityArg::Message)]
    severity: SeverityArg,

    /// Screen corner (top-right, top-left, bottom-right, bottom-left)
    #[arg(short, long, value_parser = parse_position)]
    position: Option<Position>,

    /// Time on screen in milliseconds
    #[arg(short, long)]
    duration: Option<u64>,

    /// Fade-out length in milliseconds
    #[arg(long)]
    fadeout: Option<u64>,

    /// Keep the toast until it is clicked away
    #[arg(long)]
    sticky: bool,

    /// Image file shown above the body text
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Show a set of demo toasts exercising the markup language
    #[arg(long)]
    demo: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum SeverityArg {
    Success,
    Info,
    Error,
    Warning,
    Message,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Success => Severity::Success,
            SeverityArg::Info => Severity::Info,
            SeverityArg::Error => Severity::Error,
            SeverityArg::Warning => Severity::Warning,
            SeverityArg::Message => Severity::Message,
        }
    }
}

fn parse_position(s: &str) -> Result<Position, String> {
    Position::parse(s).ok_or_else(|| {
        let valid: Vec<&str> = Position::ALL.iter().map(|p| p.as_str()).collect();
        format!("invalid position '{}', expected one of: {}", s, valid.join(", "))
    })
}

fn main() -> ExitCode {
    let args = Args::parse();

    logging::init(args.verbose);

    // Load configuration using XDG lookup chain
    // If --config is specified, it must exist and be valid (no fallback)
    let load_result = match Config::find_and_load(args.config.as_deref()) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(ref source) = load_result.source {
        info!("Loaded configuration from {:?}", source);
    } else if load_result.used_defaults {
        debug!("Using default configuration (no config file found)");
    }

    let config = load_result.config;

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    for warning in config.warnings() {
        warn!("{}", warning);
    }

    if args.check_config {
        if let Some(ref source) = load_result.source {
            println!("Configuration valid: {}", source.display());
        } else {
            println!("Configuration valid (using defaults)");
        }
        return ExitCode::SUCCESS;
    }

    if args.print_example_config {
        print!("{}", toastline_core::config::DEFAULT_CONFIG_TOML);
        return ExitCode::SUCCESS;
    }

    if !args.demo && args.title.is_none() && args.body.is_none() {
        eprintln!("Error: nothing to show (pass TITLE/BODY or --demo)");
        return ExitCode::FAILURE;
    }

    run_gtk_app(config, args)
}

/// Initialize and run the GTK4 application.
fn run_gtk_app(config: Config, args: Args) -> ExitCode {
    // Default to Wayland backend
    // SAFETY: called before GTK initialization; no other threads are
    // touching env vars yet.
    if std::env::var("GDK_BACKEND").is_err() {
        unsafe {
            std::env::set_var("GDK_BACKEND", "wayland");
        }
    }

    let app = Application::builder()
        .application_id("io.github.toastline")
        .flags(gtk4::gio::ApplicationFlags::NON_UNIQUE)
        .build();

    let config_for_activate = config.clone();

    app.connect_activate(move |app| {
        info!("GTK application activated");

        toastline::css::load_css(&config_for_activate);
        StackManager::init_global(app, config_for_activate.clone());

        // Exit once the last toast is gone.
        let app_for_quit = app.clone();
        StackManager::global().set_on_empty(move || {
            debug!("all toasts dismissed, quitting");
            app_for_quit.quit();
        });

        let toaster = Toaster::new(&config_for_activate);

        if args.demo {
            spawn_demo(&toaster);
            return;
        }

        let overrides = ToastOverrides {
            position: args.position,
            duration_ms: args.duration,
            fadeout_ms: args.fadeout,
            sticky: args.sticky.then_some(true),
            ..Default::default()
        };
        let content = ToastContent {
            title: args.title.clone(),
            text: args.body.clone(),
            image: args.image.as_ref().map(|p| p.display().to_string()),
            buttons: Vec::new(),
        };

        let severity: Severity = args.severity.into();
        let spawned = toaster.custom(&[severity.css_class()], content, overrides);
        if spawned.is_none() {
            warn!("toast content was empty, nothing to display");
            app.quit();
        }
    });

    let empty_args: Vec<String> = vec![];
    let status = app.run_with_args(&empty_args);

    if status == gtk4::glib::ExitCode::SUCCESS {
        ExitCode::SUCCESS
    } else {
        error!("GTK application exited with error");
        ExitCode::FAILURE
    }
}

/// Spawn a handful of toasts exercising severities and markup.
fn spawn_demo(toaster: &Toaster) {
    let _ = toaster.success(
        ToastContent {
            title: Some("Build finished".into()),
            text: Some("Compiled **42** crates in *12.3s*\nArtifacts: ``target/release``".into()),
            ..Default::default()
        },
        ToastOverrides::default(),
    );

    let _ = toaster.info(
        ToastContent {
            title: Some("Update available".into()),
            text: Some("# Release notes\nSee {{the changelog|https://example.com/changelog}} for details.".into()),
            ..Default::default()
        },
        ToastOverrides::default(),
    );

    let _ = toaster.warning(
        ToastContent {
            title: Some("Disk space low".into()),
            text: Some("``/home`` is at **91%**\n---\nConsider cleaning old build artifacts.".into()),
            ..Default::default()
        },
        ToastOverrides::default(),
    );

    let _ = toaster.error(
        ToastContent {
            title: Some("Sync failed".into()),
            text: Some("Could not reach *backup.local*".into()),
            ..Default::default()
        },
        ToastOverrides {
            sticky: Some(false),
            duration_ms: Some(8000),
            ..Default::default()
        },
    );
}
