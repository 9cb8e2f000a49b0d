mod context;
mod menu;
mod window;

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use gtk4::{gio, glib};
use libadwaita as adw;
use libadwaita::prelude::*;
use min_core::{launch, AppController, ConfigOverrides, ShellConfig, WindowOrigin};

use crate::context::Shell;

const APP_ID: &str = "org.minbrowser.Min";

#[derive(Parser, Debug)]
#[command(name = "min", version, about = "A fast, minimal web browser")]
struct Cli {
    /// URL to open in a new tab once the browser has loaded
    target: Option<String>,

    /// Load the browser UI from the development server
    #[arg(long)]
    dev: bool,

    /// Directory for per-user state such as the saved window bounds
    #[arg(long, value_name = "DIR")]
    profile_dir: Option<PathBuf>,

    /// Directory containing index.html and the static assets
    #[arg(long, value_name = "DIR")]
    resource_dir: Option<PathBuf>,
}

fn main() -> glib::ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let overrides = ConfigOverrides {
        profile_dir: cli.profile_dir,
        resource_dir: cli.resource_dir,
        development: cli.dev,
    };
    let config = match ShellConfig::from_environment(&overrides) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return glib::ExitCode::FAILURE;
        }
    };
    log::info!(
        "Starting {} ({:?}, {}) from {}",
        config.app_name,
        config.platform,
        if config.content.is_development() { "development" } else { "packaged" },
        config.content.load_url()
    );

    let own_path = std::env::current_exe().unwrap_or_default();
    let launch_url = launch::launch_url(cli.target.as_deref(), &own_path);

    let app = adw::Application::builder()
        .application_id(APP_ID)
        .flags(gio::ApplicationFlags::HANDLES_OPEN)
        .build();

    let shell = Shell {
        app: app.clone(),
        controller: Rc::new(RefCell::new(
            AppController::from_config(&config, launch_url.clone()).with_spawner(window::GioSpawner),
        )),
        platform: config.platform,
        app_name: config.app_name.clone(),
        hold: Rc::new(RefCell::new(None)),
    };

    {
        let shell = shell.clone();
        app.connect_startup(move |app| {
            if !shell.platform.policy().quit_on_last_window_closed {
                *shell.hold.borrow_mut() = Some(app.hold());
            }
            let ready = shell.controller.borrow_mut().on_ready();
            if ready {
                window::open(&shell, WindowOrigin::Startup);
            }
        });
    }

    {
        let shell = shell.clone();
        app.connect_activate(move |_app| {
            let create = shell.controller.borrow_mut().on_activate();
            if create {
                window::open(&shell, WindowOrigin::Activation);
            }
        });
    }

    {
        let shell = shell.clone();
        app.connect_open(move |_app, files, _hint| {
            for file in files {
                let uri = file.uri();
                shell.controller.borrow_mut().on_open_url(&uri);
            }
        });
    }

    // Options are parsed above. GTK only sees the URL to open so that a second
    // launch forwards it to the running instance.
    let program = std::env::args().next().unwrap_or_else(|| "min".to_string());
    let mut gtk_args = vec![program];
    gtk_args.extend(launch_url);
    app.run_with_args(&gtk_args)
}
