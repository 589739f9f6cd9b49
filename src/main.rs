mod daemon;
mod dispatch;
#[cfg(test)]
mod testing;

use clap::Parser;
use daemon::{Daemon, TickOutcome};
use dispatch::ActuationDispatcher;
use hinge_config::DaemonConfig;
use hinge_display::{PointerDevices, PwmLed, XrandrController};
use hinge_input::{DriverBinding, PanelSwitch, SysfsBinder};
use hinge_posture::Classifier;
use hinge_sensor::{FusionEngine, IioReader};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Exit status when the accelerometers cannot be located at startup.
const EXIT_SENSORS_MISSING: u8 = 11;

/// Rotates the screen and switches input panels of a convertible laptop
/// from its accelerometers.
#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    /// Do not log the per-tick sensor summary.
    #[arg(short, long)]
    quiet: bool,
    /// Configuration override file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "hinge_daemon=info,hinge_sensor=info,hinge_display=info,hinge_input=info,hinge_config=info"
                    .into()
            }),
        )
        .init();

    info!("Convertible orientation daemon starting");

    let config = match hinge_config::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) if cli.config.is_none() => {
            warn!(?e, "Failed to load config, using defaults");
            DaemonConfig::default()
        }
        Err(e) => {
            error!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    let reader = match IioReader::open(&config.sensors.iio_root) {
        Ok(reader) => reader,
        Err(e) => {
            error!(%e, "Accelerometers not available");
            return ExitCode::from(EXIT_SENSORS_MISSING);
        }
    };

    let mut daemon = build_daemon(&config, reader).with_report(!cli.quiet);
    info!(
        interval_ms = config.poll_interval_ms,
        action = ?config.formfactor_action,
        rotation = config.rotation.enabled,
        "Polling started"
    );

    match run(&mut daemon, Duration::from_millis(config.poll_interval_ms)).await {
        Ok(()) => {
            info!(state = ?daemon.state(), "Shutting down");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(?e, "Signal handling failed");
            ExitCode::FAILURE
        }
    }
}

type HingeDaemon = Daemon<IioReader, XrandrController, SysfsBinder>;

fn build_daemon(config: &DaemonConfig, reader: IioReader) -> HingeDaemon {
    let keyboard = &config.virtual_keyboard;
    let screen = XrandrController::new(
        config.rotation.output.clone(),
        PointerDevices {
            names: config.rotation.pointer_devices.clone(),
            prefixes: config.rotation.pointer_device_prefixes.clone(),
        },
    )
    .with_keyboards(
        keyboard.devices.clone(),
        Some(PwmLed::new(
            keyboard.led_period_path.clone(),
            keyboard.led_duty_cycle_path.clone(),
        )),
    );

    let panels = PanelSwitch::new(
        DriverBinding::new(
            config.panels.touch.driver_path.clone(),
            config.panels.touch.device.clone(),
        ),
        DriverBinding::new(
            config.panels.pen.driver_path.clone(),
            config.panels.pen.device.clone(),
        ),
    );

    let dispatcher = ActuationDispatcher::new(
        screen,
        SysfsBinder,
        panels,
        config.rotation.enabled,
        config.formfactor_action,
    );

    Daemon::new(
        reader,
        FusionEngine::new(config.sensors.fault_threshold),
        Classifier::new(config.classifier),
        dispatcher,
    )
}

/// Tick until SIGINT or SIGTERM. Each tick completes before the next wait.
async fn run(daemon: &mut HingeDaemon, period: Duration) -> anyhow::Result<()> {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut terminate =
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => match daemon.tick() {
                TickOutcome::Dropped(e) => debug!(%e, "Tick dropped"),
                TickOutcome::Classified { classification, transition } if !transition.is_empty() => {
                    info!(
                        orientation = %classification.orientation,
                        formfactor = %classification.formfactor,
                        tilt = classification.relative_tilt,
                        ?transition,
                        "Posture changed"
                    );
                }
                TickOutcome::Classified { .. } => {}
            },
            result = &mut ctrl_c => {
                result?;
                return Ok(());
            }
            _ = terminate.recv() => return Ok(()),
        }
    }
}
