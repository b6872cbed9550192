//! Main app runner for the recording session

use std::env;
use std::io::BufRead;
use std::process::ExitCode;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::ports::{ConfigStore, DeviceDirectory, PresenceIndicator};
use crate::application::SessionController;
use crate::domain::config::AppConfig;
use crate::domain::recording::DeviceId;
use crate::domain::session::SessionStatus;
use crate::infrastructure::{
    CpalDeviceDirectory, CpalEngineFactory, NotifyRustPresence, RestUploadSink, SurfaceHandle,
    TerminalPresence, XdgConfigStore,
};

use super::args::RecordOptions;
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// How the interactive loop ended
enum LoopOutcome {
    /// User asked to stop and keep the recording
    Stop,
    /// User discarded the session (q or Ctrl-C)
    Quit,
    /// Engine finalized on its own
    Completed,
    /// Capture pipeline faulted
    Faulted,
}

/// Run an interactive recording session
pub async fn run_record(options: RecordOptions) -> ExitCode {
    if options.notify {
        run_with_presence(options, NotifyRustPresence::new()).await
    } else {
        run_with_presence(options, TerminalPresence::new()).await
    }
}

async fn run_with_presence<P: PresenceIndicator>(options: RecordOptions, presence: P) -> ExitCode {
    let mut presenter = Presenter::new();

    // A CLI process has no mount phase, so the surface starts ready
    let surface = Arc::new(SurfaceHandle::mounted());
    let controller = SessionController::new(
        CpalEngineFactory::new(),
        CpalDeviceDirectory::new(),
        presence,
        surface,
    );

    if let Err(e) = controller.initialize().await {
        presenter.error(&format!("Failed to set up capture: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }

    let devices = controller.devices().await;
    if devices.is_empty() {
        presenter.warn("No input devices listed; using system default");
    } else {
        presenter.info("Input devices:");
        for (i, device) in devices.iter().enumerate() {
            presenter.device_entry(i + 1, &device.label, i == 0);
        }
    }

    if let Some(label) = &options.device {
        if devices.is_empty() || devices.iter().any(|d| d.label == *label) {
            controller
                .select_device(Some(DeviceId::from(label.as_str())))
                .await;
        } else {
            presenter.warn(&format!(
                "Device '{}' not found; using system default",
                label
            ));
        }
    }
    controller.set_title(options.title.clone()).await;

    if let Err(e) = controller.start().await {
        presenter.error(&format!("Failed to start recording: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }
    presenter.start_spinner("Recording...");

    // Forward stdin lines so keyboard control composes with select!
    let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    let outcome = session_loop(&controller, &presenter, &mut line_rx).await;

    match outcome {
        LoopOutcome::Quit => {
            presenter.stop_spinner();
            controller.discard_and_close().await;
            presenter.info("Recording discarded");
            ExitCode::from(EXIT_SUCCESS)
        }
        LoopOutcome::Faulted => {
            presenter.spinner_fail("Capture failed");
            controller.discard_and_close().await;
            ExitCode::from(EXIT_ERROR)
        }
        LoopOutcome::Stop | LoopOutcome::Completed => {
            if matches!(outcome, LoopOutcome::Stop) {
                if let Err(e) = controller.stop().await {
                    presenter.spinner_fail(&format!("Failed to stop recording: {}", e));
                    controller.discard_and_close().await;
                    return ExitCode::from(EXIT_ERROR);
                }
            }

            let size = controller
                .payload_size_display()
                .await
                .unwrap_or_else(|| "0 B".to_string());
            presenter.spinner_success(&format!("Recording complete ({})", size));

            submit_loop(&controller, &mut presenter, &mut line_rx, &options).await
        }
    }
}

/// Drive the recording until the user stops, quits, or the engine ends it
async fn session_loop<F, D, P>(
    controller: &SessionController<F, D, P>,
    presenter: &Presenter,
    line_rx: &mut mpsc::UnboundedReceiver<String>,
) -> LoopOutcome
where
    F: crate::application::ports::EngineFactory,
    D: DeviceDirectory,
    P: PresenceIndicator,
{
    let mut ticker = tokio::time::interval(std::time::Duration::from_millis(200));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                controller.pump_events().await;
                let elapsed = controller.elapsed_ms().await;
                match controller.status().await {
                    SessionStatus::Recording => {
                        presenter.update_recording_status("recording", elapsed);
                    }
                    SessionStatus::Paused => {
                        presenter.update_recording_status("paused", elapsed);
                    }
                    SessionStatus::Completed => return LoopOutcome::Completed,
                    SessionStatus::Idle => return LoopOutcome::Faulted,
                }
            }
            line = line_rx.recv() => {
                let Some(line) = line else { return LoopOutcome::Stop };
                match line.trim() {
                    "p" => {
                        if let Err(e) = controller.pause().await {
                            presenter.warn(&format!("Pause failed: {}", e));
                        }
                    }
                    "r" => {
                        if let Err(e) = controller.resume().await {
                            presenter.warn(&format!("Resume failed: {}", e));
                        }
                    }
                    "" | "s" => return LoopOutcome::Stop,
                    "q" => return LoopOutcome::Quit,
                    other => {
                        presenter.warn(&format!(
                            "Unknown command '{}': use p, r, s, or q",
                            other
                        ));
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => return LoopOutcome::Quit,
        }
    }
}

/// Upload the completed recording, offering a retry on failure
async fn submit_loop<F, D, P>(
    controller: &SessionController<F, D, P>,
    presenter: &mut Presenter,
    line_rx: &mut mpsc::UnboundedReceiver<String>,
    options: &RecordOptions,
) -> ExitCode
where
    F: crate::application::ports::EngineFactory,
    D: DeviceDirectory,
    P: PresenceIndicator,
{
    let sink = RestUploadSink::new(&options.server_url, &options.api_key);

    loop {
        presenter.start_spinner("Uploading...");
        match controller.submit(&sink).await {
            Ok(()) => {
                presenter.spinner_success("Recording uploaded");
                return ExitCode::from(EXIT_SUCCESS);
            }
            Err(e) => {
                presenter.spinner_fail(&format!("Upload failed: {}", e));
                presenter.output_inline("Retry upload? [y/N] ");
                let retry = matches!(
                    line_rx.recv().await.as_deref().map(str::trim),
                    Some("y") | Some("Y") | Some("yes")
                );
                if !retry {
                    controller.discard_and_close().await;
                    return ExitCode::from(EXIT_ERROR);
                }
            }
        }
    }
}

/// List available input devices
pub async fn run_devices() -> ExitCode {
    let presenter = Presenter::new();
    let directory = CpalDeviceDirectory::new();

    match directory.list().await {
        Ok(devices) => {
            for (i, device) in devices.iter().enumerate() {
                presenter.device_entry(i + 1, &device.label, i == 0);
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&format!("Device enumeration failed: {}", e));
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Get API key from environment or config file
pub async fn get_api_key() -> Result<String, String> {
    // Check environment first
    if let Ok(key) = env::var("SCRIBE_API_KEY") {
        if !key.is_empty() {
            return Ok(key);
        }
    }

    // Check config file
    let store = XdgConfigStore::new();
    let config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    config.api_key.ok_or_else(|| {
        "Missing API key. Set SCRIBE_API_KEY environment variable or run 'scribe-booth config set api_key <key>'".to_string()
    })
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    // Build env config
    let env_config = AppConfig {
        api_key: env::var("SCRIBE_API_KEY").ok().filter(|s| !s.is_empty()),
        server_url: env::var("SCRIBE_SERVER_URL").ok().filter(|s| !s.is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}
