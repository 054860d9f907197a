#![warn(clippy::pedantic)]

pub mod script;
pub mod settings;

use anyhow::Result as AnyResult;

fn main() -> AnyResult<()> {
    let has_term = std::io::IsTerminal::is_terminal(&std::io::stdin());
    // Log to a terminal, if available. Else, log to "log.out" in the working directory.
    if has_term {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        let _ = simple_logging::log_to_file("log.out", log::LevelFilter::Debug);
    }

    let settings = settings::Settings::get();
    if settings.did_fail_to_load() {
        // Leave a documented default file behind for the user to edit.
        if let Err(e) = settings.save() {
            log::warn!("Failed to save settings:\n{e:?}");
        }
    }

    // Args are a simple list of replay scripts.
    // Paths are OSStrings, let the system handle character encoding restrictions.
    let paths: Vec<std::path::PathBuf> = std::env::args_os().skip(1).map(Into::into).collect();
    if paths.is_empty() {
        log::warn!("No scripts given, nothing to do.");
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    let failures = runtime.block_on(async {
        let mut failures = 0usize;
        for path in &paths {
            match script::run_path(path, &settings.preferences).await {
                Ok(report) => {
                    log::info!(
                        "{}: {} events, wrote {} files",
                        path.display(),
                        report.events.len(),
                        report.written.len()
                    );
                }
                Err(e) => {
                    log::error!("failed to run script {path:?}: {e:#}");
                    failures += 1;
                }
            }
        }
        failures
    });

    if failures > 0 {
        anyhow::bail!("{failures} of {} scripts failed", paths.len());
    }
    Ok(())
}
