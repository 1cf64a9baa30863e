//! Live re-run of a scenario file
//!
//! Watches the scenario with `notify` and re-runs it after every
//! modification, printing the new summary or the load error.

use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc;
use tracing::{debug, warn};

pub fn watch_file(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        // Receiver gone means we are shutting down
        let _ = tx.send(res);
    })?;
    watcher.watch(file, RecursiveMode::NonRecursive)?;

    rerun(file);
    eprintln!("Watching {} (Ctrl-C to stop)", file.display());

    for event in rx {
        match event {
            Ok(Event {
                kind: EventKind::Modify(_) | EventKind::Create(_),
                paths,
                ..
            }) => {
                debug!(?paths, "scenario changed");
                rerun(file);
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "file watcher error"),
        }
    }

    Ok(())
}

fn rerun(file: &Path) {
    match crate::load_and_run(file) {
        Ok(result) => crate::print_summary(&result),
        Err(e) => eprintln!("Error: {}", e),
    }
}
