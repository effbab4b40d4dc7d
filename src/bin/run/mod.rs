mod options;

use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

use brdgen::api::{
    AnalysisBackend, FileBlob, GenerateRequest, HttpBackend, UploadCategory, UploadFiles,
    fetch_history,
};
use brdgen::auth::{AuthGate, Credentials, LoginOrigin, provider_from_config};
use brdgen::config::AppConfig;
use brdgen::dashboard::DashboardView;
use brdgen::pipeline::{
    Clock, InstantClock, PipelineEvent, PipelineSequencer, STAGES, SystemClock,
};
use brdgen::storage::{IdentityStore, SessionStore};

pub(crate) fn run(args: Vec<String>) -> Result<(), String> {
    let Some(options) = options::parse_args(args)? else {
        return Ok(());
    };
    let mut config = AppConfig::load().map_err(|err| format!("Failed to load config: {err}"))?;
    if options.demo {
        config.demo_mode = true;
    }

    let identities =
        IdentityStore::open_default().map_err(|err| format!("Identity store: {err}"))?;
    let gate = AuthGate::new(Arc::from(provider_from_config(&config)), identities, config.demo_mode);
    let outcome = gate
        .login(&Credentials::new(&options.email, &options.password))
        .map_err(|err| format!("Sign-in failed: {err}"))?;
    let origin = match outcome.origin {
        LoginOrigin::Remote => "remote",
        LoginOrigin::Demo => "offline demo",
    };
    println!("Signed in as {} ({}, {origin})", outcome.identity.name, outcome.identity.uid);

    let mut files = UploadFiles::default();
    for category in UploadCategory::ALL {
        if let Some(path) = options.file(category) {
            let blob = FileBlob::read(path)
                .map_err(|err| format!("Read {} failed: {err}", path.display()))?;
            files.set(category, Some(blob));
        }
    }

    let backend: Arc<dyn AnalysisBackend> = Arc::new(HttpBackend::new(&config));
    let session = Arc::new(SessionStore::new());
    let clock: Arc<dyn Clock> = if options.fast {
        Arc::new(InstantClock::new())
    } else {
        Arc::new(SystemClock)
    };
    let (events_tx, events_rx) = mpsc::channel();
    let handle = PipelineSequencer::new(Arc::clone(&backend), Arc::clone(&session), clock)
        .with_events(events_tx)
        .spawn(GenerateRequest {
            project_name: options.project.clone(),
            files,
        })
        .map_err(|err| err.user_message())?;

    let printer = thread::spawn(move || {
        while let Ok(event) = events_rx.recv() {
            print_event(&event);
        }
    });
    let outcome = handle.join();
    let _ = printer.join();
    outcome.map_err(|err| err.user_message())?;

    let history = fetch_history(backend.as_ref());
    let stored = session.current();
    let view = DashboardView::project(stored.as_ref().map(|s| &s.payload.result), &history);
    println!();
    print!("{view}");
    Ok(())
}

fn print_event(event: &PipelineEvent) {
    match event {
        PipelineEvent::StageActivated { index } => {
            let stage = &STAGES[*index];
            println!("[{}/{}] {}", stage.id, STAGES.len(), stage.name);
        }
        PipelineEvent::Log(line) => println!("      {line}"),
        PipelineEvent::StageFailed { index } => {
            println!("[{}/{}] failed", STAGES[*index].id, STAGES.len());
        }
        PipelineEvent::Failed { message } => eprintln!("{message}"),
        PipelineEvent::Done => println!("Pipeline complete."),
        PipelineEvent::StageCompleted { .. } | PipelineEvent::ResultStored { .. } => {}
    }
}
