//zbook/src/main.rs
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use zbook::kernel::services::adapters::{
    ensure_settings_file, load_settings, HeadlessPrompter, LocalNotebookStorage, NullEvaluator,
    ProcessEvaluator,
};
use zbook::kernel::services::ports::{Evaluator, NotebookSettings, SaveChoice};
use zbook::kernel::{CommandOutcome, EngineMessage, NotebookEditor};
use zbook::models::{Notebook, StorageId};

mod logging;

const USAGE: &str = "usage: zbook <notebook.json> [--run] [--upgrade]";

struct Options {
    path: PathBuf,
    run: bool,
    upgrade: bool,
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut path = None;
    let mut run = false;
    let mut upgrade = false;

    for arg in args {
        match arg.as_str() {
            "--run" => run = true,
            "--upgrade" => upgrade = true,
            "-h" | "--help" => return Err(USAGE.to_string()),
            flag if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
            _ if path.is_some() => return Err(format!("unexpected argument {arg}")),
            _ => path = Some(PathBuf::from(arg)),
        }
    }

    let path = path.ok_or_else(|| "missing notebook path".to_string())?;
    Ok(Options { path, run, upgrade })
}

fn main() -> ExitCode {
    let options = match parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    let logging = logging::init();
    if let Err(e) = ensure_settings_file() {
        tracing::warn!(error = %e, "settings file unavailable, using defaults");
    }
    let settings = load_settings();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("zbook: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };
    let local = tokio::task::LocalSet::new();
    if local.block_on(&runtime, run(options, settings)) {
        return ExitCode::SUCCESS;
    }
    if let Some(guard) = &logging {
        eprintln!("{}", guard.failure_hint());
    }
    ExitCode::FAILURE
}

async fn run(options: Options, settings: NotebookSettings) -> bool {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<EngineMessage>();
    let evaluator: Rc<dyn Evaluator> = if options.run {
        if !settings.has_engine() {
            eprintln!("zbook: --run needs `engine_command` in the settings file");
            return false;
        }
        match ProcessEvaluator::spawn(&settings.engine_command, tx) {
            Ok(evaluator) => Rc::new(evaluator),
            Err(e) => {
                eprintln!("zbook: {e}");
                return false;
            }
        }
    } else {
        drop(tx);
        Rc::new(NullEvaluator)
    };

    let storage = Rc::new(LocalNotebookStorage::new(settings.pretty_json));
    let prompter = Rc::new(HeadlessPrompter::new(SaveChoice::Cancel));
    let editor = NotebookEditor::new(storage, evaluator, prompter, settings);

    let id = StorageId::path(&options.path);
    if editor.open_specific(id).await != CommandOutcome::Done {
        return false;
    }

    if options.upgrade {
        if editor.save_notebook().await != CommandOutcome::Done {
            return false;
        }
        println!("upgraded {}", options.path.display());
    }

    if options.run {
        if editor.evaluate_notebook().await != CommandOutcome::Done {
            return false;
        }
        while editor.with_notebook(Notebook::is_executing).unwrap_or(false) {
            match rx.recv().await {
                Some(message) => editor.handle_engine_message(message),
                None => {
                    tracing::warn!("evaluation engine exited before the notebook completed");
                    break;
                }
            }
        }
        editor.with_notebook(print_results);
    }

    true
}

fn print_results(notebook: &Notebook) {
    for (index, cell) in notebook.cells().iter().enumerate() {
        if !cell.is_code() {
            continue;
        }
        if cell.outputs().is_empty() && cell.errors().is_empty() {
            continue;
        }
        println!("[{}] {}", index + 1, cell.id());
        for output in cell.outputs() {
            match &output.value {
                serde_json::Value::String(text) => println!("{text}"),
                value => println!("{value}"),
            }
        }
        for error in cell.errors() {
            match &error.location {
                Some(location) => println!(
                    "error ({}:{}): {}",
                    location.line, location.column, error.msg
                ),
                None => println!("error: {}", error.msg),
            }
        }
    }
}
