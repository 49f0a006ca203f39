use std::io::{self, BufRead};
use std::sync::Arc;
use std::thread;

use crate::app::dispatcher::EventLoop;
use crate::app::router::{self, Mode};
use crate::app::state::AppState;
use crate::app::Engine;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::Store;
use crate::errors::AppResult;
use crate::hardware::{TagCallback, TagReader};
use crate::ui::console::ConsoleUi;
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Run { mock } = cmd {
        let store = Arc::new(Store::open(&cfg.database)?);
        let (event_loop, dispatcher) = EventLoop::new();

        // The reader worker thread must not touch any state itself; its
        // callback forwards the tag onto the event loop and returns.
        let scan_dispatcher = dispatcher.clone();
        let on_tag: TagCallback = Arc::new(move |tag: String| {
            scan_dispatcher.post(move |engine, d| router::handle_scan(engine, d, &tag));
        });

        let mut reader = TagReader::open(on_tag, cfg.poll_interval(), *mock);
        let feedback = reader.feedback();
        reader.start();

        let mut engine = Engine {
            store: store.clone(),
            state: AppState::from_config(cfg),
            ui: Box::new(ConsoleUi::new()),
            feedback,
        };

        // First run: the kiosk may not open for business until an
        // administrator exists.
        if store.get_admin_count()? == 0 {
            engine.ui.set_mode(Mode::Register);
            engine.ui.show_info(
                "Welcome",
                "No administrator registered yet. Scan a fresh badge, then register it with add-employee --admin.",
            );
        }

        if *mock {
            // Feed stdin lines as scans; EOF or "quit" stops the engine.
            info("Mock mode: type tag ids on stdin (\"quit\" to exit).");
            let stdin_dispatcher = dispatcher.clone();
            thread::spawn(move || {
                let stdin = io::stdin();
                for line in stdin.lock().lines() {
                    let Ok(line) = line else { break };
                    let tag = line.trim().to_string();
                    if tag.is_empty() {
                        continue;
                    }
                    if tag.eq_ignore_ascii_case("quit") {
                        break;
                    }
                    stdin_dispatcher
                        .post(move |engine, d| router::handle_scan(engine, d, &tag));
                }
                stdin_dispatcher.stop();
            });
        }

        event_loop.run(&mut engine);

        reader.stop();
        success("Engine stopped.");
    }

    Ok(())
}
