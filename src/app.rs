use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Sender, TrySendError};
use crossterm::event::{self, Event, KeyEventKind};

use crate::config::Config;
use crate::persistence::Persistence;
use crate::render::RenderState;
use crate::tea::{update, Command, Message, Model};
use crate::{qlog_debug, qlog_error, qlog_trace, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Owns the model and the session store. Reads terminal events, runs them
/// through `update`, executes the resulting commands, and publishes
/// snapshots to the render thread.
pub struct LogicThread;

impl LogicThread {
    pub fn run(
        config: Config,
        persistence: Persistence,
        state_tx: Sender<RenderState>,
        shutdown: Arc<AtomicBool>,
    ) -> Result<()> {
        qlog_debug!(
            "LogicThread::run key={} attached={}",
            persistence.key(),
            persistence.is_attached()
        );
        let mut model = Model::load(config, &persistence);
        qlog_debug!("Model loaded: {} tasks", model.tasks.len());

        send_state(&state_tx, &model);
        model.dirty = false;

        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            if event::poll(POLL_INTERVAL)? {
                let msg = match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        qlog_trace!("key {:?} mode={:?}", key.code, model.mode);
                        Message::Key(key)
                    }
                    Event::Resize(w, h) => Message::Resize(w, h),
                    _ => continue,
                };

                if dispatch(&mut model, &persistence, msg) {
                    shutdown.store(true, Ordering::Relaxed);
                    return Ok(());
                }
            }

            publish(&state_tx, &mut model);
        }

        Ok(())
    }
}

/// Feed `msg` to `update` and execute commands until no follow-up
/// messages remain. Returns true when a command asked to quit.
pub fn dispatch(model: &mut Model, persistence: &Persistence, msg: Message) -> bool {
    let mut queue = VecDeque::from([msg]);

    while let Some(msg) = queue.pop_front() {
        for cmd in update(model, msg) {
            if execute_command(model, persistence, cmd, &mut queue) {
                return true;
            }
        }
    }

    false
}

fn execute_command(
    model: &Model,
    persistence: &Persistence,
    cmd: Command,
    queue: &mut VecDeque<Message>,
) -> bool {
    match cmd {
        Command::SaveTasks => {
            qlog_debug!("Command::SaveTasks tasks={}", model.tasks.len());
            match persistence.save(&model.tasks) {
                Ok(()) => queue.push_back(Message::TasksSaved),
                Err(e) => {
                    qlog_error!("Task save failed: {}", e);
                    queue.push_back(Message::TasksSaveFailed(e.to_string()));
                }
            }
        }

        Command::Quit => {
            qlog_debug!("Command::Quit");
            return true;
        }
    }

    false
}

/// Send a snapshot if the model changed. While the render thread still
/// holds the previous one the model stays dirty and the send is retried
/// on the next tick.
fn publish(state_tx: &Sender<RenderState>, model: &mut Model) {
    if model.dirty && send_state(state_tx, model) {
        model.dirty = false;
    }
}

/// Returns false when the channel is full and the snapshot was dropped.
fn send_state(state_tx: &Sender<RenderState>, model: &Model) -> bool {
    !matches!(
        state_tx.try_send(model.snapshot()),
        Err(TrySendError::Full(_))
    )
}
