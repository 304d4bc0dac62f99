use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, update};
use crate::app::update::refresh_preview;
use crate::diagram::{DiagramWorker, RenderRequest};

/// Holds pending diagram render requests until typing settles.
///
/// Batches merge per slot: a newer request for a slot replaces the pending
/// one, while requests for other slots stay queued. Each new batch restarts
/// the delay clock.
pub(super) struct EditDebouncer {
    delay_ms: u64,
    pending: Option<(Vec<RenderRequest>, u64)>,
}

impl EditDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) fn queue(&mut self, requests: Vec<RenderRequest>, now_ms: u64) {
        if requests.is_empty() {
            return;
        }
        match &mut self.pending {
            Some((queued, queued_at)) => {
                for request in requests {
                    if let Some(existing) = queued.iter_mut().find(|r| r.slot == request.slot) {
                        *existing = request;
                    } else {
                        queued.push(request);
                    }
                }
                *queued_at = now_ms;
            }
            None => self.pending = Some((requests, now_ms)),
        }
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<Vec<RenderRequest>> {
        let (_, queued_at) = self.pending.as_ref()?;
        if now_ms.saturating_sub(*queued_at) >= self.delay_ms {
            self.pending.take().map(|(requests, _)| requests)
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization or event polling fails.
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal; markpane requires an interactive terminal")?;
        let size = terminal.size()?;

        let mut model = Model::new(
            &self.initial_text,
            self.content_mode,
            self.layout,
            self.separator,
            (size.width, size.height),
        );
        model.ascii_diagrams = self.ascii_diagrams;

        let result = self.event_loop(&mut terminal, &mut model);

        ratatui::restore();
        result
    }

    fn event_loop(&self, terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let start = Instant::now();
        let mut debouncer = EditDebouncer::new(self.debounce_ms);
        let worker = DiagramWorker::spawn(crate::diagram::DiagramConfig {
            ascii: self.ascii_diagrams,
        })
        .context("Failed to start the diagram render thread")?;
        let mut needs_render = true;

        // Initial render of whatever the buffer starts with. The first
        // diagram batch skips the debounce delay.
        for request in refresh_preview(model) {
            worker.submit(request);
        }

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            if let Some(requests) = debouncer.take_ready(now_ms) {
                for request in requests {
                    worker.submit(request);
                }
            }

            for result in worker.drain_results() {
                *model = update(std::mem::take(model), Message::DiagramResult(result));
                needs_render = true;
            }

            let poll_ms = if needs_render {
                0
            } else if debouncer.is_pending() {
                10
            } else {
                250
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                let msg = self.handle_event(&event::read()?, model);
                if let Some(msg) = msg {
                    self.apply(model, msg);
                    needs_render = true;
                }

                // Coalesce key repeat bursts into a single render.
                while event::poll(Duration::from_millis(0))? {
                    if let Some(msg) = self.handle_event(&event::read()?, model) {
                        self.apply(model, msg);
                        needs_render = true;
                    }
                }
            }

            if model.preview_dirty {
                let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                let requests = refresh_preview(model);
                debouncer.queue(requests, event_ms);
                needs_render = true;
            }

            if needs_render {
                terminal.draw(|frame| crate::ui::view(model, frame))?;
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }

    fn apply(&self, model: &mut Model, msg: Message) {
        let side_msg = msg.clone();
        *model = update(std::mem::take(model), msg);
        super::effects::handle_message_side_effects(model, &side_msg);
    }
}
